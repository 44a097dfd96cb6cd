//! growbit CLI: drive the habit tracker against the local data directory.

use clap::{Parser, Subcommand};
use growbit::clock::SystemClock;
use growbit::config::Config;
use growbit::engine::{Tracker, TrackerConfig};
use growbit::model::{HabitId, NewHabit};
use growbit::stats;
use growbit::store::FileStore;
use growbit::telemetry::{TelemetryConfig, init_telemetry};

type HabitTracker = Tracker<FileStore, SystemClock>;

#[derive(Parser)]
#[command(name = "growbit", about = "Grow habits one day at a time")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new habit
    Add {
        /// Habit name (1-50 characters)
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Mark a habit done for today
    Complete {
        /// Habit ID (full UUID or prefix)
        id: String,
    },
    /// Undo today's completion
    Uncomplete {
        /// Habit ID (full UUID or prefix)
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID (full UUID or prefix)
        id: String,
    },
    /// List habits
    List,
    /// Show a habit
    Show {
        /// Habit ID (full UUID or prefix)
        id: String,
    },
    /// Dashboard numbers and recent history
    Stats {
        /// Days of history to show
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Show the user profile and badges
    Profile {
        /// Rename the profile
        #[arg(long)]
        name: Option<String>,
    },
    /// Toggle between light and dark theme
    Theme,
    /// Add the sample habits
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "growbit".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let mut tracker = Tracker::open(
        FileStore::new(config.data_dir.clone()),
        SystemClock,
        TrackerConfig {
            badges: config.badge_catalog()?,
            user_name: config.user_name.clone(),
        },
    );

    match cli.command {
        Command::Add {
            name,
            description,
            category,
            icon,
            color,
        } => {
            let mut new = NewHabit::new(name);
            if let Some(d) = description {
                new = new.description(d);
            }
            if let Some(c) = category {
                new = new.category(c);
            }
            if let Some(i) = icon {
                new = new.icon(i);
            }
            if let Some(c) = color {
                new = new.color(c);
            }
            let habit = tracker.add_habit(new)?;
            println!("Created: {} ({})", habit.name, habit.id.short());
        }
        Command::Complete { id } => cmd_complete(&mut tracker, &id)?,
        Command::Uncomplete { id } => {
            let id = resolve_id(&tracker, &id)?;
            match tracker.uncomplete_habit(&id) {
                Some(r) => println!(
                    "Undone: streak {} (-{} XP, level {})",
                    r.streak, r.xp_removed, r.level.level
                ),
                None => println!("Not completed today; nothing to undo."),
            }
        }
        Command::Delete { id } => {
            let id = resolve_id(&tracker, &id)?;
            if let Some(habit) = tracker.delete_habit(&id) {
                println!("Deleted: {}", habit.name);
            }
        }
        Command::List => cmd_list(&tracker),
        Command::Show { id } => cmd_show(&tracker, &id)?,
        Command::Stats { days } => cmd_stats(&tracker, days),
        Command::Profile { name } => {
            if let Some(ref name) = name {
                tracker.rename_user(name)?;
            }
            cmd_profile(&tracker);
        }
        Command::Theme => println!("Theme: {}", tracker.toggle_theme()),
        Command::Seed => println!("Seeded {} habits", tracker.seed_demo()),
    }

    if !tracker.is_durable() {
        eprintln!(
            "warning: changes could not be saved to {}",
            tracker.store().dir().display()
        );
    }
    tracker.close();
    Ok(())
}

/// Accept a full id or a unique prefix of one.
fn resolve_id(tracker: &HabitTracker, id_str: &str) -> anyhow::Result<HabitId> {
    let habits = tracker.habits();
    if let Some(habit) = habits.iter().find(|h| h.id.as_str() == id_str) {
        return Ok(habit.id.clone());
    }
    let matches: Vec<_> = habits
        .iter()
        .filter(|h| h.id.as_str().starts_with(id_str))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("no habit matching '{id_str}'"),
        1 => Ok(matches[0].id.clone()),
        n => anyhow::bail!("{n} habits match prefix '{id_str}', be more specific"),
    }
}

fn cmd_complete(tracker: &mut HabitTracker, id_str: &str) -> anyhow::Result<()> {
    let id = resolve_id(tracker, id_str)?;
    let Some(done) = tracker.complete_habit(&id) else {
        println!("Already completed today.");
        return Ok(());
    };

    println!(
        "Completed: streak {} (best {}), +{} XP",
        done.streak, done.best_streak, done.xp_awarded
    );
    if done.leveled_up {
        println!("Level up! Now level {}", done.level.level);
    }
    for badge_id in &done.unlocked_badges {
        if let Some(badge) = tracker.user().badge(badge_id) {
            println!("Badge unlocked: {} {}", badge.icon, badge.name);
        }
    }
    Ok(())
}

fn cmd_list(tracker: &HabitTracker) {
    let habits = tracker.habits();
    if habits.is_empty() {
        println!("No habits yet.");
        return;
    }

    println!(
        "{:<8}  {:<30}  {:<5}  {:<6}  {:<4}  {:<6}  TODAY",
        "ID", "NAME", "STRK", "BEST", "XP", "ACTIVE"
    );
    println!("{}", "-".repeat(80));

    for habit in &habits {
        let info = tracker.streak_info(habit);
        let name: String = habit.name.chars().take(30).collect();
        println!(
            "{:<8}  {:<30}  {:<5}  {:<6}  {:<4}  {:<6}  {}",
            habit.id.short(),
            name,
            habit.streak,
            habit.best_streak,
            habit.xp,
            if info.is_currently_active { "yes" } else { "no" },
            if habit.completed_today { "done" } else { "-" }
        );
    }

    println!("\n{} habit(s)", habits.len());
}

fn cmd_show(tracker: &HabitTracker, id_str: &str) -> anyhow::Result<()> {
    let id = resolve_id(tracker, id_str)?;
    let Some(habit) = tracker.habit(&id) else {
        anyhow::bail!("no habit {id}");
    };
    let info = tracker.streak_info(&habit);

    println!("ID:          {}", habit.id);
    println!("Name:        {}", habit.name);
    println!("Description: {}", habit.description.as_deref().unwrap_or("-"));
    println!("Category:    {}", habit.category.as_deref().unwrap_or("-"));
    println!("Streak:      {}", habit.streak);
    println!("Best:        {}", habit.best_streak);
    println!("XP:          {}", habit.xp);
    println!("Created:     {}", habit.created_at);
    println!(
        "Last done:   {}",
        info.last_completed
            .map(|d| d.to_string())
            .unwrap_or("-".to_string())
    );
    println!("Active:      {}", info.is_currently_active);
    println!("Completions: {}", habit.completions());
    Ok(())
}

fn cmd_stats(tracker: &HabitTracker, days: u32) {
    let today = tracker.today();
    let habits = tracker.habits();
    let summary = stats::summary(&habits, today);

    println!(
        "Today:        {}/{} ({}%)",
        summary.completed_today, summary.habits, summary.today_percent
    );
    println!("Streak:       {} days", summary.longest_current_streak);
    println!("Best streak:  {} days", summary.longest_best_streak);
    println!("Avg streak:   {} days", summary.average_streak);
    println!("Completions:  {}", summary.total_completions);
    println!("Total XP:     {} (level {})", summary.total_xp, summary.level);
    println!("---");
    for stat in stats::daily_history(&habits, today, days) {
        println!("{}  {:>3}%  {}", stat.day, stat.rate, "#".repeat(stat.completed));
    }
}

fn cmd_profile(tracker: &HabitTracker) {
    let user = tracker.user();
    let level = tracker.level();

    println!("Name:        {}", user.name);
    println!("Joined:      {}", user.joined_at.format("%Y-%m-%d"));
    println!(
        "Level:       {} ({} XP, {} to next)",
        user.level, user.xp, user.xp_to_next_level
    );
    println!("Progress:    {:.0}%", level.progress() * 100.0);
    println!("Completed:   {}", user.total_habits_completed);
    println!("Longest:     {} days", user.longest_streak);
    println!("Theme:       {}", user.theme);
    println!("---");
    for badge in &user.badges {
        let status = match badge.unlocked_at {
            Some(at) if badge.unlocked => format!("unlocked {}", at.format("%Y-%m-%d")),
            _ => format!("{} >= {}", badge.requirement.kind, badge.requirement.value),
        };
        println!("{} {:<20} {}", badge.icon, badge.name, status);
    }
}
