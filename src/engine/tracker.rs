//! The habit tracker. Owns the habit collection and the user profile,
//! and is the only place either one is mutated.

use opentelemetry::KeyValue;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::badges::{self, Progress};
use super::level::{Level, completion_reward, level_for_xp};
use super::streak::{current_run, longest_run, streak_info};
use crate::clock::Clock;
use crate::config::BadgeCatalog;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, EventLog};
use crate::model::*;
use crate::store::{Snapshot, Store};
use crate::telemetry::habit::{record_streak, start_habit_span};
use crate::telemetry::metrics;

/// Settings used when no stored profile exists yet.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Badges given to a fresh profile.
    pub badges: BadgeCatalog,
    /// Display name of a fresh profile.
    pub user_name: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            badges: BadgeCatalog::builtin(),
            user_name: "Demo User".to_string(),
        }
    }
}

/// What a successful completion changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub habit_id: HabitId,
    pub day: Day,
    pub streak: u32,
    pub best_streak: u32,
    pub xp_awarded: u32,
    /// Ids of badges unlocked by this completion.
    pub unlocked_badges: Vec<String>,
    /// Level after the completion.
    pub level: Level,
    pub leveled_up: bool,
}

/// What undoing a completion changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reversal {
    pub habit_id: HabitId,
    pub day: Day,
    pub streak: u32,
    pub xp_removed: u32,
    pub level: Level,
}

/// Derived user state after a mutation.
struct Settled {
    level: Level,
    previous_level: u32,
    unlocked: Vec<String>,
}

/// The habit tracking engine.
///
/// Open one per session with [`Tracker::open`] and finish with
/// [`Tracker::close`]. Every mutation saves the full state to the store
/// before returning. If a save fails the tracker keeps working in memory
/// and stops writing for the rest of the session.
pub struct Tracker<S: Store, C: Clock> {
    store: S,
    clock: C,
    habits: Vec<Habit>,
    user: UserProfile,
    events: EventLog,
    durable: bool,
}

impl<S: Store, C: Clock> Tracker<S, C> {
    /// Load state from `store`, falling back to an empty collection and a
    /// fresh profile for anything absent or unreadable.
    pub fn open(store: S, clock: C, config: TrackerConfig) -> Self {
        let (snapshot, durable) = match store.load() {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                warn!(error = %e, "store unavailable, running in memory only");
                metrics::store_failures().add(1, &[KeyValue::new("operation", "load")]);
                (Snapshot::default(), false)
            }
        };

        let habits = snapshot.habits.unwrap_or_default();
        let user = snapshot.user.unwrap_or_else(|| {
            UserProfile::new(config.user_name, config.badges.into_badges(), clock.now())
        });

        let mut tracker = Self {
            store,
            clock,
            habits,
            user,
            events: EventLog::default(),
            durable,
        };
        tracker.resync();
        info!(
            habits = tracker.habits.len(),
            level = tracker.user.level,
            durable = tracker.durable,
            "tracker opened"
        );
        tracker
    }

    /// Save one last time and hand the store back.
    pub fn close(mut self) -> S {
        self.persist();
        self.store
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a habit created today.
    pub fn add_habit(&mut self, new: NewHabit) -> Result<Habit> {
        new.validate()?;
        self.refresh();

        let habit = new.build(self.clock.today());
        let _span = start_habit_span("add", &habit.id).entered();

        self.habits.push(habit.clone());
        self.events.record(
            self.clock.now(),
            EventKind::HabitCreated {
                id: habit.id.clone(),
                name: habit.name.clone(),
            },
        );
        self.persist();

        metrics::habits_created().add(1, &[]);
        info!(name = %habit.name, "habit created");
        Ok(habit)
    }

    /// Mark a habit done for today.
    ///
    /// Returns `None` without changing anything if the habit does not exist
    /// or is already completed today.
    pub fn complete_habit(&mut self, id: &HabitId) -> Option<Completion> {
        self.refresh();
        let today = self.clock.today();
        let span = start_habit_span("complete", id);
        let _enter = span.enter();

        let Some(habit) = self.habits.iter_mut().find(|h| h.id == *id) else {
            debug!("complete ignored: habit not found");
            return None;
        };
        if !habit.completed_dates.insert(today) {
            debug!("complete ignored: already completed today");
            return None;
        }

        habit.streak = current_run(&habit.completed_dates);
        habit.best_streak = habit.best_streak.max(habit.streak);
        habit.completed_today = true;
        let xp_awarded = completion_reward(habit.streak);
        habit.xp = habit.xp.saturating_add(xp_awarded);
        let (streak, best_streak) = (habit.streak, habit.best_streak);
        record_streak(&span, streak);

        self.user.total_habits_completed = self.user.total_habits_completed.saturating_add(1);
        self.user.longest_streak = self.user.longest_streak.max(best_streak);
        self.events.record(
            self.clock.now(),
            EventKind::HabitCompleted {
                id: id.clone(),
                day: today,
                streak,
                xp_awarded,
            },
        );
        let settled = self.settle();
        self.persist();

        metrics::completions().add(1, &[]);
        info!(streak, xp_awarded, "habit completed");

        Some(Completion {
            habit_id: id.clone(),
            day: today,
            streak,
            best_streak,
            xp_awarded,
            unlocked_badges: settled.unlocked,
            level: settled.level,
            leveled_up: settled.level.level > settled.previous_level,
        })
    }

    /// Undo today's completion.
    ///
    /// Returns `None` without changing anything if the habit does not exist
    /// or is not completed today. Badges stay unlocked.
    pub fn uncomplete_habit(&mut self, id: &HabitId) -> Option<Reversal> {
        self.refresh();
        let today = self.clock.today();
        let span = start_habit_span("uncomplete", id);
        let _enter = span.enter();

        let Some(habit) = self.habits.iter_mut().find(|h| h.id == *id) else {
            debug!("uncomplete ignored: habit not found");
            return None;
        };
        if !habit.completed_dates.remove(&today) {
            debug!("uncomplete ignored: not completed today");
            return None;
        }

        // The reward being undone was computed from the streak it produced.
        let old_streak = habit.streak;
        habit.streak = current_run(&habit.completed_dates);
        habit.completed_today = false;
        let previous_xp = habit.xp;
        habit.xp = habit.xp.saturating_sub(completion_reward(old_streak));
        let xp_removed = previous_xp - habit.xp;
        let streak = habit.streak;
        record_streak(&span, streak);

        self.user.total_habits_completed = self.user.total_habits_completed.saturating_sub(1);
        self.events.record(
            self.clock.now(),
            EventKind::HabitUncompleted {
                id: id.clone(),
                day: today,
                streak,
                xp_removed,
            },
        );
        let settled = self.settle();
        self.persist();

        metrics::uncompletions().add(1, &[]);
        info!(streak, xp_removed, "habit completion undone");

        Some(Reversal {
            habit_id: id.clone(),
            day: today,
            streak,
            xp_removed,
            level: settled.level,
        })
    }

    /// Remove a habit permanently. Its experience leaves the total;
    /// badges and lifetime counters are kept.
    pub fn delete_habit(&mut self, id: &HabitId) -> Option<Habit> {
        let _span = start_habit_span("delete", id).entered();
        let Some(index) = self.habits.iter().position(|h| h.id == *id) else {
            debug!("delete ignored: habit not found");
            return None;
        };

        let habit = self.habits.remove(index);
        self.events.record(
            self.clock.now(),
            EventKind::HabitDeleted {
                id: id.clone(),
                xp_forfeited: habit.xp,
            },
        );
        self.settle();
        self.persist();

        metrics::habits_deleted().add(1, &[]);
        info!(name = %habit.name, "habit deleted");
        Some(habit)
    }

    /// Change the profile display name.
    pub fn rename_user(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidProfile("name is required".to_string()));
        }
        self.user.name = name.to_string();
        self.profile_updated();
        Ok(())
    }

    /// Flip between light and dark. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.user.theme = self.user.theme.toggled();
        self.profile_updated();
        self.user.theme
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.user.preferences = preferences;
        self.profile_updated();
    }

    /// Append the sample habits: three routines with a few days of history.
    pub fn seed_demo(&mut self) -> usize {
        self.refresh();
        let today = self.clock.today();

        let demo = [
            (
                NewHabit::new("Morning Meditation")
                    .description("Start the day with 10 minutes of mindfulness")
                    .category("Wellness")
                    .icon("🧘")
                    .color("#C8E6C9"),
                10,
                5,
                8,
                250,
            ),
            (
                NewHabit::new("Read 20 pages")
                    .description("Read at least 20 pages of a book")
                    .category("Learning")
                    .icon("📚")
                    .color("#BBDEFB"),
                15,
                3,
                12,
                150,
            ),
            (
                NewHabit::new("Drink water")
                    .description("Drink at least 8 glasses of water")
                    .category("Health")
                    .icon("💧")
                    .color("#B3E5FC"),
                20,
                10,
                10,
                500,
            ),
        ];

        let count = demo.len();
        for (new, age, history, best_streak, xp) in demo {
            let mut habit = new.build(today.minus_days(age));
            habit.completed_dates = (1..=history).map(|n| today.minus_days(n)).collect();
            habit.streak = current_run(&habit.completed_dates);
            habit.best_streak = best_streak.max(habit.streak);
            habit.xp = xp;
            self.user.longest_streak = self.user.longest_streak.max(habit.best_streak);
            self.events.record(
                self.clock.now(),
                EventKind::HabitCreated {
                    id: habit.id.clone(),
                    name: habit.name.clone(),
                },
            );
            self.habits.push(habit);
        }

        self.settle();
        self.persist();
        info!(count, "demo habits seeded");
        count
    }

    /// Re-sync the stored `completed_today` flags with the clock, so the
    /// next save writes them as of today.
    pub fn refresh(&mut self) {
        let today = self.clock.today();
        for habit in &mut self.habits {
            habit.completed_today = habit.is_completed_on(today);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Habits in insertion order, with `completed_today` taken from the
    /// clock at the time of the call.
    pub fn habits(&self) -> Vec<Habit> {
        let today = self.clock.today();
        self.habits.iter().map(|h| as_of(h, today)).collect()
    }

    pub fn habit(&self, id: &HabitId) -> Option<Habit> {
        let today = self.clock.today();
        self.habits.iter().find(|h| h.id == *id).map(|h| as_of(h, today))
    }

    pub fn is_completed_today(&self, id: &HabitId) -> bool {
        let today = self.clock.today();
        self.habits
            .iter()
            .any(|h| h.id == *id && h.is_completed_on(today))
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Sum of experience over all habits.
    pub fn total_xp(&self) -> u32 {
        self.habits.iter().fold(0u32, |sum, h| sum.saturating_add(h.xp))
    }

    pub fn level(&self) -> Level {
        level_for_xp(self.total_xp())
    }

    pub fn streak_info(&self, habit: &Habit) -> StreakInfo {
        streak_info(habit, self.clock.today())
    }

    pub fn today(&self) -> Day {
        self.clock.today()
    }

    /// Events with a sequence number greater than `since_seq`.
    pub fn events_since(&self, since_seq: u64) -> &[Event] {
        self.events.since(since_seq)
    }

    pub fn last_event_seq(&self) -> u64 {
        self.events.last_seq()
    }

    /// False once a load or save has failed this session.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Bring caches and derived fields in line with the stored dates.
    fn resync(&mut self) {
        let today = self.clock.today();
        for habit in &mut self.habits {
            habit.streak = current_run(&habit.completed_dates);
            habit.best_streak = habit.best_streak.max(longest_run(&habit.completed_dates));
            habit.completed_today = habit.is_completed_on(today);
            self.user.longest_streak = self.user.longest_streak.max(habit.best_streak);
        }
        let level = self.level();
        self.user.xp = self.total_xp();
        self.user.level = level.level;
        self.user.xp_to_next_level = level.xp_to_next_level;
    }

    /// Recompute user level from habit experience and unlock badges.
    fn settle(&mut self) -> Settled {
        let previous_level = self.user.level;
        let xp = self.total_xp();
        let level = level_for_xp(xp);
        self.user.xp = xp;
        self.user.level = level.level;
        self.user.xp_to_next_level = level.xp_to_next_level;

        let progress = Progress {
            streak: self.habits.iter().map(|h| h.streak).max().unwrap_or(0),
            completions: self.user.total_habits_completed,
            xp,
        };
        let now = self.clock.now();
        let unlocked = badges::evaluate(&mut self.user.badges, &progress, now);
        for badge_id in &unlocked {
            metrics::badges_unlocked().add(1, &[KeyValue::new("badge", badge_id.clone())]);
            info!(badge = %badge_id, "badge unlocked");
            self.events.record(
                now,
                EventKind::BadgeUnlocked {
                    badge_id: badge_id.clone(),
                },
            );
        }

        if level.level != previous_level {
            info!(from = previous_level, to = level.level, "level changed");
            self.events.record(
                now,
                EventKind::LevelChanged {
                    from: previous_level,
                    to: level.level,
                },
            );
        }

        Settled {
            level,
            previous_level,
            unlocked,
        }
    }

    fn profile_updated(&mut self) {
        self.events.record(self.clock.now(), EventKind::ProfileUpdated);
        self.persist();
    }

    fn persist(&mut self) {
        if !self.durable {
            return;
        }
        let snapshot = Snapshot {
            habits: Some(self.habits.clone()),
            user: Some(self.user.clone()),
        };
        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "save failed, continuing in memory only");
            metrics::store_failures().add(1, &[KeyValue::new("operation", "save")]);
            self.durable = false;
        }
    }
}

/// Copy of `habit` with the today flag derived for `today`.
fn as_of(habit: &Habit, today: Day) -> Habit {
    let mut habit = habit.clone();
    habit.completed_today = habit.is_completed_on(today);
    habit
}
