//! Read-only aggregates for dashboards and history views.

use serde::Serialize;

use crate::engine::level::level_for_xp;
use crate::model::{Day, Habit};

/// Headline numbers for a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub habits: usize,
    pub completed_today: usize,
    /// Rounded percentage of habits completed today.
    pub today_percent: u32,
    /// Highest current streak.
    pub longest_current_streak: u32,
    /// Highest best streak.
    pub longest_best_streak: u32,
    /// Completion days summed over all habits.
    pub total_completions: usize,
    /// Rounded mean of current streaks.
    pub average_streak: u32,
    pub total_xp: u32,
    pub level: u32,
}

pub fn summary(habits: &[Habit], today: Day) -> Summary {
    let completed_today = habits.iter().filter(|h| h.is_completed_on(today)).count();
    let total_xp = habits.iter().fold(0u32, |sum, h| sum.saturating_add(h.xp));
    let streak_sum: u64 = habits.iter().map(|h| u64::from(h.streak)).sum();

    Summary {
        habits: habits.len(),
        completed_today,
        today_percent: percent(completed_today, habits.len()),
        longest_current_streak: habits.iter().map(|h| h.streak).max().unwrap_or(0),
        longest_best_streak: habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
        total_completions: habits.iter().map(Habit::completions).sum(),
        average_streak: if habits.is_empty() {
            0
        } else {
            (streak_sum as f64 / habits.len() as f64).round() as u32
        },
        total_xp,
        level: level_for_xp(total_xp).level,
    }
}

/// Completions on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    pub day: Day,
    pub completed: usize,
    /// Rounded percentage of habits completed that day.
    pub rate: u32,
}

/// One entry per day for the `days` days ending today, oldest first.
pub fn daily_history(habits: &[Habit], today: Day, days: u32) -> Vec<DailyStat> {
    (0..u64::from(days))
        .rev()
        .map(|offset| {
            let day = today.minus_days(offset);
            let completed = habits.iter().filter(|h| h.is_completed_on(day)).count();
            DailyStat {
                day,
                completed,
                rate: percent(completed, habits.len()),
            }
        })
        .collect()
}

/// Current against best streak for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakEntry {
    pub name: String,
    pub streak: u32,
    pub best_streak: u32,
}

/// Streak comparison per habit, in collection order.
pub fn streak_board(habits: &[Habit]) -> Vec<StreakEntry> {
    habits
        .iter()
        .map(|h| StreakEntry {
            name: h.name.clone(),
            streak: h.streak,
            best_streak: h.best_streak,
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}
