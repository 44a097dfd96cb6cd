//! Streak computation over a set of completion days.

use std::collections::BTreeSet;

use crate::model::{Day, Habit, StreakInfo};

/// Length of the run of consecutive days ending at the latest day in `dates`.
///
/// Returns 0 for an empty set. The run is not required to reach "today";
/// a habit whose latest completion is old still reports the run it ended on.
pub fn current_run(dates: &BTreeSet<Day>) -> u32 {
    let mut iter = dates.iter().rev();
    let Some(&latest) = iter.next() else {
        return 0;
    };

    let mut run = 1;
    let mut expected = latest.pred();
    for &day in iter {
        if day != expected {
            break;
        }
        run += 1;
        expected = day.pred();
    }
    run
}

/// Longest run of consecutive days anywhere in `dates`.
pub fn longest_run(dates: &BTreeSet<Day>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<Day> = None;
    for &day in dates {
        run = match previous {
            Some(p) if p.succ() == day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

/// Display status: active while the latest completion is today or yesterday.
pub fn streak_info(habit: &Habit, today: Day) -> StreakInfo {
    let last_completed = habit.last_completed();
    let is_currently_active = last_completed.is_some_and(|d| d == today || d == today.pred());
    StreakInfo {
        is_currently_active,
        last_completed,
    }
}
