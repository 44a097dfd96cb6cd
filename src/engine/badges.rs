//! Badge catalogue and unlock evaluation.

use chrono::{DateTime, Utc};

use crate::model::{Badge, Requirement, RequirementKind};

/// Aggregates a badge requirement is tested against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Highest current streak across habits.
    pub streak: u32,
    /// Lifetime completions.
    pub completions: u32,
    /// Total experience.
    pub xp: u32,
}

impl Progress {
    fn value_for(&self, kind: RequirementKind) -> u32 {
        match kind {
            RequirementKind::Streak => self.streak,
            RequirementKind::Completion => self.completions,
            RequirementKind::Xp => self.xp,
        }
    }
}

pub fn is_satisfied(requirement: Requirement, progress: &Progress) -> bool {
    progress.value_for(requirement.kind) >= requirement.value
}

/// Unlock every locked badge whose requirement `progress` meets.
///
/// Returns the ids of badges unlocked by this call. Unlocked badges are
/// skipped entirely; nothing is ever re-locked.
pub fn evaluate(badges: &mut [Badge], progress: &Progress, now: DateTime<Utc>) -> Vec<String> {
    let mut unlocked = Vec::new();
    for badge in badges.iter_mut().filter(|b| !b.unlocked) {
        if is_satisfied(badge.requirement, progress) {
            badge.unlocked = true;
            badge.unlocked_at = Some(now);
            unlocked.push(badge.id.clone());
        }
    }
    unlocked
}

/// The built-in badge set.
pub fn default_badges() -> Vec<Badge> {
    vec![
        Badge::new(
            "first-habit",
            "First Steps",
            "Completed your first habit",
            "🌱",
            Requirement::completion(1),
        ),
        Badge::new(
            "streak-7",
            "Consistency Master",
            "Maintained a 7-day streak",
            "🔥",
            Requirement::streak(7),
        ),
        Badge::new(
            "streak-30",
            "Habit Champion",
            "Maintained a 30-day streak",
            "🏆",
            Requirement::streak(30),
        ),
        Badge::new("xp-500", "Rising Star", "Earned 500 XP", "⭐", Requirement::xp(500)),
        Badge::new(
            "xp-1000",
            "Growth Expert",
            "Earned 1000 XP",
            "🌟",
            Requirement::xp(1000),
        ),
        Badge::new(
            "completions-100",
            "Century Club",
            "Completed habits 100 times",
            "💯",
            Requirement::completion(100),
        ),
    ]
}
