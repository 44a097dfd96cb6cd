//! Core data model.
//!
//! A habit is a routine the user wants to repeat daily. It carries display
//! metadata, the set of days it was completed, and the progress derived from
//! that set (streak, best streak, experience).

pub mod day;
pub mod user;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub use day::Day;
pub use user::{Badge, Preferences, Requirement, RequirementKind, Theme, UserProfile};

/// Longest accepted habit name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Longest accepted habit description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 250;

// ---------------------------------------------------------------------------
// Habit
// ---------------------------------------------------------------------------

/// A tracked routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, stable for the habit's lifetime.
    pub id: HabitId,

    /// Short display label.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Consecutive completed days ending at the latest completion.
    #[serde(default)]
    pub streak: u32,

    /// Highest `streak` ever reached.
    #[serde(default)]
    pub best_streak: u32,

    /// Days on which the habit was completed. Sorted, no duplicates.
    pub completed_dates: BTreeSet<Day>,

    pub created_at: Day,

    /// Whether today is in `completed_dates`. The tracker derives it
    /// against its clock on every read.
    #[serde(default)]
    pub completed_today: bool,

    /// Experience earned through this habit. Never negative.
    #[serde(default)]
    pub xp: u32,
}

impl Habit {
    /// Most recent completion, if any.
    pub fn last_completed(&self) -> Option<Day> {
        self.completed_dates.last().copied()
    }

    /// Number of days this habit was completed.
    pub fn completions(&self) -> usize {
        self.completed_dates.len()
    }

    pub fn is_completed_on(&self, day: Day) -> bool {
        self.completed_dates.contains(&day)
    }
}

/// Opaque habit identifier.
///
/// Fresh ids are UUIDs, but any non-empty string read back from storage is
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for tabular output.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HabitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for HabitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Streak info
// ---------------------------------------------------------------------------

/// Display-oriented streak status of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakInfo {
    /// Latest completion is today or yesterday (one day of grace).
    pub is_currently_active: bool,
    pub last_completed: Option<Day>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for new habits. The engine's public API for adding habits.
#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) color: Option<String>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Check name and description bounds.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidHabit("habit name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::InvalidHabit(format!(
                "habit name is longer than {MAX_NAME_LEN} characters"
            )));
        }
        let description_len = self.description.as_deref().map_or(0, |d| d.chars().count());
        if description_len > MAX_DESCRIPTION_LEN {
            return Err(Error::InvalidHabit(format!(
                "description is longer than {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Build a fresh habit created on `today`. Call `validate` first.
    pub(crate) fn build(self, today: Day) -> Habit {
        Habit {
            id: HabitId::new(),
            name: self.name.trim().to_string(),
            description: self.description,
            category: self.category,
            icon: self.icon,
            color: self.color,
            streak: 0,
            best_streak: 0,
            completed_dates: BTreeSet::new(),
            created_at: today,
            completed_today: false,
            xp: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_a_name() {
        assert!(NewHabit::new("").validate().is_err());
        assert!(NewHabit::new("   ").validate().is_err());
        assert!(NewHabit::new("Read").validate().is_ok());
    }

    #[test]
    fn validate_bounds_name_and_description() {
        assert!(NewHabit::new("x".repeat(MAX_NAME_LEN)).validate().is_ok());
        assert!(NewHabit::new("x".repeat(MAX_NAME_LEN + 1)).validate().is_err());
        let long = NewHabit::new("Read").description("d".repeat(MAX_DESCRIPTION_LEN + 1));
        assert!(matches!(long.validate(), Err(Error::InvalidHabit(_))));
    }

    #[test]
    fn build_starts_from_zero() {
        let today = Day::from_ymd(2024, 5, 1).unwrap();
        let habit = NewHabit::new("  Stretch ").category("Health").build(today);
        assert_eq!(habit.name, "Stretch");
        assert_eq!(habit.category.as_deref(), Some("Health"));
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.best_streak, 0);
        assert_eq!(habit.xp, 0);
        assert!(habit.completed_dates.is_empty());
        assert!(!habit.completed_today);
        assert_eq!(habit.created_at, today);
    }

    #[test]
    fn completed_dates_serialize_sorted() {
        let mut habit = NewHabit::new("Read").build(Day::from_ymd(2024, 1, 1).unwrap());
        habit.completed_dates.insert("2024-01-03".parse().unwrap());
        habit.completed_dates.insert("2024-01-02".parse().unwrap());
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(
            value["completed_dates"],
            serde_json::json!(["2024-01-02", "2024-01-03"])
        );
        assert!(value.get("description").is_none());
    }

    #[test]
    fn habit_ids_are_opaque() {
        let fresh = HabitId::new();
        assert_eq!(fresh.as_str().len(), 36);
        assert_eq!(fresh.short().len(), 8);

        let legacy = HabitId::from("1");
        assert_eq!(legacy.short(), "1");
        assert_eq!(legacy.to_string(), "1");
        let back: HabitId = serde_json::from_str("\"k3j9x2a\"").unwrap();
        assert_eq!(back.as_str(), "k3j9x2a");
    }
}
