//! User progression record: level, experience, lifetime counters, badges
//! and display preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cross-habit aggregate owned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque identifier. Stored profiles may carry non-UUID ids.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Derived from `xp`. Never set directly.
    #[serde(default)]
    pub level: u32,
    /// Cached sum of per-habit experience.
    #[serde(default)]
    pub xp: u32,
    /// Derived from `xp`. Never set directly.
    #[serde(default)]
    pub xp_to_next_level: u32,

    /// Lifetime completion count.
    #[serde(default)]
    pub total_habits_completed: u32,
    /// Highest streak ever reached by any habit.
    #[serde(default)]
    pub longest_streak: u32,

    pub badges: Vec<Badge>,
    pub joined_at: DateTime<Utc>,

    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub preferences: Preferences,
}

impl UserProfile {
    /// A fresh level-1 profile carrying the given badge catalogue, all locked.
    pub fn new(name: impl Into<String>, badges: Vec<Badge>, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            avatar: None,
            level: 1,
            xp: 0,
            xp_to_next_level: 100,
            total_habits_completed: 0,
            longest_streak: 0,
            badges: badges.into_iter().map(Badge::locked).collect(),
            joined_at,
            theme: Theme::default(),
            preferences: Preferences::default(),
        }
    }

    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn unlocked_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|b| b.unlocked)
    }
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

/// A one-time achievement. Once unlocked it stays unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub requirement: Requirement,
}

impl Badge {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        requirement: Requirement,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            unlocked: false,
            unlocked_at: None,
            requirement,
        }
    }

    fn locked(mut self) -> Self {
        self.unlocked = false;
        self.unlocked_at = None;
        self
    }
}

/// Threshold a badge tests against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    pub value: u32,
}

impl Requirement {
    pub fn streak(value: u32) -> Self {
        Self {
            kind: RequirementKind::Streak,
            value,
        }
    }

    pub fn completion(value: u32) -> Self {
        Self {
            kind: RequirementKind::Completion,
            value,
        }
    }

    pub fn xp(value: u32) -> Self {
        Self {
            kind: RequirementKind::Xp,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Highest current streak across habits.
    Streak,
    /// Lifetime completion count.
    Completion,
    /// Total experience.
    Xp,
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequirementKind::Streak => "streak",
            RequirementKind::Completion => "completion",
            RequirementKind::Xp => "xp",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Display and notification settings. Stored, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub sound_effects: bool,
    pub auto_save: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            email_notifications: true,
            sound_effects: true,
            auto_save: true,
        }
    }
}
