//! Badge catalogue loaded from TOML.
//!
//! ```toml
//! [[badge]]
//! id = "streak-3"
//! name = "Warming Up"
//! description = "Maintained a 3-day streak"
//! icon = "🔥"
//! requirement = { type = "streak", value = 3 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::engine::badges::default_badges;
use crate::error::{Error, Result};
use crate::model::{Badge, Requirement};

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    badge: Vec<BadgeEntry>,
}

#[derive(Debug, Deserialize)]
struct BadgeEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    requirement: Requirement,
}

/// Badge definitions handed to new profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    /// The built-in six badges.
    pub fn builtin() -> Self {
        Self {
            badges: default_badges(),
        }
    }

    /// Parse a catalogue from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("bad badge catalogue: {e}")))?;

        let mut seen = HashSet::new();
        let mut badges = Vec::with_capacity(file.badge.len());
        for entry in file.badge {
            if entry.id.trim().is_empty() {
                return Err(Error::Config("badge id must not be empty".to_string()));
            }
            if entry.requirement.value == 0 {
                return Err(Error::Config(format!(
                    "badge {} has a zero threshold",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.clone()) {
                return Err(Error::Config(format!("duplicate badge id {}", entry.id)));
            }
            badges.push(Badge::new(
                entry.id,
                entry.name,
                entry.description,
                entry.icon,
                entry.requirement,
            ));
        }

        Ok(Self { badges })
    }

    /// Load a catalogue file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read badge catalogue {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn into_badges(self) -> Vec<Badge> {
        self.badges
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
