//! Persistence collaborator.
//!
//! The engine reads a [`Snapshot`] once at startup and writes one after
//! every mutation. The two records (habit collection and user profile) are
//! serialized independently as JSON, so a damaged record only costs itself.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Result;
use crate::model::{Habit, UserProfile};

/// Storage key of the habit collection.
pub const HABITS_KEY: &str = "habits";

/// Storage key of the user profile.
pub const USER_KEY: &str = "user";

/// Full engine state as stored. `None` means the record is absent or was
/// unreadable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub habits: Option<Vec<Habit>>,
    pub user: Option<UserProfile>,
}

/// Durable key-value home for snapshots.
pub trait Store {
    /// Read both records. Errors mean the backend itself is unavailable;
    /// malformed records come back as `None`.
    fn load(&self) -> Result<Snapshot>;

    /// Write both records.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Decode one record, discarding it if it does not parse.
pub(crate) fn decode_record<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(record = key, error = %e, "discarding unreadable stored record");
            crate::telemetry::metrics::store_failures().add(
                1,
                &[opentelemetry::KeyValue::new("operation", "decode")],
            );
            None
        }
    }
}

pub(crate) fn encode_record<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
