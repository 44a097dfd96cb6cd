//! In-memory store. Keeps the serialized JSON, like browser local storage.

use std::collections::HashMap;

use super::{HABITS_KEY, Snapshot, Store, USER_KEY, decode_record, encode_record};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored JSON for `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    /// Overwrite the raw JSON for `key`, bypassing serialization.
    pub fn put_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.records.insert(key.into(), value.into());
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            habits: decode_record(HABITS_KEY, self.raw(HABITS_KEY)),
            user: decode_record(USER_KEY, self.raw(USER_KEY)),
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Some(ref habits) = snapshot.habits {
            let encoded = encode_record(habits)?;
            self.put_raw(HABITS_KEY, encoded);
        }
        if let Some(ref user) = snapshot.user {
            let encoded = encode_record(user)?;
            self.put_raw(USER_KEY, encoded);
        }
        self.saves += 1;
        Ok(())
    }
}
