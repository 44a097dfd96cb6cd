//! Structured events emitted by the engine on every state change.
//!
//! The presentation layer polls [`crate::engine::Tracker::events_since`]
//! to learn that state changed and what to re-read. Events live for the
//! session only; the habit and user records are the durable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Day, HabitId};

/// A structured event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number, starting at 1 each session.
    pub seq: u64,
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    HabitCreated {
        id: HabitId,
        name: String,
    },
    HabitCompleted {
        id: HabitId,
        day: Day,
        streak: u32,
        xp_awarded: u32,
    },
    HabitUncompleted {
        id: HabitId,
        day: Day,
        streak: u32,
        xp_removed: u32,
    },
    HabitDeleted {
        id: HabitId,
        xp_forfeited: u32,
    },
    BadgeUnlocked {
        badge_id: String,
    },
    LevelChanged {
        from: u32,
        to: u32,
    },
    ProfileUpdated,
}

/// Append-only, in-memory event log.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn record(&mut self, timestamp: DateTime<Utc>, kind: EventKind) -> &Event {
        let seq = self.events.len() as u64 + 1;
        self.events.push(Event {
            seq,
            timestamp,
            kind,
        });
        &self.events[self.events.len() - 1]
    }

    pub fn since(&self, since_seq: u64) -> &[Event] {
        let start = (since_seq as usize).min(self.events.len());
        &self.events[start..]
    }

    pub fn last_seq(&self) -> u64 {
        self.events.len() as u64
    }
}
