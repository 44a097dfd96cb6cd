//! Time source for the engine.
//!
//! "Today" is the engine's only environmental input. Production code uses
//! the local calendar; tests and simulations drive a [`ManualClock`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveTime, Utc};

use crate::model::Day;

pub trait Clock {
    /// Current calendar day.
    fn today(&self) -> Day;

    /// Current instant, used for unlock timestamps.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock. Days follow the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Day(Local::now().date_naive())
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same current day.
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: Arc<Mutex<Day>>,
}

impl ManualClock {
    pub fn new(today: Day) -> Self {
        Self {
            today: Arc::new(Mutex::new(today)),
        }
    }

    pub fn set_today(&self, day: Day) {
        *self.today.lock().unwrap_or_else(|e| e.into_inner()) = day;
    }

    /// Move forward `n` days.
    pub fn advance_days(&self, n: u64) {
        let mut today = self.today.lock().unwrap_or_else(|e| e.into_inner());
        *today = today.plus_days(n);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> Day {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Noon UTC of the current day.
    fn now(&self) -> DateTime<Utc> {
        self.today().0.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12)
    }
}
