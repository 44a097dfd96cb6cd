//! Calendar-day identifiers.
//!
//! Completions are recorded per calendar day, never per instant. `Day`
//! serializes as `YYYY-MM-DD`, so consecutive-day checks are exact date
//! arithmetic instead of timestamp subtraction.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar day, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(pub NaiveDate);

impl Day {
    /// Build a day from year/month/day. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The day before. Saturates at the earliest representable date.
    pub fn pred(self) -> Self {
        self.0.pred_opt().map(Self).unwrap_or(self)
    }

    /// The day after. Saturates at the latest representable date.
    pub fn succ(self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(self)
    }

    /// `n` days earlier.
    pub fn minus_days(self, n: u64) -> Self {
        self.0.checked_sub_days(Days::new(n)).map(Self).unwrap_or(self)
    }

    /// `n` days later.
    pub fn plus_days(self, n: u64) -> Self {
        self.0.checked_add_days(Days::new(n)).map(Self).unwrap_or(self)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
