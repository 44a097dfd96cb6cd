//! Habit engine: the tracker service plus the pure progress rules it
//! applies (streak runs, experience rewards, level curve, badges).

pub mod badges;
pub mod level;
pub mod streak;
pub mod tracker;

pub use level::{Level, completion_reward, level_for_xp};
pub use tracker::{Completion, Reversal, Tracker, TrackerConfig};
