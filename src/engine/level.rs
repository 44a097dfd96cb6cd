//! Experience rewards and the level curve.

use serde::Serialize;

/// Flat experience granted by every completion.
pub const BASE_REWARD: u32 = 10;

/// Experience bonus per streak day.
pub const STREAK_BONUS_PER_DAY: u32 = 2;

/// Cap on the streak bonus.
pub const MAX_STREAK_BONUS: u32 = 50;

/// Cost of advancing from level `n` to `n + 1` is `n * LEVEL_COST`.
pub const LEVEL_COST: u32 = 100;

/// Experience granted for a completion that leaves the habit at `streak`.
pub fn completion_reward(streak: u32) -> u32 {
    BASE_REWARD + streak.saturating_mul(STREAK_BONUS_PER_DAY).min(MAX_STREAK_BONUS)
}

/// Position on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    pub level: u32,
    /// Experience still needed to reach `level + 1`.
    pub xp_to_next_level: u32,
    /// Experience earned inside the current level.
    pub xp_into_level: u32,
}

impl Level {
    /// Cost of the current level step.
    pub fn step_cost(&self) -> u32 {
        self.xp_into_level + self.xp_to_next_level
    }

    /// 0.0..1.0 progress within the current level.
    pub fn progress(&self) -> f32 {
        self.xp_into_level as f32 / self.step_cost() as f32
    }
}

/// Level reached with `xp` total experience.
///
/// Level 1 costs 100 to leave, level 2 costs 200, and so on. Whole steps are
/// consumed from zero upward; whatever is left counts toward the next one.
pub fn level_for_xp(xp: u32) -> Level {
    let mut level = 1u32;
    let mut cost = LEVEL_COST;
    let mut remaining = xp;

    while remaining >= cost {
        remaining -= cost;
        level += 1;
        cost = level.saturating_mul(LEVEL_COST);
    }

    Level {
        level,
        xp_to_next_level: cost - remaining,
        xp_into_level: remaining,
    }
}
