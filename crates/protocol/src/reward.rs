//! Reward and leveling rules.
//!
//! XP awarded for a task depends only on its difficulty. Levels are a step
//! function over a fixed ascending threshold table: level `n` starts at
//! `(n - 1)² × 100` XP, up to [`MAX_LEVEL`]. XP keeps accumulating past the
//! last threshold; the level simply stops rising.
//!
//! # Examples
//!
//! ```
//! use questa_protocol::reward;
//!
//! assert_eq!(reward::level(0), 1);
//! assert_eq!(reward::level(99), 1);
//! assert_eq!(reward::level(100), 2);
//! assert_eq!(reward::xp_to_next(150), Some(250));
//! ```

use crate::vocabulary::Difficulty;

/// The highest reachable level.
pub const MAX_LEVEL: u32 = 50;

/// XP needed to reach each level; index `i` holds the threshold of level `i + 1`.
pub const LEVEL_THRESHOLDS: [u64; MAX_LEVEL as usize] = thresholds();

const fn thresholds() -> [u64; MAX_LEVEL as usize] {
    let mut table = [0; MAX_LEVEL as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = (i as u64) * (i as u64) * 100;
        i += 1;
    }
    table
}

/// Returns the XP a task of the given difficulty pays out.
#[must_use]
pub const fn base_reward(difficulty: Difficulty) -> u64 {
    difficulty.base_reward()
}

/// Returns the level reached with `total_xp`.
///
/// This is one more than the highest table index whose threshold is at or
/// below `total_xp`, so a fresh player is level 1.
#[must_use]
pub fn level(total_xp: u64) -> u32 {
    // The first threshold is zero, so the partition point is at least 1.
    LEVEL_THRESHOLDS.partition_point(|threshold| *threshold <= total_xp) as u32
}

/// Returns the XP at which `level` starts, or `None` past [`MAX_LEVEL`].
///
/// Levels 0 and 1 both start at zero.
#[must_use]
pub fn xp_for_level(level: u32) -> Option<u64> {
    let index = level.saturating_sub(1) as usize;
    LEVEL_THRESHOLDS.get(index).copied()
}

/// Returns the XP still missing for the next level, or `None` at [`MAX_LEVEL`].
#[must_use]
pub fn xp_to_next(total_xp: u64) -> Option<u64> {
    xp_for_level(level(total_xp) + 1).map(|next| next - total_xp)
}

/// Returns how far through the current level `total_xp` is, from 0.0 to 1.0.
///
/// At [`MAX_LEVEL`] the progress is always 1.0.
#[must_use]
pub fn level_progress(total_xp: u64) -> f64 {
    let current = level(total_xp);
    let (Some(start), Some(end)) = (xp_for_level(current), xp_for_level(current + 1)) else {
        return 1.0;
    };
    let span = (end - start) as f64;
    ((total_xp - start) as f64 / span).clamp(0.0, 1.0)
}
