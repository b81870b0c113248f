//! # Tables Module
//!
//! Static rules tables consulted by the encounter engine: challenge ratings,
//! level thresholds, alignments and the group-size XP multiplier.

pub mod alignment;
pub mod challenge;
pub mod levels;

pub use alignment::*;
pub use challenge::*;
pub use levels::*;

/// Multiplier steps; the base categories start at index 1 so small parties can
/// shift up and large parties can shift down.
const MULTIPLIERS: [f64; 8] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];

/// Signature of a group-size multiplier lookup.
pub type MultiplierFn = fn(player_count: u32, monster_count: u32) -> f64;

/// Standard encounter multiplier for a party facing `monster_count` monsters.
///
/// More monsters at once are harder than their summed XP suggests. Parties of
/// fewer than three use the next higher step, parties of more than five the
/// next lower one.
///
/// # Examples
///
/// ```
/// use warband::get_multiplier;
///
/// assert_eq!(get_multiplier(4, 1), 1.0);
/// assert_eq!(get_multiplier(4, 3), 2.0);
/// assert_eq!(get_multiplier(2, 1), 1.5);
/// assert_eq!(get_multiplier(6, 1), 0.5);
/// ```
pub fn get_multiplier(player_count: u32, monster_count: u32) -> f64 {
    let mut category: usize = match monster_count {
        0 => return 0.0,
        1 => 1,
        2 => 2,
        3..=6 => 3,
        7..=10 => 4,
        11..=14 => 5,
        _ => 6,
    };

    if player_count < 3 {
        category += 1;
    } else if player_count > 5 {
        category -= 1;
    }

    MULTIPLIERS[category]
}
