//! Tick-based time
//!
//! All timestamps and durations are expressed in ticks of 1/60 s, the
//! resolution of the source archive. Storage never converts units.
use derive_more::{Add, AddAssign, Display, From, Into, Sum};
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// An instant within a game, in ticks since the game start.
#[derive(
    Default,
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    From,
    Into,
)]
pub struct Tick(pub u32);

/// End of regulation: ten minutes at 60 ticks per second.
pub const REGULATION_TICKS: Tick = Tick(36_000);

pub const TICKS_PER_SECOND: u32 = 60;

impl Tick {
    /// Ticks of regulation remaining after this instant, zero if past it.
    pub fn remaining_regulation(self) -> Tick {
        Tick(REGULATION_TICKS.0.saturating_sub(self.0))
    }
}

/// A duration in ticks.
///
/// Instants subtract into durations; durations accumulate. The subtraction
/// saturates at zero so that malformed archive records cannot underflow.
#[derive(
    Default,
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    From,
    Into,
    Add,
    AddAssign,
    Sum,
)]
pub struct Ticks(pub u32);

impl Sub for Tick {
    type Output = Ticks;
    fn sub(self, earlier: Tick) -> Ticks {
        Ticks(self.0.saturating_sub(earlier.0))
    }
}

impl Ticks {
    pub fn as_seconds(self) -> u32 {
        self.0 / TICKS_PER_SECOND
    }
}

impl num::Zero for Ticks {
    fn zero() -> Ticks {
        Ticks(0)
    }
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_difference() {
        assert_eq!(Tick(1_500) - Tick(1_000), Ticks(500));
    }

    #[test]
    fn difference_saturates() {
        assert_eq!(Tick(10) - Tick(20), Ticks(0));
    }

    #[test]
    fn remaining_regulation() {
        assert_eq!(Tick(18_000).remaining_regulation(), Tick(18_000));
        assert_eq!(Tick(40_000).remaining_regulation(), Tick(0));
    }
}
