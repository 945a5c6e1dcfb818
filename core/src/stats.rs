//! # Per-player counting statistics
//!
//! The stat line is the unit every stage of the pipeline trades in: the
//! interpreter emits one per player per game (full-game and regulation-only
//! variants), rollups sum them per week and per season, and storage persists
//! them verbatim. Durations are in ticks; everything else is a plain count.
use crate::time::Ticks;
use derive_more::{Add, AddAssign, Sum};
use serde::{Deserialize, Serialize};

/// The counting statistics maintained for one player.
///
/// Addition is component-wise, which is exactly the rollup operation for
/// weeks and seasons and the merge operation for paused games.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Add, AddAssign, Sum, Serialize, Deserialize,
)]
pub struct StatLine {
    pub time_played: Ticks,
    pub tags: u32,
    pub pops: u32,
    pub grabs: u32,
    pub drops: u32,
    pub hold: Ticks,
    pub captures: u32,
    pub prevent: Ticks,
    pub returns: u32,
    pub powerups: u32,
    pub caps_for: u32,
    pub caps_against: u32,
    pub total_pups_in_game: u32,
    pub grabs_off_handoffs: u32,
    pub caps_off_handoffs: u32,
    pub grabs_off_regrab: u32,
    pub caps_off_regrab: u32,
    pub long_holds: u32,
    pub flaccids: u32,
    pub handoffs: u32,
    pub good_handoffs: u32,
    pub quick_returns: u32,
    pub returns_in_base: u32,
    pub saves: u32,
    pub key_returns: u32,
    pub hold_against: Ticks,
    pub kept_flags: u32,
}

impl StatLine {
    /// Component-wise `<=`, the regulation-versus-full-game invariant.
    pub fn component_le(&self, other: &StatLine) -> bool {
        self.time_played <= other.time_played
            && self.tags <= other.tags
            && self.pops <= other.pops
            && self.grabs <= other.grabs
            && self.drops <= other.drops
            && self.hold <= other.hold
            && self.captures <= other.captures
            && self.prevent <= other.prevent
            && self.returns <= other.returns
            && self.powerups <= other.powerups
            && self.caps_for <= other.caps_for
            && self.caps_against <= other.caps_against
            && self.total_pups_in_game <= other.total_pups_in_game
            && self.grabs_off_handoffs <= other.grabs_off_handoffs
            && self.caps_off_handoffs <= other.caps_off_handoffs
            && self.grabs_off_regrab <= other.grabs_off_regrab
            && self.caps_off_regrab <= other.caps_off_regrab
            && self.long_holds <= other.long_holds
            && self.flaccids <= other.flaccids
            && self.handoffs <= other.handoffs
            && self.good_handoffs <= other.good_handoffs
            && self.quick_returns <= other.quick_returns
            && self.returns_in_base <= other.returns_in_base
            && self.saves <= other.saves
            && self.key_returns <= other.key_returns
            && self.hold_against <= other.hold_against
            && self.kept_flags <= other.kept_flags
    }
}

impl num::Zero for StatLine {
    fn zero() -> StatLine {
        StatLine::default()
    }
    fn is_zero(&self) -> bool {
        *self == StatLine::default()
    }
}
