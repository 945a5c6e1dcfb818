//! # Match timeline model
//!
//! A timeline is the totally ordered event stream of one recorded game,
//! together with the splat positions that accompany returns and the map
//! geometry needed for position-based stat credits.
//!
//! Players are interned: the timeline carries a roster of in-game usernames
//! and every event refers to a player by its [`PlayerKey`] index. Per-player
//! state downstream is a flat vector indexed by the same key, which keeps the
//! interpreter free of string lookups.
use crate::ids::EuId;
use crate::time::Tick;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two sides of a game.
#[derive(Debug, Display, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}

/// Index into a timeline's player roster.
#[derive(
    Debug, Display, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, From, Into, Serialize, Deserialize,
)]
pub struct PlayerKey(pub usize);

/// Kinds of timeline events.
///
/// Variants are declared in the alphabetical order of their canonical archive
/// labels. The derived `Ord` therefore realises the required within-tick
/// ordering: sorting events by `(tick, kind, player)` places a carrier's drop
/// before the return that popped it and a capture after the final hold
/// increment at that tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Actor scored.
    Capture,
    /// Actor dropped the opponent flag after holding it.
    Drop,
    /// Actor grabbed and was popped within the same tick.
    DropTemporary,
    /// Clock or score cap terminated the game; emitted once per player.
    GameEnds,
    /// Actor picked up the opponent flag.
    Grab,
    GrabDuplicatePowerUp,
    /// Actor began playing on the given side.
    Join(Side),
    Leave,
    /// Actor was neutralised without holding the flag.
    Pop,
    PowerUp,
    /// Actor returned their own flag, implying a tag.
    Return,
    StartPreventing,
    StopPreventing,
    /// Actor popped an opponent.
    Tag,
}

impl EventKind {
    /// Canonical label used by the source archive.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Capture => "Capture",
            EventKind::Drop => "Drop",
            EventKind::DropTemporary => "DropTemporary",
            EventKind::GameEnds => "GameEnds",
            EventKind::Grab => "Grab",
            EventKind::GrabDuplicatePowerUp => "GrabDuplicatePowerUp",
            EventKind::Join(_) => "Join",
            EventKind::Leave => "Leave",
            EventKind::Pop => "Pop",
            EventKind::PowerUp => "PowerUp",
            EventKind::Return => "Return",
            EventKind::StartPreventing => "StartPreventing",
            EventKind::StopPreventing => "StopPreventing",
            EventKind::Tag => "Tag",
        }
    }
}

/// One `(tick, event, actor)` triple.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub tick: Tick,
    pub kind: EventKind,
    pub player: PlayerKey,
}

/// Position where a popped player splatted, in map pixels.
///
/// Splats are joined to returns by `(tick, popped player)`. Rare archive
/// records lack the splat for a return; the interpreter then skips the
/// position-based credits for that return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splat {
    pub tick: Tick,
    pub player: PlayerKey,
    pub x: f64,
    pub y: f64,
}

pub const PIXELS_PER_TILE: f64 = 40.0;

/// Flag tile coordinates of the map a game was played on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    /// Red flag tile, in tile coordinates.
    pub red_flag: (u32, u32),
    /// Blue flag tile, in tile coordinates.
    pub blue_flag: (u32, u32),
}

impl MapGeometry {
    fn flag(&self, side: Side) -> (u32, u32) {
        match side {
            Side::Red => self.red_flag,
            Side::Blue => self.blue_flag,
        }
    }

    /// Euclidean distance in tiles from a pixel position to a side's flag
    /// tile centre.
    pub fn distance_to_flag(&self, side: Side, x: f64, y: f64) -> f64 {
        let (fx, fy) = self.flag(side);
        let cx = (f64::from(fx) + 0.5) * PIXELS_PER_TILE;
        let cy = (f64::from(fy) + 0.5) * PIXELS_PER_TILE;
        ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / PIXELS_PER_TILE
    }
}

/// Ordered event stream of one recorded game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub eu_id: EuId,
    players: Vec<String>,
    events: Vec<TimelineEvent>,
    splats: Vec<Splat>,
    /// Map geometry; absent for live-downloaded games, in which case
    /// position-based credits are skipped.
    pub map: Option<MapGeometry>,
}

impl Timeline {
    /// Fallible constructor.
    ///
    /// Stably sorts the events by `(tick, kind, player)`.
    ///
    /// # Errors
    ///
    /// Every event and splat must refer to a roster player.
    pub fn try_new(
        eu_id: EuId,
        players: Vec<String>,
        mut events: Vec<TimelineEvent>,
        splats: Vec<Splat>,
        map: Option<MapGeometry>,
    ) -> Result<Self, TimelineError> {
        if let Some(event) = events.iter().find(|e| e.player.0 >= players.len()) {
            return Err(TimelineError::UnknownPlayer(event.player));
        }
        if let Some(splat) = splats.iter().find(|s| s.player.0 >= players.len()) {
            return Err(TimelineError::UnknownPlayer(splat.player));
        }
        events.sort_by_key(|e| (e.tick, e.kind, e.player));
        Ok(Self {
            eu_id,
            players,
            events,
            splats,
            map,
        })
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player_name(&self, key: PlayerKey) -> &str {
        &self.players[key.0]
    }

    pub fn roster(&self) -> impl Iterator<Item = (PlayerKey, &str)> {
        self.players
            .iter()
            .enumerate()
            .map(|(idx, name)| (PlayerKey(idx), name.as_str()))
    }

    /// Splat record accompanying a return, joined by `(tick, popped player)`.
    pub fn splat_at(&self, tick: Tick, player: PlayerKey) -> Option<&Splat> {
        self.splats
            .iter()
            .find(|s| s.tick == tick && s.player == player)
    }
}

#[derive(Error, Debug, Clone)]
pub enum TimelineError {
    #[error("event refers to player key {0} outside the roster")]
    UnknownPlayer(PlayerKey),
}
