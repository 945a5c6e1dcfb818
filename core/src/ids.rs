//! Identifiers for the persisted entities
//!
//! Every entity the pipeline reads or writes is referred to by a typed id.
//! The ids are plain integers in storage; the newtypes exist so that a
//! season id can never be passed where a team-season id is expected.
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Display,
            Deserialize,
            Serialize,
            Clone,
            Copy,
            Eq,
            PartialEq,
            Hash,
            Ord,
            PartialOrd,
            From,
            Into,
        )]
        pub struct $name(pub $inner);
    };
}

entity_id!(
    /// A competitive league (MLTP, mLTP, ...).
    LeagueId,
    u32
);
entity_id!(
    /// A single season of a league.
    SeasonId,
    u32
);
entity_id!(FranchiseId, u32);
entity_id!(
    /// One franchise's participation in one season.
    TeamSeasonId,
    u32
);
entity_id!(PlayerId, u32);
entity_id!(
    /// One player's participation in one season.
    PlayerSeasonId,
    u32
);
entity_id!(
    /// A match between two teams, comprising one or more games.
    MatchId,
    u32
);
entity_id!(GameId, u32);
entity_id!(
    /// A player's participation in a single game.
    GamelogId,
    u32
);
entity_id!(SeriesId, u32);

entity_id!(
    /// Identifier of a game in the external match archive.
    EuId,
    u64
);
