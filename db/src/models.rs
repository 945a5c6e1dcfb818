//! Database row models and conversions into core types
use clr_core::ids::{GameId, GamelogId, MatchId, PlayerSeasonId, SeriesId, TeamSeasonId};
use clr_core::stats::StatLine;
use clr_core::time::Ticks;
use clr_core::week::Week;
use clr_core::Date;
use sqlx::FromRow;
use std::str::FromStr;

/// Column list shared by the four stat tables, in [`StatRow`] field order.
pub const STAT_COLUMNS: &str = "time_played, tags, pops, grabs, drops, hold, captures, prevent, \
     returns, powerups, caps_for, caps_against, total_pups_in_game, grabs_off_handoffs, \
     caps_off_handoffs, grabs_off_regrab, caps_off_regrab, long_holds, flaccids, handoffs, \
     good_handoffs, quick_returns, returns_in_base, saves, key_returns, hold_against, kept_flags";

/// Placeholder list matching [`STAT_COLUMNS`].
pub const STAT_PLACEHOLDERS: &str =
    "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

#[derive(Debug, Clone, FromRow)]
pub struct SeasonRow {
    pub id: i64,
    pub name: String,
    pub league: i64,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamSeasonRow {
    pub id: i64,
    pub franchise: i64,
    pub season: i64,
    pub name: String,
    pub abbr: String,
    pub seed: Option<i64>,
    pub playoff_finish: Option<String>,
}

impl TeamSeasonRow {
    pub fn team_id(&self) -> TeamSeasonId {
        TeamSeasonId(u32::try_from(self.id).unwrap())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayerSeasonRow {
    pub id: i64,
    pub season: i64,
    pub team: Option<i64>,
    pub player: i64,
    pub playing_as: String,
}

impl PlayerSeasonRow {
    pub fn player_season_id(&self) -> PlayerSeasonId {
        PlayerSeasonId(u32::try_from(self.id).unwrap())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub season: i64,
    pub date: String,
    pub week: String,
    pub team1: i64,
    pub team2: i64,
}

impl MatchRow {
    pub fn match_id(&self) -> MatchId {
        MatchId(u32::try_from(self.id).unwrap())
    }

    pub fn week(&self) -> Week {
        Week::new(&self.week)
    }

    pub fn date(&self) -> Result<Date, crate::DbError> {
        Date::from_str(&self.date)
            .map_err(|e| crate::DbError::Generic(format!("match {}: {}", self.id, e)))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayoffSeriesRow {
    pub id: i64,
    pub match_id: Option<i64>,
    pub seed1: i64,
    pub seed2: i64,
    pub team1_prev_series: Option<i64>,
    pub team2_prev_series: Option<i64>,
    pub winner: Option<i64>,
    pub team1_game_wins: Option<i64>,
    pub team2_game_wins: Option<i64>,
}

impl PlayoffSeriesRow {
    pub fn series_id(&self) -> SeriesId {
        SeriesId(u32::try_from(self.id).unwrap())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct GameRow {
    pub id: i64,
    pub match_id: i64,
    pub game_in_match: Option<String>,
    pub tagpro_eu: Option<i64>,
    pub paused_time: Option<i64>,
    pub resumed_tagpro_eu: Option<i64>,
    pub red_team: i64,
    pub blue_team: i64,
    pub team1_score: i64,
    pub team2_score: i64,
    pub outcome: Option<String>,
    pub team1_standing_points: Option<i64>,
    pub team2_standing_points: Option<i64>,
    pub map_name: Option<String>,
    pub map_id: Option<i64>,
}

impl GameRow {
    pub fn game_id(&self) -> GameId {
        GameId(u32::try_from(self.id).unwrap())
    }

    pub fn red_team_id(&self) -> TeamSeasonId {
        TeamSeasonId(u32::try_from(self.red_team).unwrap())
    }

    pub fn blue_team_id(&self) -> TeamSeasonId {
        TeamSeasonId(u32::try_from(self.blue_team).unwrap())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct GamelogRow {
    pub id: i64,
    pub game_id: i64,
    pub team: i64,
    pub player_season: i64,
    pub playing_as: String,
}

impl GamelogRow {
    pub fn gamelog_id(&self) -> GamelogId {
        GamelogId(u32::try_from(self.id).unwrap())
    }
}

/// The stat columns of any of the four stat tables.
#[derive(Debug, Clone, Default, FromRow)]
pub struct StatRow {
    pub time_played: i64,
    pub tags: i64,
    pub pops: i64,
    pub grabs: i64,
    pub drops: i64,
    pub hold: i64,
    pub captures: i64,
    pub prevent: i64,
    pub returns: i64,
    pub powerups: i64,
    pub caps_for: i64,
    pub caps_against: i64,
    pub total_pups_in_game: i64,
    pub grabs_off_handoffs: i64,
    pub caps_off_handoffs: i64,
    pub grabs_off_regrab: i64,
    pub caps_off_regrab: i64,
    pub long_holds: i64,
    pub flaccids: i64,
    pub handoffs: i64,
    pub good_handoffs: i64,
    pub quick_returns: i64,
    pub returns_in_base: i64,
    pub saves: i64,
    pub key_returns: i64,
    pub hold_against: i64,
    pub kept_flags: i64,
}

impl From<&StatLine> for StatRow {
    fn from(line: &StatLine) -> StatRow {
        StatRow {
            time_played: i64::from(u32::from(line.time_played)),
            tags: i64::from(line.tags),
            pops: i64::from(line.pops),
            grabs: i64::from(line.grabs),
            drops: i64::from(line.drops),
            hold: i64::from(u32::from(line.hold)),
            captures: i64::from(line.captures),
            prevent: i64::from(u32::from(line.prevent)),
            returns: i64::from(line.returns),
            powerups: i64::from(line.powerups),
            caps_for: i64::from(line.caps_for),
            caps_against: i64::from(line.caps_against),
            total_pups_in_game: i64::from(line.total_pups_in_game),
            grabs_off_handoffs: i64::from(line.grabs_off_handoffs),
            caps_off_handoffs: i64::from(line.caps_off_handoffs),
            grabs_off_regrab: i64::from(line.grabs_off_regrab),
            caps_off_regrab: i64::from(line.caps_off_regrab),
            long_holds: i64::from(line.long_holds),
            flaccids: i64::from(line.flaccids),
            handoffs: i64::from(line.handoffs),
            good_handoffs: i64::from(line.good_handoffs),
            quick_returns: i64::from(line.quick_returns),
            returns_in_base: i64::from(line.returns_in_base),
            saves: i64::from(line.saves),
            key_returns: i64::from(line.key_returns),
            hold_against: i64::from(u32::from(line.hold_against)),
            kept_flags: i64::from(line.kept_flags),
        }
    }
}

impl From<&StatRow> for StatLine {
    fn from(row: &StatRow) -> StatLine {
        StatLine {
            time_played: Ticks(u32::try_from(row.time_played).unwrap()),
            tags: u32::try_from(row.tags).unwrap(),
            pops: u32::try_from(row.pops).unwrap(),
            grabs: u32::try_from(row.grabs).unwrap(),
            drops: u32::try_from(row.drops).unwrap(),
            hold: Ticks(u32::try_from(row.hold).unwrap()),
            captures: u32::try_from(row.captures).unwrap(),
            prevent: Ticks(u32::try_from(row.prevent).unwrap()),
            returns: u32::try_from(row.returns).unwrap(),
            powerups: u32::try_from(row.powerups).unwrap(),
            caps_for: u32::try_from(row.caps_for).unwrap(),
            caps_against: u32::try_from(row.caps_against).unwrap(),
            total_pups_in_game: u32::try_from(row.total_pups_in_game).unwrap(),
            grabs_off_handoffs: u32::try_from(row.grabs_off_handoffs).unwrap(),
            caps_off_handoffs: u32::try_from(row.caps_off_handoffs).unwrap(),
            grabs_off_regrab: u32::try_from(row.grabs_off_regrab).unwrap(),
            caps_off_regrab: u32::try_from(row.caps_off_regrab).unwrap(),
            long_holds: u32::try_from(row.long_holds).unwrap(),
            flaccids: u32::try_from(row.flaccids).unwrap(),
            handoffs: u32::try_from(row.handoffs).unwrap(),
            good_handoffs: u32::try_from(row.good_handoffs).unwrap(),
            quick_returns: u32::try_from(row.quick_returns).unwrap(),
            returns_in_base: u32::try_from(row.returns_in_base).unwrap(),
            saves: u32::try_from(row.saves).unwrap(),
            key_returns: u32::try_from(row.key_returns).unwrap(),
            hold_against: Ticks(u32::try_from(row.hold_against).unwrap()),
            kept_flags: u32::try_from(row.kept_flags).unwrap(),
        }
    }
}

/// Bind the stat columns of `row` onto a query, in [`STAT_COLUMNS`] order.
pub fn bind_stats<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    row: &StatRow,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(row.time_played)
        .bind(row.tags)
        .bind(row.pops)
        .bind(row.grabs)
        .bind(row.drops)
        .bind(row.hold)
        .bind(row.captures)
        .bind(row.prevent)
        .bind(row.returns)
        .bind(row.powerups)
        .bind(row.caps_for)
        .bind(row.caps_against)
        .bind(row.total_pups_in_game)
        .bind(row.grabs_off_handoffs)
        .bind(row.caps_off_handoffs)
        .bind(row.grabs_off_regrab)
        .bind(row.caps_off_regrab)
        .bind(row.long_holds)
        .bind(row.flaccids)
        .bind(row.handoffs)
        .bind(row.good_handoffs)
        .bind(row.quick_returns)
        .bind(row.returns_in_base)
        .bind(row.saves)
        .bind(row.key_returns)
        .bind(row.hold_against)
        .bind(row.kept_flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_line_round_trip() {
        let line = StatLine {
            time_played: Ticks(36_000),
            tags: 7,
            captures: 2,
            hold: Ticks(1_234),
            kept_flags: 1,
            ..StatLine::default()
        };
        let row = StatRow::from(&line);
        assert_eq!(StatLine::from(&row), line);
    }

    #[test]
    fn stat_columns_match_placeholder_count() {
        let columns = STAT_COLUMNS.split(',').count();
        let placeholders = STAT_PLACEHOLDERS.split(',').count();
        assert_eq!(columns, placeholders);
        assert_eq!(columns, 27);
    }
}
