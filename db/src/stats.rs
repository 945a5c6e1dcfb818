//! Stat record writes and rollup reads
//!
//! A game's derived values (scores, outcome, standing points, gamelog team
//! assignments, full and regulation stat rows) are written in one
//! transaction: either the whole game lands or none of it does. Week and
//! season rollups are fully overwriting upserts.
use crate::models::{bind_stats, StatRow, STAT_COLUMNS, STAT_PLACEHOLDERS};
use crate::DbError;
use clr_core::ids::{GameId, GamelogId, PlayerSeasonId, TeamSeasonId};
use clr_core::outcome::{Outcome, StandingPoints};
use clr_core::stats::StatLine;
use clr_core::week::Week;
use sqlx::SqlitePool;
use tracing::debug;

/// Stat rows for one gamelog, plus the team the timeline put the player on.
#[derive(Debug, Clone)]
pub struct GamelogWrite {
    pub gamelog: GamelogId,
    pub team: TeamSeasonId,
    pub full: StatLine,
    pub regulation: StatLine,
}

/// Everything the interpreter derived for one game.
#[derive(Debug, Clone)]
pub struct GameWrite {
    pub game: GameId,
    pub team1_score: u32,
    pub team2_score: u32,
    pub outcome: Outcome,
    pub team1_points: StandingPoints,
    pub team2_points: StandingPoints,
    pub players: Vec<GamelogWrite>,
}

/// Persist a processed game atomically.
pub async fn write_game(pool: &SqlitePool, write: &GameWrite) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE games SET team1_score = ?, team2_score = ?, outcome = ?, \
         team1_standing_points = ?, team2_standing_points = ? WHERE id = ?",
    )
    .bind(i64::from(write.team1_score))
    .bind(i64::from(write.team2_score))
    .bind(write.outcome.code())
    .bind(i64::from(u32::from(write.team1_points)))
    .bind(i64::from(u32::from(write.team2_points)))
    .bind(i64::from(u32::from(write.game)))
    .execute(&mut *tx)
    .await?;

    for player in &write.players {
        sqlx::query("UPDATE player_gamelogs SET team = ? WHERE id = ?")
            .bind(i64::from(u32::from(player.team)))
            .bind(i64::from(u32::from(player.gamelog)))
            .execute(&mut *tx)
            .await?;

        let full_sql = format!(
            "INSERT OR REPLACE INTO player_game_stats (player_gamelog, {}) VALUES (?, {})",
            STAT_COLUMNS, STAT_PLACEHOLDERS
        );
        let query =
            sqlx::query(&full_sql).bind(i64::from(u32::from(player.gamelog)));
        bind_stats(query, &StatRow::from(&player.full))
            .execute(&mut *tx)
            .await?;

        let regulation_sql = format!(
            "INSERT OR REPLACE INTO player_regulation_game_stats (player_gamelog, {}) VALUES (?, {})",
            STAT_COLUMNS, STAT_PLACEHOLDERS
        );
        let query =
            sqlx::query(&regulation_sql).bind(i64::from(u32::from(player.gamelog)));
        bind_stats(query, &StatRow::from(&player.regulation))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    debug!(game = u32::from(write.game), "game stats written");
    Ok(())
}

/// Regulation stat lines of a player season's gamelogs, with their weeks.
pub async fn get_regulation_stats(
    pool: &SqlitePool,
    player_season: PlayerSeasonId,
) -> Result<Vec<(Week, StatLine)>, DbError> {
    let sql = "SELECT matches.week AS week, s.* FROM player_regulation_game_stats s \
         JOIN player_gamelogs ON player_gamelogs.id = s.player_gamelog \
         JOIN games ON games.id = player_gamelogs.game_id \
         JOIN matches ON matches.id = games.match_id \
         WHERE player_gamelogs.player_season = ?";
    let rows: Vec<WeekStatRow> = sqlx::query_as(sql)
        .bind(i64::from(u32::from(player_season)))
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (Week::new(&row.week), StatLine::from(&row.stats)))
        .collect())
}

#[derive(Debug, sqlx::FromRow)]
struct WeekStatRow {
    week: String,
    #[sqlx(flatten)]
    stats: StatRow,
}

/// Overwrite a player's week rollup.
pub async fn upsert_week_stats(
    pool: &SqlitePool,
    player_season: PlayerSeasonId,
    week: &Week,
    stats: &StatLine,
) -> Result<(), DbError> {
    let sql = format!(
        "INSERT OR REPLACE INTO player_week_stats (player_season, week, {}) VALUES (?, ?, {})",
        STAT_COLUMNS, STAT_PLACEHOLDERS
    );
    let query = sqlx::query(&sql)
        .bind(i64::from(u32::from(player_season)))
        .bind(week.0.as_str());
    bind_stats(query, &StatRow::from(stats))
        .execute(pool)
        .await?;
    Ok(())
}

/// Overwrite a player's season rollup.
pub async fn upsert_season_stats(
    pool: &SqlitePool,
    player_season: PlayerSeasonId,
    stats: &StatLine,
) -> Result<(), DbError> {
    let sql = format!(
        "INSERT OR REPLACE INTO player_season_stats (player_season, {}) VALUES (?, {})",
        STAT_COLUMNS, STAT_PLACEHOLDERS
    );
    let query = sqlx::query(&sql).bind(i64::from(u32::from(player_season)));
    bind_stats(query, &StatRow::from(stats))
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop week rollups that no longer correspond to any played week.
pub async fn delete_week_stats_except(
    pool: &SqlitePool,
    player_season: PlayerSeasonId,
    weeks: &[Week],
) -> Result<(), DbError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT week FROM player_week_stats WHERE player_season = ?")
            .bind(i64::from(u32::from(player_season)))
            .fetch_all(pool)
            .await?;
    for (week,) in rows {
        if !weeks.iter().any(|w| w.0 == week) {
            sqlx::query("DELETE FROM player_week_stats WHERE player_season = ? AND week = ?")
                .bind(i64::from(u32::from(player_season)))
                .bind(&week)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}
