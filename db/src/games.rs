//! Game and match queries
use crate::models::{GameRow, GamelogRow, MatchRow};
use crate::DbError;
use clr_core::ids::{GameId, MatchId, SeasonId};
use sqlx::SqlitePool;

pub async fn get_game(pool: &SqlitePool, game_id: GameId) -> Result<GameRow, DbError> {
    sqlx::query_as::<_, GameRow>("SELECT * FROM games WHERE id = ?")
        .bind(i64::from(u32::from(game_id)))
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::GameNotFound(game_id))
}

pub async fn get_match(pool: &SqlitePool, match_id: MatchId) -> Result<MatchRow, DbError> {
    Ok(
        sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE id = ?")
            .bind(i64::from(u32::from(match_id)))
            .fetch_one(pool)
            .await?,
    )
}

pub async fn get_gamelogs(pool: &SqlitePool, game_id: GameId) -> Result<Vec<GamelogRow>, DbError> {
    Ok(
        sqlx::query_as::<_, GamelogRow>("SELECT * FROM player_gamelogs WHERE game_id = ?")
            .bind(i64::from(u32::from(game_id)))
            .fetch_all(pool)
            .await?,
    )
}

/// Ids of every game in a season, ordered for deterministic reprocessing.
pub async fn get_season_game_ids(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<GameId>, DbError> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT games.id FROM games \
         JOIN matches ON matches.id = games.match_id \
         WHERE matches.season = ? \
         ORDER BY games.id",
    )
    .bind(i64::from(u32::from(season)))
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id,)| GameId(u32::try_from(id).unwrap()))
        .collect())
}

/// All matches of a season.
pub async fn get_season_matches(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<MatchRow>, DbError> {
    Ok(
        sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE season = ? ORDER BY date, id")
            .bind(i64::from(u32::from(season)))
            .fetch_all(pool)
            .await?,
    )
}

/// A season's games joined with their match rows.
pub async fn get_season_games(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<(GameRow, MatchRow)>, DbError> {
    let games = sqlx::query_as::<_, GameRow>(
        "SELECT games.* FROM games \
         JOIN matches ON matches.id = games.match_id \
         WHERE matches.season = ? \
         ORDER BY games.id",
    )
    .bind(i64::from(u32::from(season)))
    .fetch_all(pool)
    .await?;
    let matches = get_season_matches(pool, season).await?;
    games
        .into_iter()
        .map(|game| {
            let match_row = matches
                .iter()
                .find(|m| m.id == game.match_id)
                .cloned()
                .ok_or_else(|| {
                    DbError::Generic(format!("game {} references missing match", game.id))
                })?;
            Ok((game, match_row))
        })
        .collect()
}
