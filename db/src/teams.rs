//! Season and team queries
use crate::models::{SeasonRow, TeamSeasonRow};
use crate::DbError;
use clr_core::ids::{SeasonId, TeamSeasonId};
use sqlx::SqlitePool;

pub async fn get_seasons(pool: &SqlitePool) -> Result<Vec<SeasonRow>, DbError> {
    Ok(sqlx::query_as::<_, SeasonRow>("SELECT * FROM seasons")
        .fetch_all(pool)
        .await?)
}

pub async fn get_season(pool: &SqlitePool, season: SeasonId) -> Result<SeasonRow, DbError> {
    Ok(
        sqlx::query_as::<_, SeasonRow>("SELECT * FROM seasons WHERE id = ?")
            .bind(i64::from(u32::from(season)))
            .fetch_one(pool)
            .await?,
    )
}

pub async fn get_team_seasons(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<TeamSeasonRow>, DbError> {
    Ok(
        sqlx::query_as::<_, TeamSeasonRow>(
            "SELECT * FROM team_seasons WHERE season = ? ORDER BY id",
        )
        .bind(i64::from(u32::from(season)))
        .fetch_all(pool)
        .await?,
    )
}

pub async fn set_seed(pool: &SqlitePool, team: TeamSeasonId, seed: u32) -> Result<(), DbError> {
    sqlx::query("UPDATE team_seasons SET seed = ? WHERE id = ?")
        .bind(i64::from(seed))
        .bind(i64::from(u32::from(team)))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_playoff_finish(
    pool: &SqlitePool,
    team: TeamSeasonId,
    finish: &str,
) -> Result<(), DbError> {
    sqlx::query("UPDATE team_seasons SET playoff_finish = ? WHERE id = ?")
        .bind(finish)
        .bind(i64::from(u32::from(team)))
        .execute(pool)
        .await?;
    Ok(())
}
