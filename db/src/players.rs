//! Player queries
use crate::models::PlayerSeasonRow;
use crate::DbError;
use clr_core::ids::SeasonId;
use sqlx::SqlitePool;

pub async fn get_player_seasons(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<PlayerSeasonRow>, DbError> {
    Ok(
        sqlx::query_as::<_, PlayerSeasonRow>(
            "SELECT * FROM player_seasons WHERE season = ? ORDER BY id",
        )
        .bind(i64::from(u32::from(season)))
        .fetch_all(pool)
        .await?,
    )
}
