//! Standings computation and persistence
//!
//! Loads a consistent snapshot of a season's regular games and playoff
//! series, hands them to the core standings engine, and writes the seeds
//! and playoff finish labels back onto the team rows.
use crate::models::PlayoffSeriesRow;
use crate::{games, teams, DbError};
use clr_core::ids::{MatchId, SeasonId, TeamSeasonId};
use clr_core::outcome::{CapCount, StandingPoints};
use clr_core::playoff::{playoff_finish, PlayoffSeries};
use clr_core::standings::{seed_teams, SeasonGame};
use sqlx::SqlitePool;
use tracing::info;

/// A season's games reduced to standings input.
pub async fn load_season_games(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<SeasonGame>, DbError> {
    let rows = games::get_season_games(pool, season).await?;
    Ok(rows
        .into_iter()
        .map(|(game, match_row)| SeasonGame {
            week: match_row.week(),
            team1: TeamSeasonId(u32::try_from(match_row.team1).unwrap()),
            team2: TeamSeasonId(u32::try_from(match_row.team2).unwrap()),
            team1_score: CapCount(u32::try_from(game.team1_score).unwrap()),
            team2_score: CapCount(u32::try_from(game.team2_score).unwrap()),
            team1_points: StandingPoints(
                u32::try_from(game.team1_standing_points.unwrap_or(0)).unwrap(),
            ),
            team2_points: StandingPoints(
                u32::try_from(game.team2_standing_points.unwrap_or(0)).unwrap(),
            ),
        })
        .collect())
}

/// A season's playoff series joined with their match context.
pub async fn load_playoff_series(
    pool: &SqlitePool,
    season: SeasonId,
) -> Result<Vec<PlayoffSeries>, DbError> {
    let matches = games::get_season_matches(pool, season).await?;
    let rows = sqlx::query_as::<_, PlayoffSeriesRow>(
        "SELECT playoff_series.* FROM playoff_series \
         JOIN matches ON matches.id = playoff_series.match_id \
         WHERE matches.season = ?",
    )
    .bind(i64::from(u32::from(season)))
    .fetch_all(pool)
    .await?;

    let mut series = Vec::new();
    for row in rows {
        let Some(match_id) = row.match_id else {
            continue;
        };
        let Some(match_row) = matches.iter().find(|m| m.id == match_id) else {
            continue;
        };
        series.push(PlayoffSeries {
            id: row.series_id(),
            match_id: MatchId(u32::try_from(match_id).unwrap()),
            week: match_row.week(),
            date: match_row.date()?,
            team1: TeamSeasonId(u32::try_from(match_row.team1).unwrap()),
            team2: TeamSeasonId(u32::try_from(match_row.team2).unwrap()),
            seed1: u32::try_from(row.seed1).unwrap(),
            seed2: u32::try_from(row.seed2).unwrap(),
            team1_prev: row
                .team1_prev_series
                .map(|id| clr_core::ids::SeriesId(u32::try_from(id).unwrap())),
            team2_prev: row
                .team2_prev_series
                .map(|id| clr_core::ids::SeriesId(u32::try_from(id).unwrap())),
            winner: row
                .winner
                .map(|id| TeamSeasonId(u32::try_from(id).unwrap())),
            team1_game_wins: row.team1_game_wins.map(|w| u32::try_from(w).unwrap()),
            team2_game_wins: row.team2_game_wins.map(|w| u32::try_from(w).unwrap()),
        });
    }
    Ok(series)
}

/// Recompute a season's seeds and playoff finishes and persist them.
pub async fn update_standings(pool: &SqlitePool, season: SeasonId) -> Result<(), DbError> {
    let team_rows = teams::get_team_seasons(pool, season).await?;
    let team_ids: Vec<TeamSeasonId> = team_rows.iter().map(|row| row.team_id()).collect();
    let season_games = load_season_games(pool, season).await?;

    let seeded = seed_teams(&team_ids, &season_games);
    for (team, seed) in &seeded {
        teams::set_seed(pool, *team, *seed).await?;
    }

    let series = load_playoff_series(pool, season).await?;
    for team in &team_ids {
        let finish = playoff_finish(*team, &series);
        teams::set_playoff_finish(pool, *team, &finish.to_string()).await?;
    }

    info!(
        season = u32::from(season),
        teams = seeded.len(),
        "standings updated"
    );
    Ok(())
}
