//! Idempotent data-entry import
//!
//! Applies a data-entry document to the database. Seasons must already
//! exist; everything referencing a missing season, team or player season is
//! skipped and counted rather than failing the import. Games are keyed by
//! their archive id, so re-importing the same document creates nothing new.
use crate::DbError;
use clr_data::entry::EntryData;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{info, warn};

/// Counts reported back to the caller after an import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub created_games: usize,
    pub skipped_games: usize,
}

pub async fn import_entry_data(
    pool: &SqlitePool,
    data: &EntryData,
) -> Result<ImportReport, DbError> {
    let mut report = ImportReport::default();

    // Seasons are referenced by name throughout the document.
    let season_rows = crate::teams::get_seasons(pool).await?;
    let seasons: HashMap<String, i64> = season_rows
        .into_iter()
        .map(|row| (row.name, row.id))
        .collect();

    // Team seasons, keyed by (season name, team name).
    let mut team_seasons: HashMap<(String, String), i64> = HashMap::new();
    for ts in &data.team_seasons {
        let Some(season_id) = seasons.get(&ts.season) else {
            warn!(season = %ts.season, team = %ts.name, "unknown season, skipping team");
            continue;
        };
        let franchise_id = get_or_create_franchise(pool, &ts.franchise).await?;
        let id = get_or_create_team_season(pool, *season_id, franchise_id, &ts.name, &ts.abbr)
            .await?;
        team_seasons.insert((ts.season.clone(), ts.name.clone()), id);
    }

    // Player seasons, keyed by (season name, playing_as).
    let mut player_seasons: HashMap<(String, String), i64> = HashMap::new();
    for ps in &data.player_seasons {
        let Some(season_id) = seasons.get(&ps.season) else {
            warn!(season = %ps.season, player = %ps.player, "unknown season, skipping player");
            continue;
        };
        let player_id = get_or_create_player(pool, &ps.player).await?;
        let team_id = ps
            .team
            .as_ref()
            .and_then(|team| team_seasons.get(&(ps.season.clone(), team.clone())))
            .copied();
        let id =
            get_or_create_player_season(pool, *season_id, player_id, team_id, &ps.playing_as)
                .await?;
        player_seasons.insert((ps.season.clone(), ps.playing_as.clone()), id);
    }

    for match_data in &data.matches {
        let Some(season_id) = seasons.get(&match_data.season) else {
            report.skipped_games += match_data.games.len();
            continue;
        };
        let team1 = team_seasons.get(&(match_data.season.clone(), match_data.team1.clone()));
        let team2 = team_seasons.get(&(match_data.season.clone(), match_data.team2.clone()));
        let (Some(team1), Some(team2)) = (team1, team2) else {
            warn!(
                team1 = %match_data.team1,
                team2 = %match_data.team2,
                "unresolved match teams, skipping match"
            );
            report.skipped_games += match_data.games.len();
            continue;
        };
        let match_id = get_or_create_match(
            pool,
            *season_id,
            *team1,
            *team2,
            &match_data.date,
            &match_data.week,
        )
        .await?;

        for (index, game) in match_data.games.iter().enumerate() {
            let red = team_seasons.get(&(match_data.season.clone(), game.red_team.clone()));
            let blue = team_seasons.get(&(match_data.season.clone(), game.blue_team.clone()));
            let (Some(red), Some(blue)) = (red, blue) else {
                report.skipped_games += 1;
                continue;
            };

            let existing: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM games WHERE tagpro_eu = ?")
                    .bind(i64::try_from(game.tagpro_eu).unwrap())
                    .fetch_optional(pool)
                    .await?;
            if existing.is_some() {
                report.skipped_games += 1;
                continue;
            }

            let game_id = sqlx::query(
                "INSERT INTO games (match_id, game_in_match, tagpro_eu, red_team, blue_team, \
                 team1_score, team2_score, map_name, map_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(match_id)
            .bind(format!("Game {}", index + 1))
            .bind(i64::try_from(game.tagpro_eu).unwrap())
            .bind(*red)
            .bind(*blue)
            .bind(i64::from(game.team1_score))
            .bind(i64::from(game.team2_score))
            .bind(&game.map_name)
            .bind(game.map_id.map(i64::from))
            .execute(pool)
            .await?
            .last_insert_rowid();

            for player in &game.players {
                let Some(player_season) = player_seasons
                    .get(&(match_data.season.clone(), player.player_season.clone()))
                else {
                    warn!(player = %player.player_season, "unresolved player season, skipping log");
                    continue;
                };
                let Some(team) =
                    team_seasons.get(&(match_data.season.clone(), player.team.clone()))
                else {
                    continue;
                };
                sqlx::query(
                    "INSERT OR IGNORE INTO player_gamelogs (game_id, team, player_season, playing_as) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(game_id)
                .bind(*team)
                .bind(*player_season)
                .bind(&player.playing_as)
                .execute(pool)
                .await?;
            }

            report.created_games += 1;
        }
    }

    info!(
        created = report.created_games,
        skipped = report.skipped_games,
        "import finished"
    );
    Ok(report)
}

async fn get_or_create_franchise(pool: &SqlitePool, name: &str) -> Result<i64, DbError> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM franchises WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    Ok(sqlx::query("INSERT INTO franchises (name, abbr) VALUES (?, ?)")
        .bind(name)
        .bind("")
        .execute(pool)
        .await?
        .last_insert_rowid())
}

async fn get_or_create_team_season(
    pool: &SqlitePool,
    season: i64,
    franchise: i64,
    name: &str,
    abbr: &str,
) -> Result<i64, DbError> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM team_seasons WHERE season = ? AND name = ?")
            .bind(season)
            .bind(name)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    Ok(sqlx::query(
        "INSERT INTO team_seasons (franchise, season, name, abbr) VALUES (?, ?, ?, ?)",
    )
    .bind(franchise)
    .bind(season)
    .bind(name)
    .bind(abbr)
    .execute(pool)
    .await?
    .last_insert_rowid())
}

async fn get_or_create_player(pool: &SqlitePool, name: &str) -> Result<i64, DbError> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM players WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    Ok(sqlx::query("INSERT INTO players (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?
        .last_insert_rowid())
}

async fn get_or_create_player_season(
    pool: &SqlitePool,
    season: i64,
    player: i64,
    team: Option<i64>,
    playing_as: &str,
) -> Result<i64, DbError> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM player_seasons WHERE season = ? AND player = ?")
            .bind(season)
            .bind(player)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    Ok(sqlx::query(
        "INSERT INTO player_seasons (season, team, player, playing_as) VALUES (?, ?, ?, ?)",
    )
    .bind(season)
    .bind(team)
    .bind(player)
    .bind(playing_as)
    .execute(pool)
    .await?
    .last_insert_rowid())
}

async fn get_or_create_match(
    pool: &SqlitePool,
    season: i64,
    team1: i64,
    team2: i64,
    date: &str,
    week: &str,
) -> Result<i64, DbError> {
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM matches WHERE season = ? AND team1 = ? AND team2 = ? AND date = ?",
    )
    .bind(season)
    .bind(team1)
    .bind(team2)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    Ok(sqlx::query(
        "INSERT INTO matches (season, date, week, team1, team2) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(season)
    .bind(date)
    .bind(week)
    .bind(team1)
    .bind(team2)
    .execute(pool)
    .await?
    .last_insert_rowid())
}
