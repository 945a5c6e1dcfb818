//! Pipeline operations
//!
//! Each operation here is one stage of the derivation pipeline, in its
//! required order: a game's stats are written before its players are
//! re-aggregated, and a season's aggregation completes before its standings
//! update. Every stage only performs overwriting writes, so all of them are
//! safe to re-run.
use clr_core::aggregate::{season_rollup, week_rollups, GamelogStats};
use clr_core::error::CoreError;
use clr_core::ids::{EuId, GameId, MatchId, SeasonId};
use clr_core::interpreter::{interpret, GameSummary, InterpretError};
use clr_core::merge::merge_paused;
use clr_core::outcome::classify;
use clr_core::time::Tick;
use clr_core::timeline::Side;
use clr_core::week::Week;
use clr_data::archive::{ArchiveError, BulkArchive};
use clr_data::entry::EntryError;
use clr_db::stats::{GameWrite, GamelogWrite};
use clr_db::DbError;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{0}")]
    Archive(#[from] ArchiveError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Entry(#[from] EntryError),
    #[error("game {0} has no archive id")]
    NoArchiveId(GameId),
}

impl From<InterpretError> for OpsError {
    fn from(err: InterpretError) -> Self {
        OpsError::Core(CoreError::from(err))
    }
}

/// Derive and persist one game's stats from its archive timeline(s).
pub async fn process_game(
    pool: &SqlitePool,
    archive: &BulkArchive,
    game_id: GameId,
) -> Result<(), OpsError> {
    let game = clr_db::games::get_game(pool, game_id).await?;
    let eu_id = game
        .tagpro_eu
        .map(|id| EuId(u64::try_from(id).unwrap()))
        .ok_or(OpsError::NoArchiveId(game_id))?;

    let summary: GameSummary = match game.resumed_tagpro_eu {
        Some(resumed) => {
            let part1 = archive.fetch(eu_id)?;
            let part2 = archive.fetch(EuId(u64::try_from(resumed).unwrap()))?;
            let paused = Tick(u32::try_from(game.paused_time.unwrap_or(0)).unwrap());
            merge_paused(&part1.timeline, &part2.timeline, paused)?
        }
        None => {
            let fetched = archive.fetch(eu_id)?;
            let sheet = interpret(&fetched.timeline)?;
            sheet.summarize(&fetched.timeline)
        }
    };

    let match_row = clr_db::games::get_match(
        pool,
        MatchId(u32::try_from(game.match_id).unwrap()),
    )
    .await?;
    let team1_is_red = game.red_team == match_row.team1;
    let (team1_score, team2_score) = if team1_is_red {
        (summary.score.red, summary.score.blue)
    } else {
        (summary.score.blue, summary.score.red)
    };
    let outcome = classify(team1_score, team2_score, summary.went_to_overtime);
    let (team1_points, team2_points) = outcome.standing_points();

    let gamelogs = clr_db::games::get_gamelogs(pool, game_id).await?;
    let mut players = Vec::new();
    for log in &gamelogs {
        let Some(line) = summary.players.iter().find(|p| p.name == log.playing_as) else {
            warn!(player = %log.playing_as, game = u32::from(game_id), "no timeline entry for gamelog");
            continue;
        };
        let team = match line.side {
            Side::Red => game.red_team_id(),
            Side::Blue => game.blue_team_id(),
        };
        players.push(GamelogWrite {
            gamelog: log.gamelog_id(),
            team,
            full: line.full,
            regulation: line.regulation,
        });
    }
    for line in &summary.players {
        if !gamelogs.iter().any(|log| log.playing_as == line.name) {
            warn!(player = %line.name, game = u32::from(game_id), "timeline player without gamelog");
        }
    }

    clr_db::stats::write_game(
        pool,
        &GameWrite {
            game: game_id,
            team1_score: u32::from(team1_score),
            team2_score: u32::from(team2_score),
            outcome,
            team1_points,
            team2_points,
            players,
        },
    )
    .await?;
    info!(game = u32::from(game_id), outcome = %outcome, "game processed");
    Ok(())
}

/// Rebuild every player's week and season rollups for a season.
pub async fn reaggregate_season(pool: &SqlitePool, season: SeasonId) -> Result<(), OpsError> {
    let player_seasons = clr_db::players::get_player_seasons(pool, season).await?;
    for ps in &player_seasons {
        let ps_id = ps.player_season_id();
        let entries: Vec<GamelogStats> = clr_db::stats::get_regulation_stats(pool, ps_id)
            .await?
            .into_iter()
            .map(|(week, stats)| GamelogStats {
                player_season: ps_id,
                week,
                stats,
            })
            .collect();
        let rollups = week_rollups(entries);
        let weeks: Vec<Week> = rollups.keys().map(|(_, week)| week.clone()).collect();
        clr_db::stats::delete_week_stats_except(pool, ps_id, &weeks).await?;
        for ((_, week), stats) in &rollups {
            clr_db::stats::upsert_week_stats(pool, ps_id, week, stats).await?;
        }
        let season_line = season_rollup(rollups.iter().map(|((_, week), stats)| (week, stats)));
        clr_db::stats::upsert_season_stats(pool, ps_id, &season_line).await?;
    }
    info!(
        season = u32::from(season),
        players = player_seasons.len(),
        "season re-aggregated"
    );
    Ok(())
}

/// Reprocess every game of a season, then re-aggregate, then reseed.
pub async fn reprocess_season(
    pool: &SqlitePool,
    archive: &BulkArchive,
    season: SeasonId,
) -> Result<(), OpsError> {
    for game_id in clr_db::games::get_season_game_ids(pool, season).await? {
        process_game(pool, archive, game_id).await?;
    }
    reaggregate_season(pool, season).await?;
    clr_db::standings::update_standings(pool, season).await?;
    Ok(())
}

pub async fn update_standings(pool: &SqlitePool, season: SeasonId) -> Result<(), OpsError> {
    clr_db::standings::update_standings(pool, season).await?;
    Ok(())
}

pub async fn import(pool: &SqlitePool, path: &str) -> Result<(), OpsError> {
    let data = clr_data::entry::entry_data_from_file(path)?;
    let report = clr_db::import::import_entry_data(pool, &data).await?;
    info!(
        created = report.created_games,
        skipped = report.skipped_games,
        "import complete"
    );
    Ok(())
}
