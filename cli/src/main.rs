#![forbid(unsafe_code)]

//! Pipeline command line
//!
//! `clr` drives the stat-derivation pipeline against the configured
//! database and the bulk archive files: reprocess individual games,
//! re-aggregate or fully reprocess a season, update standings, or import a
//! data-entry document.
mod ops;

use clr_core::ids::{GameId, SeasonId};
use clr_data::archive::BulkArchive;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(name = "clr", about = "capture league stat pipeline")]
struct Opt {
    /// Bulk archive matches index
    #[structopt(long, default_value = "data/league_matches.json")]
    matches_index: String,
    /// Bulk archive maps index
    #[structopt(long, default_value = "data/bulkmaps.json")]
    maps_index: String,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Reprocess the stats of the given games
    #[structopt(name = "reprocess")]
    Reprocess { game_ids: Vec<u32> },
    /// Rebuild week and season stat rollups for a season
    #[structopt(name = "reaggregate-season")]
    ReaggregateSeason { season_id: u32 },
    /// Reprocess all games of a season, re-aggregate and update standings
    #[structopt(name = "reprocess-season")]
    ReprocessSeason { season_id: u32 },
    /// Recompute a season's seeds and playoff finishes
    #[structopt(name = "update-standings")]
    UpdateStandings { season_id: u32 },
    /// Import a data-entry JSON document
    #[structopt(name = "import")]
    Import { path: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let opt = Opt::from_args();
    if let Err(err) = run(opt).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(opt: Opt) -> Result<(), ops::OpsError> {
    let pool = clr_db::pool::create_pool().await?;
    match opt.command {
        Command::Reprocess { game_ids } => {
            let archive = BulkArchive::load(&opt.matches_index, &opt.maps_index)?;
            for id in game_ids {
                ops::process_game(&pool, &archive, GameId(id)).await?;
            }
        }
        Command::ReaggregateSeason { season_id } => {
            ops::reaggregate_season(&pool, SeasonId(season_id)).await?;
        }
        Command::ReprocessSeason { season_id } => {
            let archive = BulkArchive::load(&opt.matches_index, &opt.maps_index)?;
            ops::reprocess_season(&pool, &archive, SeasonId(season_id)).await?;
        }
        Command::UpdateStandings { season_id } => {
            ops::update_standings(&pool, SeasonId(season_id)).await?;
        }
        Command::Import { path } => {
            ops::import(&pool, &path).await?;
        }
    }
    Ok(())
}
