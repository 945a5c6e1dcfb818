//! # Data-entry exchange format
//!
//! Season data is moved between instances as one JSON document with three
//! top-level arrays: team seasons, player seasons, and matches with their
//! nested games and rosters. All references are by name; the importer
//! resolves them against the database and skips anything it cannot resolve.
//!
//! Import is idempotent: games are keyed by their archive id and skipped
//! when already present.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level data-entry document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntryData {
    #[serde(rename = "teamSeasons", default)]
    pub team_seasons: Vec<EntryTeamSeason>,
    #[serde(rename = "playerSeasons", default)]
    pub player_seasons: Vec<EntryPlayerSeason>,
    #[serde(default)]
    pub matches: Vec<EntryMatch>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryTeamSeason {
    pub season: String,
    pub franchise: String,
    pub name: String,
    pub abbr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryPlayerSeason {
    pub season: String,
    #[serde(default)]
    pub team: Option<String>,
    pub player: String,
    pub playing_as: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryMatch {
    pub season: String,
    pub date: String,
    pub week: String,
    pub team1: String,
    pub team2: String,
    #[serde(default)]
    pub games: Vec<EntryGame>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryGame {
    pub tagpro_eu: u64,
    pub map_name: String,
    #[serde(default)]
    pub map_id: Option<u32>,
    pub red_team: String,
    pub blue_team: String,
    pub team1_score: u32,
    pub team2_score: u32,
    #[serde(default)]
    pub players: Vec<EntryGamePlayer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryGamePlayer {
    pub team: String,
    pub player_season: String,
    pub playing_as: String,
}

pub fn entry_data_from_str(json: &str) -> Result<EntryData, EntryError> {
    Ok(serde_json::from_str(json)?)
}

pub fn entry_data_from_file(filename: &str) -> Result<EntryData, EntryError> {
    let json = crate::file_io::read_json_file_to_str(filename)?;
    entry_data_from_str(&json)
}

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("could not read data-entry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("data-entry JSON format error: {0}")]
    Json(#[from] serde_json::Error),
}
