//! # Bulk match archive
//!
//! The archive lives on disk as two JSON indexes: the matches file with one
//! record per recorded game, and the maps file with flag geometry per map.
//! Both are loaded once at startup and kept read-only for the lifetime of
//! the process.
//!
//! A game missing from the bulk index can be fetched live from the archive
//! service; downloaded records carry no map id and therefore no geometry,
//! so position-based stat credits are skipped for them.
use clr_core::ids::EuId;
use clr_core::time::Tick;
use clr_core::timeline::{
    EventKind, MapGeometry, PlayerKey, Side, Splat, Timeline, TimelineError, TimelineEvent,
};
use clr_core::utils::date::DateError;
use clr_core::Date;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// One game as the pipeline consumes it: the timeline plus the metadata
/// that ends up on the game row.
#[derive(Debug, Clone)]
pub struct ArchiveMatch {
    pub eu_id: EuId,
    pub date: Date,
    pub map_name: String,
    pub map_id: Option<u32>,
    pub red_name: String,
    pub blue_name: String,
    pub red_score: u32,
    pub blue_score: u32,
    pub timeline: Timeline,
}

/// The process-wide bulk archive, loaded once.
#[derive(Debug)]
pub struct BulkArchive {
    matches: HashMap<EuId, ParseMatch>,
    maps: HashMap<u32, ParseMap>,
}

impl BulkArchive {
    /// Load and index the two archive files.
    pub fn load(matches_path: &str, maps_path: &str) -> Result<Self, ArchiveError> {
        let matches: Vec<ParseMatch> =
            serde_json::from_str(&crate::file_io::read_json_file_to_str(matches_path)?)?;
        let maps: Vec<ParseMap> =
            serde_json::from_str(&crate::file_io::read_json_file_to_str(maps_path)?)?;
        Ok(Self {
            matches: matches
                .into_iter()
                .map(|m| (EuId(m.match_id), m))
                .collect(),
            maps: maps.into_iter().map(|m| (m.id, m)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Look a game up by its archive id.
    pub fn fetch(&self, eu_id: EuId) -> Result<ArchiveMatch, ArchiveError> {
        let record = self
            .matches
            .get(&eu_id)
            .ok_or(ArchiveError::MatchNotFound(eu_id))?;
        let geometry = record
            .map_id
            .and_then(|id| self.maps.get(&id))
            .map(|map| MapGeometry {
                red_flag: (map.red_flag.x, map.red_flag.y),
                blue_flag: (map.blue_flag.x, map.blue_flag.y),
            });
        record.to_archive_match(geometry)
    }
}

/// Download a single game from the archive service.
///
/// Used when a requested game is absent from the bulk files. The response
/// carries no map id, so the returned record has neither `map_id` nor
/// geometry.
pub async fn download_match(base_url: &str, eu_id: EuId) -> Result<ArchiveMatch, ArchiveError> {
    let url = format!("{}/data/?match={}", base_url.trim_end_matches('/'), eu_id);
    let record: ParseMatch = reqwest::get(&url)
        .await
        .map_err(|e| ArchiveError::Download(e.to_string()))?
        .json()
        .await
        .map_err(|e| ArchiveError::Download(e.to_string()))?;
    let mut fetched = record.to_archive_match(None)?;
    fetched.map_id = None;
    Ok(fetched)
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("could not read archive file: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive JSON format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no match with id {0} in the archive")]
    MatchNotFound(EuId),
    #[error("archive download failed: {0}")]
    Download(String),
    #[error("event refers to unknown team '{0}'")]
    UnknownTeam(String),
    #[error("event refers to unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("event '{0}' is not a known kind")]
    UnknownEvent(String),
    #[error("join event for '{0}' lacks a team")]
    MissingJoinTeam(String),
    #[error("{0}")]
    Timeline(#[from] TimelineError),
    #[error("{0}")]
    Date(#[from] DateError),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParseMatch {
    #[serde(rename = "matchId")]
    match_id: u64,
    date: String,
    #[serde(rename = "teamRed")]
    team_red: ParseTeam,
    #[serde(rename = "teamBlue")]
    team_blue: ParseTeam,
    #[serde(rename = "mapId")]
    map_id: Option<u32>,
    #[serde(rename = "mapName")]
    map_name: String,
    players: Vec<String>,
    events: Vec<ParseEvent>,
    #[serde(default)]
    splats: Vec<ParseSplat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParseTeam {
    name: String,
    score: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParseEvent {
    tick: u32,
    event: String,
    player: String,
    #[serde(default)]
    team: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParseSplat {
    tick: u32,
    player: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParseMap {
    id: u32,
    name: String,
    #[serde(rename = "redFlag")]
    red_flag: ParseFlag,
    #[serde(rename = "blueFlag")]
    blue_flag: ParseFlag,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
struct ParseFlag {
    x: u32,
    y: u32,
}

impl ParseMatch {
    fn to_archive_match(&self, map: Option<MapGeometry>) -> Result<ArchiveMatch, ArchiveError> {
        let keys: HashMap<&str, PlayerKey> = self
            .players
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), PlayerKey(idx)))
            .collect();
        let events = self
            .events
            .iter()
            .map(|event| self.parse_event(event, &keys))
            .collect::<Result<Vec<TimelineEvent>, ArchiveError>>()?;
        let splats = self
            .splats
            .iter()
            .filter_map(|splat| {
                keys.get(splat.player.as_str()).map(|key| Splat {
                    tick: Tick(splat.tick),
                    player: *key,
                    x: splat.x,
                    y: splat.y,
                })
            })
            .collect();
        let timeline = Timeline::try_new(
            EuId(self.match_id),
            self.players.clone(),
            events,
            splats,
            map,
        )?;
        Ok(ArchiveMatch {
            eu_id: EuId(self.match_id),
            date: Date::from_str(&self.date)?,
            map_name: self.map_name.clone(),
            map_id: self.map_id,
            red_name: self.team_red.name.clone(),
            blue_name: self.team_blue.name.clone(),
            red_score: self.team_red.score,
            blue_score: self.team_blue.score,
            timeline,
        })
    }

    fn parse_event(
        &self,
        event: &ParseEvent,
        keys: &HashMap<&str, PlayerKey>,
    ) -> Result<TimelineEvent, ArchiveError> {
        let player = *keys
            .get(event.player.as_str())
            .ok_or_else(|| ArchiveError::UnknownPlayer(event.player.clone()))?;
        let kind = match event.event.as_str() {
            "Capture" => EventKind::Capture,
            "Drop" => EventKind::Drop,
            "DropTemporary" => EventKind::DropTemporary,
            "GameEnds" => EventKind::GameEnds,
            "Grab" => EventKind::Grab,
            "GrabDuplicatePowerUp" => EventKind::GrabDuplicatePowerUp,
            "Join" => {
                let team = event
                    .team
                    .as_deref()
                    .ok_or_else(|| ArchiveError::MissingJoinTeam(event.player.clone()))?;
                EventKind::Join(self.side_of(team)?)
            }
            "Leave" => EventKind::Leave,
            "Pop" => EventKind::Pop,
            "PowerUp" => EventKind::PowerUp,
            "Return" => EventKind::Return,
            "StartPreventing" => EventKind::StartPreventing,
            "StopPreventing" => EventKind::StopPreventing,
            "Tag" => EventKind::Tag,
            other => return Err(ArchiveError::UnknownEvent(String::from(other))),
        };
        Ok(TimelineEvent {
            tick: Tick(event.tick),
            kind,
            player,
        })
    }

    /// Map a join-event team string to a side: the team identities from the
    /// record itself first, the literal side names as a fallback.
    fn side_of(&self, team: &str) -> Result<Side, ArchiveError> {
        if team == self.team_red.name || team == "Red" {
            Ok(Side::Red)
        } else if team == self.team_blue.name || team == "Blue" {
            Ok(Side::Blue)
        } else {
            Err(ArchiveError::UnknownTeam(String::from(team)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_json() -> &'static str {
        r#"{
            "matchId": 12345,
            "date": "2024-02-11",
            "teamRed": {"name": "Major TDR", "score": 2},
            "teamBlue": {"name": "Major BAL", "score": 1},
            "mapId": 7,
            "mapName": "Whirlwind",
            "players": ["alice", "bob"],
            "events": [
                {"tick": 0, "event": "Join", "player": "alice", "team": "Major TDR"},
                {"tick": 0, "event": "Join", "player": "bob", "team": "Major BAL"},
                {"tick": 500, "event": "Grab", "player": "alice"},
                {"tick": 900, "event": "Capture", "player": "alice"},
                {"tick": 36000, "event": "GameEnds", "player": "alice"},
                {"tick": 36000, "event": "GameEnds", "player": "bob"}
            ],
            "splats": []
        }"#
    }

    #[test]
    fn parse_match_record() {
        let record: ParseMatch = serde_json::from_str(match_json()).unwrap();
        let fetched = record.to_archive_match(None).unwrap();
        assert_eq!(fetched.eu_id, EuId(12345));
        assert_eq!(fetched.red_name, "Major TDR");
        assert_eq!(fetched.timeline.num_players(), 2);
        let first = fetched.timeline.events()[0];
        assert_eq!(first.kind, EventKind::Join(Side::Red));
    }

    #[test]
    fn literal_side_names_accepted() {
        let record: ParseMatch = serde_json::from_str(
            &match_json().replace("\"team\": \"Major BAL\"", "\"team\": \"Blue\""),
        )
        .unwrap();
        let fetched = record.to_archive_match(None).unwrap();
        let joins: Vec<EventKind> = fetched
            .timeline
            .events()
            .iter()
            .take(2)
            .map(|e| e.kind)
            .collect();
        assert!(joins.contains(&EventKind::Join(Side::Blue)));
    }

    #[test]
    fn unknown_team_is_an_error() {
        let json = match_json().replace("\"team\": \"Major BAL\"", "\"team\": \"Unrelated\"");
        let record: ParseMatch = serde_json::from_str(&json).unwrap();
        assert!(record.to_archive_match(None).is_err());
    }

    #[test]
    fn unknown_event_is_an_error() {
        let json = match_json().replace("\"event\": \"Grab\"", "\"event\": \"Moonwalk\"");
        let record: ParseMatch = serde_json::from_str(&json).unwrap();
        assert!(record.to_archive_match(None).is_err());
    }
}
