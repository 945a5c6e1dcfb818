//! # Playoff bracket and finish labels
//!
//! A playoff series is one-to-one with a bracket match; the `prev` references
//! form a DAG walked top-down from the final. Series live in a season-local
//! arena and refer to each other by [`SeriesId`], so the bracket needs no
//! shared ownership.
//!
//! A team's playoff finish is read off its most recent decided series.
use crate::ids::{MatchId, SeriesId, TeamSeasonId};
use crate::week::Week;
use crate::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One playoff series with its bracket links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub id: SeriesId,
    pub match_id: MatchId,
    pub week: Week,
    pub date: Date,
    pub team1: TeamSeasonId,
    pub team2: TeamSeasonId,
    pub seed1: u32,
    pub seed2: u32,
    pub team1_prev: Option<SeriesId>,
    pub team2_prev: Option<SeriesId>,
    pub winner: Option<TeamSeasonId>,
    pub team1_game_wins: Option<u32>,
    pub team2_game_wins: Option<u32>,
}

impl PlayoffSeries {
    pub fn involves(&self, team: TeamSeasonId) -> bool {
        self.team1 == team || self.team2 == team
    }
}

/// How a team's season ended.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayoffFinish {
    /// No playoff series in the season has a decided winner yet.
    Undecided,
    MissedPlayoffs,
    WonChampionship,
    /// Won their most recent round, short of the championship.
    Won(Week),
    Lost(Week),
}

impl fmt::Display for PlayoffFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayoffFinish::Undecided => write!(f, "\u{2014}"),
            PlayoffFinish::MissedPlayoffs => write!(f, "Missed playoffs"),
            PlayoffFinish::WonChampionship => write!(f, "Won championship"),
            PlayoffFinish::Won(week) => write!(f, "Won {}", week),
            PlayoffFinish::Lost(week) => write!(f, "Lost {}", week),
        }
    }
}

/// Compute a team's playoff finish from the season's series arena.
pub fn playoff_finish(team: TeamSeasonId, series: &[PlayoffSeries]) -> PlayoffFinish {
    if !series.iter().any(|s| s.winner.is_some()) {
        return PlayoffFinish::Undecided;
    }
    let mut own: Vec<&PlayoffSeries> = series.iter().filter(|s| s.involves(team)).collect();
    if own.is_empty() {
        return PlayoffFinish::MissedPlayoffs;
    }
    own.sort_by(|a, b| b.date.cmp(&a.date));
    let Some(last) = own.iter().find(|s| s.winner.is_some()) else {
        return PlayoffFinish::Undecided;
    };
    if last.winner == Some(team) {
        if last.week.is_final() {
            PlayoffFinish::WonChampionship
        } else {
            PlayoffFinish::Won(last.week.clone())
        }
    } else {
        PlayoffFinish::Lost(last.week.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn series(
        id: u32,
        week: &str,
        date: &str,
        teams: (u32, u32),
        winner: Option<u32>,
    ) -> PlayoffSeries {
        PlayoffSeries {
            id: SeriesId(id),
            match_id: MatchId(id),
            week: Week::from(week),
            date: Date::from_str(date).unwrap(),
            team1: TeamSeasonId(teams.0),
            team2: TeamSeasonId(teams.1),
            seed1: 1,
            seed2: 2,
            team1_prev: None,
            team2_prev: None,
            winner: winner.map(TeamSeasonId),
            team1_game_wins: None,
            team2_game_wins: None,
        }
    }

    #[test]
    fn undecided_until_any_series_has_a_winner() {
        let bracket = vec![series(1, "Foci Four", "2024-04-01", (1, 2), None)];
        assert_eq!(
            playoff_finish(TeamSeasonId(1), &bracket),
            PlayoffFinish::Undecided
        );
    }

    #[test]
    fn missed_playoffs() {
        let bracket = vec![series(1, "Foci Four", "2024-04-01", (1, 2), Some(1))];
        assert_eq!(
            playoff_finish(TeamSeasonId(9), &bracket),
            PlayoffFinish::MissedPlayoffs
        );
    }

    #[test]
    fn champion_and_runner_up() {
        let bracket = vec![
            series(1, "Foci Four", "2024-04-01", (1, 4), Some(1)),
            series(2, "Foci Four", "2024-04-01", (2, 3), Some(2)),
            series(3, "Super Ball", "2024-04-08", (1, 2), Some(1)),
        ];
        assert_eq!(
            playoff_finish(TeamSeasonId(1), &bracket),
            PlayoffFinish::WonChampionship
        );
        assert_eq!(
            playoff_finish(TeamSeasonId(2), &bracket),
            PlayoffFinish::Lost(Week::from("Super Ball"))
        );
        assert_eq!(
            playoff_finish(TeamSeasonId(3), &bracket),
            PlayoffFinish::Lost(Week::from("Foci Four"))
        );
    }

    #[test]
    fn win_without_reaching_final() {
        // Semifinal decided, final still open.
        let bracket = vec![
            series(1, "Foci Four", "2024-04-01", (1, 4), Some(1)),
            series(2, "Super Ball", "2024-04-08", (1, 2), None),
        ];
        assert_eq!(
            playoff_finish(TeamSeasonId(1), &bracket),
            PlayoffFinish::Won(Week::from("Foci Four"))
        );
    }

    #[test]
    fn finish_labels_display() {
        assert_eq!(format!("{}", PlayoffFinish::Undecided), "\u{2014}");
        assert_eq!(
            format!("{}", PlayoffFinish::Lost(Week::from("Foci Four"))),
            "Lost Foci Four"
        );
        assert_eq!(
            format!("{}", PlayoffFinish::WonChampionship),
            "Won championship"
        );
    }
}
