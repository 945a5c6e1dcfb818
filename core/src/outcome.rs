//! # Game outcome classification
//!
//! A finished game is classified from team1's perspective into one of five
//! outcome codes, each carrying standing points for both teams. Wins and
//! losses in regulation award 3/0; overtime results 2/1; ties 1/1.
use derive_more::{Add, AddAssign, Display, From, Into, Sum};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

/// Non-negative capture count, single-game or aggregated.
#[derive(
    Default,
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    From,
    Into,
    Add,
    AddAssign,
    Sum,
)]
pub struct CapCount(pub u32);

impl std::ops::Sub for CapCount {
    type Output = CapDiff;
    fn sub(self, other: Self) -> CapDiff {
        CapDiff(i64::from(self.0) - i64::from(other.0))
    }
}

impl num::Zero for CapCount {
    fn zero() -> CapCount {
        CapCount(0)
    }
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Capture differential: captures scored minus captures conceded.
#[derive(
    Default,
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    From,
    Into,
    Add,
    AddAssign,
    Sum,
)]
pub struct CapDiff(pub i64);

/// Standings points awarded for one game: 3 / 2 / 1 / 0.
#[derive(
    Default,
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    From,
    Into,
    Add,
    AddAssign,
    Sum,
)]
pub struct StandingPoints(pub u32);

impl num::Zero for StandingPoints {
    fn zero() -> StandingPoints {
        StandingPoints(0)
    }
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Outcome of a game from team1's perspective.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    OvertimeWin,
    Tie,
    OvertimeLoss,
    Loss,
}

impl Outcome {
    /// Storage code, always expressed from team1's perspective.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::OvertimeWin => "OTW",
            Outcome::Tie => "T",
            Outcome::OvertimeLoss => "OTL",
            Outcome::Loss => "L",
        }
    }

    /// Standing points for (team1, team2).
    pub fn standing_points(&self) -> (StandingPoints, StandingPoints) {
        match self {
            Outcome::Win => (StandingPoints(3), StandingPoints(0)),
            Outcome::OvertimeWin => (StandingPoints(2), StandingPoints(1)),
            Outcome::Tie => (StandingPoints(1), StandingPoints(1)),
            Outcome::OvertimeLoss => (StandingPoints(1), StandingPoints(2)),
            Outcome::Loss => (StandingPoints(0), StandingPoints(3)),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Outcome {
    type Err = OutcomeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "W" => Ok(Outcome::Win),
            "OTW" => Ok(Outcome::OvertimeWin),
            "T" => Ok(Outcome::Tie),
            "OTL" => Ok(Outcome::OvertimeLoss),
            "L" => Ok(Outcome::Loss),
            other => Err(OutcomeError::UnknownCode(String::from(other))),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum OutcomeError {
    #[error("unknown outcome code '{0}'")]
    UnknownCode(String),
}

/// Classify a finished game from the final scores and the overtime flag.
pub fn classify(team1_score: CapCount, team2_score: CapCount, overtime: bool) -> Outcome {
    match (team1_score.cmp(&team2_score), overtime) {
        (Ordering::Greater, false) => Outcome::Win,
        (Ordering::Greater, true) => Outcome::OvertimeWin,
        (Ordering::Less, false) => Outcome::Loss,
        (Ordering::Less, true) => Outcome::OvertimeLoss,
        (Ordering::Equal, _) => Outcome::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regulation_win() {
        let outcome = classify(CapCount(3), CapCount(1), false);
        assert_eq!(outcome, Outcome::Win);
        assert_eq!(
            outcome.standing_points(),
            (StandingPoints(3), StandingPoints(0))
        );
    }

    #[test]
    fn overtime_win() {
        let outcome = classify(CapCount(3), CapCount(2), true);
        assert_eq!(outcome, Outcome::OvertimeWin);
        assert_eq!(
            outcome.standing_points(),
            (StandingPoints(2), StandingPoints(1))
        );
    }

    #[test]
    fn overtime_loss() {
        let outcome = classify(CapCount(3), CapCount(4), true);
        assert_eq!(outcome, Outcome::OvertimeLoss);
        assert_eq!(
            outcome.standing_points(),
            (StandingPoints(1), StandingPoints(2))
        );
    }

    #[test]
    fn tie() {
        let outcome = classify(CapCount(2), CapCount(2), false);
        assert_eq!(outcome, Outcome::Tie);
        assert_eq!(
            outcome.standing_points(),
            (StandingPoints(1), StandingPoints(1))
        );
    }

    #[test]
    fn points_always_sum_to_three_except_tie() {
        for (t1, t2, ot) in [(3u32, 0u32, false), (2, 1, true), (0, 2, false), (1, 2, true)] {
            let outcome = classify(CapCount(t1), CapCount(t2), ot);
            let (p1, p2) = outcome.standing_points();
            assert_eq!(p1 + p2, StandingPoints(3));
        }
    }

    #[test]
    fn codes_round_trip() {
        for outcome in [
            Outcome::Win,
            Outcome::OvertimeWin,
            Outcome::Tie,
            Outcome::OvertimeLoss,
            Outcome::Loss,
        ] {
            assert_eq!(outcome.code().parse::<Outcome>().unwrap(), outcome);
        }
    }
}
