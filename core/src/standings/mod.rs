//! # Season standings
//!
//! Standings are derived entirely from the regular-season games: nothing is
//! stored except the final seeds. Each team accumulates a [`TeamRecord`]
//! with its standing points, capture totals and a head-to-head ledger, and
//! the ordering rules in [`order`] turn the records into a strict seeding.
pub mod order;

use crate::ids::TeamSeasonId;
use crate::outcome::{CapCount, CapDiff, StandingPoints};
use crate::week::Week;
pub use order::order_teams;
use std::collections::HashMap;

/// One regular-season game, reduced to the fields standings care about.
///
/// Scores and standing points are from team1's perspective, exactly as
/// persisted on the game row.
#[derive(Debug, Clone)]
pub struct SeasonGame {
    pub week: Week,
    pub team1: TeamSeasonId,
    pub team2: TeamSeasonId,
    pub team1_score: CapCount,
    pub team2_score: CapCount,
    pub team1_points: StandingPoints,
    pub team2_points: StandingPoints,
}

/// Accumulated record of one team against one opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadToHead {
    /// Standing points this team earned against the opponent.
    pub points: StandingPoints,
    /// Standing points both sides earned in those games.
    pub points_total: StandingPoints,
    pub caps_for: CapCount,
    pub caps_against: CapCount,
}

impl HeadToHead {
    fn add(&mut self, points: StandingPoints, total: StandingPoints, caps_for: CapCount, caps_against: CapCount) {
        self.points += points;
        self.points_total += total;
        self.caps_for += caps_for;
        self.caps_against += caps_against;
    }

    pub fn cap_differential(&self) -> CapDiff {
        self.caps_for - self.caps_against
    }
}

/// A team's full regular-season record.
#[derive(Debug, Clone, Default)]
pub struct TeamRecord {
    pub standing_points: StandingPoints,
    pub caps_for: CapCount,
    pub caps_against: CapCount,
    pub head_to_head: HashMap<TeamSeasonId, HeadToHead>,
}

impl TeamRecord {
    pub fn cap_differential(&self) -> CapDiff {
        self.caps_for - self.caps_against
    }
}

/// Accumulate every team's record from the season's regular games.
///
/// All teams passed in get a record, including teams without a single
/// played game.
pub fn team_records(
    teams: &[TeamSeasonId],
    games: &[SeasonGame],
) -> HashMap<TeamSeasonId, TeamRecord> {
    let mut records: HashMap<TeamSeasonId, TeamRecord> = teams
        .iter()
        .map(|team| (*team, TeamRecord::default()))
        .collect();
    for game in games.iter().filter(|game| game.week.is_regular()) {
        let total = game.team1_points + game.team2_points;
        if let Some(record) = records.get_mut(&game.team1) {
            record.standing_points += game.team1_points;
            record.caps_for += game.team1_score;
            record.caps_against += game.team2_score;
            record.head_to_head.entry(game.team2).or_default().add(
                game.team1_points,
                total,
                game.team1_score,
                game.team2_score,
            );
        }
        if let Some(record) = records.get_mut(&game.team2) {
            record.standing_points += game.team2_points;
            record.caps_for += game.team2_score;
            record.caps_against += game.team1_score;
            record.head_to_head.entry(game.team1).or_default().add(
                game.team2_points,
                total,
                game.team2_score,
                game.team1_score,
            );
        }
    }
    records
}

/// Seed the season's teams: order the records, then number `1..=N` in order.
///
/// The returned mapping is a bijection between the input teams and the seed
/// range.
pub fn seed_teams(
    teams: &[TeamSeasonId],
    games: &[SeasonGame],
) -> Vec<(TeamSeasonId, u32)> {
    let records = team_records(teams, games);
    order_teams(teams, &records)
        .into_iter()
        .zip(1..)
        .map(|(team, seed)| (team, seed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(team1: u32, team2: u32, score: (u32, u32), points: (u32, u32)) -> SeasonGame {
        SeasonGame {
            week: Week::from("Week 1"),
            team1: TeamSeasonId(team1),
            team2: TeamSeasonId(team2),
            team1_score: CapCount(score.0),
            team2_score: CapCount(score.1),
            team1_points: StandingPoints(points.0),
            team2_points: StandingPoints(points.1),
        }
    }

    #[test]
    fn records_accumulate_both_perspectives() {
        let teams = vec![TeamSeasonId(1), TeamSeasonId(2)];
        let games = vec![
            game(1, 2, (3, 1), (3, 0)),
            game(2, 1, (2, 2), (1, 1)),
        ];
        let records = team_records(&teams, &games);
        let one = &records[&TeamSeasonId(1)];
        assert_eq!(one.standing_points, StandingPoints(4));
        assert_eq!(one.caps_for, CapCount(5));
        assert_eq!(one.caps_against, CapCount(3));
        let versus_two = &one.head_to_head[&TeamSeasonId(2)];
        assert_eq!(versus_two.points, StandingPoints(4));
        assert_eq!(versus_two.points_total, StandingPoints(5));
        assert_eq!(versus_two.cap_differential(), CapDiff(2));
    }

    #[test]
    fn playoff_weeks_are_ignored() {
        let teams = vec![TeamSeasonId(1), TeamSeasonId(2)];
        let mut playoff = game(1, 2, (5, 0), (3, 0));
        playoff.week = Week::from("Foci Four");
        let records = team_records(&teams, &[playoff]);
        assert_eq!(
            records[&TeamSeasonId(1)].standing_points,
            StandingPoints(0)
        );
    }

    #[test]
    fn seeds_are_a_bijection() {
        let teams: Vec<TeamSeasonId> = (1..=4).map(TeamSeasonId).collect();
        let games = vec![
            game(1, 2, (3, 1), (3, 0)),
            game(3, 4, (2, 2), (1, 1)),
            game(1, 3, (1, 0), (3, 0)),
            game(2, 4, (0, 2), (0, 3)),
        ];
        let seeded = seed_teams(&teams, &games);
        let mut seeds: Vec<u32> = seeded.iter().map(|(_, seed)| *seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
        // Team 1 won both its games.
        assert_eq!(seeded[0].0, TeamSeasonId(1));
        assert_eq!(seeded[0].1, 1);
    }
}
