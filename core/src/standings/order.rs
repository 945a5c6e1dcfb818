//! # Standings ordering
//!
//! Teams are ordered by a prioritised list of criteria. Each criterion
//! partitions a tied group into equal-rank sub-groups; the next criterion is
//! applied only inside sub-groups that are still tied. The application is
//! greedy: once a group is down to one team, no further criteria touch it.
//!
//! The criteria, in order:
//!
//! 1. Standing points over all regular-season games.
//! 2. Head-to-head standing-point share among the tied teams. Teams with no
//!    games against the rest of the group rank last within it.
//! 3. Standing-point share against the opponents every tied team has faced
//!    (common opponents, excluding the tied teams themselves). Skipped when
//!    there are none.
//! 4. Capture differential against the common opponents. Skipped when there
//!    are none.
//! 5. Total capture differential.
//! 6. Total captures scored.
//!
//! Whatever remains tied after the last criterion keeps its input order, so
//! the result is always a strict order.
use crate::ids::TeamSeasonId;
use crate::standings::TeamRecord;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Order a season's teams from best to worst.
pub fn order_teams(
    teams: &[TeamSeasonId],
    records: &HashMap<TeamSeasonId, TeamRecord>,
) -> Vec<TeamSeasonId> {
    let criteria: Vec<Box<dyn Criterion>> = vec![
        Box::new(ByStandingPoints),
        Box::new(ByHeadToHeadShare),
        Box::new(ByCommonOpponentShare),
        Box::new(ByCommonOpponentCapDiff),
        Box::new(ByCapDiff),
        Box::new(ByTotalCaps),
    ];
    let order = apply_criteria(
        records,
        &criteria,
        NonStrictOrder::single(teams.to_vec()),
    );
    order.flatten()
}

/// Apply criteria greedily: recurse with the next criterion only while the
/// order is non-strict and criteria remain.
fn apply_criteria(
    records: &HashMap<TeamSeasonId, TeamRecord>,
    criteria: &[Box<dyn Criterion>],
    order: NonStrictOrder,
) -> NonStrictOrder {
    if order.is_strict() || criteria.is_empty() {
        return order;
    }
    let (current, remaining) = criteria.split_at(1);
    let order = order
        .into_iter()
        .fold(NonStrictOrder::empty(), |acc, group| {
            let sub_order = if group.len() > 1 {
                current[0].partition(records, &group)
            } else {
                NonStrictOrder::single(group)
            };
            acc.extend(sub_order)
        });
    apply_criteria(records, remaining, order)
}

/// Sorted groups of equal-rank teams, best first.
#[derive(Debug, PartialEq)]
struct NonStrictOrder(Vec<Vec<TeamSeasonId>>);

impl NonStrictOrder {
    fn empty() -> Self {
        NonStrictOrder(vec![])
    }

    fn single(group: Vec<TeamSeasonId>) -> Self {
        NonStrictOrder(vec![group])
    }

    fn is_strict(&self) -> bool {
        self.0.iter().all(|group| group.len() == 1)
    }

    fn extend(self, other: NonStrictOrder) -> Self {
        NonStrictOrder([&self.0[..], &other.0[..]].concat())
    }

    fn flatten(self) -> Vec<TeamSeasonId> {
        self.0.into_iter().flatten().collect()
    }
}

impl IntoIterator for NonStrictOrder {
    type Item = Vec<TeamSeasonId>;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single tie-break stage: split a tied group into equal-rank sub-groups.
trait Criterion {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder;
}

/// Order a group by a descending key, stably so residual ties keep input
/// order.
fn order_by_key<K: Ord>(
    group: &[TeamSeasonId],
    key: impl Fn(TeamSeasonId) -> K,
) -> NonStrictOrder {
    let mut keyed: Vec<(TeamSeasonId, K)> = group.iter().map(|team| (*team, key(*team))).collect();
    keyed.sort_by(|a, b| b.1.cmp(&a.1));
    let mut order: Vec<Vec<TeamSeasonId>> = Vec::new();
    let mut prev: Option<K> = None;
    for (team, k) in keyed {
        let tied = prev.as_ref().map_or(false, |p| *p == k);
        if tied {
            if let Some(last) = order.last_mut() {
                last.push(team);
            }
        } else {
            order.push(vec![team]);
        }
        prev = Some(k);
    }
    NonStrictOrder(order)
}

/// Standing-point share, compared as an exact fraction.
///
/// Cross-multiplied comparison keeps the key `Ord` without floats; the
/// equality follows the comparison so that 3/6 and 2/4 tie.
#[derive(Debug, Clone, Copy)]
struct PointShare {
    earned: u32,
    available: u32,
}

impl PartialEq for PointShare {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PointShare {}

impl PartialOrd for PointShare {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PointShare {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.earned) * u64::from(other.available);
        let rhs = u64::from(other.earned) * u64::from(self.available);
        lhs.cmp(&rhs)
    }
}

struct ByStandingPoints;

impl Criterion for ByStandingPoints {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        order_by_key(group, |team| {
            records
                .get(&team)
                .map(|r| r.standing_points)
                .unwrap_or_default()
        })
    }
}

struct ByHeadToHeadShare;

impl Criterion for ByHeadToHeadShare {
    /// Share of standing points earned in games against the rest of the
    /// tied group. An undefined share (no games against the group) ranks
    /// below every defined one via `None < Some`.
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        order_by_key(group, |team| {
            share_against(records, team, group.iter().filter(|o| **o != team).copied())
        })
    }
}

struct ByCommonOpponentShare;

impl Criterion for ByCommonOpponentShare {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        let common = common_opponents(records, group);
        if common.is_empty() {
            return NonStrictOrder::single(group.to_vec());
        }
        order_by_key(group, |team| {
            share_against(records, team, common.iter().copied())
        })
    }
}

struct ByCommonOpponentCapDiff;

impl Criterion for ByCommonOpponentCapDiff {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        let common = common_opponents(records, group);
        if common.is_empty() {
            return NonStrictOrder::single(group.to_vec());
        }
        order_by_key(group, |team| {
            records.get(&team).map_or(0, |record| {
                common
                    .iter()
                    .filter_map(|opponent| record.head_to_head.get(opponent))
                    .map(|h2h| i64::from(h2h.cap_differential()))
                    .sum::<i64>()
            })
        })
    }
}

struct ByCapDiff;

impl Criterion for ByCapDiff {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        order_by_key(group, |team| {
            records
                .get(&team)
                .map(|r| r.cap_differential())
                .unwrap_or_default()
        })
    }
}

struct ByTotalCaps;

impl Criterion for ByTotalCaps {
    fn partition(
        &self,
        records: &HashMap<TeamSeasonId, TeamRecord>,
        group: &[TeamSeasonId],
    ) -> NonStrictOrder {
        order_by_key(group, |team| {
            records.get(&team).map(|r| r.caps_for).unwrap_or_default()
        })
    }
}

/// Standing-point share of `team` over its games against `opponents`.
fn share_against(
    records: &HashMap<TeamSeasonId, TeamRecord>,
    team: TeamSeasonId,
    opponents: impl Iterator<Item = TeamSeasonId>,
) -> Option<PointShare> {
    let record = records.get(&team)?;
    let mut earned = 0;
    let mut available = 0;
    for opponent in opponents {
        if let Some(h2h) = record.head_to_head.get(&opponent) {
            earned += u32::from(h2h.points);
            available += u32::from(h2h.points_total);
        }
    }
    if available == 0 {
        None
    } else {
        Some(PointShare { earned, available })
    }
}

/// Opponents every team in the group has faced, excluding the group itself.
fn common_opponents(
    records: &HashMap<TeamSeasonId, TeamRecord>,
    group: &[TeamSeasonId],
) -> HashSet<TeamSeasonId> {
    let group_set: HashSet<TeamSeasonId> = group.iter().copied().collect();
    let mut teams = group.iter();
    let mut common: HashSet<TeamSeasonId> = match teams.next() {
        Some(first) => records
            .get(first)
            .map(|r| r.head_to_head.keys().copied().collect())
            .unwrap_or_default(),
        None => return HashSet::new(),
    };
    for team in teams {
        common.retain(|opponent| {
            records
                .get(team)
                .map_or(false, |r| r.head_to_head.contains_key(opponent))
        });
    }
    common.retain(|opponent| !group_set.contains(opponent));
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{CapCount, StandingPoints};
    use crate::standings::{team_records, SeasonGame};
    use crate::week::Week;

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

    fn order(teams: &[u32], games: &[SeasonGame]) -> Vec<u32> {
        let teams: Vec<TeamSeasonId> = teams.iter().map(|t| TeamSeasonId(*t)).collect();
        let records = team_records(&teams, games);
        order_teams(&teams, &records)
            .into_iter()
            .map(u32::from)
            .collect()
    }

    #[test]
    fn points_decide_first() {
        let games = vec![game(1, 2, (1, 3), (0, 3)), game(2, 3, (2, 0), (3, 0))];
        assert_eq!(order(&[1, 2, 3], &games), vec![2, 1, 3]);
    }

    #[test]
    fn head_to_head_breaks_point_tie() {
        // 1, 2 and 3 all at 3 points; 1 won its meeting with 2, so the
        // head-to-head share puts 1 ahead of 2.
        let games = vec![
            game(1, 2, (2, 1), (3, 0)),
            game(3, 1, (1, 0), (3, 0)),
            game(2, 4, (2, 0), (3, 0)),
        ];
        assert_eq!(order(&[1, 2, 3, 4], &games), vec![3, 1, 2, 4]);
    }

    #[test]
    fn no_group_games_ranks_last_in_group() {
        // 1, 2, 3 all tied on points. 1 and 2 met (1 won); 3 never faced
        // either, so its head-to-head share is undefined and ranks last
        // within the tied group.
        let games = vec![
            game(1, 2, (2, 1), (3, 0)),
            game(2, 4, (3, 0), (3, 0)),
            game(3, 4, (2, 0), (3, 0)),
            game(3, 5, (0, 1), (0, 3)),
            game(1, 5, (0, 2), (0, 3)),
        ];
        // Points: 5 -> 6; 1, 2, 3 -> 3; 4 -> 0.
        let ordered = order(&[1, 2, 3, 4, 5], &games);
        assert_eq!(ordered, vec![5, 1, 2, 3, 4]);
    }

    #[test]
    fn common_opponents_break_remaining_tie() {
        // 1 and 2 are tied and never met; both faced 3. 1 beat 3, 2 lost
        // to 3 but picked up its points elsewhere.
        let games = vec![
            game(1, 3, (2, 0), (3, 0)),
            game(2, 3, (0, 1), (0, 3)),
            game(1, 4, (0, 3), (0, 3)),
            game(2, 5, (3, 0), (3, 0)),
            game(3, 4, (1, 1), (1, 1)),
        ];
        let ordered = order(&[1, 2, 3, 4, 5], &games);
        let pos_1 = ordered.iter().position(|t| *t == 1).unwrap();
        let pos_2 = ordered.iter().position(|t| *t == 2).unwrap();
        assert!(pos_1 < pos_2);
    }

    #[test]
    fn common_opponent_cap_diff_breaks_equal_share() {
        // 1 and 2 split against common opponent 3 with the same point
        // share but different cap margins.
        let games = vec![
            game(1, 3, (3, 1), (3, 0)),
            game(3, 1, (2, 0), (3, 0)),
            game(2, 3, (2, 0), (3, 0)),
            game(3, 2, (2, 1), (3, 0)),
        ];
        // Both at 3 points, both 3/6 against 3. Cap diff vs 3: team 1 is
        // (3-1)+(0-2) = 0, team 2 is (2-0)+(1-2) = 1.
        let ordered = order(&[1, 2], &games);
        assert_eq!(ordered, vec![2, 1]);
    }

    #[test]
    fn total_cap_diff_when_no_common_opponents() {
        let games = vec![
            game(1, 3, (5, 0), (3, 0)),
            game(2, 4, (3, 0), (3, 0)),
        ];
        let ordered = order(&[1, 2, 3, 4], &games);
        assert_eq!(ordered[0], 1);
        assert_eq!(ordered[1], 2);
    }

    #[test]
    fn total_caps_as_final_criterion() {
        let games = vec![
            game(1, 3, (4, 1), (3, 0)),
            game(2, 4, (3, 0), (3, 0)),
        ];
        // Equal points, no common opponents, equal cap diff (+3), caps 4 > 3.
        let ordered = order(&[1, 2, 3, 4], &games);
        assert_eq!(ordered[0], 1);
        assert_eq!(ordered[1], 2);
    }

    #[test]
    fn residual_tie_preserves_input_order() {
        let ordered = order(&[7, 9, 8], &[]);
        assert_eq!(ordered, vec![7, 9, 8]);
    }
}
