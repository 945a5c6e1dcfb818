//! # Stat rollups
//!
//! Regulation game stats roll up into week totals, and regular-season week
//! totals roll up into season totals. Both operations are plain
//! component-wise sums, so re-running them over the same inputs is
//! idempotent by construction; the persistence layer completes the story by
//! fully overwriting the stored rollups.
use crate::ids::PlayerSeasonId;
use crate::stats::StatLine;
use crate::week::Week;
use itertools::Itertools;
use std::collections::HashMap;

/// One gamelog's regulation stat line, tagged with its rollup keys.
#[derive(Debug, Clone)]
pub struct GamelogStats {
    pub player_season: PlayerSeasonId,
    pub week: Week,
    pub stats: StatLine,
}

/// Sum regulation game stats into per-`(player season, week)` totals.
pub fn week_rollups(
    entries: impl IntoIterator<Item = GamelogStats>,
) -> HashMap<(PlayerSeasonId, Week), StatLine> {
    entries
        .into_iter()
        .map(|entry| ((entry.player_season, entry.week), entry.stats))
        .into_grouping_map()
        .sum()
}

/// Sum a player season's week totals into its season total.
///
/// Only regular weeks (`Week <n>` labels) count; playoff rounds are left
/// out of season totals.
pub fn season_rollup<'a>(weeks: impl IntoIterator<Item = (&'a Week, &'a StatLine)>) -> StatLine {
    weeks
        .into_iter()
        .filter(|(week, _)| week.is_regular())
        .map(|(_, stats)| *stats)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Ticks;

    fn entry(ps: u32, week: &str, captures: u32, hold: u32) -> GamelogStats {
        GamelogStats {
            player_season: PlayerSeasonId(ps),
            week: Week::from(week),
            stats: StatLine {
                captures,
                hold: Ticks(hold),
                ..StatLine::default()
            },
        }
    }

    #[test]
    fn weeks_sum_per_player_season() {
        let rollup = week_rollups(vec![
            entry(1, "Week 1", 2, 600),
            entry(1, "Week 1", 3, 300),
            entry(1, "Week 2", 1, 0),
            entry(2, "Week 1", 4, 100),
        ]);
        let week1 = rollup
            .get(&(PlayerSeasonId(1), Week::from("Week 1")))
            .unwrap();
        assert_eq!(week1.captures, 5);
        assert_eq!(week1.hold, Ticks(900));
        assert_eq!(
            rollup
                .get(&(PlayerSeasonId(2), Week::from("Week 1")))
                .unwrap()
                .captures,
            4
        );
        assert_eq!(rollup.len(), 3);
    }

    #[test]
    fn season_sums_only_regular_weeks() {
        let week1 = (Week::from("Week 1"), entry(1, "Week 1", 2, 0).stats);
        let week2 = (Week::from("Week 2"), entry(1, "Week 2", 1, 0).stats);
        let playoff = (Week::from("Foci Four"), entry(1, "Foci Four", 9, 0).stats);
        let season = season_rollup([
            (&week1.0, &week1.1),
            (&week2.0, &week2.1),
            (&playoff.0, &playoff.1),
        ]);
        assert_eq!(season.captures, 3);
    }

    #[test]
    fn rollup_is_idempotent() {
        let entries = vec![
            entry(1, "Week 1", 2, 600),
            entry(1, "Week 2", 3, 300),
            entry(3, "Week 1", 1, 60),
        ];
        let first = week_rollups(entries.clone());
        let second = week_rollups(entries);
        assert_eq!(first, second);
    }
}
