//! # Paused-game merging
//!
//! A game that was paused and resumed is recorded as two separate archive
//! timelines. The first timeline may contain voided play past the pause, so
//! part one is interpreted with the pause tick as its boundary: its
//! "regulation" snapshot is exactly the state at the pause. Part two resumes
//! the clock from zero, so its regulation boundary is whatever remained of
//! regulation at the pause.
//!
//! Per-player merging is keyed by username; the team a player finished part
//! two on wins over their part-one team.
use crate::interpreter::{interpret_bounded, GameSummary, InterpretError, PlayerLine};
use crate::time::{Tick, REGULATION_TICKS};
use crate::timeline::Timeline;

/// Merge the two timelines of a paused game into a single game summary.
pub fn merge_paused(
    part1: &Timeline,
    part2: &Timeline,
    paused_time: Tick,
) -> Result<GameSummary, InterpretError> {
    if paused_time <= REGULATION_TICKS {
        let at_pause = interpret_bounded(part1, paused_time)?;
        let resumed = interpret_bounded(part2, paused_time.remaining_regulation())?;
        let first = at_pause.summarize(part1);
        let second = resumed.summarize(part2);
        Ok(GameSummary {
            players: merge_players(&first.players, &first.players, &second.players),
            score: first.regulation_score + second.score,
            regulation_score: first.regulation_score + second.regulation_score,
            went_to_overtime: second.went_to_overtime,
        })
    } else {
        // Paused during overtime: part one needs two snapshots, one at the
        // regulation boundary for the regulation set and one at the pause
        // for the full set. Part two is pure overtime.
        let at_regulation = interpret_bounded(part1, REGULATION_TICKS)?.summarize(part1);
        let at_pause = interpret_bounded(part1, paused_time)?.summarize(part1);
        let resumed = interpret_bounded(part2, Tick(0))?.summarize(part2);
        Ok(GameSummary {
            players: merge_players(&at_pause.players, &at_regulation.players, &resumed.players),
            score: at_pause.regulation_score + resumed.score,
            regulation_score: at_regulation.regulation_score,
            went_to_overtime: true,
        })
    }
}

/// Combine per-player lines: part-one contributions are the at-pause
/// (`first_full`) and at-regulation (`first_regulation`) snapshots, part-two
/// contributions the resumed game's full and regulation sets.
fn merge_players(
    first_full: &[PlayerLine],
    first_regulation: &[PlayerLine],
    second: &[PlayerLine],
) -> Vec<PlayerLine> {
    let mut merged: Vec<PlayerLine> = Vec::new();
    for line in first_full {
        let regulation_part = first_regulation
            .iter()
            .find(|l| l.name == line.name)
            .map(|l| l.regulation)
            .unwrap_or_default();
        match second.iter().find(|l| l.name == line.name) {
            Some(resumed) => merged.push(PlayerLine {
                name: line.name.clone(),
                side: resumed.side,
                full: line.regulation + resumed.full,
                regulation: regulation_part + resumed.regulation,
            }),
            None => merged.push(PlayerLine {
                name: line.name.clone(),
                side: line.side,
                full: line.regulation,
                regulation: regulation_part,
            }),
        }
    }
    for line in second
        .iter()
        .filter(|l| first_full.iter().all(|f| f.name != l.name))
    {
        merged.push(line.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EuId;
    use crate::outcome::{classify, CapCount, Outcome};
    use crate::time::Ticks;
    use crate::timeline::{EventKind, PlayerKey, Side, TimelineEvent};

    fn timeline(players: &[&str], events: Vec<(u32, EventKind, usize)>) -> Timeline {
        Timeline::try_new(
            EuId(1),
            players.iter().map(|p| String::from(*p)).collect(),
            events
                .into_iter()
                .map(|(tick, kind, player)| TimelineEvent {
                    tick: Tick(tick),
                    kind,
                    player: PlayerKey(player),
                })
                .collect(),
            vec![],
            None,
        )
        .unwrap()
    }

    fn cap(events: &mut Vec<(u32, EventKind, usize)>, grab: u32, capture: u32, player: usize) {
        events.push((grab, EventKind::Grab, player));
        events.push((capture, EventKind::Capture, player));
    }

    /// Part one runs to the pause at tick 18000 with red up 2-1; part two
    /// replays the remaining regulation from a fresh clock, red adds one and
    /// blue two, then blue wins it in overtime.
    #[test]
    fn paused_in_regulation() {
        let mut part1 = Vec::new();
        part1.push((0, EventKind::Join(Side::Red), 0));
        part1.push((0, EventKind::Join(Side::Blue), 1));
        cap(&mut part1, 1_000, 2_000, 0);
        cap(&mut part1, 5_000, 6_000, 1);
        cap(&mut part1, 9_000, 10_000, 0);
        let part1 = timeline(&["a", "d"], part1);

        let mut part2 = Vec::new();
        part2.push((0, EventKind::Join(Side::Red), 0));
        part2.push((0, EventKind::Join(Side::Blue), 1));
        cap(&mut part2, 1_000, 2_000, 0);
        cap(&mut part2, 5_000, 6_000, 1);
        cap(&mut part2, 9_000, 10_000, 1);
        // Tied 3-3 after the remaining 18000 regulation ticks; blue wins in
        // overtime of the resumed game.
        cap(&mut part2, 19_000, 20_000, 1);
        for idx in 0..2 {
            part2.push((20_000, EventKind::GameEnds, idx));
        }
        let part2 = timeline(&["a", "d"], part2);

        let merged = merge_paused(&part1, &part2, Tick(18_000)).unwrap();

        assert_eq!(merged.regulation_score.red, CapCount(3));
        assert_eq!(merged.regulation_score.blue, CapCount(3));
        assert_eq!(merged.score.red, CapCount(3));
        assert_eq!(merged.score.blue, CapCount(4));
        assert!(merged.went_to_overtime);

        // Red is team1 here: an overtime loss worth 1 standing point.
        let outcome = classify(
            merged.score.red,
            merged.score.blue,
            merged.went_to_overtime,
        );
        assert_eq!(outcome, Outcome::OvertimeLoss);

        let a = merged.players.iter().find(|p| p.name == "a").unwrap();
        let d = merged.players.iter().find(|p| p.name == "d").unwrap();
        assert_eq!(a.full.captures, 3);
        assert_eq!(a.regulation.captures, 3);
        assert_eq!(d.full.captures, 4);
        assert_eq!(d.regulation.captures, 3);
        assert_eq!(a.full.time_played, Ticks(18_000 + 20_000));
        assert_eq!(a.regulation.time_played, Ticks(18_000 + 18_000));
    }

    #[test]
    fn player_only_in_one_part() {
        let mut part1 = Vec::new();
        part1.push((0, EventKind::Join(Side::Red), 0));
        part1.push((0, EventKind::Join(Side::Blue), 1));
        cap(&mut part1, 1_000, 2_000, 0);
        let part1 = timeline(&["a", "d"], part1);

        let mut part2 = Vec::new();
        part2.push((0, EventKind::Join(Side::Red), 0));
        part2.push((0, EventKind::Join(Side::Blue), 1));
        for idx in 0..2 {
            part2.push((18_000, EventKind::GameEnds, idx));
        }
        let part2 = timeline(&["a", "sub"], part2);

        let merged = merge_paused(&part1, &part2, Tick(18_000)).unwrap();
        let names: Vec<&str> = merged.players.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"a"));
        assert!(names.contains(&"d"));
        assert!(names.contains(&"sub"));

        // Part-one-only player keeps the at-pause stats.
        let d = merged.players.iter().find(|p| p.name == "d").unwrap();
        assert_eq!(d.full.caps_against, 1);
        assert_eq!(d.side, Side::Blue);
    }

    #[test]
    fn resumed_side_wins_over_paused_side() {
        let mut part1 = Vec::new();
        part1.push((0, EventKind::Join(Side::Red), 0));
        part1.push((0, EventKind::Join(Side::Blue), 1));
        let part1 = timeline(&["a", "d"], part1);

        let mut part2 = Vec::new();
        // Sides swapped on resume.
        part2.push((0, EventKind::Join(Side::Blue), 0));
        part2.push((0, EventKind::Join(Side::Red), 1));
        let part2 = timeline(&["a", "d"], part2);

        let merged = merge_paused(&part1, &part2, Tick(18_000)).unwrap();
        let a = merged.players.iter().find(|p| p.name == "a").unwrap();
        assert_eq!(a.side, Side::Blue);
    }
}
