use clr_core::ids::EuId;
use clr_core::interpreter::interpret;
use clr_core::outcome::{classify, CapCount, Outcome};
use clr_core::timeline::{PlayerKey, Side};
use clr_data::archive::{ArchiveError, BulkArchive};

fn archive() -> BulkArchive {
    BulkArchive::load(
        "tests/data/archive-matches.json",
        "tests/data/archive-maps.json",
    )
    .expect("could not load archive fixtures")
}

#[test]
fn load_bulk_archive() {
    let archive = archive();
    assert_eq!(archive.len(), 2);
    let fetched = archive.fetch(EuId(900_001)).unwrap();
    assert_eq!(fetched.red_name, "Major TDR");
    assert_eq!(fetched.map_id, Some(7));
    assert!(fetched.timeline.map.is_some());
}

#[test]
fn missing_match_id() {
    let err = archive().fetch(EuId(123)).unwrap_err();
    assert!(matches!(err, ArchiveError::MatchNotFound(EuId(123))));
}

#[test]
fn regulation_game_end_to_end() {
    let fetched = archive().fetch(EuId(900_001)).unwrap();
    let sheet = interpret(&fetched.timeline).unwrap();

    assert_eq!(sheet.score.red, CapCount(2));
    assert_eq!(sheet.score.blue, CapCount(1));
    assert_eq!(sheet.score.red, CapCount(fetched.red_score));
    assert!(!sheet.went_to_overtime);
    assert_eq!(
        classify(sheet.score.red, sheet.score.blue, sheet.went_to_overtime),
        Outcome::Win
    );

    let roster: Vec<&str> = fetched
        .timeline
        .roster()
        .map(|(_, name)| name)
        .collect();
    assert_eq!(roster, vec!["SomeBall", "BallSoHard", "Pilot", "Turret"]);

    // The red defender pops the blue carrier right next to the blue flag.
    let defender = sheet.full(PlayerKey(1));
    assert_eq!(defender.returns, 1);
    assert_eq!(defender.quick_returns, 1);
    assert_eq!(defender.saves, 1);
    assert_eq!(defender.returns_in_base, 0);

    let carrier = sheet.full(PlayerKey(2));
    assert_eq!(carrier.flaccids, 1);
    assert_eq!(carrier.powerups, 1);

    let preventer = sheet.full(PlayerKey(3));
    assert_eq!(u32::from(preventer.prevent), 1_800);

    // Regulation equals the full game when nothing crossed the boundary.
    for idx in 0..4 {
        assert_eq!(sheet.regulation(PlayerKey(idx)), sheet.full(PlayerKey(idx)));
    }
}

#[test]
fn overtime_game_end_to_end() {
    let fetched = archive().fetch(EuId(900_002)).unwrap();
    let sheet = interpret(&fetched.timeline).unwrap();

    assert!(sheet.went_to_overtime);
    assert_eq!(sheet.regulation_score.red, CapCount(2));
    assert_eq!(sheet.regulation_score.blue, CapCount(2));
    assert_eq!(sheet.score.red, CapCount(3));

    // Red is team2 of the match fixture; from team1's perspective this is
    // an overtime loss.
    assert_eq!(
        classify(sheet.score.blue, sheet.score.red, sheet.went_to_overtime),
        Outcome::OvertimeLoss
    );

    assert_eq!(sheet.side(PlayerKey(0)), Some(Side::Blue));
    let scorer = sheet.full(PlayerKey(1));
    let scorer_regulation = sheet.regulation(PlayerKey(1));
    assert_eq!(scorer.captures, 3);
    assert_eq!(scorer_regulation.captures, 2);
}
