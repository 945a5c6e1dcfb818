//! # Import inference
//!
//! A newly imported game arrives with free-text team and player strings.
//! These helpers match them to persisted entities: the team from its
//! trailing abbreviation, the player from the names used across seasons,
//! the week from the match date. Every function returns `None` rather than
//! guessing when the input is ambiguous; the caller decides whether to
//! prompt or to create new entities.
//!
//! The functions operate on lightweight views of the persisted rows so they
//! stay independent of the storage layer.
use crate::ids::{MatchId, PlayerId, PlayerSeasonId, SeasonId, TeamSeasonId};
use crate::week::Week;
use crate::Date;

/// League tag a team-name prefix letter selects within a season group.
const LEAGUE_PREFIXES: &[(char, &str)] = &[('M', "MLTP"), ('N', "mLTP"), ('A', "NLTP")];

#[derive(Debug, Clone)]
pub struct SeasonView {
    pub id: SeasonId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TeamSeasonView {
    pub id: TeamSeasonId,
    pub season: SeasonId,
    pub abbr: String,
}

#[derive(Debug, Clone)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PlayerSeasonView {
    pub id: PlayerSeasonId,
    pub season: SeasonId,
    pub player: PlayerId,
    pub playing_as: String,
}

#[derive(Debug, Clone)]
pub struct MatchView {
    pub id: MatchId,
    pub season: SeasonId,
    pub date: Date,
    pub week: Week,
    pub team1: TeamSeasonId,
    pub team2: TeamSeasonId,
}

#[derive(Debug, Clone)]
pub struct GamelogView {
    pub player_season: PlayerSeasonId,
    pub player: PlayerId,
    pub playing_as: String,
}

fn is_unusable_team_name(name: &str, min_len: usize) -> bool {
    name.is_empty() || name == "Red" || name == "Blue" || name.len() < min_len
}

/// Guess the season a free-text team name belongs to, from the league letter
/// the name starts with.
pub fn infer_season<'a>(
    season_group: &'a [SeasonView],
    team_name: &str,
) -> Option<&'a SeasonView> {
    if is_unusable_team_name(team_name, 4) {
        return None;
    }
    let league_indicator = team_name.chars().next()?;
    let (_, league_tag) = LEAGUE_PREFIXES
        .iter()
        .find(|(letter, _)| *letter == league_indicator)?;
    season_group
        .iter()
        .find(|season| season.name.starts_with(league_tag))
}

/// Match a free-text team name to a team season via its trailing
/// three-character abbreviation.
///
/// The inferred season is searched first; failing that, any season of the
/// group. First match wins.
pub fn infer_team<'a>(
    season_group: &[SeasonView],
    teams: &'a [TeamSeasonView],
    team_name: &str,
) -> Option<&'a TeamSeasonView> {
    if is_unusable_team_name(team_name, 3) {
        return None;
    }
    // Captains sometimes add a trailing space by mistake.
    let trimmed: Vec<char> = team_name.trim().chars().collect();
    if trimmed.len() < 3 {
        return None;
    }
    let abbr: String = trimmed[trimmed.len() - 3..].iter().collect();
    let season_guess = infer_season(season_group, team_name);
    let matching: Vec<&TeamSeasonView> = teams.iter().filter(|t| t.abbr == abbr).collect();
    if let Some(guess) = season_guess {
        if let Some(team) = matching.iter().find(|t| t.season == guess.id) {
            return Some(team);
        }
    }
    matching
        .into_iter()
        .find(|t| season_group.iter().any(|s| s.id == t.season))
}

/// Find a match featuring both teams, in either order, on the given date.
pub fn existing_match<'a>(
    matches: &'a [MatchView],
    red: Option<&TeamSeasonView>,
    blue: Option<&TeamSeasonView>,
    date: Date,
) -> Option<&'a MatchView> {
    let (red, blue) = (red?, blue?);
    matches.iter().find(|m| {
        m.date == date
            && ((m.team1 == red.id && m.team2 == blue.id)
                || (m.team1 == blue.id && m.team2 == red.id))
    })
}

/// Infer the week label for a game on `date` between the given teams.
///
/// The latest week label on or before the date carries over, except that a
/// numbered week increments when either team already played in it.
pub fn infer_week(
    red: Option<&TeamSeasonView>,
    blue: Option<&TeamSeasonView>,
    date: Date,
    matches: &[MatchView],
) -> Week {
    let season = match (red, blue) {
        (Some(team), _) => team.season,
        (None, Some(team)) => team.season,
        (None, None) => return Week::from("Week 1"),
    };
    let before: Vec<&MatchView> = matches
        .iter()
        .filter(|m| m.season == season && m.date <= date)
        .collect();
    let Some(max_week) = before.iter().map(|m| &m.week).max() else {
        return Week::from("Week 1");
    };
    if max_week.number().is_none() {
        return max_week.clone();
    }
    let team_ids: Vec<TeamSeasonId> = [red, blue].iter().flatten().map(|t| t.id).collect();
    let either_played = before.iter().any(|m| {
        m.week == *max_week && (team_ids.contains(&m.team1) || team_ids.contains(&m.team2))
    });
    if either_played {
        max_week.next().unwrap_or_else(|| max_week.clone())
    } else {
        max_week.clone()
    }
}

/// Find the player season a username refers to, within the team's season.
///
/// Without a team the league is unknown, and a guess from the wrong league
/// would be worse than no guess.
pub fn infer_player_season<'a>(
    player_seasons: &'a [PlayerSeasonView],
    players: &[PlayerView],
    username: &str,
    team: Option<&TeamSeasonView>,
) -> Option<&'a PlayerSeasonView> {
    let team = team?;
    if let Some(ps) = player_seasons
        .iter()
        .filter(|ps| ps.season == team.season)
        .find(|ps| ps.playing_as.eq_ignore_ascii_case(username))
    {
        return Some(ps);
    }
    player_seasons
        .iter()
        .filter(|ps| ps.season == team.season)
        .find(|ps| {
            players
                .iter()
                .any(|p| p.id == ps.player && p.name.eq_ignore_ascii_case(username))
        })
}

/// Resolve a username to a player, given an already-inferred player season
/// if there is one.
///
/// Fallback chain: player name, any historical season alias, any historical
/// gamelog alias.
pub fn infer_player(
    players: &[PlayerView],
    player_seasons: &[PlayerSeasonView],
    gamelogs: &[GamelogView],
    player_season: Option<&PlayerSeasonView>,
    username: &str,
) -> Option<PlayerId> {
    if let Some(ps) = player_season {
        return Some(ps.player);
    }
    if let Some(player) = players
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(username))
    {
        return Some(player.id);
    }
    if let Some(ps) = player_seasons
        .iter()
        .find(|ps| ps.playing_as.eq_ignore_ascii_case(username))
    {
        return Some(ps.player);
    }
    gamelogs
        .iter()
        .find(|log| log.playing_as.eq_ignore_ascii_case(username))
        .map(|log| log.player)
}

/// Label for the next game of a match that already has `existing_games`.
pub fn game_number(existing_games: usize) -> String {
    format!("Game {}", existing_games + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn seasons() -> Vec<SeasonView> {
        vec![
            SeasonView {
                id: SeasonId(1),
                name: String::from("MLTP S20"),
            },
            SeasonView {
                id: SeasonId(2),
                name: String::from("mLTP S20"),
            },
        ]
    }

    fn teams() -> Vec<TeamSeasonView> {
        vec![
            TeamSeasonView {
                id: TeamSeasonId(10),
                season: SeasonId(1),
                abbr: String::from("BAL"),
            },
            TeamSeasonView {
                id: TeamSeasonId(11),
                season: SeasonId(2),
                abbr: String::from("BAL"),
            },
            TeamSeasonView {
                id: TeamSeasonId(12),
                season: SeasonId(1),
                abbr: String::from("TDR"),
            },
        ]
    }

    #[test]
    fn season_from_league_letter() {
        let group = seasons();
        assert_eq!(
            infer_season(&group, "Major BAL").map(|s| s.id),
            Some(SeasonId(1))
        );
        assert_eq!(
            infer_season(&group, "Ninor BAL").map(|s| s.id),
            Some(SeasonId(2))
        );
        assert!(infer_season(&group, "Red").is_none());
        assert!(infer_season(&group, "Xyz").is_none());
    }

    #[test]
    fn team_from_trailing_abbreviation() {
        let group = seasons();
        let teams = teams();
        // League letter picks the majors roster.
        assert_eq!(
            infer_team(&group, &teams, "Major BAL").map(|t| t.id),
            Some(TeamSeasonId(10))
        );
        // Minors letter steers to the other season's team.
        assert_eq!(
            infer_team(&group, &teams, "Ninor BAL").map(|t| t.id),
            Some(TeamSeasonId(11))
        );
        // No league letter: first abbreviation match in the group.
        assert_eq!(
            infer_team(&group, &teams, "Some TDR").map(|t| t.id),
            Some(TeamSeasonId(12))
        );
        // Trailing whitespace is tolerated.
        assert_eq!(
            infer_team(&group, &teams, "Major BAL ").map(|t| t.id),
            Some(TeamSeasonId(10))
        );
        assert!(infer_team(&group, &teams, "Blue").is_none());
        assert!(infer_team(&group, &teams, "ab").is_none());
    }

    fn match_view(id: u32, date: &str, week: &str, team1: u32, team2: u32) -> MatchView {
        MatchView {
            id: MatchId(id),
            season: SeasonId(1),
            date: Date::from_str(date).unwrap(),
            week: Week::from(week),
            team1: TeamSeasonId(team1),
            team2: TeamSeasonId(team2),
        }
    }

    #[test]
    fn week_defaults_to_one() {
        let team = &teams()[0];
        let week = infer_week(
            Some(team),
            None,
            Date::from_str("2024-01-01").unwrap(),
            &[],
        );
        assert_eq!(week, Week::from("Week 1"));
    }

    #[test]
    fn week_increments_when_team_already_played() {
        let all = teams();
        let matches = vec![match_view(1, "2024-01-01", "Week 3", 10, 12)];
        let week = infer_week(
            Some(&all[0]),
            None,
            Date::from_str("2024-01-02").unwrap(),
            &matches,
        );
        assert_eq!(week, Week::from("Week 4"));
    }

    #[test]
    fn week_carries_over_for_fresh_team() {
        let all = teams();
        let matches = vec![match_view(1, "2024-01-01", "Week 3", 12, 13)];
        let week = infer_week(
            Some(&all[0]),
            None,
            Date::from_str("2024-01-02").unwrap(),
            &matches,
        );
        assert_eq!(week, Week::from("Week 3"));
    }

    #[test]
    fn playoff_week_returned_as_is() {
        let all = teams();
        let matches = vec![match_view(1, "2024-04-01", "Foci Four", 10, 12)];
        let week = infer_week(
            Some(&all[0]),
            None,
            Date::from_str("2024-04-02").unwrap(),
            &matches,
        );
        assert_eq!(week, Week::from("Foci Four"));
    }

    #[test]
    fn existing_match_in_either_order() {
        let all = teams();
        let matches = vec![match_view(1, "2024-01-01", "Week 1", 12, 10)];
        let date = Date::from_str("2024-01-01").unwrap();
        let found = existing_match(&matches, Some(&all[0]), Some(&all[2]), date);
        assert_eq!(found.map(|m| m.id), Some(MatchId(1)));
        assert!(existing_match(&matches, None, Some(&all[2]), date).is_none());
    }

    fn roster() -> (Vec<PlayerView>, Vec<PlayerSeasonView>, Vec<GamelogView>) {
        let players = vec![
            PlayerView {
                id: PlayerId(1),
                name: String::from("Alice"),
            },
            PlayerView {
                id: PlayerId(2),
                name: String::from("Bob"),
            },
        ];
        let player_seasons = vec![
            PlayerSeasonView {
                id: PlayerSeasonId(21),
                season: SeasonId(1),
                player: PlayerId(1),
                playing_as: String::from("SomeBall"),
            },
            PlayerSeasonView {
                id: PlayerSeasonId(22),
                season: SeasonId(2),
                player: PlayerId(2),
                playing_as: String::from("OtherBall"),
            },
        ];
        let gamelogs = vec![GamelogView {
            player_season: PlayerSeasonId(22),
            player: PlayerId(2),
            playing_as: String::from("OldAlias"),
        }];
        (players, player_seasons, gamelogs)
    }

    #[test]
    fn player_season_by_alias_then_name() {
        let (players, player_seasons, _) = roster();
        let all = teams();
        let by_alias = infer_player_season(&player_seasons, &players, "someball", Some(&all[0]));
        assert_eq!(by_alias.map(|ps| ps.id), Some(PlayerSeasonId(21)));
        let by_name = infer_player_season(&player_seasons, &players, "ALICE", Some(&all[0]));
        assert_eq!(by_name.map(|ps| ps.id), Some(PlayerSeasonId(21)));
        // Wrong season: the alias belongs to the minors.
        assert!(
            infer_player_season(&player_seasons, &players, "OtherBall", Some(&all[0])).is_none()
        );
        assert!(infer_player_season(&player_seasons, &players, "SomeBall", None).is_none());
    }

    #[test]
    fn player_fallback_chain() {
        let (players, player_seasons, gamelogs) = roster();
        assert_eq!(
            infer_player(&players, &player_seasons, &gamelogs, None, "bob"),
            Some(PlayerId(2))
        );
        assert_eq!(
            infer_player(&players, &player_seasons, &gamelogs, None, "otherball"),
            Some(PlayerId(2))
        );
        assert_eq!(
            infer_player(&players, &player_seasons, &gamelogs, None, "oldalias"),
            Some(PlayerId(2))
        );
        assert!(infer_player(&players, &player_seasons, &gamelogs, None, "nobody").is_none());
    }

    #[test]
    fn game_numbers() {
        assert_eq!(game_number(0), "Game 1");
        assert_eq!(game_number(2), "Game 3");
    }
}
