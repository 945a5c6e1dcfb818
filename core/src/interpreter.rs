//! # Event interpreter
//!
//! A single pass over one time-sorted timeline, maintaining per-player state
//! in a flat vector indexed by [`PlayerKey`]. The pass emits a [`GameSheet`]
//! with two consistent stat sets: the full game, and the state snapshotted at
//! the regulation boundary.
//!
//! The boundary is a parameter rather than a constant because a paused game
//! is interpreted as two bounded passes: part one bounded at the pause tick,
//! part two at the remaining regulation (see [`crate::merge`]).
use crate::outcome::CapCount;
use crate::stats::StatLine;
use crate::time::{Tick, Ticks, REGULATION_TICKS};
use crate::timeline::{EventKind, PlayerKey, Side, Timeline};
use derive_more::{Add, AddAssign};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A grab within this window of a teammate's drop chains off that drop.
pub const HANDOFF_WINDOW: Ticks = Ticks(120);
/// A chained grab is a hand-off when the prior hold was shorter than this,
/// a regrab otherwise.
pub const HANDOFF_MAX_PRIOR_HOLD: Ticks = Ticks(180);
/// A hand-off turns good when the receiver holds longer than this.
pub const GOOD_HANDOFF_MIN_HOLD: Ticks = Ticks(300);
pub const LONG_HOLD_MIN: Ticks = Ticks(600);
/// A drop this soon after the grab is a flaccid.
pub const FLACCID_MAX_HOLD: Ticks = Ticks(120);
/// A return while the hold was shorter than this is a quick return.
pub const QUICK_RETURN_MAX_HOLD: Ticks = Ticks(120);
/// A return this close before a team capture is a key return.
pub const KEY_RETURN_WINDOW: Ticks = Ticks(120);
/// Radius around a flag tile for returns-in-base and saves, in tiles.
pub const BASE_RADIUS_TILES: f64 = 10.0;

/// Red/blue capture tally.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Add, AddAssign, Serialize, Deserialize)]
pub struct Score {
    pub red: CapCount,
    pub blue: CapCount,
}

impl Score {
    fn credit(&mut self, side: Side) {
        match side {
            Side::Red => self.red += CapCount(1),
            Side::Blue => self.blue += CapCount(1),
        }
    }

    pub fn side(&self, side: Side) -> CapCount {
        match side {
            Side::Red => self.red,
            Side::Blue => self.blue,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.red == self.blue
    }
}

/// Result of interpreting one timeline.
#[derive(Debug, Clone)]
pub struct GameSheet {
    full: Vec<StatLine>,
    regulation: Vec<StatLine>,
    sides: Vec<Option<Side>>,
    pub score: Score,
    pub regulation_score: Score,
    pub went_to_overtime: bool,
}

impl GameSheet {
    pub fn num_players(&self) -> usize {
        self.full.len()
    }

    pub fn full(&self, key: PlayerKey) -> &StatLine {
        &self.full[key.0]
    }

    pub fn regulation(&self, key: PlayerKey) -> &StatLine {
        &self.regulation[key.0]
    }

    /// Last side the player played for, `None` for roster entries that never
    /// joined.
    pub fn side(&self, key: PlayerKey) -> Option<Side> {
        self.sides[key.0]
    }

    /// Name-keyed view of the sheet, pairing each participating player with
    /// both stat sets. Used by the paused-game merger and the persistence
    /// layer, neither of which care about timeline-local player keys.
    pub fn summarize(&self, timeline: &Timeline) -> GameSummary {
        let players = timeline
            .roster()
            .filter_map(|(key, name)| {
                self.sides[key.0].map(|side| PlayerLine {
                    name: String::from(name),
                    side,
                    full: self.full[key.0],
                    regulation: self.regulation[key.0],
                })
            })
            .collect();
        GameSummary {
            players,
            score: self.score,
            regulation_score: self.regulation_score,
            went_to_overtime: self.went_to_overtime,
        }
    }
}

/// One player's derived stats in a game, keyed by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub side: Side,
    pub full: StatLine,
    pub regulation: StatLine,
}

/// Name-keyed game result, the unit consumed by persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub players: Vec<PlayerLine>,
    pub score: Score,
    pub regulation_score: Score,
    pub went_to_overtime: bool,
}

#[derive(Error, Debug, Clone)]
pub enum InterpretError {
    #[error("player '{0}' cannot be mapped to either team")]
    UnresolvedTeam(String),
}

/// Interpret a timeline with the standard regulation boundary.
pub fn interpret(timeline: &Timeline) -> Result<GameSheet, InterpretError> {
    interpret_bounded(timeline, REGULATION_TICKS)
}

/// Interpret a timeline, snapshotting per-player state when the first event
/// past `boundary` is encountered.
pub fn interpret_bounded(timeline: &Timeline, boundary: Tick) -> Result<GameSheet, InterpretError> {
    let mut pass = Pass::new(timeline, boundary);
    for event in timeline.events() {
        if pass.snapshot.is_none() && event.tick > boundary {
            pass.take_snapshot();
        }
        let idx = event.player.0;
        pass.acted[idx] = true;
        let tick = event.tick;
        match event.kind {
            EventKind::Capture => pass.on_capture(idx, tick)?,
            EventKind::Drop => pass.on_drop(idx, tick),
            EventKind::DropTemporary => pass.on_drop_temporary(idx, tick),
            EventKind::GameEnds => pass.on_game_ends(idx, tick),
            EventKind::Grab => pass.on_grab(idx, tick)?,
            EventKind::GrabDuplicatePowerUp | EventKind::PowerUp => pass.on_powerup(idx),
            EventKind::Join(side) => pass.on_join(idx, tick, side),
            EventKind::Leave => pass.on_leave(idx, tick),
            EventKind::Pop => pass.states[idx].stats.pops += 1,
            EventKind::Return => pass.on_return(idx, tick)?,
            EventKind::StartPreventing => pass.states[idx].prevent_start = Some(tick),
            EventKind::StopPreventing => pass.on_stop_preventing(idx, tick),
            EventKind::Tag => pass.states[idx].stats.tags += 1,
        }
    }
    pass.finish()
}

/// Running per-player state: the accumulating stat line plus the helper
/// fields that never leave the interpreter.
#[derive(Default, Debug, Clone)]
struct PlayerState {
    stats: StatLine,
    side: Option<Side>,
    join_time: Option<Tick>,
    grab_time: Option<Tick>,
    prevent_start: Option<Tick>,
    last_return: Option<Tick>,
    last_hold_end: Option<Tick>,
    handed_off_by: Option<PlayerKey>,
    grabbed_off_regrab: bool,
}

impl PlayerState {
    fn is_holding(&self) -> bool {
        self.grab_time.is_some() && self.last_hold_end.is_none()
    }
}

struct Pass<'t> {
    timeline: &'t Timeline,
    boundary: Tick,
    states: Vec<PlayerState>,
    snapshot: Option<Vec<PlayerState>>,
    sides: Vec<Option<Side>>,
    acted: Vec<bool>,
    score: Score,
    regulation_score: Score,
    went_to_overtime: bool,
}

impl<'t> Pass<'t> {
    fn new(timeline: &'t Timeline, boundary: Tick) -> Self {
        let n = timeline.num_players();
        Self {
            timeline,
            boundary,
            states: vec![PlayerState::default(); n],
            snapshot: None,
            sides: vec![None; n],
            acted: vec![false; n],
            score: Score::default(),
            regulation_score: Score::default(),
            went_to_overtime: false,
        }
    }

    fn require_side(&self, idx: usize) -> Result<Side, InterpretError> {
        self.states[idx].side.ok_or_else(|| {
            InterpretError::UnresolvedTeam(String::from(self.timeline.player_name(PlayerKey(idx))))
        })
    }

    fn take_snapshot(&mut self) {
        let mut snap = self.states.clone();
        for idx in 0..snap.len() {
            close_out(&mut snap, idx, self.boundary);
        }
        self.snapshot = Some(snap);
    }

    fn on_join(&mut self, idx: usize, tick: Tick, side: Side) {
        self.states[idx].side = Some(side);
        self.states[idx].join_time = Some(tick);
        self.sides[idx] = Some(side);
    }

    fn on_leave(&mut self, idx: usize, tick: Tick) {
        close_out(&mut self.states, idx, tick);
        clear_presence(&mut self.states[idx]);
    }

    fn on_game_ends(&mut self, idx: usize, tick: Tick) {
        let was_holding = self.states[idx].is_holding();
        close_out(&mut self.states, idx, tick);
        if was_holding {
            self.states[idx].stats.kept_flags += 1;
            // A flag kept through an overtime finish was also kept at the
            // regulation boundary; only the hold time stays out of the
            // snapshot.
            if let Some(snap) = &mut self.snapshot {
                snap[idx].stats.kept_flags += 1;
            }
        }
        clear_presence(&mut self.states[idx]);
    }

    fn on_grab(&mut self, idx: usize, tick: Tick) -> Result<(), InterpretError> {
        let side = self.require_side(idx)?;
        let st = &mut self.states[idx];
        st.stats.grabs += 1;
        st.grab_time = Some(tick);
        st.last_hold_end = None;
        st.handed_off_by = None;
        st.grabbed_off_regrab = false;
        for mate in 0..self.states.len() {
            if mate == idx || self.states[mate].side != Some(side) {
                continue;
            }
            let (Some(hold_end), Some(mate_grab)) =
                (self.states[mate].last_hold_end, self.states[mate].grab_time)
            else {
                continue;
            };
            if tick - hold_end >= HANDOFF_WINDOW {
                continue;
            }
            let prior_hold = hold_end - mate_grab;
            if prior_hold < HANDOFF_MAX_PRIOR_HOLD {
                self.states[mate].stats.handoffs += 1;
                self.states[idx].stats.grabs_off_handoffs += 1;
                self.states[idx].handed_off_by = Some(PlayerKey(mate));
            } else {
                self.states[idx].stats.grabs_off_regrab += 1;
                self.states[idx].grabbed_off_regrab = true;
            }
            break;
        }
        Ok(())
    }

    fn on_drop(&mut self, idx: usize, tick: Tick) {
        self.states[idx].stats.drops += 1;
        self.states[idx].stats.pops += 1;
        if self.states[idx].is_holding() {
            let grab = self.states[idx].grab_time.unwrap_or(tick);
            let hold_len = tick - grab;
            add_hold(&mut self.states, idx, hold_len);
            if hold_len > GOOD_HANDOFF_MIN_HOLD {
                if let Some(src) = self.states[idx].handed_off_by {
                    self.states[src.0].stats.good_handoffs += 1;
                }
            }
            if hold_len < FLACCID_MAX_HOLD {
                self.states[idx].stats.flaccids += 1;
            }
        }
        self.states[idx].last_hold_end = Some(tick);
        self.states[idx].handed_off_by = None;
        self.states[idx].grabbed_off_regrab = false;
    }

    fn on_drop_temporary(&mut self, idx: usize, tick: Tick) {
        let st = &mut self.states[idx];
        st.stats.grabs += 1;
        st.stats.drops += 1;
        st.stats.pops += 1;
        st.stats.flaccids += 1;
        st.grab_time = Some(tick);
        st.last_hold_end = Some(tick);
        st.handed_off_by = None;
        st.grabbed_off_regrab = false;
    }

    fn on_capture(&mut self, idx: usize, tick: Tick) -> Result<(), InterpretError> {
        let side = self.require_side(idx)?;
        self.states[idx].stats.captures += 1;
        self.score.credit(side);
        if tick <= self.boundary {
            self.regulation_score.credit(side);
        } else {
            self.went_to_overtime = true;
        }
        if let Some(src) = self.states[idx].handed_off_by {
            self.states[src.0].stats.good_handoffs += 1;
            self.states[idx].stats.caps_off_handoffs += 1;
        }
        if self.states[idx].grabbed_off_regrab {
            self.states[idx].stats.caps_off_regrab += 1;
        }
        if self.states[idx].is_holding() {
            let grab = self.states[idx].grab_time.unwrap_or(tick);
            let hold_len = tick - grab;
            add_hold(&mut self.states, idx, hold_len);
        }
        self.states[idx].last_hold_end = Some(tick);
        self.states[idx].handed_off_by = None;
        self.states[idx].grabbed_off_regrab = false;
        for other in 0..self.states.len() {
            if other == idx {
                continue;
            }
            match self.states[other].side {
                Some(s) if s == side => {
                    self.states[other].stats.caps_for += 1;
                    if let Some(last_return) = self.states[other].last_return {
                        if tick - last_return < KEY_RETURN_WINDOW {
                            self.states[other].stats.key_returns += 1;
                        }
                    }
                }
                Some(_) => self.states[other].stats.caps_against += 1,
                None => {}
            }
        }
        Ok(())
    }

    fn on_return(&mut self, idx: usize, tick: Tick) -> Result<(), InterpretError> {
        let side = self.require_side(idx)?;
        self.states[idx].stats.returns += 1;
        self.states[idx].stats.tags += 1;
        self.states[idx].last_return = Some(tick);
        let opponent = side.opponent();
        let mut position_credited = false;
        for opp in 0..self.states.len() {
            if self.states[opp].side != Some(opponent)
                || self.states[opp].last_hold_end != Some(tick)
            {
                continue;
            }
            if let Some(grab) = self.states[opp].grab_time {
                if tick - grab < QUICK_RETURN_MAX_HOLD {
                    self.states[idx].stats.quick_returns += 1;
                }
            }
            if position_credited {
                continue;
            }
            let Some(map) = self.timeline.map else {
                continue;
            };
            // Archive records occasionally lack the splat for a return; the
            // position-based credits are then skipped for this return.
            let Some(splat) = self.timeline.splat_at(tick, PlayerKey(opp)) else {
                continue;
            };
            position_credited = true;
            let own_flag = map.distance_to_flag(side, splat.x, splat.y);
            let enemy_flag = map.distance_to_flag(opponent, splat.x, splat.y);
            if own_flag < BASE_RADIUS_TILES {
                self.states[idx].stats.returns_in_base += 1;
            }
            // A pop near the enemy flag only saves a capture if the
            // carrier's side had no other flag out; the popped carrier's
            // own hold already ended this tick.
            if enemy_flag < BASE_RADIUS_TILES && !self.side_holding(opponent) {
                self.states[idx].stats.saves += 1;
            }
        }
        Ok(())
    }

    fn side_holding(&self, side: Side) -> bool {
        self.states
            .iter()
            .any(|st| st.side == Some(side) && st.is_holding())
    }

    fn on_powerup(&mut self, idx: usize) {
        self.states[idx].stats.powerups += 1;
        for st in self.states.iter_mut().filter(|st| st.side.is_some()) {
            st.stats.total_pups_in_game += 1;
        }
    }

    fn on_stop_preventing(&mut self, idx: usize, tick: Tick) {
        // StopPreventing without a prior start happens when a player
        // disconnects on the same tick; ignored.
        if let Some(start) = self.states[idx].prevent_start.take() {
            self.states[idx].stats.prevent += tick - start;
        }
    }

    fn finish(mut self) -> Result<GameSheet, InterpretError> {
        for (idx, acted) in self.acted.iter().enumerate() {
            if *acted && self.sides[idx].is_none() {
                return Err(InterpretError::UnresolvedTeam(String::from(
                    self.timeline.player_name(PlayerKey(idx)),
                )));
            }
        }
        // A timeline that never crossed the boundary still gets its
        // regulation set closed out there; this matters for the first half
        // of a paused game, whose recording stops at the pause with
        // accumulators open.
        if self.snapshot.is_none() {
            self.take_snapshot();
        }
        let full: Vec<StatLine> = self.states.iter().map(|st| st.stats).collect();
        let regulation = match self.snapshot {
            Some(snap) => snap.into_iter().map(|st| st.stats).collect(),
            None => full.clone(),
        };
        Ok(GameSheet {
            full,
            regulation,
            sides: self.sides,
            score: self.score,
            regulation_score: self.regulation_score,
            went_to_overtime: self.went_to_overtime,
        })
    }
}

/// Close a player's open accumulators at `tick`: time played, prevent, and an
/// in-progress hold with its downstream credits.
fn close_out(states: &mut [PlayerState], idx: usize, tick: Tick) {
    if let Some(join) = states[idx].join_time {
        states[idx].stats.time_played += tick - join;
    }
    if let Some(start) = states[idx].prevent_start {
        states[idx].stats.prevent += tick - start;
    }
    if states[idx].is_holding() {
        let grab = states[idx].grab_time.unwrap_or(tick);
        let hold_len = tick - grab;
        add_hold(states, idx, hold_len);
        if hold_len > GOOD_HANDOFF_MIN_HOLD {
            if let Some(src) = states[idx].handed_off_by {
                states[src.0].stats.good_handoffs += 1;
            }
        }
        states[idx].last_hold_end = Some(tick);
    }
}

/// Account a finished hold: the holder's hold time and long-hold counter,
/// plus hold-against for every active opponent.
fn add_hold(states: &mut [PlayerState], idx: usize, hold_len: Ticks) {
    states[idx].stats.hold += hold_len;
    if hold_len > LONG_HOLD_MIN {
        states[idx].stats.long_holds += 1;
    }
    if let Some(side) = states[idx].side {
        let opponent = side.opponent();
        for st in states.iter_mut().filter(|st| st.side == Some(opponent)) {
            st.stats.hold_against += hold_len;
        }
    }
}

fn clear_presence(st: &mut PlayerState) {
    st.join_time = None;
    st.side = None;
    st.prevent_start = None;
    st.handed_off_by = None;
    st.grabbed_off_regrab = false;
}
