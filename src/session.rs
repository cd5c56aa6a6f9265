//! Game session: turn order, history, end of game, and the automated player.
//!
//! [`GameSession`] is the only owner of the authoritative [`Grid`]. Every
//! successful transition returns a [`SessionEvent`] describing the new state
//! for a UI; every rejected one returns a [`SessionError`] and changes nothing.
//!
//! When an automated color is set, the session dispatches a background
//! evaluation whenever that color is to move. While it is outstanding, human
//! `play`/`pass` are refused; `undo` and `restart` cancel it. The reply is
//! applied by [`GameSession::poll_evaluation`] or
//! [`GameSession::wait_evaluation`].

use std::collections::HashSet;

use fastrand::Rng;
use tracing::{debug, info, warn};

use crate::board::{Color, Grid, Move, Point};
use crate::capture;
use crate::config::Config;
use crate::constants::PASSES_TO_END;
use crate::error::{ConfigError, SessionError};
use crate::evaluator::EvaluationRequest;
use crate::group::group;
use crate::rules;
use crate::scoring::{self, GameResult, Prisoners};
use crate::worker::{EvaluationHandle, EvaluationReply, Poll, spawn_evaluation};

/// Everything needed to restore a position. Pushed onto the history before
/// each play or pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub to_move: Color,
    pub last_move: Option<Point>,
    pub move_count: usize,
    pub consecutive_passes: u32,
    pub prisoners: Prisoners,
    pub ko_point: Option<Point>,
}

impl Snapshot {
    fn initial(size: usize) -> Self {
        Self {
            grid: Grid::new(size),
            to_move: Color::Black,
            last_move: None,
            move_count: 0,
            consecutive_passes: 0,
            prisoners: Prisoners::default(),
            ko_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    InProgress(Color),
    Finished(GameResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Played(Move),
    Passed(Color),
    Undone,
    Restarted,
}

/// What a UI needs to redraw after a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub kind: EventKind,
    pub grid: Grid,
    /// Stones removed by this move
    pub captured: Vec<Point>,
    /// The move left an adjacent opponent group with one liberty
    pub atari: bool,
    pub prisoners: Prisoners,
    pub state: GameState,
}

pub struct GameSession {
    config: Config,
    current: Snapshot,
    history: Vec<Snapshot>,
    result: Option<GameResult>,
    auto_player: Option<Color>,
    generation: u64,
    pending: Option<EvaluationHandle>,
    rng: Rng,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::start(Config::default())
    }
}

impl GameSession {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config))
    }

    fn start(config: Config) -> Self {
        Self {
            current: Snapshot::initial(config.board_size),
            history: Vec::new(),
            result: None,
            auto_player: None,
            generation: 0,
            pending: None,
            rng: config.rng(),
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.current.grid
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn to_move(&self) -> Color {
        self.current.to_move
    }

    pub fn move_count(&self) -> usize {
        self.current.move_count
    }

    pub fn prisoners(&self) -> Prisoners {
        self.current.prisoners
    }

    pub fn ko_point(&self) -> Option<Point> {
        self.current.ko_point
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn state(&self) -> GameState {
        match &self.result {
            Some(result) => GameState::Finished(result.clone()),
            None => GameState::InProgress(self.current.to_move),
        }
    }

    pub fn auto_player(&self) -> Option<Color> {
        self.auto_player
    }

    pub fn evaluation_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The connected stones under `(x, y)`, for highlighting. Empty for an
    /// empty or off-board point.
    pub fn group_at(&self, x: usize, y: usize) -> HashSet<Point> {
        let pt = Point::new(x, y);
        let grid = &self.current.grid;
        match grid.contains(pt).then(|| grid.get(pt)).flatten() {
            Some(color) => group(grid, pt, color),
            None => HashSet::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Human-facing transitions
    // -------------------------------------------------------------------------

    /// Place a stone for the side to move.
    pub fn play(&mut self, x: usize, y: usize) -> Result<SessionEvent, SessionError> {
        self.ensure_accepting_moves()?;
        self.apply_play(Point::new(x, y))
    }

    pub fn pass(&mut self) -> Result<SessionEvent, SessionError> {
        self.ensure_accepting_moves()?;
        Ok(self.apply_pass())
    }

    /// Take back the last move, or the last two when that returns the turn to
    /// the human after an automated reply.
    pub fn undo(&mut self) -> Result<SessionEvent, SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameFinished);
        }
        if self.history.is_empty() {
            return Err(SessionError::NothingToUndo);
        }
        self.cancel_evaluation();

        let steps = match self.auto_player {
            Some(auto) if self.current.to_move != auto && self.history.len() >= 2 => 2,
            _ => 1,
        };
        for _ in 0..steps {
            if let Some(previous) = self.history.pop() {
                self.current = previous;
            }
        }
        debug!(steps, move_count = self.current.move_count, "undo");

        let event = self.event(EventKind::Undone, Vec::new(), false);
        self.dispatch_if_automated();
        Ok(event)
    }

    /// Discard the game and start over with the same configuration.
    pub fn restart(&mut self) -> SessionEvent {
        self.cancel_evaluation();
        self.current = Snapshot::initial(self.config.board_size);
        self.history.clear();
        self.result = None;
        info!(generation = self.generation, "session restarted");

        let event = self.event(EventKind::Restarted, Vec::new(), false);
        self.dispatch_if_automated();
        event
    }

    /// Turn the automated player on for `color`, or off with `None`.
    pub fn set_auto_player(&mut self, color: Option<Color>) {
        if self.auto_player != color {
            self.cancel_evaluation();
        }
        self.auto_player = color;
        self.dispatch_if_automated();
    }

    // -------------------------------------------------------------------------
    // Automated player
    // -------------------------------------------------------------------------

    /// Start evaluating a move for the side to move, whoever that is.
    pub fn request_evaluation(&mut self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameFinished);
        }
        if self.pending.is_some() {
            return Err(SessionError::EvaluationPending);
        }
        let request = EvaluationRequest {
            grid: self.current.grid.clone(),
            to_move: self.current.to_move,
            move_count: self.current.move_count,
            ko_point: self.current.ko_point,
        };
        debug!(generation = self.generation, color = %request.to_move, "dispatching evaluation");
        self.pending = Some(spawn_evaluation(
            request,
            self.config.clone(),
            self.rng.fork(),
            self.generation,
        ));
        Ok(())
    }

    /// Apply the evaluation reply if it has arrived.
    pub fn poll_evaluation(&mut self) -> Option<SessionEvent> {
        let handle = self.pending.as_ref()?;
        let reply = match handle.poll() {
            Poll::Pending => return None,
            Poll::Ready(reply) => Some(reply),
            Poll::Lost => {
                warn!(generation = handle.generation(), "evaluation worker vanished");
                None
            }
        };
        self.pending = None;
        self.resolve_evaluation(reply)
    }

    /// Block until the outstanding evaluation answers and apply it.
    pub fn wait_evaluation(&mut self) -> Result<SessionEvent, SessionError> {
        let handle = self.pending.take().ok_or(SessionError::NoEvaluationPending)?;
        debug!(generation = handle.generation(), "waiting for evaluation");
        let reply = handle.wait();
        self.resolve_evaluation(reply)
            .ok_or(SessionError::NoEvaluationPending)
    }

    fn resolve_evaluation(&mut self, reply: Option<EvaluationReply>) -> Option<SessionEvent> {
        let choice = match reply {
            Some(reply) if reply.generation == self.generation => reply.choice,
            Some(reply) => {
                warn!(
                    stale = reply.generation,
                    current = self.generation,
                    "discarding stale evaluation"
                );
                return None;
            }
            None => {
                warn!("no evaluation reply; passing");
                None
            }
        };
        if self.is_finished() {
            return None;
        }
        let event = match choice {
            Some(pt) => self.apply_play(pt).unwrap_or_else(|err| {
                warn!(%pt, %err, "evaluator proposed an illegal move; passing");
                self.apply_pass()
            }),
            None => self.apply_pass(),
        };
        Some(event)
    }

    fn dispatch_if_automated(&mut self) {
        if self.pending.is_none()
            && !self.is_finished()
            && self.auto_player == Some(self.current.to_move)
        {
            // Cannot fail: not finished and nothing pending.
            let _ = self.request_evaluation();
        }
    }

    fn cancel_evaluation(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    // -------------------------------------------------------------------------
    // Internal transitions
    // -------------------------------------------------------------------------

    fn ensure_accepting_moves(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameFinished);
        }
        if self.pending.is_some() {
            return Err(SessionError::EvaluationPending);
        }
        Ok(())
    }

    fn apply_play(&mut self, pt: Point) -> Result<SessionEvent, SessionError> {
        let color = self.current.to_move;
        rules::check_move(&self.current.grid, pt, color, self.current.ko_point)?;

        self.history.push(self.current.clone());
        let placement = capture::apply(&mut self.current.grid, pt, color);
        let state = &mut self.current;
        state.prisoners.add(color, placement.stones_captured() as u32);
        state.ko_point = placement.ko_point;
        state.move_count += 1;
        state.consecutive_passes = 0;
        state.last_move = Some(pt);
        state.to_move = color.opponent();

        let atari = capture::puts_in_atari(&state.grid, pt, color);
        debug!(%pt, %color, captured = placement.stones_captured(), atari, "played");

        let event = self.event(
            EventKind::Played(Move { point: pt, color }),
            placement.captured_points().collect(),
            atari,
        );
        self.dispatch_if_automated();
        Ok(event)
    }

    fn apply_pass(&mut self) -> SessionEvent {
        let color = self.current.to_move;
        self.history.push(self.current.clone());
        let state = &mut self.current;
        state.consecutive_passes += 1;
        state.ko_point = None;
        state.last_move = None;
        state.to_move = color.opponent();
        debug!(%color, passes = state.consecutive_passes, "passed");

        if state.consecutive_passes >= PASSES_TO_END {
            let result = scoring::score(&state.grid, state.prisoners, self.config.komi);
            info!(result = %result.score, "game over");
            self.result = Some(result);
        }

        let event = self.event(EventKind::Passed(color), Vec::new(), false);
        self.dispatch_if_automated();
        event
    }

    fn event(&self, kind: EventKind, captured: Vec<Point>, atari: bool) -> SessionEvent {
        SessionEvent {
            kind,
            grid: self.current.grid.clone(),
            captured,
            atari,
            prisoners: self.current.prisoners,
            state: self.state(),
        }
    }
}
