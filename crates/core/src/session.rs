//! Session module - the chain resolution state machine
//!
//! A session owns the board, the active pair, the piece queue and the score.
//! Everything advances through two entry points:
//!
//! - [`Session::process_input`] applies one discrete action
//! - [`Session::tick`] advances the timer of the current phase by the elapsed seconds
//!
//! Phase flow:
//!
//! ```text
//! Falling --lock--> Locked --settle+match--> Resolving --pop done--> (settle+match again)
//!                      |                         |
//!                      +---- no match -----------+--> Spawning --> Falling
//!                                                          |
//!                                                          +--blocked--> GameOver
//! ```
//!
//! `Locked` and `Spawning` are entered and left inside a single call.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::gravity::settle;
use crate::matcher::ChainContext;
use crate::nuisance::{calculate_nuisance, Denomination, NuisanceReport};
use crate::piece::{PieceCell, PuyoPair};
use crate::rng::PieceQueue;
use crate::scoring::{calculate_score, ScoreResult};
use puyo_chain_types::{GameAction, Phase, PuyoColor};

/// Oldest events are dropped beyond this many undrained entries
pub const MAX_PENDING_EVENTS: usize = 1024;

/// One completed clear pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainEvent {
    /// 1-based pass number within the current chain
    pub chain: u32,
    pub cleared: usize,
    pub groups: Vec<usize>,
    pub colors: Vec<PuyoColor>,
    pub increment: u64,
    /// Cumulative score after this pass
    pub score: u64,
    pub nuisance_count: u64,
    pub denominations: Vec<Denomination>,
    pub leftover: f64,
}

/// Something observers may want to log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Locked { piece_id: u32, cells: [PieceCell; 2] },
    Chain(ChainEvent),
    GameOver { score: u64, pieces: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    config: Arc<EngineConfig>,
    board: Board,
    active: Option<PuyoPair>,
    queue: PieceQueue,
    phase: Phase,
    chain: ChainContext,
    chain_count: u32,
    last_chain: u32,
    score: u64,
    last_score: Option<ScoreResult>,
    nuisance: NuisanceReport,
    fall_timer: u32,
    fast_held: bool,
    paused: bool,
    elapsed_secs: f64,
    /// Seed this episode started from
    seed: u32,
    /// Monotonic id for spawned pairs (increments only on successful spawn)
    piece_id: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    events: VecDeque<SessionEvent>,
}

impl Session {
    /// Create a session on an empty board. Fails only if `config` is invalid.
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height);
        Ok(Self::build(Arc::new(config), board, seed))
    }

    /// Create a session with the default 6x12 configuration
    pub fn new_default(seed: u32) -> Self {
        let config = EngineConfig::default();
        let board = Board::new(config.width, config.height);
        Self::build(Arc::new(config), board, seed)
    }

    /// Create a session on a prepared board.
    ///
    /// The board must match the configured dimensions. Popping cells are reset
    /// to normal. The first pair spawns immediately, so a blocked spawn area
    /// yields a session that is already over.
    pub fn from_board(config: EngineConfig, mut board: Board, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.width || board.height() != config.height {
            return Err(ConfigError::BoardMismatch {
                expected_w: config.width,
                expected_h: config.height,
                actual_w: board.width(),
                actual_h: board.height(),
            });
        }
        for y in 0..board.height() as i16 {
            for x in 0..board.width() as i16 {
                if let Some(p) = board.get_mut(x, y) {
                    if p.is_popping() {
                        *p = puyo_chain_types::Puyo::new(p.color);
                    }
                }
            }
        }
        Ok(Self::build(Arc::new(config), board, seed))
    }

    fn build(config: Arc<EngineConfig>, board: Board, seed: u32) -> Self {
        let queue = PieceQueue::new(seed, &config.palette, config.width);
        let mut session = Self {
            config,
            board,
            active: None,
            queue,
            phase: Phase::Spawning,
            chain: ChainContext::new(),
            chain_count: 0,
            last_chain: 0,
            score: 0,
            last_score: None,
            nuisance: NuisanceReport::default(),
            fall_timer: 0,
            fast_held: false,
            paused: false,
            elapsed_secs: 0.0,
            seed,
            piece_id: 0,
            episode_id: 0,
            events: VecDeque::new(),
        };
        session.spawn();
        session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<PuyoPair> {
        self.active
    }

    pub fn next(&self) -> PuyoPair {
        self.queue.next()
    }

    pub fn next_next(&self) -> PuyoPair {
        self.queue.next_next()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::GameOver
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Passes completed or in progress in the current chain (0 outside a chain)
    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    /// Length of the most recent chain; survives the reset at spawn
    pub fn last_chain(&self) -> u32 {
        self.last_chain
    }

    /// Score breakdown of the most recent pass
    pub fn last_score(&self) -> Option<ScoreResult> {
        self.last_score
    }

    /// Nuisance conversion of the score after the most recent pass
    pub fn last_nuisance(&self) -> &NuisanceReport {
        &self.nuisance
    }

    /// Groups matched in the pass currently popping (empty outside `Resolving`)
    pub fn chain_context(&self) -> &ChainContext {
        &self.chain
    }

    pub fn fall_timer(&self) -> u32 {
        self.fall_timer
    }

    pub fn fast_held(&self) -> bool {
        self.fast_held
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Current generator state; restarting continues from here
    pub fn rng_state(&self) -> u32 {
        self.queue.seed()
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Rows a hard drop would move the active pair
    pub fn ghost_drop_distance(&self) -> Option<i16> {
        self.active.map(|pair| pair.drop_distance(&self.board))
    }

    /// Pop animation progress in [0, 1] for a popping cell
    pub fn pop_progress(&self, x: i16, y: i16) -> Option<f32> {
        if !self.board.is_within(x, y) {
            return None;
        }
        let puyo = self.board.get(x, y)?;
        if !puyo.is_popping() {
            return None;
        }
        let duration = self.config.pop_duration_secs;
        if duration <= 0.0 {
            return Some(1.0);
        }
        Some((puyo.pop_elapsed / duration).clamp(0.0, 1.0))
    }

    /// Drain pending events, oldest first
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &SessionEvent> + '_ {
        self.events.iter()
    }

    fn push_event(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Advance the current phase by `dt` seconds. Returns true if anything changed.
    ///
    /// Falling: the fall timer gains 1 (or the fast multiplier while soft drop is
    /// held) and drops the pair one row once it reaches the fall speed.
    /// Resolving: every popping cell ages by `dt`; the pass completes once all of
    /// them reach the pop duration. Non-finite or negative deltas count as 0.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.paused || self.phase == Phase::GameOver {
            return false;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed_secs += dt as f64;

        match self.phase {
            Phase::Falling => {
                let step = if self.fast_held {
                    self.config.fast_fall_multiplier
                } else {
                    1
                };
                self.fall_timer = self.fall_timer.saturating_add(step);
                if self.fall_timer >= self.config.fall_speed {
                    self.fall_timer = 0;
                    self.drop_step();
                }
                true
            }
            Phase::Resolving => {
                self.advance_popping(dt);
                true
            }
            Phase::Locked | Phase::Spawning | Phase::GameOver => false,
        }
    }

    /// Apply an action. Returns true if it was accepted.
    ///
    /// `Restart` works in every state. Once the game is over nothing else is
    /// accepted. `Pause` toggles the paused flag. The soft-drop flag tracks the
    /// input in any live state; pair commands need `Falling` and not paused.
    pub fn process_input(&mut self, action: GameAction) -> bool {
        if action == GameAction::Restart {
            self.restart();
            return true;
        }
        if self.phase == Phase::GameOver {
            return false;
        }

        match action {
            GameAction::Pause => {
                self.paused = !self.paused;
                true
            }
            GameAction::SoftDropStart => {
                self.fast_held = true;
                if self.can_control() {
                    self.drop_step();
                }
                true
            }
            GameAction::SoftDropStop => {
                self.fast_held = false;
                true
            }
            _ if !self.can_control() => false,
            GameAction::MoveLeft => self.try_shift(-1),
            GameAction::MoveRight => self.try_shift(1),
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
            GameAction::Drop => {
                self.drop_step();
                true
            }
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::Restart => true,
        }
    }

    /// Apply an action by name; unknown names are ignored
    pub fn process_named(&mut self, name: &str) -> bool {
        match GameAction::from_str(name) {
            Some(action) => self.process_input(action),
            None => false,
        }
    }

    /// Full reset: fresh board and score, queue reseeded from the current
    /// generator state, episode id incremented. Pending events are kept.
    pub fn restart(&mut self) {
        let seed = self.queue.seed();
        let next_episode = self.episode_id.wrapping_add(1);
        let events = std::mem::take(&mut self.events);
        let board = Board::new(self.config.width, self.config.height);
        *self = Self::build(Arc::clone(&self.config), board, seed);
        self.episode_id = next_episode;
        let fresh = std::mem::replace(&mut self.events, events);
        for event in fresh {
            self.push_event(event);
        }
    }

    fn can_control(&self) -> bool {
        self.phase == Phase::Falling && !self.paused && self.active.is_some()
    }

    fn try_shift(&mut self, dx: i16) -> bool {
        match self.active.as_mut() {
            Some(pair) => pair.try_move(&self.board, dx, 0),
            None => false,
        }
    }

    fn try_rotate(&mut self, clockwise: bool) -> bool {
        match self.active.as_mut() {
            Some(pair) => pair.try_rotate(&self.board, clockwise),
            None => false,
        }
    }

    /// Move the pair down one row, locking it if blocked
    fn drop_step(&mut self) {
        let Some(pair) = self.active.as_mut() else {
            return;
        };
        if !pair.try_move(&self.board, 0, 1) {
            self.lock_active();
        }
    }

    fn hard_drop(&mut self) {
        let Some(pair) = self.active.as_mut() else {
            return;
        };
        while pair.try_move(&self.board, 0, 1) {}
        self.fall_timer = 0;
        self.lock_active();
    }

    fn lock_active(&mut self) {
        let Some(pair) = self.active.take() else {
            return;
        };
        pair.lock_into(&mut self.board);
        self.phase = Phase::Locked;
        self.chain_count = 0;
        self.push_event(SessionEvent::Locked {
            piece_id: self.piece_id,
            cells: pair.cells(),
        });
        self.resolve();
    }

    /// Settle, match, and either start popping or spawn the next pair
    fn resolve(&mut self) {
        settle(&mut self.board);
        self.chain.find(&self.board, self.config.required_group_size);

        if self.chain.is_empty() {
            self.spawn();
            return;
        }

        self.chain_count = self.chain_count.saturating_add(1);
        for &(x, y) in &self.chain.to_clear {
            if let Some(puyo) = self.board.get_mut(x, y) {
                puyo.start_popping();
            }
        }
        self.phase = Phase::Resolving;
    }

    fn advance_popping(&mut self, dt: f32) {
        let duration = self.config.pop_duration_secs;
        let mut done = true;
        for &(x, y) in &self.chain.to_clear {
            if let Some(puyo) = self.board.get_mut(x, y) {
                puyo.pop_elapsed += dt;
                if puyo.pop_elapsed < duration {
                    done = false;
                }
            }
        }
        if done {
            self.complete_pass();
        }
    }

    /// Remove the popped cells, score the pass and look for the next link
    fn complete_pass(&mut self) {
        for &(x, y) in &self.chain.to_clear {
            self.board.set(x, y, None);
        }

        let cleared = self.chain.cleared_count();
        let result = calculate_score(
            cleared,
            self.chain_count,
            &self.chain.colors_cleared,
            &self.chain.groups_cleared,
            &self.config,
        );
        self.score = self.score.saturating_add(result.increment);
        self.nuisance = calculate_nuisance(
            self.score,
            self.config.nuisance_target_points,
            &self.config.nuisance_denominations,
        );
        self.last_score = Some(result);
        self.last_chain = self.chain_count;

        let event = ChainEvent {
            chain: self.chain_count,
            cleared,
            groups: self.chain.groups_cleared.clone(),
            colors: self.chain.colors_cleared.iter().collect(),
            increment: result.increment,
            score: self.score,
            nuisance_count: self.nuisance.count,
            denominations: self.nuisance.denominations.clone(),
            leftover: self.nuisance.leftover,
        };
        self.push_event(SessionEvent::Chain(event));

        self.resolve();
    }

    fn spawn(&mut self) {
        self.phase = Phase::Spawning;
        self.chain.reset();
        self.chain_count = 0;
        self.fall_timer = 0;

        let pair = self.queue.promote();
        if !pair.fits(&self.board) {
            self.active = None;
            self.phase = Phase::GameOver;
            self.push_event(SessionEvent::GameOver {
                score: self.score,
                pieces: self.piece_id,
            });
            return;
        }

        self.active = Some(pair);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.phase = Phase::Falling;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new_default(1)
    }
}
