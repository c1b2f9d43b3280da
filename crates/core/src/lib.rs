//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the puzzle rules, state management, and simulation logic.
//! It has **no dependencies** on rendering, input devices, or I/O, making it:
//!
//! - **Deterministic**: Same config, seed and inputs produce identical sessions
//! - **Testable**: Unit tests for every rule, ASCII board fixtures for scenarios
//! - **Portable**: Can run in any environment (terminal, GUI, headless search)
//! - **Cheap to clone**: Flat board storage and a shared `Arc` config for clone-and-simulate
//!
//! # Module Structure
//!
//! - [`board`]: Flat width x height grid with bounds and occupancy queries
//! - [`gravity`]: Single-pass gravity and settle-to-fixed-point
//! - [`matcher`]: Breadth-first flood fill producing the per-pass chain context
//! - [`piece`]: The falling pivot/satellite pair (move, rotate, lock)
//! - [`rng`]: Seeded LCG and the current/next/next-next piece queue
//! - [`scoring`]: Chain, color and group bonuses and the per-pass increment
//! - [`nuisance`]: Score to nuisance conversion and greedy denomination split
//! - [`config`]: Engine configuration with defaults and validation
//! - [`session`]: The chain resolution state machine tying everything together
//! - [`snapshot`]: Read-only view of a session for renderers and observers
//!
//! # Game Rules
//!
//! - **Pairs**: Each piece is two puyos; the satellite orbits the pivot on rotation (no wall kicks)
//! - **Gravity**: After a lock, every floating puyo falls until the board is settled
//! - **Groups**: 4 or more (configurable) 4-connected puyos of one color clear
//! - **Chains**: Each clear re-settles the board and rematches; every pass bumps the chain counter
//! - **Scoring**: `cleared * 10 * max(1, chain + color + group bonus)`
//! - **Nuisance**: `score / 70` split greedily into denominations
//!
//! # Example
//!
//! ```
//! use puyo_chain_core::Session;
//! use puyo_chain_types::GameAction;
//!
//! // Create a session with the default 6x12 configuration
//! let mut session = Session::new_default(12345);
//!
//! // Apply game actions
//! session.process_input(GameAction::MoveLeft);
//! session.process_input(GameAction::RotateCw);
//! session.process_input(GameAction::HardDrop);
//!
//! // Advance time (seconds); popping animations and the fall timer run here
//! session.tick(1.0 / 60.0);
//!
//! assert!(session.is_running());
//! assert_eq!(session.board().occupied_count(), 2);
//! ```
//!
//! # Timing
//!
//! The session never waits. Call [`Session::tick`](session::Session::tick) once per frame
//! with the elapsed seconds:
//! - **Falling**: the fall timer gains 1 per tick (5 while soft drop is held) and drops the
//!   pair when it reaches the configured fall speed
//! - **Resolving**: popping puyos accumulate the elapsed seconds and are removed once all of
//!   them reach the pop duration

pub mod board;
pub mod config;
pub mod gravity;
pub mod matcher;
pub mod nuisance;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use puyo_chain_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use gravity::{apply_gravity, settle};
pub use matcher::{find_matches, ChainContext};
pub use nuisance::{calculate_nuisance, decompose_nuisance, Denomination, NuisanceReport};
pub use piece::{PieceCell, PuyoPair};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_score, ScoreResult};
pub use session::{ChainEvent, Session, SessionEvent};
pub use snapshot::{CellSnapshot, GameSnapshot};
