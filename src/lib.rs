//! Puyo chain engine (workspace facade crate).
//!
//! Re-exports the engine and its data types from the crates under `crates/`,
//! plus the headless runner used by the `puyo-chain` binary.

pub use puyo_chain_core as core;
pub use puyo_chain_types as types;

pub mod runner;
