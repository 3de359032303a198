//! # Combo Four Library
//!
//! This library provides the rule engine for Combo Four, a connect-four variant in which
//! every completed line of four scores a point and is cleared, letting the pieces above fall
//! and possibly complete further lines in a chain. It also provides a computer opponent with
//! four difficulty tiers.
//!
//! It is used by three binaries:
//! - `human_player`: interactive terminal game, hot seat or against the AI.
//! - `ai_solver`: takes a board file and prints the column the AI would play.
//! - `tier_evaluator`: plays seeded AI-vs-AI matches and tallies the results per tier.
//!
//! ## Modules
//! - `engine`: the board model (`Board`, `Cell`, `Player`), placement and gravity.
//! - `detector`: connect-four detection (`find_alignments`).
//! - `game`: the session (`Game`) and move resolution with its frames and events.
//! - `heuristics`: positional evaluation and the random and greedy tiers.
//! - `solver`: minimax with alpha-beta pruning and the `AiPlayer` front end.
//! - `config`: session configuration loaded from TOML.
//! - `snapshot`: the persisted JSON form of a board.
//! - `error`: error types.
//! - `utils`: text-grid board parsing.

pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod snapshot;
pub mod solver;
pub mod utils;
