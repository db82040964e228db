//! A chess rules engine.
//!
//! The crate enumerates legal moves from an arbitrary position, applies
//! moves to produce successor positions, detects termination, renders
//! positions as FEN strings and scores positions with a single-ply
//! heuristic. It performs no search and keeps no state across calls:
//! every entry point is a pure function of the [`board::Position`] it is
//! handed, and what-if evaluation always happens on an internal clone.
//!
//! Deliberately out of scope, matching the rules actually enforced here:
//! en passant capture, and every draw condition other than the 50-move
//! half-move clock.

pub mod board;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod movegen;
pub mod moves;
