//! # Base types for duelchess
//!
//! This is an auxiliary crate for `duelchess`, which contains the leaf types: squares, pieces,
//! colors and square sets. It has no knowledge of chess rules beyond board geometry.
//!
//! Normally you don't want to use this crate directly. Use `duelchess` instead, which re-exports
//! everything needed.

pub mod bitboard;
pub mod geometry;
pub mod types;
