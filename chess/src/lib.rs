//! Chess rule engine for two-player games
//!
//! The crate keeps a chess position, checks moves against the rules of chess and detects check,
//! checkmate and stalemate. Everything from outside goes through [`Game`], which accepts only
//! legal moves and notifies subscribers about the changes.
//!
//! # Example
//!
//! ```
//! use duelchess::{Color, Game, GameStatus, Outcome};
//!
//! let mut game = Game::new();
//! for (src_file, src_rank, dst_file, dst_rank) in [
//!     ('f', 2, 'f', 3),
//!     ('e', 7, 'e', 5),
//!     ('g', 2, 'g', 4),
//!     ('d', 8, 'h', 4),
//! ] {
//!     game.request_move(src_file, src_rank, dst_file, dst_rank).unwrap();
//! }
//! assert_eq!(
//!     game.status(),
//!     GameStatus::Finished(Outcome::Checkmate { winner: Color::Black })
//! );
//! assert!(game.request_move('e', 2, 'e', 4).is_err());
//! ```

pub mod board;
pub mod fen;
pub mod game;
pub mod legal;
pub mod log;
pub mod movegen;
pub mod moves;
pub mod pieces;

pub use duelchess_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::{Board, RawBoard};
pub use game::{Game, GameConfig, GameEvent, GameStatus, RequestError, StartPosition};
pub use log::MoveLog;
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, PromotePiece, Special};
pub use pieces::{PieceSet, PieceState};
pub use types::{
    CastlingRights, CastlingSide, Cell, Color, Coord, CoordError, File, Outcome, Piece, Rank,
};
