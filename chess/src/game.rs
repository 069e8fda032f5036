//! Game orchestrator: the single entry point for playing moves

use crate::board::Board;
use crate::fen::FenParseError;
use crate::legal;
use crate::log::MoveLog;
use crate::movegen::{self, MoveList};
use crate::moves::{uci, CreateError, Move, PromotePiece, ValidateError};
use crate::pieces::PieceState;
use crate::types::{Color, Coord, CoordError, Outcome};

use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Position from which a game starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StartPosition {
    /// Standard initial position
    #[default]
    Initial,
    /// Position given as FEN
    Fen(String),
}

/// Game options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Position to start from
    pub start: StartPosition,
    /// Piece chosen when a pawn reaches the last rank and no piece is given explicitly
    pub default_promote: PromotePiece,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            start: StartPosition::Initial,
            default_promote: PromotePiece::Queen,
        }
    }
}

/// State of the game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The side to move is not in check and has legal moves
    Ongoing,
    /// The given side is in check, but has legal moves
    Check(Color),
    /// The game has ended, no more moves are accepted
    Finished(Outcome),
}

impl GameStatus {
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished(_))
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            GameStatus::Finished(o) => Some(o),
            _ => None,
        }
    }
}

/// Notification sent to subscribers after the game state changes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// The move was applied to the board
    MoveExecuted(Move),
    /// The given side is now to move
    ActiveSideChanged(Color),
    /// The given side is in check
    Check(Color),
    /// The game ended by checkmate, the given side wins
    Checkmate(Color),
    /// The game ended by stalemate
    Stalemate,
    /// The move was taken back
    Undone(Move),
}

/// Error returned when a move request is rejected
///
/// A rejected request never changes the game state.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RequestError {
    /// A coordinate is outside the board
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),
    /// The move text cannot be parsed
    #[error("cannot parse move: {0}")]
    Parse(#[from] uci::RawParseError),
    /// The move cannot be formed on the current board
    #[error("cannot create move: {0}")]
    Create(#[from] CreateError),
    /// The move breaks the rules of chess
    #[error("illegal move: {0}")]
    Illegal(#[from] ValidateError),
    /// The game has already ended
    #[error("game is finished: {0}")]
    Finished(Outcome),
}

/// Chess game between two sides
///
/// The game owns the board and the move log. All the changes go through the `request_*` methods,
/// which accept only legal moves. Each accepted move is followed by a status update and the
/// events sent to the subscribers. Rejected requests change nothing and send nothing.
///
/// Once the game is finished by checkmate or stalemate, all the move requests are rejected.
#[derive(Debug)]
pub struct Game {
    board: Board,
    log: MoveLog,
    status: GameStatus,
    default_promote: PromotePiece,
    listeners: Vec<Sender<GameEvent>>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

fn calc_status(b: &Board) -> GameStatus {
    let side = b.side();
    let check = legal::is_check(b, side);
    if !legal::has_legal_moves(b, side) {
        return GameStatus::Finished(match check {
            true => Outcome::Checkmate { winner: side.inv() },
            false => Outcome::Stalemate,
        });
    }
    match check {
        true => GameStatus::Check(side),
        false => GameStatus::Ongoing,
    }
}

impl Game {
    /// Creates a game from the initial position with default options
    pub fn new() -> Game {
        Game::from_board(Board::initial(), PromotePiece::Queen)
    }

    /// Creates a game with the given options
    pub fn with_config(config: GameConfig) -> Result<Game, FenParseError> {
        let board = match &config.start {
            StartPosition::Initial => Board::initial(),
            StartPosition::Fen(fen) => Board::from_fen(fen)?,
        };
        Ok(Game::from_board(board, config.default_promote))
    }

    fn from_board(board: Board, default_promote: PromotePiece) -> Game {
        let status = calc_status(&board);
        Game {
            log: MoveLog::new(board.clone()),
            board,
            status,
            default_promote,
            listeners: Vec::new(),
        }
    }

    /// Subscribes to game events
    ///
    /// The channel is unbounded, so sending never blocks the game. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    fn emit(&mut self, event: GameEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }

    /// Requests a move given by file letters and rank numbers, like `('e', 2, 'e', 4)`
    ///
    /// If a pawn reaches the last rank, it is promoted to the default piece from [`GameConfig`].
    #[instrument(level = "debug", skip(self))]
    pub fn request_move(
        &mut self,
        src_file: char,
        src_rank: u8,
        dst_file: char,
        dst_rank: u8,
    ) -> Result<Move, RequestError> {
        let src = Coord::from_raw(src_file, src_rank)?;
        let dst = Coord::from_raw(dst_file, dst_rank)?;
        let promote =
            Move::needs_promote(&self.board, src, dst).then_some(self.default_promote);
        self.play(src, dst, promote)
    }

    /// Same as [`Game::request_move()`], but with an explicit promote piece
    #[instrument(level = "debug", skip(self))]
    pub fn request_promotion(
        &mut self,
        src_file: char,
        src_rank: u8,
        dst_file: char,
        dst_rank: u8,
        piece: PromotePiece,
    ) -> Result<Move, RequestError> {
        let src = Coord::from_raw(src_file, src_rank)?;
        let dst = Coord::from_raw(dst_file, dst_rank)?;
        self.play(src, dst, Some(piece))
    }

    /// Requests a move in UCI format, like `e2e4` or `e7e8q`
    #[instrument(level = "debug", skip(self))]
    pub fn request_uci(&mut self, s: &str) -> Result<Move, RequestError> {
        let parsed = uci::Move::from_str(s)?;
        let promote = match parsed.promote {
            Some(p) => Some(p),
            None => Move::needs_promote(&self.board, parsed.src, parsed.dst)
                .then_some(self.default_promote),
        };
        self.play(parsed.src, parsed.dst, promote)
    }

    fn play(
        &mut self,
        src: Coord,
        dst: Coord,
        promote: Option<PromotePiece>,
    ) -> Result<Move, RequestError> {
        if let GameStatus::Finished(outcome) = self.status {
            warn!(%src, %dst, %outcome, "move requested in a finished game");
            return Err(RequestError::Finished(outcome));
        }
        let mv = match self.build_move(src, dst, promote) {
            Ok(mv) => mv,
            Err(e) => {
                debug!(%src, %dst, error = %e, "move rejected");
                return Err(e);
            }
        };
        self.execute(mv);
        Ok(mv)
    }

    fn build_move(
        &self,
        src: Coord,
        dst: Coord,
        promote: Option<PromotePiece>,
    ) -> Result<Move, RequestError> {
        let mv = Move::from_coords(&self.board, src, dst, promote)?;
        mv.validate(&self.board)?;
        Ok(mv)
    }

    fn execute(&mut self, mv: Move) {
        self.log.push(mv);
        self.board.apply_move(mv);
        debug!(%mv, fen = %self.board, "move executed");

        let side = self.board.side();
        self.emit(GameEvent::MoveExecuted(mv));
        self.emit(GameEvent::ActiveSideChanged(side));

        self.status = calc_status(&self.board);
        match self.status {
            GameStatus::Finished(Outcome::Stalemate) => {
                info!("stalemate");
                self.emit(GameEvent::Stalemate);
            }
            GameStatus::Finished(Outcome::Checkmate { winner }) => {
                info!(winner = winner.as_long_str(), "checkmate");
                self.emit(GameEvent::Checkmate(winner));
            }
            GameStatus::Check(color) => {
                info!(side = color.as_long_str(), "check");
                self.emit(GameEvent::Check(color));
            }
            GameStatus::Ongoing => {}
        }
    }

    /// Takes back the last move
    ///
    /// The position is restored by replaying the log from the start. Undoing the last move of a
    /// finished game makes it playable again. Returns `None` if no moves were made.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.log.pop()?;
        self.board = self.log.replay();
        self.status = calc_status(&self.board);
        debug!(%mv, fen = %self.board, "move undone");
        self.emit(GameEvent::Undone(mv));
        self.emit(GameEvent::ActiveSideChanged(self.board.side()));
        Some(mv)
    }

    /// Returns the piece on the square given by file letter and rank number
    pub fn piece_at(&self, file: char, rank: u8) -> Result<Option<PieceState>, CoordError> {
        Ok(self.board.piece_at(Coord::from_raw(file, rank)?))
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.status.outcome()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.board.side()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    /// Returns all the legal moves of the side to move
    pub fn legal_moves(&self) -> MoveList {
        if self.is_finished() {
            return MoveList::new();
        }
        movegen::gen_legal(&self.board)
    }
}
