//! Ordered record of the moves played in a game

use crate::board::Board;
use crate::moves::Move;
use crate::types::Color;

use std::fmt;

/// Moves played from the starting position, in play order
///
/// The log only records moves, it doesn't validate them. Moves are appended by
/// [`Game`](crate::game::Game) after they are checked and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLog {
    start: Board,
    moves: Vec<Move>,
}

impl MoveLog {
    pub fn new(start: Board) -> Self {
        MoveLog {
            start,
            moves: Vec::new(),
        }
    }

    /// Returns the position before the first move
    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }

    pub fn get(&self, idx: usize) -> Option<Move> {
        self.moves.get(idx).copied()
    }

    pub fn last(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub(crate) fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// Replays all the moves from the starting position and returns the resulting board
    pub fn replay(&self) -> Board {
        let mut board = self.start.clone();
        for &mv in &self.moves {
            board.apply_move(mv);
        }
        board
    }

    /// Returns a walker which yields each move together with the position before it
    pub fn walk(&self) -> Walker<'_> {
        Walker {
            start: &self.start,
            board: self.start.clone(),
            moves: &self.moves,
            pos: 0,
            board_pos: 0,
        }
    }

    /// Returns a wrapper to display the moves with move numbers, like `1. e2e4 e7e5 2. g1f3`
    pub fn numbered(&self) -> NumberedList<'_> {
        NumberedList(self)
    }
}

impl fmt::Display for MoveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, m) in self.moves.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// Walks over the log, keeping track of the position before each move
pub struct Walker<'a> {
    start: &'a Board,
    board: Board,
    moves: &'a [Move],
    pos: usize,
    board_pos: usize,
}

impl<'a> Walker<'a> {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn set_board_pos(&mut self, target: usize) {
        if self.board_pos > target {
            self.board.clone_from(self.start);
            self.board_pos = 0;
        }
        while self.board_pos < target {
            self.board.apply_move(self.moves[self.board_pos]);
            self.board_pos += 1;
        }
    }

    pub fn next(&mut self) -> Option<(&Board, Move)> {
        if self.pos == self.moves.len() {
            return None;
        }
        self.pos += 1;
        self.set_board_pos(self.pos - 1);
        Some((&self.board, self.moves[self.pos - 1]))
    }

    pub fn prev(&mut self) -> Option<(&Board, Move)> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        self.set_board_pos(self.pos);
        Some((&self.board, self.moves[self.pos]))
    }

    pub fn start(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self) {
        self.pos = self.moves.len();
    }
}

/// Wrapper to display the log with move numbers
pub struct NumberedList<'a>(&'a MoveLog);

impl<'a> fmt::Display for NumberedList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut walker = self.0.walk();
        let mut first = true;
        while let Some((b, mv)) = walker.next() {
            if !first {
                write!(f, " ")?;
            }
            match b.side() {
                Color::White => write!(f, "{}. ", b.move_number())?,
                Color::Black if first => write!(f, "{}... ", b.move_number())?,
                Color::Black => {}
            }
            write!(f, "{}", mv)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_from_uci(start: Board, list: &str) -> MoveLog {
        let mut log = MoveLog::new(start);
        let mut board = log.start().clone();
        for s in list.split_ascii_whitespace() {
            let mv = Move::from_uci_legal(s, &board).unwrap();
            board = board.make_move(mv).unwrap();
            log.push(mv);
        }
        log
    }

    #[test]
    fn test_replay() {
        let log = log_from_uci(Board::initial(), "e2e4 e7e5 g1f3 b8c6 f1b5");
        assert_eq!(log.len(), 5);
        assert_eq!(log.to_string(), "e2e4 e7e5 g1f3 b8c6 f1b5");
        assert_eq!(
            log.replay().as_fen(),
            "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3"
        );
        assert_eq!(log.last().map(|m| m.to_string()), Some("f1b5".to_string()));
        assert_eq!(log.get(1).map(|m| m.to_string()), Some("e7e5".to_string()));
        assert_eq!(log.get(5), None);
    }

    #[test]
    fn test_walk() {
        let log = log_from_uci(Board::initial(), "e2e4 e7e5 g1f3");
        let mut walker = log.walk();
        assert_eq!(walker.len(), 3);

        let (b, mv) = walker.next().unwrap();
        assert_eq!(*b, Board::initial());
        assert_eq!(mv.to_string(), "e2e4");
        let (b, mv) = walker.next().unwrap();
        assert_eq!(b.side(), Color::Black);
        assert_eq!(mv.to_string(), "e7e5");
        let (b, _) = walker.next().unwrap();
        assert_eq!(
            b.as_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
        assert!(walker.next().is_none());

        let (b, mv) = walker.prev().unwrap();
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(b.side(), Color::White);
        walker.start();
        assert_eq!(walker.pos(), 0);
        assert!(walker.prev().is_none());
        walker.end();
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_numbered() {
        let log = log_from_uci(Board::initial(), "e2e4 e7e5 g1f3");
        assert_eq!(log.numbered().to_string(), "1. e2e4 e7e5 2. g1f3");

        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 7").unwrap();
        let log = log_from_uci(b, "e8d8 e1d1 d8c8");
        assert_eq!(log.numbered().to_string(), "7... e8d8 8. e1d1 d8c8");

        let log = MoveLog::new(Board::initial());
        assert!(log.is_empty());
        assert_eq!(log.numbered().to_string(), "");
        assert_eq!(log.to_string(), "");
    }

    #[test]
    fn test_pop() {
        let mut log = log_from_uci(Board::initial(), "e2e4 e7e5");
        assert_eq!(log.pop().map(|m| m.to_string()), Some("e7e5".to_string()));
        assert_eq!(
            log.replay().as_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
