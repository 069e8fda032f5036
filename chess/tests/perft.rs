use duelchess::{movegen, Board};

fn perft(b: &Board, depth: usize) -> u64 {
    let moves = movegen::gen_legal(b);
    if depth <= 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&mv| perft(&b.make_move(mv).unwrap(), depth - 1))
        .sum()
}

fn check(fen: &str, counts: &[u64]) {
    let board = Board::from_fen(fen).unwrap();
    for (depth, &expected) in counts.iter().enumerate() {
        assert_eq!(perft(&board, depth + 1), expected, "{fen} at depth {}", depth + 1);
    }
}

#[test]
fn initial() {
    check(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8902, 197281],
    );
}

#[test]
fn kiwipete() {
    check(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039, 97862],
    );
}

#[test]
fn rook_endgame_with_pins() {
    check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812, 43238]);
}

#[test]
fn promotions_and_castling() {
    check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9467],
    );
}

#[test]
fn discovered_checks() {
    check(
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1486, 62379],
    );
}

#[test]
fn symmetric_middlegame() {
    check(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[46, 2079, 89890],
    );
}
