use duelchess::{legal, Color, Game, GameStatus, Outcome, RequestError};
use proptest::{prelude::*, sample::Selector};
use test_strategy::proptest;

/// Game reached by playing random legal moves from the initial position
fn game() -> impl Strategy<Value = Game> {
    (0..160usize, any::<Selector>())
        .prop_map(|(plies, selector)| {
            let mut game = Game::new();
            for _ in 0..plies {
                let moves = game.legal_moves();
                match selector.try_select(moves.iter().copied()) {
                    Some(mv) => {
                        game.request_uci(&mv.to_string()).unwrap();
                    }
                    None => break,
                }
            }
            game
        })
        .no_shrink()
}

fn file() -> impl Strategy<Value = char> {
    (0u8..8).prop_map(|f| (b'a' + f) as char)
}

#[proptest]
fn legal_moves_never_expose_own_king(#[strategy(game())] game: Game) {
    let side = game.side();
    for &mv in &game.legal_moves() {
        let next = game.board().make_move(mv).unwrap();
        prop_assert!(!legal::is_check(&next, side), "{mv} exposes the king");
    }
}

#[proptest]
fn checkmate_and_stalemate_agree_with_check(#[strategy(game())] game: Game) {
    for color in [Color::White, Color::Black] {
        let b = game.board();
        if legal::is_checkmate(b, color) {
            prop_assert!(legal::is_check(b, color));
            prop_assert!(!legal::is_stalemate(b, color));
        }
        if legal::is_stalemate(b, color) {
            prop_assert!(!legal::is_check(b, color));
        }
    }
}

#[proptest]
fn status_matches_board(#[strategy(game())] game: Game) {
    let b = game.board();
    let side = game.side();
    match game.status() {
        GameStatus::Ongoing => {
            prop_assert!(!legal::is_check(b, side));
            prop_assert!(!game.legal_moves().is_empty());
        }
        GameStatus::Check(color) => {
            prop_assert_eq!(color, side);
            prop_assert!(legal::is_check(b, side));
        }
        GameStatus::Finished(Outcome::Checkmate { winner }) => {
            prop_assert_eq!(winner, side.inv());
            prop_assert!(legal::is_checkmate(b, side));
        }
        GameStatus::Finished(Outcome::Stalemate) => {
            prop_assert!(legal::is_stalemate(b, side));
        }
    }
}

#[proptest]
fn accepted_move_passes_the_turn(#[strategy(game())] mut game: Game, selector: Selector) {
    let moves = game.legal_moves();
    if let Some(mv) = selector.try_select(moves.iter().copied()) {
        let side = game.side();
        let len = game.log().len();
        prop_assert_eq!(game.request_uci(&mv.to_string()), Ok(mv));
        prop_assert_eq!(game.side(), side.inv());
        prop_assert_eq!(game.log().len(), len + 1);
        prop_assert_eq!(game.log().last(), Some(mv));
    }
}

#[proptest]
fn rejected_request_changes_nothing(
    #[strategy(game())] mut game: Game,
    #[strategy(file())] src_file: char,
    #[strategy(1u8..=8)] src_rank: u8,
    #[strategy(file())] dst_file: char,
    #[strategy(1u8..=8)] dst_rank: u8,
) {
    let board = game.board().clone();
    let status = game.status();
    let len = game.log().len();
    let events = game.subscribe();

    if game
        .request_move(src_file, src_rank, dst_file, dst_rank)
        .is_err()
    {
        prop_assert_eq!(game.board(), &board);
        prop_assert_eq!(game.status(), status);
        prop_assert_eq!(game.log().len(), len);
        prop_assert_eq!(events.try_iter().count(), 0);
    } else {
        prop_assert_eq!(game.side(), board.side().inv());
    }
}

#[proptest]
fn finished_game_is_locked(
    #[strategy(game())] mut game: Game,
    #[strategy(file())] src_file: char,
    #[strategy(1u8..=8)] src_rank: u8,
    #[strategy(file())] dst_file: char,
    #[strategy(1u8..=8)] dst_rank: u8,
) {
    if let Some(outcome) = game.outcome() {
        prop_assert!(game.legal_moves().is_empty());
        prop_assert_eq!(
            game.request_move(src_file, src_rank, dst_file, dst_rank),
            Err(RequestError::Finished(outcome))
        );
    }
}

#[proptest]
fn log_replays_to_current_board(#[strategy(game())] mut game: Game) {
    prop_assert_eq!(&game.log().replay(), game.board());

    let fen = game.board().as_fen();
    prop_assert_eq!(game.board().raw().as_fen(), fen);

    if let Some(mv) = game.undo() {
        prop_assert_eq!(&game.log().replay(), game.board());
        prop_assert_eq!(game.side(), mv.side());
    }
}
