// Simple command-line application to play chess

use duelchess::{board::PrettyStyle, Color, Game, GameEvent};
use std::io::{self, BufRead, Write};
use tracing_subscriber::fmt;

fn main() {
    fmt().with_writer(io::stderr).init();

    let mut stdin = io::stdin().lock();
    let mut game = Game::new();
    let events = game.subscribe();

    loop {
        if let Some(outcome) = game.outcome() {
            println!("Game finished: {}", outcome);
            println!("Moves: {}", game.log().numbered());
            break;
        }

        println!("{}", game.board().pretty(PrettyStyle::Ascii));
        let side = match game.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("{} move ({}): ", side, game.board().move_number());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        match s {
            "undo" => {
                if game.undo().is_none() {
                    println!("Nothing to undo");
                }
            }
            "moves" => {
                let moves: Vec<_> = game.legal_moves().iter().map(|m| m.to_string()).collect();
                println!("{}", moves.join(" "));
            }
            _ => {
                if let Err(e) = game.request_uci(s) {
                    println!("Bad move: {}", e);
                }
            }
        }

        for event in events.try_iter() {
            match event {
                GameEvent::Check(_) => println!("Check!"),
                GameEvent::Checkmate(winner) => println!("Checkmate, {} wins", winner.as_long_str()),
                GameEvent::Stalemate => println!("Stalemate"),
                _ => {}
            }
        }
        println!();
    }
}
