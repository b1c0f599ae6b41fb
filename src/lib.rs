use std::time::Instant;

use crate::board::{Board, FenError};

pub mod board;
pub mod castling;
pub mod cli;
pub mod evaluation;
pub mod game;
pub mod history;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod r#move;
pub mod rules;
pub mod search;
pub mod square;

/// Prints the node counts of every depth up to `depth`, from the starting position
/// or the given FEN.
pub fn perft(depth: usize, fen: Option<String>) -> Result<(), FenError> {
    println!("perft");
    let mut board = match fen {
        None => Board::new(),
        Some(f) => Board::from_fen(&f)?,
    };
    println!("{}\n", board);
    println!("depth nodes\n--------");
    for d in 1..=depth {
        let start = Instant::now();
        let nodes = move_generator::perft(&mut board, d);
        let elapsed = start.elapsed().as_secs_f32();
        println!("{}     {} ({}s, {} nps)", d, nodes, elapsed, nodes_per_second(nodes, elapsed));
    }
    Ok(())
}

fn nodes_per_second(nodes: u64, seconds: f32) -> f32 {
    if seconds > 0.0 {
        nodes as f32 / seconds
    } else {
        0.0
    }
}
