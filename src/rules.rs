//! Check, checkmate and stalemate detection.

use crate::board::Board;
use crate::move_generator::{attacks_square, legal_piece_moves};
use crate::piece::Color;
use crate::square::Square;

/// Whether the king of `color` is attacked by the opponent
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king_square) => attacks_square(board, king_square, color.opposite()),
        None => false,
    }
}

/// Whether any piece of `color` has a legal move. Stops on the first one found.
pub fn has_legal_move(board: &mut Board, color: Color) -> bool {
    for origin in Square::all() {
        match board.piece_at(origin) {
            Some(piece) if piece.color == color => {
                if !legal_piece_moves(board, origin, piece).is_empty() {
                    return true;
                }
            }
            _ => (),
        }
    }
    false
}

pub fn is_checkmate(board: &mut Board, color: Color) -> bool {
    is_in_check(board, color) && !has_legal_move(board, color)
}

pub fn is_stalemate(board: &mut Board, color: Color) -> bool {
    !is_in_check(board, color) && !has_legal_move(board, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generator::{generate, legal_moves};
    use crate::piece::Color::{Black, White};
    use crate::r#move::Move;

    fn play(board: &mut Board, mv: &str) {
        let (origin, target) = Move::parse(mv).unwrap();
        let m = legal_moves(board, origin).find(origin, target).unwrap();
        board.make(m);
    }

    #[test]
    fn fools_mate() {
        let mut board = Board::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut board, mv);
        }
        assert!(is_in_check(&board, White));
        assert!(is_checkmate(&mut board, White));
        assert!(!is_stalemate(&mut board, White));
        assert!(generate(&mut board).is_empty());
        assert!(!is_checkmate(&mut board, Black));
    }

    #[test]
    fn back_rank_mate() {
        let mut board = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(is_checkmate(&mut board, Black));
        assert!(!has_legal_move(&mut board, Black));

        // An escape square turns it into a plain check
        let mut board = Board::from_fen("3R2k1/5p1p/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(is_in_check(&board, Black));
        assert!(!is_checkmate(&mut board, Black));
    }

    #[test]
    fn stalemate_is_not_checkmate() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!is_in_check(&board, Black));
        assert!(is_stalemate(&mut board, Black));
        assert!(!is_checkmate(&mut board, Black));
        assert!(!is_stalemate(&mut board, White));
    }

    #[test]
    fn detection_leaves_board_untouched() {
        let mut board = Board::from_fen("3R2k1/5p1p/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let before = board.clone();
        is_checkmate(&mut board, Black);
        is_stalemate(&mut board, Black);
        assert_eq!(board, before);
    }
}
