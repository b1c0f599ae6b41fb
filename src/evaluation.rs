use crate::board::Board;
use crate::piece::{Color, PieceType};

pub type Score = i32;

pub struct Evaluation;
impl Evaluation {
    /// Pawn, knight, bishop, rook, queen, king. The king is never captured so it counts for nothing.
    pub const PIECE_TYPE_VALUE: [Score; 6] = [1, 3, 3, 5, 9, 0];

    pub fn piece_value(piece_type: PieceType) -> Score {
        Self::PIECE_TYPE_VALUE[piece_type as usize]
    }

    /// Material balance, positive when `side` is ahead
    pub fn material(board: &Board, side: Color) -> Score {
        Self::material_of(board, side) - Self::material_of(board, side.opposite())
    }

    fn material_of(board: &Board, color: Color) -> Score {
        board
            .pieces(color)
            .map(|(_, piece)| Self::piece_value(piece.piece_type))
            .sum()
    }
}
