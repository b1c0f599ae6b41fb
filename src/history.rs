use crate::castling::{CastlingRights, CastlingSide};
use crate::piece::Piece;
use crate::r#move::{Move, MoveKind};
use crate::square::Square;
use std::fmt::{Display, Formatter};

/// Everything needed to take a move back: the move itself, the moved piece as it was
/// before moving, the captured piece, and the state that cannot be recomputed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub move_played: Move,
    pub moved_piece: Piece,
    pub captured_piece: Option<Piece>,
    pub ep_target: Option<Square>,
    pub castling_rights: CastlingRights,
    /// Whether the move left the opponent in check. Filled in by the executor,
    /// hypothetical moves leave it unset.
    pub gives_check: bool,
}

impl MoveRecord {
    pub fn origin(&self) -> Square {
        self.move_played.origin
    }
    pub fn target(&self) -> Square {
        self.move_played.target
    }
    pub fn is_en_passant(&self) -> bool {
        self.move_played.kind == MoveKind::EnPassant
    }
    pub fn is_castling(&self) -> bool {
        self.move_played.castling_side().is_some()
    }
    pub fn is_promotion(&self) -> bool {
        self.move_played.is_promotion()
    }

    /// Square the captured piece stood on. Differs from the target only for en passant.
    pub fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.origin().row, self.target().col)
        } else {
            self.target()
        }
    }
}

/// Move list notation: piece letter, origin, `x` on captures, destination.
/// Castling, en passant, promotion and check are written as exclusive forms,
/// checked in that order.
impl Display for MoveRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (origin, target) = (self.origin(), self.target());
        if let Some(side) = self.move_played.castling_side() {
            return write!(
                f,
                "{}",
                match side {
                    CastlingSide::KingSide => "O-O",
                    CastlingSide::QueenSide => "O-O-O",
                }
            );
        }
        if self.is_en_passant() {
            return write!(f, "{}x{} e.p.", origin.file_char(), target);
        }
        if self.is_promotion() {
            return write!(f, "{}=Q", target);
        }

        if let Some(letter) = self.moved_piece.piece_type.notation_letter() {
            write!(f, "{}", letter)?;
        }
        write!(
            f,
            "{}{}{}",
            origin,
            if self.captured_piece.is_some() { "x" } else { "" },
            target
        )?;
        if self.gives_check {
            write!(f, "+")?;
        }
        Ok(())
    }
}

/// Renders a history as a numbered move list, white's and black's moves paired up
pub fn move_list_text(history: &[MoveRecord]) -> String {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}. {} {}", i + 1, white, black),
            [white] => format!("{}. {}", i + 1, white),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
