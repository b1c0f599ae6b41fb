use crate::castling::CastlingSide;
use crate::square::Square;
use std::fmt::{Display, Formatter};

/// A move from one square to another, tagged with what kind of move it is.
/// Promotions always turn the pawn into a queen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub origin: Square,
    pub target: Square,
    pub kind: MoveKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    DoublePush,
    Capture,
    EnPassant,
    Castle(CastlingSide),
    Promotion,
    PromotionCapture,
}

impl Move {
    pub fn new(origin: Square, target: Square, kind: MoveKind) -> Move {
        Move {
            origin,
            target,
            kind,
        }
    }
    pub fn new_quiet(origin: Square, target: Square) -> Move {
        Self::new(origin, target, MoveKind::Quiet)
    }
    pub fn new_capture(origin: Square, target: Square) -> Move {
        Self::new(origin, target, MoveKind::Capture)
    }

    /// En passant captures included
    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture
        )
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    /// Parses a move formatted in long algebraic notation.
    /// Since no information can be given on flags, it simply returns origin and target.
    /// A trailing promotion letter is tolerated and ignored.
    pub fn parse(mv: &str) -> Option<(Square, Square)> {
        if mv.len() < 4 || !mv.is_char_boundary(2) {
            return None;
        }
        let origin = Square::parse(&mv[0..2])?;
        let target = Square::parse(&mv[2..])?;
        Some((origin, target))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_promotion() {
            write!(f, "{}{}q", self.origin, self.target)
        } else {
            write!(f, "{}{}", self.origin, self.target)
        }
    }
}
