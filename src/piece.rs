use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    /// Only load-bearing for kings and rooks (castling eligibility)
    pub has_moved: bool,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceType {
    pub fn is_bishop_like(&self) -> bool {
        matches!(self, Bishop | Queen)
    }
    pub fn is_rook_like(&self) -> bool {
        matches!(self, Queen | Rook)
    }

    /// Letter used in move notation, pawns have none
    pub fn notation_letter(&self) -> Option<char> {
        match self {
            Pawn => None,
            Knight => Some('N'),
            Bishop => Some('B'),
            Rook => Some('R'),
            Queen => Some('Q'),
            King => Some('K'),
        }
    }
}
impl Display for PieceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Pawn => "p",
                Knight => "n",
                Bishop => "b",
                Rook => "r",
                Queen => "q",
                King => "k",
            }
        )
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const BOTH: [Color; 2] = [White, Black];

    pub fn opposite(&self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }

    /// Row delta of a pawn push. White pawns walk towards row 0
    pub fn forward(&self) -> i8 {
        match self {
            White => -1,
            Black => 1,
        }
    }

    /// Row holding this color's king and rooks at the start of a game
    pub fn back_rank(&self) -> u8 {
        match self {
            White => 7,
            Black => 0,
        }
    }

    /// Row pawns of this color start on
    pub fn pawn_rank(&self) -> u8 {
        match self {
            White => 6,
            Black => 1,
        }
    }

    /// Row on which pawns of this color promote
    pub fn promotion_rank(&self) -> u8 {
        self.opposite().back_rank()
    }

    pub fn parse(s: &str) -> Option<Color> {
        match s {
            "w" | "white" => Some(White),
            "b" | "black" => Some(Black),
            _ => None,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self == &White { "white" } else { "black" })
    }
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece {
            piece_type,
            color,
            has_moved: false,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = match c.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            _ => return None,
        };
        let color = if c.is_ascii_lowercase() { Black } else { White };
        Some(Piece::new(piece_type, color))
    }

    pub fn is(&self, piece_type: PieceType, color: Color) -> bool {
        self.piece_type == piece_type && self.color == color
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.piece_type.to_string();
        write!(
            f,
            "{}",
            if self.color == White {
                s.to_uppercase()
            } else {
                s
            }
        )
    }
}
