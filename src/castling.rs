use crate::piece::Color;
use crate::piece::Color::{Black, White};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}
impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];

    /// Column the rook starts the game on
    pub fn rook_home(&self) -> u8 {
        match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        }
    }
    /// Column the rook lands on, adjacent to the king's destination
    pub fn rook_target(&self) -> u8 {
        match self {
            CastlingSide::KingSide => 5,
            CastlingSide::QueenSide => 3,
        }
    }
    /// Column the king lands on, two files towards the rook
    pub fn king_target(&self) -> u8 {
        match self {
            CastlingSide::KingSide => 6,
            CastlingSide::QueenSide => 2,
        }
    }
    /// Columns strictly between the king and the rook, which have to be empty
    pub fn between(&self) -> &'static [u8] {
        match self {
            CastlingSide::KingSide => &[5, 6],
            CastlingSide::QueenSide => &[1, 2, 3],
        }
    }
    /// Columns the king crosses, destination included, which may not be attacked
    pub fn king_path(&self) -> &'static [u8] {
        match self {
            CastlingSide::KingSide => &[5, 6],
            CastlingSide::QueenSide => &[3, 2],
        }
    }

    /// Castling side whose rook starts on the given column, if any
    pub fn from_rook_home(col: u8) -> Option<CastlingSide> {
        match col {
            7 => Some(CastlingSide::KingSide),
            0 => Some(CastlingSide::QueenSide),
            _ => None,
        }
    }
}

/// Castling rights of both sides. Rights are only ever removed during a game,
/// restoring them is left to undo, which copies back a whole snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);

    pub fn new() -> CastlingRights {
        CastlingRights(0b1111)
    }
    pub fn from_str(s: &str) -> CastlingRights {
        let mut res = CastlingRights(0);
        if s.contains('K') {
            res.0 |= 0b1000
        }
        if s.contains('Q') {
            res.0 |= 0b0100
        }
        if s.contains('k') {
            res.0 |= 0b0010
        }
        if s.contains('q') {
            res.0 |= 0b0001
        }
        res
    }

    fn mask(color: Color, side: CastlingSide) -> u8 {
        match (color, side) {
            (White, CastlingSide::KingSide) => 0b1000,
            (White, CastlingSide::QueenSide) => 0b0100,
            (Black, CastlingSide::KingSide) => 0b0010,
            (Black, CastlingSide::QueenSide) => 0b0001,
        }
    }

    /// Returns the castling rights of a given color, as (king side, queen side)
    pub fn get(&self, color: Color) -> (bool, bool) {
        (
            self.has(color, CastlingSide::KingSide),
            self.has(color, CastlingSide::QueenSide),
        )
    }
    pub fn has(&self, color: Color, side: CastlingSide) -> bool {
        self.0 & Self::mask(color, side) != 0
    }
    /// Marks the given color as unable to castle at all
    pub fn uncastle(&mut self, color: Color) {
        self.uncastle_side(color, CastlingSide::KingSide);
        self.uncastle_side(color, CastlingSide::QueenSide);
    }
    /// Marks the given color as unable to castle on one side
    pub fn uncastle_side(&mut self, color: Color, side: CastlingSide) {
        self.0 &= !Self::mask(color, side)
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        let (wking, wqueen) = self.get(White);
        let (bking, bqueen) = self.get(Black);
        write!(
            f,
            "{}{}{}{}",
            if wking { "K" } else { "" },
            if wqueen { "Q" } else { "" },
            if bking { "k" } else { "" },
            if bqueen { "q" } else { "" }
        )
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}
