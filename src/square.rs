use std::fmt::{Display, Formatter};

/// A square of the board, in the engine's fixed orientation:
/// row 0 is the eighth rank (black's back rank), col 0 is the a-file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    /// Iterates over the 64 squares, row by row
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// Returns the square shifted by the given deltas, if it is still on the board
    /// ```
    /// use gambit::square::Square;
    /// assert_eq!(Square::new(6, 4).offset(-2, 0), Some(Square::new(4, 4)));
    /// assert_eq!(Square::new(0, 0).offset(-1, 1), None);
    /// assert_eq!(Square::new(7, 7).offset(0, 1), None);
    /// ```
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Parses a square from a given string slice,
    /// only caring that the first two characters form a valid square representation
    /// ```
    /// use gambit::square::Square;
    /// assert_eq!(Square::parse("e4"), Some(Square::new(4, 4)));
    /// assert_eq!(Square::parse("d2someotherstuff"), Some(Square::new(6, 3)));
    /// assert_eq!(Square::parse("a8"), Some(Square::new(0, 0)));
    /// assert_eq!(Square::parse("randoma1stuff"), None);
    /// assert_eq!(Square::parse("k9"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars_iter = s.chars();
        let col = match chars_iter.next()? {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return None,
        };
        let rank = match chars_iter.next()?.to_digit(10) {
            Some(i) if (1..=8).contains(&i) => i as u8,
            _ => return None,
        };
        Some(Square::new(8 - rank, col))
    }

    /// The file letter of this square
    /// ```
    /// use gambit::square::Square;
    /// assert_eq!(Square::new(3, 2).file_char(), 'c');
    /// ```
    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank digit of this square
    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }
}

/// Renders a square in file-rank notation
/// ```
/// use gambit::square::Square;
/// assert_eq!(Square::new(4, 4).to_string(), "e4");
/// assert_eq!(Square::new(7, 0).to_string(), "a1");
/// ```
impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
