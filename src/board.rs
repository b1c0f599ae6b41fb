use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::castling::{CastlingRights, CastlingSide};
use crate::history::MoveRecord;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use crate::piece::{Color, Piece, PieceType};
use crate::r#move::{Move, MoveKind};
use crate::rules;
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),
    #[error("bad piece placement: {0}")]
    BadPlacement(String),
    #[error("bad side to move: {0}")]
    BadSide(String),
    #[error("bad en passant square: {0}")]
    BadEnPassant(String),
    #[error("expected exactly one {0} king")]
    KingCount(Color),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    side_to_move: Color,
    castling_rights: CastlingRights,
    ep_target: Option<Square>,
    check_flags: [bool; 2],
    fullmove: u32,

    history_entries: Vec<MoveRecord>,
}

impl Default for Board {
    fn default() -> Self {
        let mut b = Board::empty();
        b.place_start_position();
        b
    }
}

impl Board {
    fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
            side_to_move: White,
            castling_rights: CastlingRights::new(),
            ep_target: None,
            check_flags: [false; 2],
            fullmove: 1,

            history_entries: Vec::with_capacity(128),
        }
    }

    /// A board holding the standard starting position
    pub fn new() -> Board {
        Board::default()
    }

    /// Puts the pieces back to the starting position and clears every other state
    pub fn reset(&mut self) {
        *self = Board::default();
    }

    fn place_start_position(&mut self) {
        const BACK_RANK: [PieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for color in Color::BOTH {
            for (col, piece_type) in BACK_RANK.iter().enumerate() {
                self.add_piece(Piece::new(*piece_type, color), Square::new(color.back_rank(), col as u8));
                self.add_piece(Piece::new(Pawn, color), Square::new(color.pawn_rank(), col as u8));
            }
        }
    }

    /// Makes a move on the board, pushing the record needed to take it back.
    /// The move is expected to come from the legal move generator, anything else
    /// will break the position.
    pub fn make(&mut self, mv: Move) {
        let origin = mv.origin;
        let target = mv.target;
        let moved_piece = self
            .remove_piece(origin)
            .unwrap_or_else(|| panic!("no piece to move on {}", origin));

        let mut history_entry = MoveRecord {
            move_played: mv,
            moved_piece,
            captured_piece: None,
            ep_target: self.ep_target,
            castling_rights: self.castling_rights,
            gives_check: false,
        };
        history_entry.captured_piece = self.remove_piece(history_entry.capture_square());

        if let MoveKind::Castle(side) = mv.kind {
            let mut moved_rook = self
                .remove_piece(Square::new(origin.row, side.rook_home()))
                .unwrap_or_else(|| panic!("no rook to castle with on {} side", origin));
            moved_rook.has_moved = true;
            self.add_piece(moved_rook, Square::new(origin.row, side.rook_target()));
        }

        let mut placed = moved_piece;
        placed.has_moved = true;
        if mv.is_promotion() {
            placed.piece_type = Queen;
        }
        self.add_piece(placed, target);

        self.ep_target = match mv.kind {
            MoveKind::DoublePush => Some(Square::new((origin.row + target.row) / 2, origin.col)),
            _ => None,
        };

        let color = moved_piece.color;
        match moved_piece.piece_type {
            King => self.castling_rights.uncastle(color),
            Rook => {
                if let Some(side) = CastlingSide::from_rook_home(origin.col) {
                    self.castling_rights.uncastle_side(color, side)
                }
            }
            _ => (),
        }

        if color == Black {
            self.fullmove += 1;
        }
        self.side_to_move = self.side_to_move.opposite();
        self.history_entries.push(history_entry);
    }

    /// Unmakes the move on the top of the history stack, returning its record
    pub fn unmake(&mut self) -> Option<MoveRecord> {
        let history_entry = self.history_entries.pop()?;
        let move_played = history_entry.move_played;

        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Black {
            self.fullmove -= 1;
        }
        self.ep_target = history_entry.ep_target;
        self.castling_rights = history_entry.castling_rights;

        self.remove_piece(move_played.target);
        self.add_piece(history_entry.moved_piece, move_played.origin);
        if let Some(captured) = history_entry.captured_piece {
            self.add_piece(captured, history_entry.capture_square());
        }

        if let MoveKind::Castle(side) = move_played.kind {
            let row = move_played.origin.row;
            if let Some(mut moved_rook) = self.remove_piece(Square::new(row, side.rook_target())) {
                moved_rook.has_moved = false;
                self.add_piece(moved_rook, Square::new(row, side.rook_home()));
            }
        }

        Some(history_entry)
    }

    /// Places a new piece on a given square
    pub(crate) fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.squares[sq.row as usize][sq.col as usize] = Some(piece);
    }

    /// Clears the given square, returning the piece that has been removed if any
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize].take()
    }

    /*
    INTERESTING GETTERS
     */
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Cached "is this color's king attacked", as of the last applied move
    pub fn check_flag(&self, color: Color) -> bool {
        self.check_flags[color as usize]
    }

    pub(crate) fn set_check_flag(&mut self, color: Color, value: bool) {
        self.check_flags[color as usize] = value
    }

    /// Recomputes both check flags from the position
    pub(crate) fn refresh_check_flags(&mut self) {
        for color in Color::BOTH {
            let in_check = rules::is_in_check(self, color);
            self.set_check_flag(color, in_check)
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history_entries
    }

    pub fn last_record(&self) -> Option<&MoveRecord> {
        self.history_entries.last()
    }

    pub(crate) fn last_record_mut(&mut self) -> Option<&mut MoveRecord> {
        self.history_entries.last_mut()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|sq| matches!(self.piece_at(*sq), Some(p) if p.is(King, color)))
    }

    /// Every piece of the given color along with its square
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /*
    FEN STRING OPERATIONS
     */
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut sections = fen.split_whitespace();
        let piece_placement = sections.next().ok_or(FenError::MissingField("piece placement"))?;
        let side = sections.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = sections.next().unwrap_or("-");
        let ep_target = sections.next().unwrap_or("-");
        let _halfmove = sections.next();
        let fullmove = sections.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);

        let mut b = Board::empty();
        b.side_to_move = Color::parse(side).ok_or_else(|| FenError::BadSide(side.to_owned()))?;
        b.castling_rights = CastlingRights::from_str(castling);
        b.fullmove = fullmove.max(1);
        b.ep_target = match ep_target {
            "-" => None,
            s => Some(Square::parse(s).ok_or_else(|| FenError::BadEnPassant(s.to_owned()))?),
        };

        let rows: Vec<&str> = piece_placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::BadPlacement(piece_placement.to_owned()));
        }
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0u8;
            for c in row_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as u8;
                } else {
                    let piece = Piece::from_char(c)
                        .filter(|_| col < 8)
                        .ok_or_else(|| FenError::BadPlacement(piece_placement.to_owned()))?;
                    b.add_piece(piece, Square::new(row as u8, col));
                    col += 1;
                }
            }
            if col != 8 {
                return Err(FenError::BadPlacement(piece_placement.to_owned()));
            }
        }

        for color in Color::BOTH {
            if b.pieces(color).filter(|(_, p)| p.piece_type == King).count() != 1 {
                return Err(FenError::KingCount(color));
            }
        }
        b.infer_moved_pieces();
        b.refresh_check_flags();
        Ok(b)
    }

    // Kings and rooks are unmoved only if a castling right still involves them
    fn infer_moved_pieces(&mut self) {
        for sq in Square::all() {
            let Some(mut piece) = self.piece_at(sq) else { continue };
            let color = piece.color;
            let on_back_rank = sq.row == color.back_rank();
            piece.has_moved = match piece.piece_type {
                King => {
                    let (king_side, queen_side) = self.castling_rights.get(color);
                    !(on_back_rank && sq.col == 4 && (king_side || queen_side))
                }
                Rook => !CastlingSide::from_rook_home(sq.col)
                    .map_or(false, |side| on_back_rank && self.castling_rights.has(color, side)),
                Pawn => sq.row != color.pawn_rank(),
                _ => false,
            };
            self.add_piece(piece, sq);
        }
    }

    pub fn fen(&self) -> String {
        let mut fen = String::new();

        for row in 0..8u8 {
            let mut empty_counter = 0;
            for col in 0..8u8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(p) => {
                        if empty_counter != 0 {
                            fen.push_str(&empty_counter.to_string())
                        }
                        empty_counter = 0;
                        fen.push_str(&p.to_string())
                    }
                    None => empty_counter += 1,
                }
            }
            if empty_counter != 0 {
                fen.push_str(&empty_counter.to_string())
            }
            if row != 7 {
                fen.push('/');
            }
        }

        fen.push_str(if self.side_to_move == White { " w " } else { " b " });
        fen.push_str(&self.castling_rights.to_string());
        match self.ep_target {
            Some(sq) => fen.push_str(&format!(" {} ", sq)),
            None => fen.push_str(" - "),
        }
        fen.push_str("0 ");
        fen.push_str(&self.fullmove.to_string());
        fen
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ranks: Vec<String> = vec![];
        for row in 0..8u8 {
            let mut line = format!("{} ", 8 - row);
            for col in 0..8u8 {
                match self.piece_at(Square::new(row, col)) {
                    None => line.push_str(". "),
                    Some(p) => line.push_str(&(p.to_string() + " ")),
                }
            }
            ranks.push(line);
        }

        let mut ranks_iter = ranks.iter();
        let mut next_rank = || ranks_iter.next().map(String::as_str).unwrap_or_default();
        writeln!(f, "{}", next_rank())?;
        writeln!(f, "{}  side to move: {}", next_rank(), self.side_to_move)?;
        writeln!(f, "{}  castling rights: {}", next_rank(), self.castling_rights)?;
        writeln!(
            f,
            "{}  en passant: {}",
            next_rank(),
            self.ep_target.map_or_else(|| String::from("-"), |sq| sq.to_string())
        )?;
        writeln!(
            f,
            "{}  check: white {}, black {}",
            next_rank(),
            self.check_flag(White),
            self.check_flag(Black)
        )?;
        writeln!(f, "{}  ply: {}", next_rank(), self.history_entries.len())?;
        writeln!(f, "{}  fen: {}", next_rank(), self.fen())?;
        writeln!(f, "{}", next_rank())?;
        write!(f, "  a b c d e f g h")
    }
}
