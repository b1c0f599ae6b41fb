use std::fmt::{Display, Formatter};

use rand::Rng;

use crate::board::Board;
use crate::history::MoveRecord;
use crate::movelist::MoveList;
use crate::move_generator::{generate, legal_moves};
use crate::piece::Color;
use crate::r#move::Move;
use crate::rules;
use crate::search::{self, BotTier, SearchReport};
use crate::square::Square;

/// Why a game ended
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TerminalReason {
    Checkmate { winner: Color },
    Stalemate,
    Timeout { winner: Color },
}
impl TerminalReason {
    pub fn winner(&self) -> Option<Color> {
        match self {
            TerminalReason::Checkmate { winner } | TerminalReason::Timeout { winner } => Some(*winner),
            TerminalReason::Stalemate => None,
        }
    }
}
impl Display for TerminalReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalReason::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            TerminalReason::Stalemate => write!(f, "stalemate, game drawn"),
            TerminalReason::Timeout { winner } => write!(f, "time out, {} wins", winner),
        }
    }
}

/// A single game: the board, its history, and whether it is over.
///
/// Every method taking a move or undoing one expects the caller to have checked it
/// first (the move is in `legal_moves`, the history is not empty, the game is not over).
/// Breaking that is a bug in the caller and panics.
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    outcome: Option<TerminalReason>,
}

impl Game {
    pub fn new() -> Game {
        Game::default()
    }

    /// Starts from an arbitrary position
    pub fn from_board(board: Board) -> Game {
        Game { board, outcome: None }
    }

    /// Back to the standard starting position
    pub fn reset(&mut self) {
        self.board.reset();
        self.outcome = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn history(&self) -> &[MoveRecord] {
        self.board.history()
    }

    /// Legal destinations of the piece on `origin`, castling moves tagged as such
    pub fn legal_moves(&mut self, origin: Square) -> MoveList {
        legal_moves(&mut self.board, origin)
    }

    /// Every legal move of the side to move
    pub fn all_legal_moves(&mut self) -> MoveList {
        generate(&mut self.board)
    }

    /// Plays a legal move, refreshes the check flags, records it, and ends the game
    /// if the opponent is left checkmated or stalemated.
    pub fn apply_move(&mut self, origin: Square, target: Square) -> MoveRecord {
        assert!(
            self.outcome.is_none(),
            "cannot play {}{}, the game is over",
            origin,
            target
        );
        let mv = self
            .legal_moves(origin)
            .find(origin, target)
            .unwrap_or_else(|| panic!("{}{} is not a legal move", origin, target));
        self.apply(mv)
    }

    fn apply(&mut self, mv: Move) -> MoveRecord {
        let mover = self.board.side_to_move();
        let opponent = mover.opposite();
        self.board.make(mv);

        let check = rules::is_in_check(&self.board, opponent);
        self.board.set_check_flag(mover, false);
        self.board.set_check_flag(opponent, check);
        if let Some(record) = self.board.last_record_mut() {
            record.gives_check = check;
        }

        if !rules::has_legal_move(&mut self.board, opponent) {
            self.outcome = Some(if check {
                TerminalReason::Checkmate { winner: mover }
            } else {
                TerminalReason::Stalemate
            });
        }

        *self
            .board
            .last_record()
            .unwrap_or_else(|| panic!("{} was not recorded", mv))
    }

    /// Takes back the last move and reopens the game if it had ended
    pub fn undo_last(&mut self) -> MoveRecord {
        let record = self
            .board
            .unmake()
            .unwrap_or_else(|| panic!("there is no move to undo"));

        match self.board.last_record().copied() {
            Some(previous) => {
                let checked = previous.moved_piece.color.opposite();
                self.board.set_check_flag(checked, previous.gives_check);
                self.board.set_check_flag(checked.opposite(), false);
            }
            None => self.board.refresh_check_flags(),
        }
        self.outcome = None;
        record
    }

    /// Takes back the last move and, if that leaves the opponent of `human` to move,
    /// the one before it too, so the human is always the one to play afterwards
    /// (unless the history ran out first). Returns how many moves were taken back.
    pub fn undo_ply_pair(&mut self, human: Color) -> usize {
        self.undo_last();
        if self.side_to_move() != human && !self.history().is_empty() {
            self.undo_last();
            return 2;
        }
        1
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        self.outcome
    }

    /// Ends the game on time, `color` being the side whose clock ran out.
    /// Has no effect on a game that is already over.
    pub fn notify_timeout(&mut self, color: Color) {
        if self.outcome.is_none() {
            self.outcome = Some(TerminalReason::Timeout {
                winner: color.opposite(),
            });
        }
    }

    pub fn is_checkmate(&mut self, color: Color) -> bool {
        rules::is_checkmate(&mut self.board, color)
    }

    pub fn is_stalemate(&mut self, color: Color) -> bool {
        rules::is_stalemate(&mut self.board, color)
    }

    /// Picks the automated opponent's move, without playing it
    pub fn choose_bot_move<R: Rng + ?Sized>(&mut self, tier: BotTier, rng: &mut R) -> SearchReport {
        assert!(self.outcome.is_none(), "the bot cannot play, the game is over");
        search::choose_move(&mut self.board, tier, rng)
    }

    /// Picks and plays the automated opponent's move
    pub fn play_bot_move<R: Rng + ?Sized>(&mut self, tier: BotTier, rng: &mut R) -> (MoveRecord, SearchReport) {
        let report = self.choose_bot_move(tier, rng);
        let record = self.apply(report.best_move);
        (record, report)
    }

    /// A suggested move for the side to move, never played
    pub fn hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Move> {
        if self.outcome.is_some() {
            return None;
        }
        search::hint(&mut self.board, rng)
    }
}

/// Move list notation of a single record
pub fn format_move(record: &MoveRecord) -> String {
    record.to_string()
}
