use std::fmt::Display;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::Board;
use crate::evaluation::{Evaluation, Score};
use crate::move_generator::generate;
use crate::movelist::MoveList;
use crate::piece::Color;
use crate::r#move::Move;
use crate::rules;

/// How many opponent replies the minimax tier looks at. Anything above 1 still
/// only looks one reply deep.
pub const MINIMAX_DEPTH: u8 = 1;

/// Strength of the automated opponent
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BotTier {
    /// Uniformly random legal move
    Random,
    /// Checks first, then captures, then anything
    Heuristic,
    /// Material minimax with a single reply of lookahead
    Minimax,
}
impl BotTier {
    pub const ALL: [BotTier; 3] = [BotTier::Random, BotTier::Heuristic, BotTier::Minimax];

    pub fn name(&self) -> &'static str {
        match self {
            BotTier::Random => "easy",
            BotTier::Heuristic => "medium",
            BotTier::Minimax => "hard",
        }
    }
}
impl Display for BotTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl FromStr for BotTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BotTier::ALL
            .into_iter()
            .find(|tier| tier.name() == s)
            .ok_or_else(|| format!("unknown difficulty {}", s))
    }
}

/// Outcome of a bot search
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub tier: BotTier,
    pub best_move: Move,
    /// Material score of the chosen move, only the minimax tier computes one
    pub score: Option<Score>,
    pub nodes_searched: u64,
    pub time: Duration,
}
impl Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tier {} time {} nodes {} pv {}",
            self.tier,
            self.time.as_millis(),
            self.nodes_searched,
            self.best_move
        )?;
        if let Some(score) = self.score {
            write!(f, " score {}", score)?;
        }
        Ok(())
    }
}

/// Picks a move for the side to move. Every hypothetical move made along the way
/// is unmade before returning.
///
/// The side to move must have at least one legal move: checkmate and stalemate
/// are to be declared before asking the bot to play.
pub fn choose_move<R: Rng + ?Sized>(board: &mut Board, tier: BotTier, rng: &mut R) -> SearchReport {
    let start = Instant::now();
    let moves = generate(board);
    assert!(
        !moves.is_empty(),
        "the bot was asked to play but {} has no legal move",
        board.side_to_move()
    );

    let mut nodes_searched = moves.len() as u64;
    let (best_move, score) = match tier {
        BotTier::Random => (pick(&moves, rng), None),
        BotTier::Heuristic => (heuristic_move(board, &moves, rng), None),
        BotTier::Minimax => {
            let (m, s) = minimax_move(board, &moves, MINIMAX_DEPTH, &mut nodes_searched);
            (m, Some(s))
        }
    };

    SearchReport {
        tier,
        best_move,
        score,
        nodes_searched,
        time: start.elapsed(),
    }
}

/// Suggests a move to the side to move with the heuristic tier's policy.
/// The board is left as it was found.
pub fn hint<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Move> {
    let moves = generate(board);
    if moves.is_empty() {
        return None;
    }
    Some(heuristic_move(board, &moves, rng))
}

fn pick<R: Rng + ?Sized>(moves: &MoveList, rng: &mut R) -> Move {
    moves
        .choose(rng)
        .unwrap_or_else(|| panic!("cannot pick a move out of an empty list"))
}

/// Whether the move puts the opponent of the mover in check
pub fn gives_check(board: &mut Board, m: Move) -> bool {
    let opponent = board.side_to_move().opposite();
    board.make(m);
    let check = rules::is_in_check(board, opponent);
    board.unmake();
    check
}

fn heuristic_move<R: Rng + ?Sized>(board: &mut Board, moves: &MoveList, rng: &mut R) -> Move {
    let checking = moves.filtered(|m| gives_check(board, *m));
    if !checking.is_empty() {
        let checking_captures = checking.filtered(|m| m.is_capture());
        return if checking_captures.is_empty() {
            pick(&checking, rng)
        } else {
            pick(&checking_captures, rng)
        };
    }

    let captures = moves.filtered(|m| m.is_capture());
    if captures.is_empty() {
        pick(moves, rng)
    } else {
        pick(&captures, rng)
    }
}

/// Scores every candidate and keeps the best one, the first generated winning ties.
/// The evaluation is the searcher's material balance. A candidate is worth the
/// negation of that balance after the opponent's minimising reply, or the negation
/// of the balance right after the candidate when no reply is looked at or none exists.
pub fn minimax_move(board: &mut Board, moves: &MoveList, depth: u8, nodes_searched: &mut u64) -> (Move, Score) {
    let searcher = board.side_to_move();
    let mut best: Option<(Move, Score)> = None;
    for m in moves {
        board.make(*m);
        let static_value = Evaluation::material(board, searcher);
        let value = if depth == 0 {
            static_value
        } else {
            minimising_reply_value(board, searcher, nodes_searched).unwrap_or(static_value)
        };
        board.unmake();

        let score = -value;
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*m, score));
        }
    }
    best.unwrap_or_else(|| panic!("cannot search an empty move list"))
}

/// The lowest material balance for `searcher` the side to move can reach in one reply.
/// None if it has no reply.
fn minimising_reply_value(board: &mut Board, searcher: Color, nodes_searched: &mut u64) -> Option<Score> {
    let replies = generate(board);
    *nodes_searched += replies.len() as u64;

    let mut lowest = None;
    for reply in &replies {
        board.make(*reply);
        let value = Evaluation::material(board, searcher);
        board.unmake();
        lowest = Some(lowest.map_or(value, |l: Score| l.min(value)));
    }
    lowest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn random_tier_samples_every_move() {
        let mut board = Board::new();
        let legal: HashSet<Move> = generate(&mut board).iter().copied().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let report = choose_move(&mut board, BotTier::Random, &mut rng);
            assert!(legal.contains(&report.best_move));
            seen.insert(report.best_move);
        }
        assert_eq!(seen, legal);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn heuristic_tier_prefers_checking_captures() {
        let mut board = Board::from_fen("3qk3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let m = choose_move(&mut board, BotTier::Heuristic, &mut rng).best_move;
            assert_eq!((m.origin, m.target), (sq("d1"), sq("d8")));
        }
    }

    #[test]
    fn heuristic_tier_prefers_checks_over_captures() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/p7/R3K2R w - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let m = choose_move(&mut board, BotTier::Heuristic, &mut rng).best_move;
            assert_eq!((m.origin, m.target), (sq("h1"), sq("h8")));
        }
    }

    #[test]
    fn heuristic_tier_falls_back_to_captures() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/p7/R3K3 w - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            let m = choose_move(&mut board, BotTier::Heuristic, &mut rng).best_move;
            assert_eq!((m.origin, m.target), (sq("a1"), sq("a2")));
        }
    }

    #[test]
    fn minimax_negates_the_minimising_reply() {
        // Every rook move along the a file lets the queen take it: -(5 - 5 - 9) = 9
        let fen = "q3k3/8/8/8/8/8/8/R3K3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let report = choose_move(&mut board, BotTier::Minimax, &mut StdRng::seed_from_u64(5));
        assert_eq!((report.best_move.origin, report.best_move.target), (sq("a1"), sq("a2")));
        assert_eq!(report.score, Some(9));
        assert!(report.nodes_searched > 0);
        assert_eq!(board, Board::from_fen(fen).unwrap());

        // Taking the queen leaves no recapture, so it scores -5
        let capture = generate(&mut board).filtered(|m| m.target == sq("a8"));
        assert_eq!(capture.len(), 1);
        let mut nodes = 0;
        assert_eq!(minimax_move(&mut board, &capture, MINIMAX_DEPTH, &mut nodes).1, -5);
    }

    #[test]
    fn minimax_with_recapture() {
        let fen = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let report = choose_move(&mut board, BotTier::Minimax, &mut StdRng::seed_from_u64(6));
        // Qxd5 exd5 leaves white a pawn down, the only reply bringing it below +7
        assert_eq!((report.best_move.origin, report.best_move.target), (sq("d1"), sq("d5")));
        assert_eq!(report.score, Some(1));
        assert_eq!(board, Board::from_fen(fen).unwrap());
    }

    #[test]
    fn minimax_depth_zero_negates_own_evaluation() {
        let mut board = Board::from_fen("q3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let moves = generate(&mut board);
        let mut nodes = 0;
        let (m, score) = minimax_move(&mut board, &moves, 0, &mut nodes);
        // Anything but taking the queen keeps white at -4
        assert_eq!((m.origin, m.target), (sq("a1"), sq("a2")));
        assert_eq!(score, 4);
        assert_eq!(nodes, 0);
    }

    #[test]
    fn minimax_ties_go_to_the_first_move() {
        let mut board = Board::new();
        let moves = generate(&mut board);
        let mut nodes = 0;
        let (m, score) = minimax_move(&mut board, &moves, 0, &mut nodes);
        assert_eq!(m, *moves.get(0).unwrap());
        assert_eq!(score, 0);
    }

    #[test]
    fn hint_is_advisory() {
        let fen = "3qk3/8/8/8/8/8/8/3RK3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let m = hint(&mut board, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!((m.origin, m.target), (sq("d1"), sq("d8")));
        assert_eq!(board, Board::from_fen(fen).unwrap());

        let mut mated = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(hint(&mut mated, &mut StdRng::seed_from_u64(8)), None);
    }

    #[test]
    fn tiers_by_name() {
        assert_eq!("hard".parse::<BotTier>(), Ok(BotTier::Minimax));
        assert_eq!(BotTier::Random.to_string(), "easy");
        assert!("impossible".parse::<BotTier>().is_err());
    }
}
