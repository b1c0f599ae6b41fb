use crate::{
    board::Board,
    castling::CastlingSide,
    movelist::MoveList,
    piece::{Color, Piece, PieceType},
    r#move::{Move, MoveKind},
    rules,
    square::Square,
};

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum GenType {
    /// Every move the piece could make by its movement rules
    Moves,
    /// Only the squares the piece attacks: pawn diagonals whatever stands there,
    /// no pawn pushes and no castling
    Attacks,
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Generates the pseudo-legal moves of the piece standing on `origin`, whoever's turn it is.
/// These may leave the mover's own king in check.
pub fn pseudo_moves(board: &Board, origin: Square) -> MoveList {
    let mut move_list = MoveList::default();
    if let Some(piece) = board.piece_at(origin) {
        piece_moves(board, origin, piece, GenType::Moves, &mut move_list);
    }
    move_list
}

/// Generates the legal moves of the piece standing on `origin`.
/// Empty if the square is empty or holds a piece of the side not to move.
///
/// Each candidate is made on the board, checked for king safety, then unmade,
/// so the board is left exactly as it was found.
pub fn legal_moves(board: &mut Board, origin: Square) -> MoveList {
    match board.piece_at(origin) {
        Some(piece) if piece.color == board.side_to_move() => legal_piece_moves(board, origin, piece),
        _ => MoveList::default(),
    }
}

/// Every legal move of the side to move, in square order (a8 to h1)
pub fn generate(board: &mut Board) -> MoveList {
    legal_moves_for(board, board.side_to_move())
}

/// Every legal move of the pieces of `color`, in square order (a8 to h1)
pub fn legal_moves_for(board: &mut Board, color: Color) -> MoveList {
    let mut move_list = MoveList::default();
    for origin in Square::all() {
        match board.piece_at(origin) {
            Some(piece) if piece.color == color => {
                move_list.extend(&legal_piece_moves(board, origin, piece))
            }
            _ => (),
        }
    }
    move_list
}

pub(crate) fn legal_piece_moves(board: &mut Board, origin: Square, piece: Piece) -> MoveList {
    let mut move_list = MoveList::default();
    piece_moves(board, origin, piece, GenType::Moves, &mut move_list);
    move_list.retain(|m| {
        board.make(*m);
        let king_safe = !rules::is_in_check(board, piece.color);
        board.unmake();
        king_safe
    });
    move_list
}

/// Checks whether any piece of `by` attacks the given square.
/// Pawns attack both forward diagonals, occupied or not; pawn pushes and castling
/// never attack anything.
pub fn attacks_square(board: &Board, target: Square, by: Color) -> bool {
    let mut attacks = MoveList::default();
    board.pieces(by).any(|(origin, piece)| {
        piece_moves(board, origin, piece, GenType::Attacks, &mut attacks);
        let hit = attacks.iter().any(|m| m.target == target);
        attacks = MoveList::default();
        hit
    })
}

fn piece_moves(board: &Board, origin: Square, piece: Piece, gen_type: GenType, move_list: &mut MoveList) {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, origin, piece, gen_type, move_list),
        PieceType::Knight => step_moves(board, origin, piece, &KNIGHT_OFFSETS, move_list),
        PieceType::Bishop | PieceType::Rook | PieceType::Queen => {
            if piece.piece_type.is_rook_like() {
                slider_moves(board, origin, piece, &ROOK_DIRECTIONS, move_list)
            }
            if piece.piece_type.is_bishop_like() {
                slider_moves(board, origin, piece, &BISHOP_DIRECTIONS, move_list)
            }
        }
        PieceType::King => {
            step_moves(board, origin, piece, &KING_OFFSETS, move_list);
            if gen_type == GenType::Moves {
                castling(board, origin, piece, move_list)
            }
        }
    }
}

fn pawn_moves(board: &Board, origin: Square, piece: Piece, gen_type: GenType, move_list: &mut MoveList) {
    let forward = piece.color.forward();
    let promotes = |sq: Square| sq.row == piece.color.promotion_rank();

    if gen_type == GenType::Attacks {
        for dc in [-1, 1] {
            if let Some(target) = origin.offset(forward, dc) {
                move_list.push(Move::new_capture(origin, target))
            }
        }
        return;
    }

    if let Some(one_step) = origin.offset(forward, 0) {
        if board.piece_at(one_step).is_none() {
            let kind = if promotes(one_step) { MoveKind::Promotion } else { MoveKind::Quiet };
            move_list.push(Move::new(origin, one_step, kind));

            if origin.row == piece.color.pawn_rank() {
                if let Some(two_steps) = one_step.offset(forward, 0) {
                    if board.piece_at(two_steps).is_none() {
                        move_list.push(Move::new(origin, two_steps, MoveKind::DoublePush))
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        let target = match origin.offset(forward, dc) {
            Some(sq) => sq,
            None => continue,
        };
        match board.piece_at(target) {
            Some(other) if other.color != piece.color => {
                let kind = if promotes(target) { MoveKind::PromotionCapture } else { MoveKind::Capture };
                move_list.push(Move::new(origin, target, kind))
            }
            None if board.en_passant_target() == Some(target) && en_passant_possible(board, origin, piece, target) => {
                move_list.push(Move::new(origin, target, MoveKind::EnPassant))
            }
            _ => (),
        }
    }
}

// The skipped-over pawn has to sit beside the capturing one, and only the side to move
// may take it
fn en_passant_possible(board: &Board, origin: Square, piece: Piece, target: Square) -> bool {
    piece.color == board.side_to_move()
        && matches!(
            board.piece_at(Square::new(origin.row, target.col)),
            Some(p) if p.is(PieceType::Pawn, piece.color.opposite())
        )
}

/// Knight and king steps
fn step_moves(board: &Board, origin: Square, piece: Piece, offsets: &[(i8, i8)], move_list: &mut MoveList) {
    for (dr, dc) in offsets {
        if let Some(target) = origin.offset(*dr, *dc) {
            match board.piece_at(target) {
                None => move_list.push(Move::new_quiet(origin, target)),
                Some(other) if other.color != piece.color => move_list.push(Move::new_capture(origin, target)),
                _ => (),
            }
        }
    }
}

/// Casts a ray in every direction, stopping on the first occupied square
fn slider_moves(board: &Board, origin: Square, piece: Piece, directions: &[(i8, i8)], move_list: &mut MoveList) {
    for (dr, dc) in directions {
        let mut current = origin;
        while let Some(target) = current.offset(*dr, *dc) {
            match board.piece_at(target) {
                None => move_list.push(Move::new_quiet(origin, target)),
                Some(other) => {
                    if other.color != piece.color {
                        move_list.push(Move::new_capture(origin, target))
                    }
                    break;
                }
            }
            current = target;
        }
    }
}

fn castling(board: &Board, origin: Square, king: Piece, move_list: &mut MoveList) {
    let color = king.color;
    let back_rank = color.back_rank();
    if king.has_moved || origin != Square::new(back_rank, 4) {
        return;
    }

    let mut in_check = None;
    for side in CastlingSide::BOTH {
        if !board.castling_rights().has(color, side) {
            continue;
        }
        let path_clear = side
            .between()
            .iter()
            .all(|col| board.piece_at(Square::new(back_rank, *col)).is_none());
        let rook_ready = matches!(
            board.piece_at(Square::new(back_rank, side.rook_home())),
            Some(rook) if rook.is(PieceType::Rook, color) && !rook.has_moved
        );
        if !path_clear || !rook_ready {
            continue;
        }
        if *in_check.get_or_insert_with(|| rules::is_in_check(board, color)) {
            return;
        }
        let path_attacked = side
            .king_path()
            .iter()
            .any(|col| attacks_square(board, Square::new(back_rank, *col), color.opposite()));
        if !path_attacked {
            move_list.push(Move::new(
                origin,
                Square::new(back_rank, side.king_target()),
                MoveKind::Castle(side),
            ))
        }
    }
}

/// Counts the leaf nodes of the legal move tree down to `depth`
pub fn perft(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in &moves {
        board.make(*m);
        nodes += perft(board, depth - 1);
        board.unmake();
    }
    nodes
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color::{Black, White};

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn targets(moves: &MoveList) -> Vec<String> {
        let mut v: Vec<String> = moves.iter().map(|m| m.target.to_string()).collect();
        v.sort();
        v
    }

    fn play(board: &mut Board, mv: &str) {
        let (origin, target) = Move::parse(mv).unwrap();
        let m = legal_moves(board, origin).find(origin, target).unwrap();
        board.make(m);
    }

    #[test]
    fn opening_move_counts() {
        let mut board = Board::new();
        assert_eq!(generate(&mut board).len(), 20);
        assert_eq!(targets(&legal_moves(&mut board, sq("g1"))), ["f3", "h3"]);
        assert_eq!(targets(&legal_moves(&mut board, sq("e2"))), ["e3", "e4"]);
        // Not black's turn
        assert!(legal_moves(&mut board, sq("e7")).is_empty());
        assert!(legal_moves(&mut board, sq("e4")).is_empty());

        play(&mut board, "e2e4");
        assert_eq!(generate(&mut board).len(), 20);
        assert_eq!(legal_moves_for(&mut board, White).len(), 30);
    }

    #[test]
    fn legal_moves_leave_board_untouched() {
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        let before = board.clone();
        generate(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // The e2 knight shields its king from the e8 rook
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&mut board, sq("e2")).is_empty());
        assert_eq!(pseudo_moves(&board, sq("e2")).len(), 6);
    }

    #[test]
    fn no_move_leaves_own_king_attacked() {
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        for m in &generate(&mut board) {
            board.make(*m);
            assert!(!rules::is_in_check(&board, White), "{} exposes the king", m);
            for reply in &generate(&mut board) {
                board.make(*reply);
                assert!(!rules::is_in_check(&board, Black), "{} {} exposes the king", m, reply);
                board.unmake();
            }
            board.unmake();
        }
    }

    #[test]
    fn en_passant_capture() {
        let mut board = Board::new();
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut board, mv);
        }
        let moves = legal_moves(&mut board, sq("e5"));
        let ep = moves.find(sq("e5"), sq("d6")).unwrap();
        assert_eq!(ep.kind, MoveKind::EnPassant);
        assert!(ep.is_capture());

        board.make(ep);
        assert_eq!(board.piece_at(sq("d5")), None);
        assert!(board.piece_at(sq("d6")).unwrap().is(PieceType::Pawn, White));
        assert_eq!(board.last_record().unwrap().captured_piece.unwrap().color, Black);

        board.unmake();
        assert!(board.piece_at(sq("d5")).unwrap().is(PieceType::Pawn, Black));
        assert_eq!(board.piece_at(sq("d6")), None);
        assert_eq!(board.en_passant_target(), Some(sq("d6")));
    }

    #[test]
    fn en_passant_expires_after_one_move() {
        let mut board = Board::new();
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            play(&mut board, mv);
        }
        assert!(legal_moves(&mut board, sq("e5")).find(sq("e5"), sq("d6")).is_none());
    }

    #[test]
    fn castling_both_sides() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_moves(&mut board, sq("e1"));
        let short = moves.find(sq("e1"), sq("g1")).unwrap();
        assert_eq!(short.castling_side(), Some(CastlingSide::KingSide));
        let long = moves.find(sq("e1"), sq("c1")).unwrap();
        assert_eq!(long.castling_side(), Some(CastlingSide::QueenSide));
    }

    #[test]
    fn castling_through_attacked_square_is_excluded() {
        // The f8 rook covers f1
        let mut board = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        let moves = legal_moves(&mut board, sq("e1"));
        assert!(moves.find(sq("e1"), sq("g1")).is_none());
        assert!(moves.find(sq("e1"), sq("c1")).is_some());

        // b1 may be attacked on the queen side, the king never crosses it
        let mut board = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(legal_moves(&mut board, sq("e1")).find(sq("e1"), sq("c1")).is_some());
    }

    #[test]
    fn no_castling_out_of_check_or_when_blocked() {
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves(&mut board, sq("e1"));
        assert!(moves.iter().all(|m| m.castling_side().is_none()));

        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        let moves = legal_moves(&mut board, sq("e1"));
        assert!(moves.iter().all(|m| m.castling_side().is_none()));
    }

    #[test]
    fn castling_needs_the_unmoved_rook() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        for mv in ["h1h2", "e8d8", "h2h1", "d8e8"] {
            play(&mut board, mv);
        }
        let moves = legal_moves(&mut board, sq("e1"));
        assert!(moves.find(sq("e1"), sq("g1")).is_none());
        assert!(moves.find(sq("e1"), sq("c1")).is_some());
    }

    #[test]
    fn captured_home_rook_keeps_its_right_but_cannot_castle() {
        let mut board = Board::from_fen("4k3/8/8/8/8/6n1/8/R3K2R b KQ - 0 1").unwrap();
        play(&mut board, "g3h1");
        assert!(board.castling_rights().has(White, CastlingSide::KingSide));
        assert!(board.castling_rights().has(White, CastlingSide::QueenSide));

        let moves = legal_moves(&mut board, sq("e1"));
        assert!(moves.find(sq("e1"), sq("g1")).is_none());
        assert!(moves.find(sq("e1"), sq("c1")).is_some());
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let board = Board::from_fen("4k3/8/8/8/8/3p4/8/4K3 w - - 0 1").unwrap();
        assert!(attacks_square(&board, sq("e2"), Black));
        assert!(attacks_square(&board, sq("c2"), Black));
        assert!(!attacks_square(&board, sq("d2"), Black));
        assert!(attacks_square(&board, sq("d2"), White));

        // An empty square on a pawn diagonal still stops castling across it
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4p3/4K2R w K - 0 1").unwrap();
        assert!(attacks_square(&board, sq("f1"), Black));
        assert!(legal_moves(&mut board, sq("e1")).find(sq("e1"), sq("g1")).is_none());
    }

    #[test]
    fn promotion_moves_are_tagged() {
        let mut board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&mut board, sq("a7"));
        assert_eq!(moves.len(), 2);
        assert_eq!(moves.find(sq("a7"), sq("a8")).unwrap().kind, MoveKind::Promotion);
        assert_eq!(moves.find(sq("a7"), sq("b8")).unwrap().kind, MoveKind::PromotionCapture);
    }
}
