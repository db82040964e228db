use crate::board::{Color, Piece, PieceKind, Position, Square};
use crate::moves::{Move, Promotion};

// Fixed move-pattern data. Knight and ray tables run anticlockwise starting
// from (2,1) and (1,0) respectively; the last two king offsets are the
// castling king displacements.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i8, i8); 10] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (2, 0),
    (-2, 0),
];

const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Highest valid pattern id (pawn capture-right promoting to knight).
const PATTERN_ID_MAX: u16 = 29;

/// Cursor value past the last target square (64 squares x 64 id slots).
const CURSOR_END: u16 = 64 * 64;

/// Half-move-clock value at which the game is drawn and enumeration stops.
const HALFMOVE_LIMIT: u32 = 50;

/// Resumable enumerator over the side to move's formal (pseudo-legal)
/// moves.
///
/// Moves are organized by destination square in ascending index order, then
/// by pattern id 1-29 at each destination: 1-8 knight arrivals, 9-16
/// sliding arrivals, 17 king (including castling), 18-29 pawn arrivals.
/// Each `next` call resumes from the cursor left by the previous one, so
/// callers can pull one move at a time without materializing a list.
/// Formal moves may still leave the mover's king exposed; see
/// [`LegalMoves`] for the filtered sequence.
pub struct FormalMoves<'a> {
    pos: &'a Position,
    cursor: u16, // target square index * 64 + last tried pattern id
}

impl<'a> FormalMoves<'a> {
    pub fn new(pos: &'a Position) -> Self {
        Self { pos, cursor: 0 }
    }

    fn probe(&self, side: Color, to: Square, id: u16, occupant: Option<Piece>) -> Option<Move> {
        match id {
            1..=8 => {
                let (df, dr) = KNIGHT_OFFSETS[(id - 1) as usize];
                let from = to.offset(-df, -dr)?;
                let knight = Piece::new(side, PieceKind::Knight);
                (self.pos.piece_at(from) == Some(knight)).then(|| Move::new(from, to))
            }
            9..=16 => self.probe_slider(side, to, (id - 9) as usize),
            17 => self.probe_king(side, to),
            18 | 21 | 24 | 27 => self.probe_pawn_push(side, to, id, occupant),
            19 | 20 | 22 | 23 | 25 | 26 | 28 | 29 => {
                self.probe_pawn_capture(side, to, id, occupant)
            }
            _ => unreachable!("pattern id {id} outside the generator's 1-29 range"),
        }
    }

    /// Sliding arrival: walk backwards along the ray until the first
    /// occupied square; that square is the only possible source. Queens
    /// qualify on every ray, rooks on even (orthogonal) ray indices,
    /// bishops on odd (diagonal) ones.
    fn probe_slider(&self, side: Color, to: Square, ray: usize) -> Option<Move> {
        let (df, dr) = RAY_DIRECTIONS[ray];
        let mut from = to;
        loop {
            from = from.offset(-df, -dr)?;
            if self.pos.piece_at(from).is_some() {
                break;
            }
        }
        let piece = self.pos.piece_at(from)?;
        if piece.color != side {
            return None;
        }
        let qualifies = match piece.kind {
            PieceKind::Queen => true,
            PieceKind::Rook => ray % 2 == 0,
            PieceKind::Bishop => ray % 2 == 1,
            _ => false,
        };
        qualifies.then(|| Move::new(from, to))
    }

    /// King arrival, castling included. A two-file displacement needs the
    /// king on its home e-file square, the corresponding right intact and
    /// the intervening squares empty; whether the king ends up capturable
    /// is the legality filter's business, not ours.
    fn probe_king(&self, side: Color, to: Square) -> Option<Move> {
        let king = Piece::new(side, PieceKind::King);
        for &(df, dr) in KING_OFFSETS.iter() {
            let from = match to.offset(-df, -dr) {
                Some(sq) => sq,
                None => continue,
            };
            if self.pos.piece_at(from) != Some(king) {
                continue;
            }
            if df == 2 {
                if from.file != 4 {
                    continue;
                }
                let home = from.rank;
                let clear = self.pos.piece_at(Square::new(5, home)).is_none()
                    && self.pos.piece_at(Square::new(6, home)).is_none();
                let allowed = match (side, home) {
                    (Color::White, 0) | (Color::Black, 7) => self.pos.castling.kingside(side),
                    _ => false,
                };
                if !(clear && allowed) {
                    continue;
                }
            } else if df == -2 {
                if from.file != 4 {
                    continue;
                }
                let home = from.rank;
                let clear = self.pos.piece_at(Square::new(3, home)).is_none()
                    && self.pos.piece_at(Square::new(2, home)).is_none()
                    && self.pos.piece_at(Square::new(1, home)).is_none();
                let allowed = match (side, home) {
                    (Color::White, 0) | (Color::Black, 7) => self.pos.castling.queenside(side),
                    _ => false,
                };
                if !(clear && allowed) {
                    continue;
                }
            }
            return Some(Move::new(from, to));
        }
        None
    }

    /// Non-capturing pawn arrival. Id 18 covers the plain push (with the
    /// automatic queen on the far rank) and the double step; 21/24/27 are
    /// the same push restricted to the promotion rank, choosing rook,
    /// bishop or knight.
    fn probe_pawn_push(
        &self,
        side: Color,
        to: Square,
        id: u16,
        occupant: Option<Piece>,
    ) -> Option<Move> {
        if occupant.is_some() {
            return None;
        }
        let promoting = to.rank == side.promotion_rank();
        if id != 18 && !promoting {
            return None;
        }
        let pawn = Piece::new(side, PieceKind::Pawn);
        let back: i8 = match side {
            Color::White => -1,
            Color::Black => 1,
        };

        if let Some(from) = to.offset(0, back) {
            if self.pos.piece_at(from) == Some(pawn) {
                let promotion = match id {
                    18 => Promotion::Queen,
                    21 => Promotion::Rook,
                    24 => Promotion::Bishop,
                    27 => Promotion::Knight,
                    _ => unreachable!(),
                };
                return Some(Move::promoting(from, to, promotion));
            }
        }

        if id == 18 && to.rank == side.double_step_rank() {
            let from = to.offset(0, 2 * back)?;
            let mid = to.offset(0, back)?;
            if self.pos.piece_at(from) == Some(pawn) && self.pos.piece_at(mid).is_none() {
                return Some(Move::new(from, to));
            }
        }
        None
    }

    /// Capturing pawn arrival: source diagonally behind, destination must
    /// be occupied (by an enemy piece; friendly destinations never reach
    /// here). Odd ids within each pair capture from the left file.
    fn probe_pawn_capture(
        &self,
        side: Color,
        to: Square,
        id: u16,
        occupant: Option<Piece>,
    ) -> Option<Move> {
        if occupant.is_none() {
            return None;
        }
        let promoting = to.rank == side.promotion_rank();
        if !matches!(id, 19 | 20) && !promoting {
            return None;
        }
        let df: i8 = if id % 3 == 1 { -1 } else { 1 };
        let back: i8 = match side {
            Color::White => -1,
            Color::Black => 1,
        };
        let from = to.offset(df, back)?;
        if self.pos.piece_at(from) != Some(Piece::new(side, PieceKind::Pawn)) {
            return None;
        }
        let promotion = match id {
            19 | 20 => Promotion::Queen,
            22 | 23 => Promotion::Rook,
            25 | 26 => Promotion::Bishop,
            28 | 29 => Promotion::Knight,
            _ => unreachable!(),
        };
        Some(Move::promoting(from, to, promotion))
    }
}

impl Iterator for FormalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        // The 50-move rule overrides candidate generation entirely.
        if self.pos.halfmove_clock >= HALFMOVE_LIMIT {
            return None;
        }
        let side = self.pos.side_to_move();
        while self.cursor < CURSOR_END {
            let target = self.cursor / 64;
            let mut id = self.cursor % 64;
            let to = Square::from_index(target as u8);
            let occupant = self.pos.piece_at(to);

            // Skip destinations holding a friendly piece, and destinations
            // whose patterns are exhausted.
            if occupant.map_or(false, |p| p.color == side) || id >= PATTERN_ID_MAX {
                self.cursor = (target + 1) * 64;
                continue;
            }

            while id < PATTERN_ID_MAX {
                id += 1;
                if let Some(mv) = self.probe(side, to, id, occupant) {
                    self.cursor = target * 64 + id;
                    return Some(mv);
                }
            }
            self.cursor = target * 64 + id;
        }
        None
    }
}

/// Would the mover's king be capturable after this (formal) move?
///
/// Decided by cloning the position, committing the move on the clone and
/// probing the opponent's formal replies for a king capture. The caller's
/// position is never touched.
pub fn is_king_safe_after(pos: &Position, mv: Move) -> bool {
    let mover = pos.side_to_move();
    let mut probe = pos.clone();
    probe.apply(mv);
    king_survives(&probe, mover)
}

/// Is the side to move's king safe right now (i.e. not in check)?
pub fn is_king_safe(pos: &Position) -> bool {
    let mover = pos.side_to_move();
    let mut probe = pos.clone();
    probe.pass();
    king_survives(&probe, mover)
}

fn king_survives(probe: &Position, mover: Color) -> bool {
    let king = Piece::new(mover, PieceKind::King);
    !FormalMoves::new(probe).any(|reply| probe.piece_at(reply.to) == Some(king))
}

/// Lazy sequence of legal moves: formal moves that pass the king-safety
/// filter. Restartable only by building a new iterator.
pub struct LegalMoves<'a> {
    pos: &'a Position,
    formal: FormalMoves<'a>,
}

impl<'a> LegalMoves<'a> {
    pub fn new(pos: &'a Position) -> Self {
        Self {
            pos,
            formal: FormalMoves::new(pos),
        }
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let pos = self.pos;
        self.formal.by_ref().find(|&mv| is_king_safe_after(pos, mv))
    }
}

/// True iff the side to move has no legal move. Checkmate and stalemate
/// are deliberately not distinguished here.
pub fn is_game_ended(pos: &Position) -> bool {
    LegalMoves::new(pos).next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CastlingRights;

    fn sq(name: &str) -> Square {
        let bytes = name.as_bytes();
        Square::new(bytes[0] - b'a', bytes[1] - b'1')
    }

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let pos = Position::initial();
        let formal: Vec<Move> = FormalMoves::new(&pos).collect();
        assert_eq!(formal.len(), 20);
        let legal: Vec<Move> = LegalMoves::new(&pos).collect();
        assert_eq!(legal.len(), 20);

        let pawn_pushes = legal.iter().filter(|m| m.from.rank == 1).count();
        let knight_jumps = legal.iter().filter(|m| m.from.rank == 0).count();
        assert_eq!(pawn_pushes, 16);
        assert_eq!(knight_jumps, 4);
    }

    #[test]
    fn test_enumeration_order_is_resumable() {
        let pos = Position::initial();
        let mut it = FormalMoves::new(&pos);
        // First empty target square is a3: the b1 knight arrives before the
        // a2 pawn does.
        assert_eq!(it.next(), Some(Move::new(sq("b1"), sq("a3"))));
        assert_eq!(it.next(), Some(Move::new(sq("a2"), sq("a3"))));

        // Pulling one at a time matches collecting in one go.
        let collected: Vec<Move> = FormalMoves::new(&pos).collect();
        let mut resumed = Vec::new();
        let mut it = FormalMoves::new(&pos);
        while let Some(mv) = it.next() {
            resumed.push(mv);
        }
        assert_eq!(collected, resumed);
    }

    #[test]
    fn test_double_step_needs_empty_intermediate() {
        let mut pos = Position::initial();
        pos.set(sq("e3"), Piece::new(Color::Black, PieceKind::Knight));
        let moves: Vec<Move> = FormalMoves::new(&pos).collect();
        assert!(!moves.contains(&Move::new(sq("e2"), sq("e3"))));
        assert!(!moves.contains(&Move::new(sq("e2"), sq("e4"))));
        // The knight itself is capturable by the d2 and f2 pawns.
        assert!(moves.contains(&Move::new(sq("d2"), sq("e3"))));
        assert!(moves.contains(&Move::new(sq("f2"), sq("e3"))));
    }

    #[test]
    fn test_slider_qualification_by_ray() {
        let mut pos = Position::empty();
        pos.set(sq("a1"), Piece::new(Color::White, PieceKind::Rook));
        pos.set(sq("c1"), Piece::new(Color::White, PieceKind::Bishop));
        let moves: Vec<Move> = FormalMoves::new(&pos).collect();
        assert!(moves.contains(&Move::new(sq("a1"), sq("a5"))));
        assert!(moves.contains(&Move::new(sq("c1"), sq("g5"))));
        // A rook never arrives along a diagonal, a bishop never along a file.
        assert!(!moves.contains(&Move::new(sq("a1"), sq("b2"))));
        assert!(!moves.contains(&Move::new(sq("c1"), sq("c5"))));
    }

    #[test]
    fn test_pawn_capture_requires_occupied_destination() {
        let mut pos = Position::empty();
        pos.set(sq("d4"), Piece::new(Color::White, PieceKind::Pawn));
        let quiet: Vec<Move> = FormalMoves::new(&pos).collect();
        assert_eq!(quiet, vec![Move::new(sq("d4"), sq("d5"))]);

        pos.set(sq("e5"), Piece::new(Color::Black, PieceKind::Pawn));
        let with_target: Vec<Move> = FormalMoves::new(&pos).collect();
        assert!(with_target.contains(&Move::new(sq("d4"), sq("e5"))));
    }

    #[test]
    fn test_forward_promotion_yields_four_choices() {
        let mut pos = Position::empty();
        pos.set(sq("a7"), Piece::new(Color::White, PieceKind::Pawn));
        let moves: Vec<Move> = FormalMoves::new(&pos).collect();
        let choices: Vec<Promotion> = moves.iter().map(|m| m.promotion).collect();
        assert_eq!(moves.len(), 4);
        assert_eq!(
            choices,
            vec![
                Promotion::Queen,
                Promotion::Rook,
                Promotion::Bishop,
                Promotion::Knight
            ]
        );
        assert!(moves.iter().all(|m| m.to == sq("a8")));
    }

    #[test]
    fn test_kingside_castling_is_enumerated() {
        let mut pos = Position::empty();
        pos.castling = CastlingRights::all();
        pos.set(sq("e1"), Piece::new(Color::White, PieceKind::King));
        pos.set(sq("h1"), Piece::new(Color::White, PieceKind::Rook));
        let legal: Vec<Move> = LegalMoves::new(&pos).collect();
        assert!(legal.contains(&Move::new(sq("e1"), sq("g1"))));
    }

    #[test]
    fn test_castling_blocked_or_revoked() {
        let mut pos = Position::empty();
        pos.castling = CastlingRights::all();
        pos.set(sq("e1"), Piece::new(Color::White, PieceKind::King));
        pos.set(sq("h1"), Piece::new(Color::White, PieceKind::Rook));
        pos.set(sq("f1"), Piece::new(Color::White, PieceKind::Bishop));
        let blocked: Vec<Move> = FormalMoves::new(&pos).collect();
        assert!(!blocked.contains(&Move::new(sq("e1"), sq("g1"))));

        pos.remove(sq("f1"));
        pos.castling.white_kingside = false;
        let revoked: Vec<Move> = FormalMoves::new(&pos).collect();
        assert!(!revoked.contains(&Move::new(sq("e1"), sq("g1"))));
    }

    #[test]
    fn test_pinned_rook_filters_to_fewer_legal_moves() {
        let mut pos = Position::empty();
        pos.set(sq("e1"), Piece::new(Color::White, PieceKind::King));
        pos.set(sq("e2"), Piece::new(Color::White, PieceKind::Rook));
        pos.set(sq("e8"), Piece::new(Color::Black, PieceKind::Queen));
        pos.set(sq("a8"), Piece::new(Color::Black, PieceKind::King));

        let formal = FormalMoves::new(&pos).count();
        let legal: Vec<Move> = LegalMoves::new(&pos).collect();
        assert!(legal.len() < formal);
        // The pinned rook may slide along the e-file but never off it.
        assert!(legal.contains(&Move::new(sq("e2"), sq("e5"))));
        assert!(!legal.contains(&Move::new(sq("e2"), sq("d2"))));
        // Every approved move really does leave the king safe afterwards.
        for mv in legal {
            assert!(is_king_safe_after(&pos, mv));
        }
    }

    #[test]
    fn test_king_safety_probe() {
        assert!(is_king_safe(&Position::initial()));

        let mut pos = Position::empty();
        pos.set(sq("e1"), Piece::new(Color::White, PieceKind::King));
        pos.set(sq("e8"), Piece::new(Color::Black, PieceKind::Rook));
        assert!(!is_king_safe(&pos));
    }

    #[test]
    fn test_back_rank_mate_ends_the_game() {
        let mut pos = Position::empty();
        pos.set(sq("a8"), Piece::new(Color::Black, PieceKind::King));
        pos.set(sq("a1"), Piece::new(Color::White, PieceKind::Rook));
        pos.set(sq("b1"), Piece::new(Color::White, PieceKind::Rook));
        pos.set(sq("e1"), Piece::new(Color::White, PieceKind::King));
        pos.pass(); // Black to move

        assert!(!is_king_safe(&pos));
        assert!(is_game_ended(&pos));
    }

    #[test]
    fn test_stalemate_also_ends_the_game() {
        let mut pos = Position::empty();
        pos.set(sq("a8"), Piece::new(Color::Black, PieceKind::King));
        pos.set(sq("b6"), Piece::new(Color::White, PieceKind::Queen));
        pos.set(sq("h1"), Piece::new(Color::White, PieceKind::King));
        pos.pass(); // Black to move

        assert!(is_king_safe(&pos)); // not in check
        assert!(is_game_ended(&pos)); // yet no legal move
    }

    #[test]
    fn test_halfmove_limit_stops_enumeration() {
        let mut pos = Position::initial();
        pos.halfmove_clock = 50;
        assert_eq!(FormalMoves::new(&pos).count(), 0);
        assert_eq!(LegalMoves::new(&pos).count(), 0);
        assert!(is_game_ended(&pos));
    }
}
