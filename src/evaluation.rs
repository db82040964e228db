use crate::board::{PieceKind, Position, Square};
use crate::movegen::LegalMoves;

/// Conventional material values; the king carries none.
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}

/// Single-ply heuristic scorer. Positive scores favour the side to move.
///
/// `score = material + mobility_weight * mobility + attacked_weight * attacked`
/// where the attacked term is a documented placeholder (see
/// [`Evaluator::attacked_differential`]).
pub struct Evaluator {
    pub mobility_weight: f64,
    pub attacked_weight: f64,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            mobility_weight: 0.1,
            attacked_weight: 0.1,
        }
    }

    pub fn score(&self, pos: &Position) -> f64 {
        self.material_balance(pos) as f64
            + self.mobility_weight * self.mobility_differential(pos) as f64
            + self.attacked_weight * self.attacked_differential(pos) as f64
    }

    /// Sum of piece values, positive for the mover's pieces and negative
    /// for the opponent's.
    fn material_balance(&self, pos: &Position) -> i32 {
        let mover = pos.side_to_move();
        let mut balance = 0;
        for square in Square::all() {
            if let Some(piece) = pos.piece_at(square) {
                let value = piece_value(piece.kind);
                balance += if piece.color == mover { value } else { -value };
            }
        }
        balance
    }

    /// Mover's legal-move count minus the opponent's, the latter measured
    /// after a null move so it is evaluated from the same board.
    fn mobility_differential(&self, pos: &Position) -> i32 {
        let ours = LegalMoves::new(pos).count() as i32;
        let mut passed = pos.clone();
        passed.pass();
        let theirs = LegalMoves::new(&passed).count() as i32;
        ours - theirs
    }

    /// Attacked-piece differential, counted with multiplicity.
    ///
    /// Not implemented; kept as an explicit zero so the coefficient stays
    /// documented rather than silently dropped.
    fn attacked_differential(&self, _pos: &Position) -> i32 {
        0
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece, Position};

    #[test]
    fn test_initial_position_is_balanced() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.score(&Position::initial()), 0.0);
    }

    #[test]
    fn test_material_advantage_dominates() {
        let mut pos = Position::empty();
        pos.set(
            Square::new(4, 0),
            Piece::new(Color::White, PieceKind::King),
        );
        pos.set(
            Square::new(4, 7),
            Piece::new(Color::Black, PieceKind::King),
        );
        pos.set(
            Square::new(3, 3),
            Piece::new(Color::White, PieceKind::Queen),
        );

        let evaluator = Evaluator::new();
        let white_view = evaluator.score(&pos);
        assert!(white_view > 8.0, "queen up should score near +9, got {white_view}");

        pos.pass();
        let black_view = evaluator.score(&pos);
        assert!(black_view < -8.0, "down a queen should score near -9, got {black_view}");
    }

    #[test]
    fn test_mobility_term_breaks_material_ties() {
        // Equal material, but White's rook is free while Black's is boxed
        // into the corner by its own king.
        let mut pos = Position::empty();
        pos.set(
            Square::new(4, 0),
            Piece::new(Color::White, PieceKind::King),
        );
        pos.set(
            Square::new(0, 3),
            Piece::new(Color::White, PieceKind::Rook),
        );
        pos.set(
            Square::new(7, 7),
            Piece::new(Color::Black, PieceKind::Rook),
        );
        pos.set(
            Square::new(6, 7),
            Piece::new(Color::Black, PieceKind::King),
        );

        let evaluator = Evaluator::new();
        assert!(evaluator.score(&pos) > 0.0);
    }
}
