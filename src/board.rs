use std::fmt;

use crate::error::ChessError;
use crate::moves::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank a pawn of this color must reach to promote.
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank a pawn of this color lands on after a double step.
    pub fn double_step_rank(&self) -> u8 {
        match self {
            Color::White => 3,
            Color::Black => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Result<Self, ChessError> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(ChessError::UnknownPiece(c)),
        };
        Ok(Self { color, kind })
    }
}

/// A board coordinate. File 0 is the a-file, rank 0 is White's home rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "square ({file}, {rank}) off the board");
        Self { file, rank }
    }

    /// Fallible constructor for coordinates coming from external input.
    pub fn try_new(file: u8, rank: u8) -> Result<Self, ChessError> {
        if file < 8 && rank < 8 {
            Ok(Self { file, rank })
        } else {
            Err(ChessError::SquareOutOfRange { file, rank })
        }
    }

    /// Square index 0-63, file varying fastest.
    pub fn index(&self) -> u8 {
        self.file + self.rank * 8
    }

    pub fn from_index(index: u8) -> Self {
        debug_assert!(index < 64);
        Self {
            file: index % 8,
            rank: index / 8,
        }
    }

    /// The square displaced by (df, dr), or None if that leaves the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

/// The four castling rights. Each flag only ever transitions true -> false
/// within a game; nothing in the engine grants a right back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// True if at least one right remains (FEN renders '-' otherwise).
    pub fn any(&self) -> bool {
        self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke_both(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Revoke the right belonging to a rook home corner. Keyed purely on
    /// coordinates: any move leaving that corner forfeits the right, while a
    /// rook captured on its home square keeps it.
    fn revoke_corner(&mut self, square: Square) {
        match (square.file, square.rank) {
            (0, 0) => self.white_queenside = false,
            (7, 0) => self.white_kingside = false,
            (0, 7) => self.black_queenside = false,
            (7, 7) => self.black_kingside = false,
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// A chess position: the board grid plus the bookkeeping every other
/// component operates on.
///
/// Side to move is not stored; it is derived from the parity of the move
/// history, so `apply` and `pass` are the only ways to advance it.
#[derive(Debug, Clone)]
pub struct Position {
    board: [[Option<Piece>; 8]; 8], // indexed [file][rank]
    pub castling: CastlingRights,
    pub last_captured: Option<Piece>,
    pub halfmove_clock: u32,
    history: Vec<Move>,
}

impl Position {
    /// An empty board with no castling rights and White to move.
    pub fn empty() -> Self {
        Self {
            board: [[None; 8]; 8],
            castling: CastlingRights::none(),
            last_captured: None,
            halfmove_clock: 0,
            history: Vec::new(),
        }
    }

    /// The standard starting position.
    pub fn initial() -> Self {
        let mut pos = Position::empty();
        pos.castling = CastlingRights::all();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            pos.set(Square::new(file, 0), Piece::new(Color::White, kind));
            pos.set(Square::new(file, 1), Piece::new(Color::White, PieceKind::Pawn));
            pos.set(Square::new(file, 6), Piece::new(Color::Black, PieceKind::Pawn));
            pos.set(Square::new(file, 7), Piece::new(Color::Black, kind));
        }
        pos
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.file as usize][square.rank as usize]
    }

    pub fn set(&mut self, square: Square, piece: Piece) {
        self.board[square.file as usize][square.rank as usize] = Some(piece);
    }

    pub fn remove(&mut self, square: Square) {
        self.board[square.file as usize][square.rank as usize] = None;
    }

    /// White moves on even plies, Black on odd ones.
    pub fn side_to_move(&self) -> Color {
        if self.history.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn fullmove_number(&self) -> u32 {
        1 + self.history.len() as u32 / 2
    }

    /// Commit a move to the position.
    ///
    /// The move is assumed to come from the formal-move generator; no
    /// legality check happens here. Callers that need legality must filter
    /// through `movegen::is_king_safe_after` first.
    pub fn apply(&mut self, mv: Move) {
        let moved = self.piece_at(mv.from);
        let target = self.piece_at(mv.to);

        if let Some(captured) = target {
            self.last_captured = Some(captured);
        }
        self.board[mv.to.file as usize][mv.to.rank as usize] = moved;
        self.board[mv.from.file as usize][mv.from.rank as usize] = None;

        if let Some(piece) = moved {
            // A king travelling two files is castling: the rook on that
            // rank crosses to the square the king passed through.
            if piece.kind == PieceKind::King && mv.from.file == 4 {
                let rank = mv.from.rank as usize;
                let rook = Some(Piece::new(piece.color, PieceKind::Rook));
                if mv.to.file == 6 {
                    self.board[5][rank] = rook;
                    self.board[7][rank] = None;
                } else if mv.to.file == 2 {
                    self.board[3][rank] = rook;
                    self.board[0][rank] = None;
                }
            }

            if piece.kind == PieceKind::King {
                self.castling.revoke_both(piece.color);
            }

            if piece.kind == PieceKind::Pawn && mv.to.rank == piece.color.promotion_rank() {
                self.board[mv.to.file as usize][mv.to.rank as usize] =
                    Some(Piece::new(piece.color, mv.promotion.kind()));
            }
        }

        // Leaving a rook home corner forfeits that corner's right whatever
        // the piece was: the rook is no longer there either way.
        self.castling.revoke_corner(mv.from);

        let pawn_moved = matches!(moved, Some(p) if p.kind == PieceKind::Pawn);
        if pawn_moved || target.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.history.push(mv);
    }

    /// The null move: hand the turn over without touching the board.
    ///
    /// Used by the legality probe and by mobility scoring to evaluate the
    /// opponent's options from the current board.
    pub fn pass(&mut self) {
        self.halfmove_clock += 1;
        self.history.push(Move::null());
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let c = match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                write!(f, "{}", c)?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
