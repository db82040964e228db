use std::fmt;

use crate::board::{PieceKind, Square};

/// The piece a pawn becomes on reaching the far rank.
///
/// The discriminants are the packed-move promotion codes; `Queen` doubles
/// as the default for moves that never promote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Queen = 0,
    Bishop = 1,
    Knight = 2,
    Rook = 3,
}

impl Promotion {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Self {
        match code % 4 {
            0 => Promotion::Queen,
            1 => Promotion::Bishop,
            2 => Promotion::Knight,
            _ => Promotion::Rook,
        }
    }

    pub fn kind(self) -> PieceKind {
        match self {
            Promotion::Queen => PieceKind::Queen,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Knight => PieceKind::Knight,
            Promotion::Rook => PieceKind::Rook,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Promotion::Queen => 'q',
            Promotion::Bishop => 'b',
            Promotion::Knight => 'n',
            Promotion::Rook => 'r',
        }
    }
}

/// A move in structured form: origin, destination, promotion choice.
///
/// The packed form (`encode`/`decode`) exists for the generator's resumable
/// cursor bookkeeping; everything else traffics in the named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Promotion,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Promotion::Queen,
        }
    }

    pub fn promoting(from: Square, to: Square, promotion: Promotion) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// The null move: nothing moves, only the turn changes hands.
    pub fn null() -> Self {
        Move::new(Square::new(0, 0), Square::new(0, 0))
    }

    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    /// Pack into `x1 + y1*8 + x2*64 + y2*512 + ppc*4096`.
    ///
    /// 3 bits per coordinate, 2 bits for the promotion choice; the result
    /// fits in 14 bits.
    pub fn encode(&self) -> u16 {
        self.from.file as u16
            + self.from.rank as u16 * 8
            + self.to.file as u16 * 64
            + self.to.rank as u16 * 512
            + self.promotion.code() * 4096
    }

    pub fn decode(code: u16) -> Self {
        Self {
            from: Square::new((code % 8) as u8, (code / 8 % 8) as u8),
            to: Square::new((code / 64 % 8) as u8, (code / 512 % 8) as u8),
            promotion: Promotion::from_code(code / 4096),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion != Promotion::Queen {
            write!(f, "{}", self.promotion.letter())?;
        }
        Ok(())
    }
}
