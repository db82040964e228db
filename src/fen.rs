use crate::board::{Color, Piece, Position, Square};
use crate::error::ChessError;

/// Worst case: 71 characters of piece placement, then the fixed-shape
/// suffix (" w KQkq - " plus two counters). Rendering past this is an
/// engine defect.
const FEN_MAX: usize = 90;

/// Render a position in Forsyth-Edwards Notation.
///
/// En passant is not modelled by this engine, so the en passant field is
/// always `-`.
pub fn render(pos: &Position) -> String {
    let mut fen = String::with_capacity(FEN_MAX);

    for rank in (0..8u8).rev() {
        let mut run = 0u8;
        for file in 0..8u8 {
            match pos.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if run > 0 {
                        fen.push((b'0' + run) as char);
                        run = 0;
                    }
                    fen.push(piece.to_char());
                }
                None => run += 1,
            }
        }
        if run > 0 {
            fen.push((b'0' + run) as char);
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match pos.side_to_move() {
        Color::White => 'w',
        Color::Black => 'b',
    });

    fen.push(' ');
    if pos.castling.any() {
        if pos.castling.white_kingside {
            fen.push('K');
        }
        if pos.castling.white_queenside {
            fen.push('Q');
        }
        if pos.castling.black_kingside {
            fen.push('k');
        }
        if pos.castling.black_queenside {
            fen.push('q');
        }
    } else {
        fen.push('-');
    }

    fen.push_str(&format!(
        " - {} {}",
        pos.halfmove_clock,
        pos.fullmove_number()
    ));

    debug_assert!(
        fen.len() <= FEN_MAX,
        "FEN grew past its theoretical maximum: {fen}"
    );
    fen
}

/// Parse the piece-placement field of a FEN string back into a board grid.
///
/// Only the placement field: the remaining fields describe state the
/// caller already holds in structured form.
pub fn parse_placement(field: &str) -> Result<[[Option<Piece>; 8]; 8], ChessError> {
    let mut board = [[None; 8]; 8];
    let mut ranks = 0u8;

    for (i, row) in field.split('/').enumerate() {
        if i >= 8 {
            return Err(ChessError::MalformedPlacement(format!(
                "more than 8 ranks in '{field}'"
            )));
        }
        ranks += 1;
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(d) = c.to_digit(10) {
                // Each digit must fit in the files remaining; this also
                // rejects '0' and keeps the accumulator from wrapping on
                // absurdly long runs of digits.
                if d == 0 || d > 8 - file as u32 {
                    return Err(ChessError::MalformedPlacement(format!(
                        "rank {} overflows 8 files in '{field}'",
                        rank + 1
                    )));
                }
                file += d as u8;
            } else {
                if file >= 8 {
                    return Err(ChessError::MalformedPlacement(format!(
                        "rank {} overflows 8 files in '{field}'",
                        rank + 1
                    )));
                }
                board[file as usize][rank as usize] = Some(Piece::from_char(c)?);
                file += 1;
            }
        }
        if file != 8 {
            return Err(ChessError::MalformedPlacement(format!(
                "rank {} covers {file} files instead of 8 in '{field}'",
                rank + 1
            )));
        }
    }

    if ranks != 8 {
        return Err(ChessError::MalformedPlacement(format!(
            "{ranks} ranks instead of 8 in '{field}'"
        )));
    }
    Ok(board)
}
