use thiserror::Error;

/// Errors reported for malformed external input.
///
/// Internal invariant violations (a generator pattern id outside its
/// defined range, a FEN buffer growing past its theoretical maximum) are
/// engine defects rather than data problems and panic instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChessError {
    #[error("unrecognized piece character '{0}'")]
    UnknownPiece(char),

    #[error("square out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: u8, rank: u8 },

    #[error("malformed placement field: {0}")]
    MalformedPlacement(String),
}
