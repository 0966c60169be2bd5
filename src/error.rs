//! Error types for FEN parsing, move text parsing, UCI command handling and
//! engine-level failures. Plain enums with hand-written `Display` impls,
//! matching this codebase's preference for small dependency surfaces over
//! a derive-macro error crate.

use std::fmt;

/// Failure parsing a square from algebraic notation ("e4"-style text).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SquareError {
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation: '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Failure parsing a FEN record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount { found: usize },
    BadPlacement { reason: String },
    BadSideToMove { text: String },
    BadCastlingRights { text: String },
    BadEnPassant { text: String },
    BadHalfmoveClock { text: String },
    BadFullmoveNumber { text: String },
    KingCountInvalid { color_white: bool, count: usize },
    SideNotToMoveInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "FEN must have 6 space-separated fields, found {found}")
            }
            FenError::BadPlacement { reason } => write!(f, "bad piece placement: {reason}"),
            FenError::BadSideToMove { text } => write!(f, "bad side to move: '{text}'"),
            FenError::BadCastlingRights { text } => {
                write!(f, "bad castling rights field: '{text}'")
            }
            FenError::BadEnPassant { text } => write!(f, "bad en passant field: '{text}'"),
            FenError::BadHalfmoveClock { text } => write!(f, "bad halfmove clock: '{text}'"),
            FenError::BadFullmoveNumber { text } => write!(f, "bad fullmove number: '{text}'"),
            FenError::KingCountInvalid { color_white, count } => write!(
                f,
                "{} must have exactly one king, found {count}",
                if *color_white { "white" } else { "black" }
            ),
            FenError::SideNotToMoveInCheck => {
                write!(f, "side not to move is in check")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Failure parsing a coordinate move string ("e2e4", "e7e8q").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    BadLength { text: String },
    BadSquare { text: String },
    BadPromotion { text: String },
    IllegalInPosition { text: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::BadLength { text } => {
                write!(f, "move text '{text}' has an invalid length")
            }
            MoveParseError::BadSquare { text } => {
                write!(f, "move text '{text}' has an invalid square")
            }
            MoveParseError::BadPromotion { text } => {
                write!(f, "move text '{text}' has an invalid promotion piece")
            }
            MoveParseError::IllegalInPosition { text } => {
                write!(f, "move '{text}' is not legal in this position")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Failure parsing or executing a UCI command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UciError {
    UnknownCommand { line: String },
    BadPosition(FenError),
    BadMove(MoveParseError),
    BadOption { name: String, value: String },
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::UnknownCommand { line } => write!(f, "unknown command: '{line}'"),
            UciError::BadPosition(e) => write!(f, "bad position: {e}"),
            UciError::BadMove(e) => write!(f, "bad move: {e}"),
            UciError::BadOption { name, value } => {
                write!(f, "bad value '{value}' for option '{name}'")
            }
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::BadPosition(e)
    }
}

impl From<MoveParseError> for UciError {
    fn from(e: MoveParseError) -> Self {
        UciError::BadMove(e)
    }
}

/// Top-level engine failure. `Interrupted` unwinds a search in progress and
/// is never surfaced to the user; `search` callers discard its partial
/// result and report the best move found before the stop arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    OutOfMemory { requested_mb: usize },
    Interrupted,
    Fen(FenError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OutOfMemory { requested_mb } => {
                write!(f, "failed to allocate {requested_mb} MB transposition table")
            }
            EngineError::Interrupted => write!(f, "search interrupted"),
            EngineError::Fen(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<FenError> for EngineError {
    fn from(e: FenError) -> Self {
        EngineError::Fen(e)
    }
}
