//! Errors raised below the decision boundary.
//!
//! None of these reach a caller of [`crate::Engine::generate_decision`]: the
//! policy maps every failure to a pass. They surface through the lower level
//! APIs (lexicon loading, board parsing, applying a play).

use crate::Position;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no valid word in the lexicon input")]
    EmptyLexicon,

    #[error("lexicon file has unsupported extension: {0:?}")]
    UnsupportedLexiconFile(String),

    #[error("fst error: {0}")]
    Fst(#[from] fst::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid board at row {row}, col {col}: '{found}'")]
    InvalidBoard { row: usize, col: usize, found: char },

    #[error("invalid rack symbol '{0}' (expected a-z or a blank marker)")]
    InvalidRack(char),

    #[error("rack holds {0} tiles, at most 7 are allowed")]
    RackTooLarge(usize),

    #[error("placements are not on a single line")]
    Misaligned,

    #[error("square {pos:?} is already occupied")]
    Occupied { pos: Position },

    #[error("position {pos:?} is off the board")]
    OffBoard { pos: Position },
}
