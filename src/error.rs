use thiserror::Error;

/// Everything that can go wrong while building a board or solving it.
///
/// All of these are fatal: there is no partial board and no partial
/// dictionary load. `WordSource` and `ControlCharacter` are kept separate so
/// a caller can distinguish "bad path" from "corrupt word list".
#[derive(Debug, Error)]
pub enum Error {
    #[error("board has {tiles} tiles but dimensions are {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        tiles: usize,
    },

    #[error("board has {0} tiles; at most 64 are supported")]
    TooManyTiles(usize),

    #[error("minimum word length {min_word_length} exceeds the {tiles} tiles on the board")]
    MinWordLength { min_word_length: usize, tiles: usize },

    #[error("failed to read word list: {0}")]
    WordSource(#[from] std::io::Error),

    #[error("word list contains a control character on line {line}")]
    ControlCharacter { line: usize },
}
