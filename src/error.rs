//! Error types for huffcodec

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty input: no symbols to build a tree from")]
    EmptyInput,

    #[error("symbol set mismatch: tree has {tree_symbols} distinct leaf symbols, table has {table_symbols}")]
    SymbolSetMismatch {
        tree_symbols: usize,
        table_symbols: usize,
    },

    #[error("truncated stream: decoded {decoded} of {expected} symbols before the bits ran out")]
    TruncatedStream { expected: usize, decoded: usize },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("header overflow: {0} internal nodes do not fit the 1-byte count field")]
    HeaderOverflow(usize),

    #[error("truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("symbol {0} has no code in the code table")]
    UnknownSymbol(u8),

    #[error("input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
