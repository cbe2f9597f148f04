use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshkeyError {
    #[error("base60 value out of range: {0}")]
    OutOfRange(u32),

    #[error("invalid base60 symbol: {0:?}")]
    InvalidSymbol(char),

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("{field} has {digits} digits but capacity is {capacity}")]
    FieldTooLong {
        field: &'static str,
        digits: usize,
        capacity: usize,
    },

    #[error("invalid shuffle sequence: {0}")]
    InvalidSequence(String),

    #[error("unsupported document: {0}")]
    UnsupportedDocument(String),
}

pub type Result<T> = std::result::Result<T, MeshkeyError>;
