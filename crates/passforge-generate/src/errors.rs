use thiserror::Error;

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("schema error: {0}")]
    Schema(#[from] passforge_core::Error),
    #[error("field '{0}' has no candidate values")]
    EmptyCandidates(String),
    #[error("combination space of {size} exceeds limit {limit}")]
    CombinationLimit { size: u128, limit: u64 },
    #[error(
        "could not draw {requested} unique combinations: {accepted} accepted after {attempts} attempts"
    )]
    CombinationBudgetExceeded {
        requested: u64,
        accepted: u64,
        attempts: u64,
        distinct: Option<u64>,
    },
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised before a password is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("password length must be between {min} and {max}, got {length}")]
    LengthOutOfRange {
        length: usize,
        min: usize,
        max: usize,
    },
    #[error("invalid combination, the character pool is empty")]
    EmptyPool,
    #[error("option '{name}' expects {expected}, got {found}")]
    InvalidOption {
        name: String,
        expected: &'static str,
        found: String,
    },
}
