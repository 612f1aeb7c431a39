use thiserror::Error;

/// Core error type shared across passforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema violates structural invariants (duplicate or empty names).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// The schema uses a variant the engine does not expand.
    #[error("unsupported schema variant '{variant}' at '{path}'")]
    UnsupportedVariant { variant: &'static str, path: String },
    /// Enumerating a field would exceed the configured candidate bound.
    #[error("candidate list for '{path}' would hold {size} values (limit {limit})")]
    CandidateLimit {
        path: String,
        size: u128,
        limit: usize,
    },
}

/// Convenience alias for results returned by passforge crates.
pub type Result<T> = std::result::Result<T, Error>;
