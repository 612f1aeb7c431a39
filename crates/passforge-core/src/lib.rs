//! Core contracts for passforge.
//!
//! This crate defines the declarative field schema, the candidate values it
//! expands into, and the schema engine that performs the expansion. It holds
//! no randomness and performs no I/O.

pub mod error;
pub mod expand;
pub mod schema;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use expand::{
    CandidateSet, Candidates, DEFAULT_MAX_CANDIDATES, ExpandLimits, ResolvedCandidates,
    SAFE_INTEGER_MAX, SchemaEngine, expand,
};
pub use schema::{FieldSchema, FieldsSchema, SchemaField};
pub use validation::validate_fields_schema;
pub use value::{FieldValue, GeneratedObject};

/// Contract version for serialized `FieldsSchema` documents.
pub const SCHEMA_VERSION: &str = "0.1";
