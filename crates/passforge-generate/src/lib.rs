//! Password bulk-generation engine for passforge.
//!
//! Sampled option combinations from `passforge-core` are turned into
//! passwords, scored by a strength oracle and validated. The driver returns
//! successful rows and per-item failures side by side.

pub mod combinator;
pub mod driver;
pub mod errors;
pub mod model;
pub mod oracle;
pub mod output;
pub mod profile;
pub mod synth;
pub mod validate;

pub use combinator::{Combinator, CombinatorLimits, SampleRequest, count_combinations};
pub use driver::GenerationDriver;
pub use errors::{GenerationError, SynthesisError};
pub use model::{GenerationOutcome, GenerationReport, ItemFailure, PasswordRow};
pub use oracle::{StrengthEstimate, StrengthOracle, ZxcvbnOracle};
pub use output::OutputFormat;
pub use profile::{GenerationProfile, SamplingStrategy};
pub use synth::{LengthLimits, PasswordSynthesizer, SynthesisOptions, character_pool};
pub use validate::{PasswordValidator, ValidationResult, ValidatorConfig, strength_label};
