use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use passforge_core::GeneratedObject;

use crate::oracle::StrengthEstimate;
use crate::validate::ValidationResult;

/// One synthesized and validated password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordRow {
    pub id: Uuid,
    pub password: String,
    /// Length in characters.
    pub length: usize,
    pub message: Vec<String>,
    pub score: Option<u8>,
    pub detailed_score: Option<StrengthEstimate>,
    pub success: bool,
    /// Sampled options that produced the password.
    pub values: GeneratedObject,
}

impl PasswordRow {
    pub fn new(id: Uuid, password: String, values: GeneratedObject, validation: ValidationResult) -> Self {
        Self {
            id,
            length: password.chars().count(),
            password,
            message: validation.message,
            score: validation.score,
            detailed_score: validation.detailed_score,
            success: validation.success,
            values,
        }
    }
}

/// A sampled combination that could not be turned into a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    pub values: GeneratedObject,
    pub error: String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub distinct_combinations: u64,
    pub objects_requested: u64,
    pub rows_generated: u64,
    pub items_failed: u64,
    /// Row count per oracle score.
    pub score_histogram: BTreeMap<u8, u64>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            distinct_combinations: 0,
            objects_requested: 0,
            rows_generated: 0,
            items_failed: 0,
            score_histogram: BTreeMap::new(),
            duration_ms: 0,
        }
    }

    pub fn record_row(&mut self, row: &PasswordRow) {
        self.rows_generated += 1;
        if let Some(score) = row.score {
            *self.score_histogram.entry(score).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&mut self) {
        self.items_failed += 1;
    }
}

/// Rows, failures and the report of one run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub rows: Vec<PasswordRow>,
    pub failures: Vec<ItemFailure>,
    pub report: GenerationReport,
}
