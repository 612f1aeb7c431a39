//! Row writers and ordering helpers.

pub mod csv;
pub mod json;
pub mod sort;
pub mod table;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::model::PasswordRow;

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Txt => "txt",
        }
    }
}

/// Write `rows` to `path` in `format`. Returns the number of bytes written.
pub fn write_rows(
    path: &Path,
    rows: &[PasswordRow],
    format: OutputFormat,
) -> Result<u64, GenerationError> {
    match format {
        OutputFormat::Json => json::write_rows_json(path, rows),
        OutputFormat::Csv => Ok(csv::write_rows_csv(path, rows)?),
        OutputFormat::Txt => table::write_rows_table(path, rows),
    }
}
