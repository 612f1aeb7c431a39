use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::GenerationError;
use crate::model::PasswordRow;

/// Write rows as a pretty JSON array.
pub fn write_rows_json(path: &Path, rows: &[PasswordRow]) -> Result<u64, GenerationError> {
    let bytes = serde_json::to_vec_pretty(rows)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len() as u64)
}
