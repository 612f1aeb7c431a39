use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::PasswordRow;
use crate::validate::strength_label;

const FIXED_COLUMNS: [&str; 6] = ["id", "password", "length", "strength", "score", "success"];

/// Write rows as CSV. Value columns follow the field order of the first row;
/// the validation messages land in a trailing `message` column.
pub fn write_rows_csv(path: &Path, rows: &[PasswordRow]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let value_columns: Vec<String> = rows
        .first()
        .map(|row| row.values.iter().map(|(name, _)| name.to_string()).collect())
        .unwrap_or_default();

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|name| name.to_string()).collect();
    header.extend(value_columns.iter().cloned());
    header.push("message".to_string());
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.id.to_string(),
            row.password.clone(),
            row.length.to_string(),
            strength_label(row.score).to_string(),
            row.score.map(|score| score.to_string()).unwrap_or_default(),
            row.success.to_string(),
        ];
        record.extend(value_columns.iter().map(|name| {
            row.values
                .get(name)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        record.push(row.message.join("\n"));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
