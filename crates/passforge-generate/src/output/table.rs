//! Fixed-width text table export.

use std::fs;
use std::path::Path;

use crate::errors::GenerationError;
use crate::model::PasswordRow;
use crate::synth::{
    FIELD_ALL_CHARACTERS, FIELD_EASY_TO_READ, FIELD_EASY_TO_SAY, FIELD_LOWER_CASE, FIELD_NUMBERS,
    FIELD_SYMBOLS, FIELD_UPPER_CASE,
};
use crate::validate::strength_label;

/// Spaces on each side of a cell, on top of the single framing space.
const CELL_PADDING: usize = 2;

enum Column {
    Password,
    Strength,
    Length,
    Toggle(&'static str),
}

const COLUMNS: [(&str, Column); 10] = [
    ("Password", Column::Password),
    ("Strength", Column::Strength),
    ("Length", Column::Length),
    ("All characters", Column::Toggle(FIELD_ALL_CHARACTERS)),
    ("Easy to read", Column::Toggle(FIELD_EASY_TO_READ)),
    ("Easy to say", Column::Toggle(FIELD_EASY_TO_SAY)),
    ("Lower case", Column::Toggle(FIELD_LOWER_CASE)),
    ("Upper case", Column::Toggle(FIELD_UPPER_CASE)),
    ("Numbers", Column::Toggle(FIELD_NUMBERS)),
    ("Symbols", Column::Toggle(FIELD_SYMBOLS)),
];

fn cell(row: &PasswordRow, column: &Column) -> String {
    match column {
        Column::Password => row.password.clone(),
        Column::Strength => strength_label(row.score).to_string(),
        Column::Length => row.length.to_string(),
        Column::Toggle(name) => row
            .values
            .get(name)
            .map(|value| value.to_string())
            .unwrap_or_default(),
    }
}

/// Render rows as a framed, left-aligned text table.
pub fn render_table(rows: &[PasswordRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| COLUMNS.iter().map(|(_, column)| cell(row, column)).collect())
        .collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(index, (header, _))| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = format!(
        "+{}+",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2 + CELL_PADDING * 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let render_row = |values: Vec<&str>| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| pad(value, *width))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(line.clone());
    out.push(render_row(COLUMNS.iter().map(|(header, _)| *header).collect()));
    out.push(line.clone());
    for row in &cells {
        out.push(render_row(row.iter().map(String::as_str).collect()));
    }
    out.push(line);
    out.join("\n")
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count()) + CELL_PADDING * 2;
    format!(" {text}{} ", " ".repeat(fill))
}

/// Write the text table to `path`. Returns the number of bytes written.
pub fn write_rows_table(path: &Path, rows: &[PasswordRow]) -> Result<u64, GenerationError> {
    let mut text = render_table(rows);
    text.push('\n');
    fs::write(path, &text)?;
    Ok(text.len() as u64)
}
