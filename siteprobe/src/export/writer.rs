//! Serializers from [`Table`] to file bytes.

use rust_xlsxwriter::{ColNum, RowNum, Workbook};
use tracing::warn;

use super::table::Table;
use crate::document::Scalar;
use crate::errors::ExportError;

/// Excel's per-cell character limit.
pub const MAX_CELL_CHARS: usize = 32_767;

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Writes a table as UTF-8 CSV with a header row.
pub fn write_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // A record with no fields can't be told apart from a blank line.
    if !table.columns.is_empty() {
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell_text(cell.as_ref())))?;
        }
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))
}

/// Writes a table as a single-sheet XLSX workbook.
///
/// Numbers and booleans become typed cells. Text longer than Excel allows is
/// truncated.
pub fn write_spreadsheet(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.columns.len() > MAX_COLUMNS {
        return Err(ExportError::TooLarge(format!(
            "{} columns (max {MAX_COLUMNS})",
            table.columns.len()
        )));
    }
    if table.rows.len() >= MAX_ROWS {
        return Err(ExportError::TooLarge(format!(
            "{} rows (max {})",
            table.rows.len(),
            MAX_ROWS - 1
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as ColNum, truncate(name))?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = (r + 1) as RowNum;
        for (c, cell) in row.iter().enumerate() {
            let col = c as ColNum;
            match cell {
                None | Some(Scalar::Null) => {}
                Some(Scalar::Bool(b)) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Some(Scalar::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row_num, col, f)?;
                    }
                    None => {
                        worksheet.write_string(row_num, col, n.to_string())?;
                    }
                },
                Some(Scalar::Text(s)) => {
                    worksheet.write_string(row_num, col, truncate(s))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn cell_text(cell: Option<&Scalar>) -> String {
    cell.map(ToString::to_string).unwrap_or_default()
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => {
            warn!(chars = text.chars().count(), "Truncating spreadsheet cell");
            &text[..idx]
        }
        None => text,
    }
}
