//! Outbound adapter decoding spreadsheets with `calamine`.
//!
//! Only the first sheet is read. Its first row supplies the column labels;
//! columns without a label and rows without any value are skipped.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::ports::{WorkbookSource, WorkbookSourceError};
use crate::domain::{CellValue, SheetRow};

/// `calamine` backed workbook decoder (xlsx, xlsm, xlsb, xls, ods).
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineWorkbookSource;

#[async_trait]
impl WorkbookSource for CalamineWorkbookSource {
    async fn read_rows(&self, path: &Path) -> Result<Vec<SheetRow>, WorkbookSourceError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let bytes = read_file(&path)?;
            decode_rows(bytes)
        })
        .await
        .map_err(|err| WorkbookSourceError::read(format!("decoder task failed: {err}")))?
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, WorkbookSourceError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| WorkbookSourceError::read(format!("{} is not a file", path.display())))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| WorkbookSourceError::read(format!("{err} ({})", parent.display())))?;
    dir.read(file_name)
        .map_err(|err| WorkbookSourceError::read(format!("{err} ({})", path.display())))
}

/// Decode the first sheet of an in-memory workbook.
fn decode_rows(bytes: Vec<u8>) -> Result<Vec<SheetRow>, WorkbookSourceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| WorkbookSourceError::decode(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| WorkbookSourceError::decode("workbook contains no sheets"))?
        .map_err(|err| WorkbookSourceError::decode(err.to_string()))?;
    let rows = rows_from_range(&range);
    debug!(rows = rows.len(), "decoded workbook rows");
    Ok(rows)
}

fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let labels: Vec<String> = header.iter().map(label_text).collect();

    lines
        .filter(|cells| !cells.iter().all(is_blank))
        .map(|cells| {
            let mut row = SheetRow::new();
            for (label, cell) in labels.iter().zip(cells) {
                if !label.is_empty() {
                    row.push(label.clone(), to_cell_value(cell));
                }
            }
            row
        })
        .collect()
}

fn label_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_owned(),
        other => other.to_string().trim().to_owned(),
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(text.clone())
        }
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
    }
}
