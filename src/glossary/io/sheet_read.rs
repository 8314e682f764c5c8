use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::glossary::error::{Result, ToolError};

/// Raw tabular data read from one worksheet: an ordered header row plus the
/// data rows below it. Rows may be shorter than the header row; the
/// normalizer treats that as valid ragged input.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads the named worksheet from an Excel workbook. The first row is taken
/// as the header row; every cell is rendered to its string form.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<SheetData> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = workbook
        .worksheet_range(sheet_name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{sheet_name}'")))?
        .map_err(ToolError::from)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
        .collect();

    Ok(SheetData { headers, rows })
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
