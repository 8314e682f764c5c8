use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::glossary::error::Result;

/// Writes a single worksheet (header row plus data rows) to the given path,
/// formatted as an autofiltered table. Existing files are replaced wholesale;
/// appending to a workbook therefore goes through read-modify-rewrite.
pub fn write_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    let mut table = rust_xlsxwriter::Table::new();
    table.set_autofilter(true);
    let col_end = (headers.len() as u16).saturating_sub(1);
    let row_end = if rows.is_empty() { 0 } else { rows.len() as u32 };
    worksheet.add_table(0, 0, row_end, col_end, &table)?;

    workbook.save(path)?;
    Ok(())
}
