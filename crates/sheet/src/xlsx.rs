//! Excel file loading (xlsx, xls, xlsb, ods) via calamine.
//!
//! One-way conversion only: a worksheet becomes a `RawSheet` cell matrix and
//! nothing more. Formulas arrive as their cached values, dates as serial
//! numbers; that is all the detector needs.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::SheetError;
use crate::raw::{CellValue, RawSheet};

/// Dimension caps. Supplier documents are a few hundred rows; anything near
/// these limits is not a shipment document.
pub const MAX_ROWS: usize = 65536;
pub const MAX_COLS: usize = 256;

/// Load the first worksheet of a workbook.
pub fn load_sheet(path: &Path) -> Result<RawSheet, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::Open(e.to_string()))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;
    read_sheet(&mut workbook, &first)
}

/// Load a worksheet by name.
pub fn load_named(path: &Path, name: &str) -> Result<RawSheet, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::Open(e.to_string()))?;
    if !workbook.sheet_names().iter().any(|n| n == name) {
        return Err(SheetError::UnknownSheet(name.to_string()));
    }
    read_sheet(&mut workbook, name)
}

/// Worksheet names in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, SheetError> {
    let workbook = open_workbook_auto(path).map_err(|e| SheetError::Open(e.to_string()))?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(SheetError::NoSheets);
    }
    Ok(names)
}

fn read_sheet(
    workbook: &mut Sheets<std::io::BufReader<std::fs::File>>,
    name: &str,
) -> Result<RawSheet, SheetError> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| SheetError::Read {
            sheet: name.to_string(),
            message: e.to_string(),
        })?;

    let (height, width) = range.get_size();
    if height > MAX_ROWS || width > MAX_COLS {
        return Err(SheetError::TooLarge {
            rows: height,
            cols: width,
        });
    }

    let rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    Ok(RawSheet::new(rows))
}

/// Degrade calamine's cell taxonomy to the three-valued model the detector
/// works on. Error cells read as empty; dates stay as their serial numbers.
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn fixture(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        build(sheet);
        workbook.save(dir.path().join("fixture.xlsx")).unwrap();
        dir
    }

    #[test]
    fn loads_text_and_numbers() {
        let dir = fixture(|ws| {
            ws.write_string(0, 0, "COMMERCIAL INVOICE").unwrap();
            ws.write_string(2, 1, "LB010").unwrap();
            ws.write_number(2, 3, 119.0).unwrap();
            ws.write_number(2, 4, 0.898).unwrap();
        });
        let sheet = load_sheet(&dir.path().join("fixture.xlsx")).unwrap();
        assert_eq!(sheet.cell(0, 0).display(), "COMMERCIAL INVOICE");
        assert_eq!(sheet.cell(2, 1).display(), "LB010");
        assert_eq!(sheet.cell(2, 3).number(), Some(119.0));
        assert_eq!(sheet.cell(2, 4).number(), Some(0.898));
        assert!(sheet.cell(1, 0).is_blank());
    }

    #[test]
    fn load_named_rejects_unknown_sheet() {
        let dir = fixture(|ws| {
            ws.write_string(0, 0, "x").unwrap();
        });
        let err = load_named(&dir.path().join("fixture.xlsx"), "Packing").unwrap_err();
        assert!(matches!(err, SheetError::UnknownSheet(_)));
    }

    #[test]
    fn open_error_for_missing_file() {
        let err = load_sheet(Path::new("/nonexistent/supplier.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::Open(_)));
    }

    #[test]
    fn sheet_names_listed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Invoice").unwrap();
        workbook.add_worksheet().set_name("Packing").unwrap();
        let path = dir.path().join("two.xlsx");
        workbook.save(&path).unwrap();
        assert_eq!(sheet_names(&path).unwrap(), vec!["Invoice", "Packing"]);
    }
}
