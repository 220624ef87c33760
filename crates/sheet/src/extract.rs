//! Projection of detected data rows into typed line items.
//!
//! Cells are trusted the way the supplier wrote them: malformed numerics
//! degrade to zero and `total_amount` is NOT re-derived from
//! `quantity * unit_price`. The only row-level rule is that a row without a
//! product code is not a line item and is dropped.

use serde::Serialize;

use crate::detect::{invoice_col, packing_col};
use crate::raw::CellValue;

/// One invoice line. `code` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    pub code: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_amount: f64,
}

/// One packing-list line (pre-aggregation: one row per carton range).
/// `code` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackingItem {
    pub code: String,
    pub description: String,
    pub qty_per_carton: f64,
    pub total_cartons: f64,
    pub total_quantity: f64,
    pub unit_weight: f64,
    pub total_weight: f64,
    pub cbm: f64,
    pub carton_numbers: Vec<u32>,
}

fn code_of(row: &[CellValue], index: usize) -> Option<String> {
    let code = row.get(index).map(CellValue::display).unwrap_or_default();
    if code.is_empty() { None } else { Some(code) }
}

fn cell(row: &[CellValue], index: usize) -> &CellValue {
    const EMPTY: CellValue = CellValue::Empty;
    row.get(index).unwrap_or(&EMPTY)
}

/// Project invoice data rows (per the `invoice_col` map) into items.
/// Never errors; rows without a code are skipped.
pub fn extract_invoice(rows: &[Vec<CellValue>]) -> Vec<InvoiceItem> {
    rows.iter()
        .filter_map(|row| {
            let code = code_of(row, invoice_col::ITEM_NO)?;
            Some(InvoiceItem {
                code,
                description: cell(row, invoice_col::DESCRIPTION).display(),
                quantity: cell(row, invoice_col::QTY).number_or_zero(),
                unit_price: cell(row, invoice_col::UNIT_PRICE).number_or_zero(),
                total_amount: cell(row, invoice_col::AMOUNT).number_or_zero(),
            })
        })
        .collect()
}

/// Project packing data rows (per the `packing_col` map) into items.
pub fn extract_packing(rows: &[Vec<CellValue>]) -> Vec<PackingItem> {
    rows.iter()
        .filter_map(|row| {
            let code = code_of(row, packing_col::ITEM_NO)?;
            Some(PackingItem {
                code,
                description: cell(row, packing_col::DESCRIPTION).display(),
                qty_per_carton: cell(row, packing_col::QTY_PER_CTN).number_or_zero(),
                total_cartons: cell(row, packing_col::TOTAL_CTN).number_or_zero(),
                total_quantity: cell(row, packing_col::QUANTITY).number_or_zero(),
                unit_weight: cell(row, packing_col::UNIT_WEIGHT).number_or_zero(),
                total_weight: cell(row, packing_col::TOTAL_GW).number_or_zero(),
                cbm: cell(row, packing_col::CBM).number_or_zero(),
                carton_numbers: expand_carton_numbers(cell(row, packing_col::CTN)),
            })
        })
        .collect()
}

/// Longest carton range a single CTN cell may expand to. Real shipments
/// run a few hundred cartons; anything past this is a corrupt cell, not a
/// range, and must not turn into a giant allocation.
pub const MAX_CARTON_RANGE: u32 = 10_000;

/// Expand a carton-number cell. A value containing `-` is an inclusive
/// numeric range (`"14-18"` → `[14, 15, 16, 17, 18]`); otherwise a single
/// integer. Non-numeric content and ranges longer than [`MAX_CARTON_RANGE`]
/// expand to nothing.
pub fn expand_carton_numbers(cell: &CellValue) -> Vec<u32> {
    let text = cell.display();
    if text.is_empty() {
        return Vec::new();
    }
    if let Some((start, end)) = text.split_once('-') {
        if let (Ok(a), Ok(b)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>()) {
            if a <= b && b - a < MAX_CARTON_RANGE {
                return (a..=b).collect();
            }
        }
        return Vec::new();
    }
    match text.parse::<u32>() {
        Ok(n) => vec![n],
        Err(_) => Vec::new(),
    }
}
