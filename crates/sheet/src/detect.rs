//! Heuristic layout detection for supplier Invoice / Packing List sheets.
//!
//! Supplier files carry no declared schema: headers may be absent, merged
//! across two rows, or omitted entirely. Detection is an ordered chain of
//! positional probes over a normalized sheet; the first probe that succeeds
//! wins, and an explicit fallback covers everything else. All row offsets
//! come from the probe configs rather than inline literals, so a new
//! supplier template family is a config change.

use serde::{Deserialize, Serialize};

use crate::error::SheetError;
use crate::raw::{CellValue, RawSheet};

// ---------------------------------------------------------------------------
// Column maps
// ---------------------------------------------------------------------------

/// Fixed cell indices for the invoice template family (column A reserved).
pub mod invoice_col {
    pub const ITEM_NO: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const QTY: usize = 3;
    pub const UNIT_PRICE: usize = 4;
    pub const AMOUNT: usize = 5;
}

/// Fixed cell indices for the packing-list template family (A–J populated).
pub mod packing_col {
    pub const CTN: usize = 0;
    pub const ITEM_NO: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const QTY_PER_CTN: usize = 3;
    pub const UNIT: usize = 4;
    pub const TOTAL_CTN: usize = 5;
    pub const QUANTITY: usize = 6;
    pub const UNIT_WEIGHT: usize = 7;
    pub const TOTAL_GW: usize = 8;
    pub const CBM: usize = 9;
}

/// One semantic field → cell index binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub index: usize,
    pub description: String,
}

/// A named column map for a detected document kind. Indices are unique
/// within a spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub columns: Vec<ColumnDef>,
}

impl ColumnSpec {
    fn def(name: &str, index: usize, description: &str) -> ColumnDef {
        ColumnDef {
            name: name.into(),
            index,
            description: description.into(),
        }
    }

    /// 6-column invoice shape: A reserved/empty, B–F populated.
    pub fn invoice() -> Self {
        Self {
            columns: vec![
                Self::def("ITEM", 0, "reserved, empty in observed templates"),
                Self::def("ITEM NO", invoice_col::ITEM_NO, "supplier product code"),
                Self::def("DESCRIPTION", invoice_col::DESCRIPTION, "product description"),
                Self::def("QTY", invoice_col::QTY, "invoiced quantity (pieces)"),
                Self::def("UNIT PRICE", invoice_col::UNIT_PRICE, "FOB unit price (USD)"),
                Self::def("AMOUNT", invoice_col::AMOUNT, "line total (USD)"),
            ],
        }
    }

    /// 10-column packing shape, A–J populated.
    pub fn packing() -> Self {
        Self {
            columns: vec![
                Self::def("CTN", packing_col::CTN, "carton number or range"),
                Self::def("ITEM NO", packing_col::ITEM_NO, "supplier product code"),
                Self::def("DESCRIPTION", packing_col::DESCRIPTION, "product description"),
                Self::def("Q'TY/CTN", packing_col::QTY_PER_CTN, "pieces per carton"),
                Self::def("unit", packing_col::UNIT, "unit of measure"),
                Self::def("TOTAL CTN", packing_col::TOTAL_CTN, "carton count for the row"),
                Self::def("QUANTITY", packing_col::QUANTITY, "total pieces for the row"),
                Self::def("unit weight", packing_col::UNIT_WEIGHT, "per-piece weight (kg)"),
                Self::def("TOTAL G.W", packing_col::TOTAL_GW, "gross weight for the row (kg)"),
                Self::def("CBM", packing_col::CBM, "volume for the row (m³)"),
            ],
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.index)
    }
}

// ---------------------------------------------------------------------------
// Detection result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Invoice,
    Packing,
    Unknown,
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Packing => write!(f, "packing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Structural classification of one sheet. Immutable after creation.
///
/// Row fields use `-1` for "absent": `header_row = -1` means data begins
/// with no real header row, `totals_row = -1` means no trailing totals row
/// was found, `data_start_row = -1` means no plausible data row exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub kind: DocKind,
    pub header_row: i32,
    pub data_start_row: i32,
    pub totals_row: i32,
    pub columns: ColumnSpec,
    pub confidence: Confidence,
}

impl DetectionResult {
    /// The data rows the extractor may see: `[data_start_row, totals_row)`
    /// when a totals row exists, `[data_start_row, len)` otherwise. The
    /// totals row and anything after it must never reach the extractor.
    pub fn data_slice<'a>(&self, sheet: &'a RawSheet) -> &'a [Vec<CellValue>] {
        if self.data_start_row < 0 {
            return &[];
        }
        let start = self.data_start_row as usize;
        if start >= sheet.len() {
            return &[];
        }
        let end = if self.totals_row > 0 && (self.totals_row as usize) <= sheet.len() {
            self.totals_row as usize
        } else {
            sheet.len()
        };
        if end <= start {
            return &[];
        }
        &sheet.rows[start..end]
    }
}

// ---------------------------------------------------------------------------
// Probe configuration
// ---------------------------------------------------------------------------

/// Window constants for the invoice probe. Defaults encode the observed
/// supplier template family: first plausible data row at index 13, data
/// scan window 12..=19, totals search starting 10 rows into the data.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InvoiceProbeConfig {
    pub probe_row: usize,
    pub scan_start: usize,
    pub scan_end: usize,
    pub totals_search_offset: usize,
}

impl Default for InvoiceProbeConfig {
    fn default() -> Self {
        Self {
            probe_row: 13,
            scan_start: 12,
            scan_end: 19,
            totals_search_offset: 10,
        }
    }
}

/// Window constants for the packing probe. The known templates carry a
/// two-row combined header at rows 13–14, with data from row 15.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PackingProbeConfig {
    pub probe_row: usize,
    pub header_row: usize,
    pub scan_start: usize,
    pub scan_end: usize,
    pub totals_search_offset: usize,
}

impl Default for PackingProbeConfig {
    fn default() -> Self {
        Self {
            probe_row: 15,
            header_row: 13,
            scan_start: 14,
            scan_end: 19,
            totals_search_offset: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectConfig {
    pub invoice: InvoiceProbeConfig,
    pub packing: PackingProbeConfig,
}

impl DetectConfig {
    pub fn from_toml(input: &str) -> Result<Self, SheetError> {
        let config: DetectConfig =
            toml::from_str(input).map_err(|e| SheetError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SheetError> {
        if self.invoice.scan_start > self.invoice.scan_end {
            return Err(SheetError::ConfigValidation(format!(
                "invoice scan window is inverted: {}..={}",
                self.invoice.scan_start, self.invoice.scan_end
            )));
        }
        if self.packing.scan_start > self.packing.scan_end {
            return Err(SheetError::ConfigValidation(format!(
                "packing scan window is inverted: {}..={}",
                self.packing.scan_start, self.packing.scan_end
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

/// The ordered probe chain. First success wins; `Fallback` always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Invoice,
    Packing,
    Fallback,
}

const PROBE_ORDER: [Probe; 3] = [Probe::Invoice, Probe::Packing, Probe::Fallback];

/// Classify the sheet and locate its structural rows.
///
/// Deterministic: a fixed sheet always yields the same result. Never fails;
/// an undetectable layout degrades to `DocKind::Unknown` with
/// `Confidence::Low` and the invoice column shape as a best-effort default.
pub fn detect(sheet: &RawSheet, config: &DetectConfig) -> DetectionResult {
    for probe in PROBE_ORDER {
        let result = match probe {
            Probe::Invoice => probe_invoice(sheet, &config.invoice),
            Probe::Packing => probe_packing(sheet, &config.packing),
            Probe::Fallback => Some(fallback(config)),
        };
        if let Some(result) = result {
            return result;
        }
    }
    unreachable!("fallback probe always yields a result")
}

fn fallback(config: &DetectConfig) -> DetectionResult {
    DetectionResult {
        kind: DocKind::Unknown,
        header_row: config.packing.header_row as i32,
        data_start_row: config.packing.header_row as i32 + 1,
        totals_row: -1,
        columns: ColumnSpec::invoice(),
        confidence: Confidence::Low,
    }
}

// ---------------------------------------------------------------------------
// Cell predicates
// ---------------------------------------------------------------------------

/// Prefix match for supplier item codes: two uppercase letters followed by
/// a digit (e.g. `LB010`, `MB002-A`). Prefix only, not a full-string match.
fn is_code(cell: &CellValue) -> bool {
    let Some(text) = cell.text() else {
        return false;
    };
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(a), Some(b), Some(c))
            if a.is_ascii_uppercase() && b.is_ascii_uppercase() && c.is_ascii_digit()
    )
}

/// Finite number strictly greater than zero. NaN and infinities fail.
fn is_positive_number(cell: &CellValue) -> bool {
    cell.number().is_some_and(|n| n > 0.0)
}

/// Character count, not byte count; descriptions are Spanish and carry
/// accented letters.
fn is_long_text(cell: &CellValue, min_len: usize) -> bool {
    cell.text().is_some_and(|t| t.chars().count() > min_len)
}

/// Lowercased concatenation of a row's text content, for totals scanning.
fn row_text(row: &[CellValue]) -> String {
    let mut out = String::new();
    for cell in row {
        out.push_str(&cell.display());
        out.push(' ');
    }
    out.to_lowercase()
}

// ---------------------------------------------------------------------------
// Invoice probe
// ---------------------------------------------------------------------------

/// Minimal signature of an invoice data row: code, quantity, unit price.
fn is_invoice_data_row(sheet: &RawSheet, row: usize) -> bool {
    is_code(sheet.cell(row, invoice_col::ITEM_NO))
        && is_positive_number(sheet.cell(row, invoice_col::QTY))
        && is_positive_number(sheet.cell(row, invoice_col::UNIT_PRICE))
}

fn probe_invoice(sheet: &RawSheet, config: &InvoiceProbeConfig) -> Option<DetectionResult> {
    let row = config.probe_row;
    let plausible = is_code(sheet.cell(row, invoice_col::ITEM_NO))
        && is_long_text(sheet.cell(row, invoice_col::DESCRIPTION), 5)
        && is_positive_number(sheet.cell(row, invoice_col::QTY))
        && is_positive_number(sheet.cell(row, invoice_col::UNIT_PRICE));
    if !plausible {
        return None;
    }

    let data_start_row = (config.scan_start..=config.scan_end)
        .find(|&r| is_invoice_data_row(sheet, r))
        .map(|r| r as i32)
        .unwrap_or(-1);

    let totals_row = if data_start_row >= 0 {
        find_totals_row(
            sheet,
            data_start_row as usize + config.totals_search_offset,
            |text| {
                text.contains("total") || text.contains("say total") || text.contains("dollar")
            },
        )
    } else {
        -1
    };

    Some(DetectionResult {
        kind: DocKind::Invoice,
        // No real header row exists in this family; data begins immediately.
        header_row: -1,
        data_start_row,
        totals_row,
        columns: ColumnSpec::invoice(),
        confidence: Confidence::High,
    })
}

// ---------------------------------------------------------------------------
// Packing probe
// ---------------------------------------------------------------------------

/// Minimal signature of a packing data row: carton number, code, CBM.
fn is_packing_data_row(sheet: &RawSheet, row: usize) -> bool {
    is_positive_number(sheet.cell(row, packing_col::CTN))
        && is_code(sheet.cell(row, packing_col::ITEM_NO))
        && is_positive_number(sheet.cell(row, packing_col::CBM))
}

fn probe_packing(sheet: &RawSheet, config: &PackingProbeConfig) -> Option<DetectionResult> {
    let row = config.probe_row;
    let plausible = is_positive_number(sheet.cell(row, packing_col::CTN))
        && is_code(sheet.cell(row, packing_col::ITEM_NO))
        && is_long_text(sheet.cell(row, packing_col::DESCRIPTION), 5)
        && is_positive_number(sheet.cell(row, packing_col::QTY_PER_CTN))
        && is_positive_number(sheet.cell(row, packing_col::CBM));
    if !plausible {
        return None;
    }

    let data_start_row = (config.scan_start..=config.scan_end)
        .find(|&r| is_packing_data_row(sheet, r))
        .map(|r| r as i32)
        .unwrap_or(-1);

    let totals_row = if data_start_row >= 0 {
        find_totals_row(
            sheet,
            data_start_row as usize + config.totals_search_offset,
            |text| text.contains("total") && (text.contains("cartons") || text.contains("say")),
        )
    } else {
        -1
    };

    Some(DetectionResult {
        kind: DocKind::Packing,
        header_row: config.header_row as i32,
        data_start_row,
        totals_row,
        columns: ColumnSpec::packing(),
        confidence: Confidence::High,
    })
}

fn find_totals_row(sheet: &RawSheet, from: usize, matches: impl Fn(&str) -> bool) -> i32 {
    (from..sheet.len())
        .find(|&r| sheet.row(r).is_some_and(|row| matches(&row_text(row))))
        .map(|r| r as i32)
        .unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
