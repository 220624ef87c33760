//! One-call analysis façade: normalize → detect → extract → aggregate.

use std::path::Path;

use serde::Serialize;

use crate::aggregate::aggregate_packing;
use crate::detect::{detect, DetectConfig, DetectionResult, DocKind};
use crate::error::SheetError;
use crate::extract::{extract_invoice, extract_packing, InvoiceItem, PackingItem};
use crate::raw::{normalize, RawSheet};
use crate::xlsx;

/// Structured result of analyzing one sheet. Exactly one of the item lists
/// is populated; an `unknown` kind extracts best-effort invoice items and
/// the caller must treat `detection.confidence == Low` as "verify manually".
#[derive(Debug, Clone, Serialize)]
pub struct SheetAnalysis {
    pub detection: DetectionResult,
    pub invoice_items: Vec<InvoiceItem>,
    /// Aggregated: one record per distinct code.
    pub packing_items: Vec<PackingItem>,
    /// Data rows seen before aggregation.
    pub data_rows: usize,
}

/// Analyze an in-memory sheet. Stateless; consumes its input.
pub fn analyze(sheet: RawSheet, config: &DetectConfig) -> SheetAnalysis {
    let sheet = normalize(sheet);
    let detection = detect(&sheet, config);
    let data = detection.data_slice(&sheet);

    let (invoice_items, packing_items) = match detection.kind {
        DocKind::Invoice | DocKind::Unknown => (extract_invoice(data), Vec::new()),
        DocKind::Packing => (Vec::new(), aggregate_packing(&extract_packing(data))),
    };

    SheetAnalysis {
        detection,
        invoice_items,
        packing_items,
        data_rows: data.len(),
    }
}

/// Analyze a worksheet from an Excel file (first sheet unless named).
pub fn analyze_file(
    path: &Path,
    sheet_name: Option<&str>,
    config: &DetectConfig,
) -> Result<SheetAnalysis, SheetError> {
    let sheet = match sheet_name {
        Some(name) => xlsx::load_named(path, name)?,
        None => xlsx::load_sheet(path)?,
    };
    Ok(analyze(sheet, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    /// An invoice-shaped sheet the way suppliers actually send it: a
    /// letterhead block with blank rows mixed in, data, then a totals row.
    /// Blank rows are positioned so that, post-normalization, data lands at
    /// the probed offsets.
    fn invoice_sheet() -> RawSheet {
        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for i in 0..13 {
            rows.push(vec![text(&format!("SHIPPER LINE {i}"))]);
            if i % 4 == 0 {
                rows.push(vec![CellValue::Empty]); // stripped by normalize
            }
        }
        rows.push(vec![
            CellValue::Empty,
            text("LB010"),
            text("CINTO DE DAMA"),
            num(119.0),
            num(0.898),
            num(106.862),
        ]);
        for i in 0..11 {
            rows.push(vec![
                CellValue::Empty,
                text(&format!("MB{:03}", i + 1)),
                text("PULSERA DE METAL"),
                num(10.0),
                num(2.0),
                num(20.0),
            ]);
        }
        rows.push(vec![CellValue::Empty, text("SAY TOTAL US DOLLARS ONLY")]);
        RawSheet::new(rows)
    }

    fn packing_sheet() -> RawSheet {
        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for i in 0..14 {
            rows.push(vec![text(&format!("HEADER LINE {i}"))]);
        }
        let data = [
            ("1", "LB010", 60.0),
            ("2", "LB010", 40.0),
            ("3-4", "MB002", 100.0),
            ("5", "MB003", 20.0),
            ("6", "MB003", 30.0),
        ];
        for (ctn, code, qty) in data {
            rows.push(vec![
                text(ctn),
                text(code),
                text("CINTO DE DAMA"),
                num(qty),
                text("PCS"),
                num(1.0),
                num(qty),
                num(0.2),
                num(qty * 0.2),
                num(0.1),
            ]);
        }
        rows.push(vec![text("SAY TOTAL 6 CARTONS ONLY")]);
        RawSheet::new(rows)
    }

    #[test]
    fn invoice_end_to_end() {
        let analysis = analyze(invoice_sheet(), &DetectConfig::default());
        assert_eq!(analysis.detection.kind, DocKind::Invoice);
        assert_eq!(analysis.invoice_items.len(), 12);
        assert!(analysis.packing_items.is_empty());
        assert_eq!(analysis.invoice_items[0].code, "LB010");
        assert_eq!(analysis.invoice_items[0].quantity, 119.0);
    }

    #[test]
    fn packing_end_to_end_aggregates() {
        let analysis = analyze(packing_sheet(), &DetectConfig::default());
        assert_eq!(analysis.detection.kind, DocKind::Packing);
        assert_eq!(analysis.data_rows, 5);
        assert_eq!(analysis.packing_items.len(), 3);
        let lb010 = &analysis.packing_items[0];
        assert_eq!(lb010.code, "LB010");
        assert_eq!(lb010.total_quantity, 100.0);
        assert_eq!(lb010.carton_numbers, vec![1, 2]);
        let mb002 = &analysis.packing_items[1];
        assert_eq!(mb002.carton_numbers, vec![3, 4]);
    }

    #[test]
    fn unknown_sheet_extracts_best_effort() {
        let rows = (0..20)
            .map(|i| vec![text(&format!("free text {i}"))])
            .collect();
        let analysis = analyze(RawSheet::new(rows), &DetectConfig::default());
        assert_eq!(analysis.detection.kind, DocKind::Unknown);
        assert_eq!(analysis.detection.confidence, crate::detect::Confidence::Low);
        assert!(analysis.invoice_items.is_empty());
    }

    #[test]
    fn file_round_trip() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        for i in 0..13u32 {
            ws.write_string(i, 0, format!("SHIPPER LINE {i}")).unwrap();
        }
        ws.write_string(13, 1, "LB010").unwrap();
        ws.write_string(13, 2, "CINTO DE DAMA").unwrap();
        ws.write_number(13, 3, 119.0).unwrap();
        ws.write_number(13, 4, 0.898).unwrap();
        ws.write_number(13, 5, 106.862).unwrap();
        let path = dir.path().join("invoice.xlsx");
        workbook.save(&path).unwrap();

        let analysis = analyze_file(&path, None, &DetectConfig::default()).unwrap();
        assert_eq!(analysis.detection.kind, DocKind::Invoice);
        assert_eq!(analysis.invoice_items.len(), 1);
        assert_eq!(analysis.invoice_items[0].total_amount, 106.862);
    }
}
