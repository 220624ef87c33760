//! The three comparison variants sharing one matcher.

use std::collections::HashMap;

use maredoc_sheet::extract::{InvoiceItem, PackingItem};

use crate::config::ToleranceConfig;
use crate::matcher::{compare_lines, PairOutput};
use crate::model::{
    ComparisonRecord, DocLine, PurchaseOrderItem, ReconMeta, ReconSummary,
    ReconciliationResult,
};

/// Invoice ↔ Packing List, by product code. No price comparison: packing
/// lists carry no prices.
pub fn invoice_vs_packing(
    invoice: &[InvoiceItem],
    packing: &[PackingItem],
    tolerance: &ToleranceConfig,
) -> ReconciliationResult {
    let left: Vec<DocLine> = invoice.iter().map(DocLine::from_invoice).collect();
    let right: Vec<DocLine> = packing.iter().map(DocLine::from_packing).collect();
    let out = compare_lines(&left, &right, tolerance, false);
    classify("invoice_vs_packing", out)
}

/// Purchase orders ↔ Invoice, by supplier (falling back to internal) code,
/// with price tolerance.
pub fn orders_vs_invoice(
    orders: &[PurchaseOrderItem],
    invoice: &[InvoiceItem],
    tolerance: &ToleranceConfig,
) -> ReconciliationResult {
    let left: Vec<DocLine> = orders.iter().map(DocLine::from_order).collect();
    let right: Vec<DocLine> = invoice.iter().map(DocLine::from_invoice).collect();
    let out = compare_lines(&left, &right, tolerance, true);
    classify("orders_vs_invoice", out)
}

/// Purchase orders ↔ (Invoice ∪ Packing), consolidated. Used when several
/// same-supplier orders ship together: all order lines on the left, one
/// merged document line per code on the right carrying the invoice price
/// and the packing weight/volume.
pub fn orders_vs_documents(
    orders: &[PurchaseOrderItem],
    invoice: &[InvoiceItem],
    packing: &[PackingItem],
    tolerance: &ToleranceConfig,
) -> ReconciliationResult {
    let left: Vec<DocLine> = orders.iter().map(DocLine::from_order).collect();
    let right = merge_documents(invoice, packing);
    let out = compare_lines(&left, &right, tolerance, true);
    classify("orders_vs_documents", out)
}

/// Union of invoice and packing lines keyed by code. Invoice data wins for
/// quantity and price; packing contributes weight and volume. Codes present
/// only on the packing list appear as price-less lines.
fn merge_documents(invoice: &[InvoiceItem], packing: &[PackingItem]) -> Vec<DocLine> {
    let mut lines: Vec<DocLine> = invoice.iter().map(DocLine::from_invoice).collect();
    let mut by_code: HashMap<String, usize> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.code.clone(), i))
        .collect();

    for item in packing {
        match by_code.get(&item.code) {
            Some(&i) => {
                lines[i].unit_weight = Some(item.unit_weight);
                lines[i].cbm = Some(item.cbm);
            }
            None => {
                by_code.insert(item.code.clone(), lines.len());
                lines.push(DocLine::from_packing(item));
            }
        }
    }

    lines
}

/// Split matched-key records into matched / quantity / price buckets and
/// attach the summary. A record is fully matched only when every applicable
/// tolerance holds; quantity takes precedence when both disagree.
fn classify(comparison: &str, out: PairOutput) -> ReconciliationResult {
    let mut matched: Vec<ComparisonRecord> = Vec::new();
    let mut quantity_mismatches: Vec<ComparisonRecord> = Vec::new();
    let mut price_mismatches: Vec<ComparisonRecord> = Vec::new();

    for record in out.records {
        if !record.matches_quantity {
            quantity_mismatches.push(record);
        } else if !record.matches_price {
            price_mismatches.push(record);
        } else {
            matched.push(record);
        }
    }

    let summary = summarize(
        matched.len(),
        quantity_mismatches.len(),
        price_mismatches.len(),
        out.only_left.len(),
        out.only_right.len(),
    );

    ReconciliationResult {
        meta: ReconMeta::new(comparison),
        summary,
        matched,
        quantity_mismatches,
        price_mismatches,
        only_left: out.only_left,
        only_right: out.only_right,
    }
}

fn summarize(
    matched: usize,
    quantity_mismatches: usize,
    price_mismatches: usize,
    only_left: usize,
    only_right: usize,
) -> ReconSummary {
    let total = matched + quantity_mismatches + price_mismatches + only_left + only_right;
    let consistency = if total > 0 {
        matched as f64 / total as f64
    } else {
        0.0
    };
    ReconSummary {
        matched,
        quantity_mismatches,
        price_mismatches,
        only_left,
        only_right,
        consistency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_item(code: &str, qty: f64, price: f64) -> InvoiceItem {
        InvoiceItem {
            code: code.into(),
            description: format!("{code} desc"),
            quantity: qty,
            unit_price: price,
            total_amount: qty * price,
        }
    }

    fn packing_item(code: &str, qty: f64, weight: f64, cbm: f64) -> PackingItem {
        PackingItem {
            code: code.into(),
            description: format!("{code} desc"),
            qty_per_carton: qty,
            total_cartons: 1.0,
            total_quantity: qty,
            unit_weight: if qty > 0.0 { weight / qty } else { 0.0 },
            total_weight: weight,
            cbm,
            carton_numbers: vec![1],
        }
    }

    fn order_item(order: &str, supplier: &str, internal: &str, qty: f64, price: f64) -> PurchaseOrderItem {
        PurchaseOrderItem {
            order_number: order.into(),
            internal_code: internal.into(),
            supplier_code: supplier.into(),
            name: format!("{supplier} product"),
            ordered_quantity: qty,
            fob_price: price,
            total_fob: qty * price,
            category: "cintos".into(),
            production_time: "45 dias".into(),
        }
    }

    #[test]
    fn invoice_vs_packing_buckets() {
        let invoice = vec![
            invoice_item("LB010", 119.0, 0.898),
            invoice_item("MB002", 50.0, 1.5),
            invoice_item("MB003", 25.0, 2.0),
        ];
        let packing = vec![
            packing_item("LB010", 119.0, 23.8, 0.12),
            packing_item("MB003", 20.0, 4.0, 0.05),
            packing_item("XX999", 10.0, 1.0, 0.01),
        ];
        let result = invoice_vs_packing(&invoice, &packing, &ToleranceConfig::default());

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].code, "LB010");
        assert_eq!(result.quantity_mismatches.len(), 1);
        assert_eq!(result.quantity_mismatches[0].code, "MB003");
        assert_eq!(result.quantity_mismatches[0].quantity_difference, 5.0);
        assert_eq!(result.only_left.len(), 1);
        assert_eq!(result.only_left[0].code, "MB002");
        assert_eq!(result.only_right.len(), 1);
        assert_eq!(result.only_right[0].code, "XX999");

        let s = &result.summary;
        assert_eq!(s.matched, 1);
        assert!((s.consistency - 0.25).abs() < 1e-12);
        assert_eq!(result.meta.comparison, "invoice_vs_packing");
    }

    #[test]
    fn matched_records_carry_derived_metrics() {
        let invoice = vec![invoice_item("LB010", 119.0, 0.898)];
        let packing = vec![packing_item("LB010", 119.0, 23.8, 0.12)];
        let result = invoice_vs_packing(&invoice, &packing, &ToleranceConfig::default());
        let derived = result.matched[0].derived.as_ref().unwrap();
        assert!((derived.density - (23.8 / 119.0) / 0.12).abs() < 1e-9);
    }

    #[test]
    fn orders_vs_invoice_price_classification() {
        let orders = vec![
            order_item("OC-104", "LB010", "FER-1", 119.0, 0.898),
            order_item("OC-104", "MB002", "FER-2", 50.0, 1.50),
            order_item("OC-104", "MB003", "FER-3", 25.0, 2.00),
        ];
        let invoice = vec![
            invoice_item("LB010", 119.0, 0.898), // full match
            invoice_item("MB002", 50.0, 1.65),   // price off by 0.15
            invoice_item("MB003", 30.0, 2.00),   // quantity off by 5
        ];
        let result = orders_vs_invoice(&orders, &invoice, &ToleranceConfig::default());

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.price_mismatches.len(), 1);
        assert_eq!(result.price_mismatches[0].code, "MB002");
        assert!(result.price_mismatches[0].matches_quantity);
        assert_eq!(result.quantity_mismatches.len(), 1);
        assert_eq!(result.quantity_mismatches[0].code, "MB003");
    }

    #[test]
    fn quantity_takes_precedence_over_price() {
        let orders = vec![order_item("OC-104", "LB010", "FER-1", 100.0, 1.0)];
        let invoice = vec![invoice_item("LB010", 90.0, 2.0)];
        let result = orders_vs_invoice(&orders, &invoice, &ToleranceConfig::default());
        assert_eq!(result.quantity_mismatches.len(), 1);
        assert!(result.price_mismatches.is_empty());
        let r = &result.quantity_mismatches[0];
        assert!(!r.matches_quantity);
        assert!(!r.matches_price); // both disagreements remain visible
    }

    #[test]
    fn consolidated_merges_packing_into_invoice_lines() {
        let orders = vec![
            order_item("OC-104", "LB010", "FER-1", 119.0, 0.898),
            order_item("OC-107", "MB002", "FER-2", 50.0, 1.5),
        ];
        let invoice = vec![invoice_item("LB010", 119.0, 0.898)];
        let packing = vec![
            packing_item("LB010", 119.0, 23.8, 0.12),
            packing_item("MB002", 50.0, 5.0, 0.05),
        ];
        let result =
            orders_vs_documents(&orders, &invoice, &packing, &ToleranceConfig::default());

        // LB010: invoice price + packing weight in one line → derived present.
        assert_eq!(result.matched.len(), 2);
        let lb010 = result.matched.iter().find(|r| r.code == "LB010").unwrap();
        assert!(lb010.derived.is_some());
        assert_eq!(lb010.right.unit_price, Some(0.898));
        assert_eq!(lb010.right.cbm, Some(0.12));

        // MB002 exists only on the packing list; price comparison does not
        // apply but the quantity still reconciles.
        let mb002 = result.matched.iter().find(|r| r.code == "MB002").unwrap();
        assert_eq!(mb002.right.unit_price, None);
        assert!(mb002.matches_price);
    }

    #[test]
    fn empty_inputs_yield_zero_consistency() {
        let result = invoice_vs_packing(&[], &[], &ToleranceConfig::default());
        assert_eq!(result.summary.consistency, 0.0);
        assert_eq!(result.summary.matched, 0);
    }

    #[test]
    fn result_serializes_to_json() {
        let invoice = vec![invoice_item("LB010", 119.0, 0.898)];
        let packing = vec![packing_item("LB010", 119.0, 23.8, 0.12)];
        let result = invoice_vs_packing(&invoice, &packing, &ToleranceConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"]["matched"], 1);
        assert_eq!(json["matched"][0]["code"], "LB010");
        // Price fields are absent, not null, for price-less comparisons.
        assert!(json["matched"][0].get("price_difference").is_none());
    }
}
