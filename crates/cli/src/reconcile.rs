//! `maredoc reconcile` — cross-document comparison.

use std::path::{Path, PathBuf};

use serde::Serialize;

use maredoc_recon::{
    invoice_vs_packing, orders_vs_documents, orders_vs_invoice, PurchaseOrderItem,
    ReconciliationResult, ToleranceConfig,
};
use maredoc_sheet::extract::{InvoiceItem, PackingItem};
use maredoc_sheet::{analyze_file, DocKind};

use crate::app_config::AppConfig;
use crate::exit_codes::EXIT_DISCREPANCIES;
use crate::orders::load_orders;
use crate::CliError;

pub struct ReconcileArgs {
    pub invoice: PathBuf,
    pub packing: Option<PathBuf>,
    pub orders: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Combined output of one reconcile run; comparisons that did not run are
/// absent from the JSON.
#[derive(Debug, Serialize)]
struct ReconcileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    invoice_vs_packing: Option<ReconciliationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders_vs_invoice: Option<ReconciliationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders_vs_documents: Option<ReconciliationResult>,
}

pub fn cmd_reconcile(args: ReconcileArgs) -> Result<(), CliError> {
    if args.packing.is_none() && args.orders.is_none() {
        return Err(CliError::usage(
            "nothing to reconcile against: pass --packing and/or --orders",
        ));
    }

    let config = AppConfig::load(args.config.as_deref())?;

    let invoice_analysis =
        analyze_file(&args.invoice, None, &config.detect).map_err(CliError::sheet)?;
    warn_kind(&args.invoice, invoice_analysis.detection.kind, DocKind::Invoice);
    let invoice_items = invoice_analysis.invoice_items;

    let packing_items = match &args.packing {
        Some(path) => {
            let analysis = analyze_file(path, None, &config.detect).map_err(CliError::sheet)?;
            warn_kind(path, analysis.detection.kind, DocKind::Packing);
            Some(analysis.packing_items)
        }
        None => None,
    };

    let order_items = match &args.orders {
        Some(path) => Some(load_orders(path)?),
        None => None,
    };

    let report = build_report(
        &invoice_items,
        packing_items.as_deref(),
        order_items.as_deref(),
        &config.tolerance,
    );

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::parse(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    for result in report.results() {
        print_summary(result);
    }
    check_discrepancies(&report)
}

/// Run every comparison the supplied inputs allow.
fn build_report(
    invoice: &[InvoiceItem],
    packing: Option<&[PackingItem]>,
    orders: Option<&[PurchaseOrderItem]>,
    tol: &ToleranceConfig,
) -> ReconcileReport {
    ReconcileReport {
        invoice_vs_packing: packing.map(|packing| invoice_vs_packing(invoice, packing, tol)),
        orders_vs_invoice: orders.map(|orders| orders_vs_invoice(orders, invoice, tol)),
        orders_vs_documents: match (orders, packing) {
            (Some(orders), Some(packing)) => {
                Some(orders_vs_documents(orders, invoice, packing, tol))
            }
            _ => None,
        },
    }
}

impl ReconcileReport {
    fn results(&self) -> impl Iterator<Item = &ReconciliationResult> {
        [
            &self.invoice_vs_packing,
            &self.orders_vs_invoice,
            &self.orders_vs_documents,
        ]
        .into_iter()
        .flatten()
    }
}

/// Exit contract: any mismatch or unmatched item in any comparison that ran
/// means "documents differ".
fn check_discrepancies(report: &ReconcileReport) -> Result<(), CliError> {
    let clean = report.results().all(|result| {
        let s = &result.summary;
        s.quantity_mismatches == 0 && s.price_mismatches == 0 && s.only_left == 0 && s.only_right == 0
    });
    if !clean {
        return Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: "discrepancies found".into(),
            hint: None,
        });
    }
    Ok(())
}

fn warn_kind(path: &Path, got: DocKind, expected: DocKind) {
    if got != expected {
        eprintln!(
            "warning: {} detected as {got}, expected {expected}; items extracted best-effort",
            path.display()
        );
    }
}

fn print_summary(result: &ReconciliationResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} matched, {} quantity mismatches, {} price mismatches, {} left-only, {} right-only ({:.0}% consistent)",
        result.meta.comparison,
        s.matched,
        s.quantity_mismatches,
        s.price_mismatches,
        s.only_left,
        s.only_right,
        s.consistency * 100.0,
    );
    for r in &result.quantity_mismatches {
        eprintln!(
            "  qty  {:<12} {} vs {} (diff {})",
            r.code, r.left.quantity, r.right.quantity, r.quantity_difference
        );
    }
    for r in &result.price_mismatches {
        eprintln!(
            "  price {:<12} {:?} vs {:?} (diff {:?})",
            r.code, r.left.unit_price, r.right.unit_price, r.price_difference
        );
    }
    for l in &result.only_left {
        eprintln!("  only in {}: {}", l.source, l.code);
    }
    for l in &result.only_right {
        eprintln!("  only in {}: {}", l.source, l.code);
    }
}
