use serde::Serialize;

use maredoc_sheet::extract::{InvoiceItem, PackingItem};

use crate::derived::DerivedMetrics;

// ---------------------------------------------------------------------------
// Purchase orders
// ---------------------------------------------------------------------------

/// One product line of an internally authored purchase order (OC).
/// Sourced externally; read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderItem {
    pub order_number: String,
    pub internal_code: String,
    pub supplier_code: String,
    pub name: String,
    pub ordered_quantity: f64,
    pub fob_price: f64,
    pub total_fob: f64,
    pub category: String,
    pub production_time: String,
}

// ---------------------------------------------------------------------------
// Normalized comparison lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocSource {
    Invoice,
    Packing,
    Order,
}

impl std::fmt::Display for DocSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Packing => write!(f, "packing"),
            Self::Order => write!(f, "order"),
        }
    }
}

/// A line item lifted into the shape the matcher compares. `code` is the
/// supplier-provided product code, verbatim: no normalization and no
/// case-folding, matching how suppliers echo codes back on their documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocLine {
    pub source: DocSource,
    pub code: String,
    /// Secondary lookup key. For order lines this is the internal code,
    /// consulted when the primary finds nothing on the other side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_code: Option<String>,
    pub description: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cbm: Option<f64>,
    /// Order reference when the line came from a purchase order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

impl DocLine {
    pub fn from_invoice(item: &InvoiceItem) -> Self {
        Self {
            source: DocSource::Invoice,
            code: item.code.clone(),
            alt_code: None,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: Some(item.unit_price),
            total_amount: Some(item.total_amount),
            unit_weight: None,
            cbm: None,
            order_number: None,
        }
    }

    pub fn from_packing(item: &PackingItem) -> Self {
        Self {
            source: DocSource::Packing,
            code: item.code.clone(),
            alt_code: None,
            description: item.description.clone(),
            quantity: item.total_quantity,
            unit_price: None,
            total_amount: None,
            unit_weight: Some(item.unit_weight),
            cbm: Some(item.cbm),
            order_number: None,
        }
    }

    /// Order lines key on the supplier code, falling back to the internal
    /// code when the supplier code is empty; the unused code stays
    /// available as `alt_code` so both sides of an OC product can be
    /// searched against the documents.
    pub fn from_order(item: &PurchaseOrderItem) -> Self {
        let (code, alt_code) = if item.supplier_code.trim().is_empty() {
            (item.internal_code.clone(), None)
        } else {
            (item.supplier_code.clone(), Some(item.internal_code.clone()))
        };
        Self {
            source: DocSource::Order,
            code,
            alt_code: alt_code.filter(|c| !c.trim().is_empty()),
            description: item.name.clone(),
            quantity: item.ordered_quantity,
            unit_price: Some(item.fob_price),
            total_amount: Some(item.total_fob),
            unit_weight: None,
            cbm: None,
            order_number: Some(item.order_number.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison records
// ---------------------------------------------------------------------------

/// One matched key pair plus its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRecord {
    pub code: String,
    pub left: DocLine,
    pub right: DocLine,
    /// `|left.quantity − right.quantity|`
    pub quantity_difference: f64,
    /// `|left price − right price|`; absent when either side has no price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_difference: Option<f64>,
    pub matches_quantity: bool,
    /// True when prices coincide within tolerance. Also true when price
    /// comparison does not apply to this pairing.
    pub matches_price: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedMetrics>,
}

// ---------------------------------------------------------------------------
// Result + summary
// ---------------------------------------------------------------------------

/// Buckets of one comparison invocation. Created fresh per call; every left
/// item with a match lands in exactly one of the three record lists.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub matched: Vec<ComparisonRecord>,
    pub quantity_mismatches: Vec<ComparisonRecord>,
    pub price_mismatches: Vec<ComparisonRecord>,
    pub only_left: Vec<DocLine>,
    pub only_right: Vec<DocLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub matched: usize,
    pub quantity_mismatches: usize,
    pub price_mismatches: usize,
    pub only_left: usize,
    pub only_right: usize,
    /// `matched / (matched + mismatches + only_left + only_right)`;
    /// 0 when there is nothing to compare.
    pub consistency: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    /// Which comparison ran, e.g. `invoice_vs_packing`.
    pub comparison: String,
    pub engine_version: String,
    pub run_at: String,
}

impl ReconMeta {
    pub fn new(comparison: &str) -> Self {
        Self {
            comparison: comparison.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
