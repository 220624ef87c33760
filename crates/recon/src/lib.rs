//! `maredoc-recon` — cross-document reconciliation for supplier shipments.
//!
//! Pure engine crate: receives extracted line items and purchase-order
//! records, returns classified comparison results and derived logistics
//! metrics. No CLI or file IO dependencies.

pub mod config;
pub mod derived;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod model;

pub use config::ToleranceConfig;
pub use engine::{invoice_vs_packing, orders_vs_documents, orders_vs_invoice};
pub use error::ReconError;
pub use metrics::{shipment_metrics, ShipmentMetrics, ShipmentTotals};
pub use model::{ComparisonRecord, DocLine, PurchaseOrderItem, ReconciliationResult};
