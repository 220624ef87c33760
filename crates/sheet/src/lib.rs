//! `maredoc-sheet` — supplier shipment document ingestion.
//!
//! Reads supplier-provided Invoice and Packing List spreadsheets of unknown,
//! inconsistent layout, locates their tabular structure with positional
//! probes, and extracts typed line items. Only the xlsx loader touches the
//! filesystem; everything else is pure in-memory transformation.

pub mod aggregate;
pub mod analyze;
pub mod detect;
pub mod error;
pub mod extract;
pub mod raw;
pub mod xlsx;

pub use analyze::{analyze, analyze_file, SheetAnalysis};
pub use detect::{detect, DetectConfig, DetectionResult, DocKind};
pub use error::SheetError;
pub use raw::{normalize, CellValue, RawSheet};
