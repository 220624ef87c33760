//! `maredoc analyze` — single-sheet layout detection and extraction.

use std::path::Path;

use maredoc_sheet::{analyze_file, DocKind, SheetAnalysis};
use maredoc_sheet::detect::Confidence;

use crate::app_config::AppConfig;
use crate::exit_codes::EXIT_LOW_CONFIDENCE;
use crate::CliError;

pub fn cmd_analyze(
    file: impl AsRef<Path>,
    sheet: Option<&str>,
    json: bool,
    config_path: Option<&Path>,
    force: bool,
) -> Result<(), CliError> {
    let config = AppConfig::load(config_path)?;
    let analysis = analyze_file(file.as_ref(), sheet, &config.detect).map_err(CliError::sheet)?;

    if json {
        let json_str = serde_json::to_string_pretty(&analysis)
            .map_err(|e| CliError::parse(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print_summary(&analysis);
    }

    check_confidence(&analysis.detection, force)
}

/// Exit contract: a low-confidence detection is reported but fails the run
/// unless the caller forces it through.
fn check_confidence(
    detection: &maredoc_sheet::DetectionResult,
    force: bool,
) -> Result<(), CliError> {
    if detection.confidence == Confidence::Low && !force {
        return Err(CliError {
            code: EXIT_LOW_CONFIDENCE,
            message: "layout detection fell back to low confidence".into(),
            hint: Some("verify the extracted items manually, or rerun with --force".into()),
        });
    }
    Ok(())
}

fn print_summary(analysis: &SheetAnalysis) {
    let d = &analysis.detection;
    eprintln!(
        "detected {} (confidence {:?}): data rows {}..{}, {} data row(s)",
        d.kind,
        d.confidence,
        d.data_start_row,
        if d.totals_row > 0 { d.totals_row.to_string() } else { "end".into() },
        analysis.data_rows,
    );

    match d.kind {
        DocKind::Invoice | DocKind::Unknown => {
            let total: f64 = analysis.invoice_items.iter().map(|i| i.total_amount).sum();
            let pieces: f64 = analysis.invoice_items.iter().map(|i| i.quantity).sum();
            println!(
                "{} invoice item(s), {pieces} pcs, {total:.2} USD",
                analysis.invoice_items.len()
            );
            for item in &analysis.invoice_items {
                println!(
                    "  {:<12} {:<30} {:>8} x {:>8.3} = {:>10.2}",
                    item.code, item.description, item.quantity, item.unit_price, item.total_amount
                );
            }
        }
        DocKind::Packing => {
            let pieces: f64 = analysis.packing_items.iter().map(|i| i.total_quantity).sum();
            let weight: f64 = analysis.packing_items.iter().map(|i| i.total_weight).sum();
            let cbm: f64 = analysis.packing_items.iter().map(|i| i.cbm).sum();
            println!(
                "{} packing item(s), {pieces} pcs, {weight:.2} kg, {cbm:.3} m3",
                analysis.packing_items.len()
            );
            for item in &analysis.packing_items {
                println!(
                    "  {:<12} {:>8} pcs {:>8} ctn {:>8.2} kg {:>7.3} m3  cartons {:?}",
                    item.code,
                    item.total_quantity,
                    item.total_cartons,
                    item.total_weight,
                    item.cbm,
                    item.carton_numbers,
                );
            }
        }
    }
}
