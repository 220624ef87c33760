// maredoc CLI - supplier shipment document analysis, headless

mod analyze;
mod app_config;
mod exit_codes;
mod orders;
mod reconcile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_IO, EXIT_PARSE, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "maredoc")]
#[command(about = "Supplier shipment document analysis: invoice, packing list, purchase order")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the layout of a supplier spreadsheet and extract its line items
    #[command(after_help = "\
Examples:
  maredoc analyze invoice.xlsx
  maredoc analyze shipment.xlsx --sheet 'PACKING LIST' --json
  maredoc analyze odd-template.xlsx --config probes.toml --force")]
    Analyze {
        /// Excel file (xlsx, xls, xlsb, ods)
        file: PathBuf,

        /// Worksheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,

        /// TOML file overriding detection probe windows and tolerances
        #[arg(long)]
        config: Option<PathBuf>,

        /// Exit 0 even when detection confidence is low
        #[arg(long)]
        force: bool,
    },

    /// Reconcile an invoice against a packing list and/or purchase orders
    #[command(after_help = "\
Examples:
  maredoc reconcile --invoice inv.xlsx --packing pack.xlsx
  maredoc reconcile --invoice inv.xlsx --orders oc-104.csv --json
  maredoc reconcile --invoice inv.xlsx --packing pack.xlsx --orders oc.csv --output result.json")]
    Reconcile {
        /// Invoice workbook
        #[arg(long)]
        invoice: PathBuf,

        /// Packing-list workbook
        #[arg(long)]
        packing: Option<PathBuf>,

        /// Purchase-order CSV export
        #[arg(long)]
        orders: Option<PathBuf>,

        /// Output JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// TOML file overriding detection probe windows and tolerances
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute per-piece / per-carton shipment metrics from aggregate totals
    #[command(after_help = "\
Examples:
  maredoc metrics --quantity 15000 --weight-kg 2500.5 --cbm 12.856 --cartons 620 --fob 18500.50")]
    Metrics {
        /// Total pieces in the shipment (must be > 0)
        #[arg(long)]
        quantity: f64,

        /// Total gross weight in kilograms
        #[arg(long)]
        weight_kg: f64,

        /// Total volume in cubic meters
        #[arg(long)]
        cbm: f64,

        /// Total carton count
        #[arg(long)]
        cartons: f64,

        /// Total FOB value in dollars
        #[arg(long)]
        fob: f64,

        /// Output JSON to stdout instead of a human summary
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Map a sheet-layer error to the exit-code contract.
    pub fn sheet(err: maredoc_sheet::SheetError) -> Self {
        use maredoc_sheet::SheetError as E;
        match err {
            E::Open(_) => Self::io(err.to_string()),
            E::NoSheets | E::UnknownSheet(_) => Self::usage(err.to_string()),
            E::Read { .. } | E::TooLarge { .. } | E::ConfigParse(_) | E::ConfigValidation(_) => {
                Self::parse(err.to_string())
            }
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Analyze { file, sheet, json, config, force } => {
            analyze::cmd_analyze(file, sheet.as_deref(), json, config.as_deref(), force)
        }
        Commands::Reconcile { invoice, packing, orders, json, output, config } => {
            reconcile::cmd_reconcile(reconcile::ReconcileArgs {
                invoice,
                packing,
                orders,
                json,
                output,
                config,
            })
        }
        Commands::Metrics { quantity, weight_kg, cbm, cartons, fob, json } => {
            cmd_metrics(quantity, weight_kg, cbm, cartons, fob, json)
        }
    }
}

fn cmd_metrics(
    quantity: f64,
    weight_kg: f64,
    cbm: f64,
    cartons: f64,
    fob: f64,
    json: bool,
) -> Result<(), CliError> {
    let totals = maredoc_recon::ShipmentTotals {
        total_cartons: cartons,
        total_weight_kg: weight_kg,
        total_cbm: cbm,
        total_quantity: quantity,
        total_fob: fob,
    };
    let metrics = maredoc_recon::shipment_metrics(&totals).map_err(|e| {
        CliError::usage(e.to_string()).with_hint("pass the shipment's total piece count with --quantity")
    })?;

    if json {
        let json_str = serde_json::to_string_pretty(&metrics)
            .map_err(|e| CliError::parse(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    println!("per piece:  {:.2} g, {:.2} cm3, {:.4} USD", metrics.weight_grams_per_piece, metrics.volume_cm3_per_piece, metrics.fob_per_piece);
    println!(
        "per carton: {:.1} pcs, {:.2} kg, {:.4} m3, {:.2} USD",
        metrics.pieces_per_carton, metrics.weight_kg_per_carton, metrics.cbm_per_carton, metrics.fob_per_carton
    );
    println!(
        "ratios:     {:.4} g/cm3, {:.4} kg/USD, {:.6} m3/USD",
        metrics.density_g_per_cm3, metrics.weight_kg_per_dollar, metrics.cbm_per_dollar
    );
    Ok(())
}
