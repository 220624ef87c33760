//! Purchase-order CSV source.
//!
//! Orders live in the back-office system and arrive here as a CSV export,
//! one row per product line. Header names are fixed by the export; the
//! loader resolves them by position once, then projects each record.

use std::path::Path;

use maredoc_recon::PurchaseOrderItem;

use crate::CliError;

const REQUIRED: [&str; 5] = [
    "order_number",
    "internal_code",
    "supplier_code",
    "name",
    "quantity",
];

/// Load purchase-order items from a CSV file.
pub fn load_orders(path: &Path) -> Result<Vec<PurchaseOrderItem>, CliError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    parse_orders(&data)
}

/// Parse the CSV export. `total_fob` is optional in the export and is
/// derived from `quantity * fob_price` when the column is absent.
pub fn parse_orders(data: &str) -> Result<Vec<PurchaseOrderItem>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CliError::parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, CliError> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            CliError::parse(format!("orders CSV: missing column '{name}'"))
                .with_hint(format!("expected columns: {}", REQUIRED.join(", ")))
        })
    };
    let opt_idx = |name: &str| headers.iter().position(|h| h == name);

    let order_idx = idx("order_number")?;
    let internal_idx = idx("internal_code")?;
    let supplier_idx = idx("supplier_code")?;
    let name_idx = idx("name")?;
    let quantity_idx = idx("quantity")?;
    let fob_price_idx = opt_idx("fob_price");
    let total_fob_idx = opt_idx("total_fob");
    let category_idx = opt_idx("category");
    let production_time_idx = opt_idx("production_time");

    let mut items = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CliError::parse(e.to_string()))?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let opt_field = |i: Option<usize>| i.map(field).unwrap_or_default();

        let order_number = field(order_idx);
        let parse_num = |value: &str, column: &str| -> Result<f64, CliError> {
            if value.is_empty() {
                return Ok(0.0);
            }
            value.parse::<f64>().map_err(|_| {
                CliError::parse(format!(
                    "orders CSV, record {} (order '{order_number}'): cannot parse {column} '{value}'",
                    line + 1
                ))
            })
        };

        let ordered_quantity = parse_num(&field(quantity_idx), "quantity")?;
        let fob_price = parse_num(&opt_field(fob_price_idx), "fob_price")?;
        let total_fob = match total_fob_idx {
            Some(i) => parse_num(&field(i), "total_fob")?,
            None => ordered_quantity * fob_price,
        };

        items.push(PurchaseOrderItem {
            order_number,
            internal_code: field(internal_idx),
            supplier_code: field(supplier_idx),
            name: field(name_idx),
            ordered_quantity,
            fob_price,
            total_fob,
            category: opt_field(category_idx),
            production_time: opt_field(production_time_idx),
        });
    }

    Ok(items)
}
