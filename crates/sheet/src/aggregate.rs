//! Packing-list aggregation.
//!
//! Supplier packing lists repeat a product code across rows, one row per
//! carton range. Downstream reconciliation wants one logical record per
//! code, so repeated rows collapse into an aggregate that sums quantities,
//! cartons, weights and volume and concatenates the expanded carton numbers.

use std::collections::HashMap;

use crate::extract::PackingItem;

/// Collapse repeated packing rows into one record per distinct code.
///
/// Output order is first-occurrence order: an arena of aggregates plus a
/// code → arena-index map, filled in one linear pass. `unit_weight` is
/// recomputed post-aggregation as `total_weight / total_quantity` (0 when
/// the quantity is 0).
pub fn aggregate_packing(items: &[PackingItem]) -> Vec<PackingItem> {
    let mut arena: Vec<PackingItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        match index.get(&item.code) {
            Some(&i) => {
                let agg = &mut arena[i];
                agg.total_quantity += item.total_quantity;
                agg.total_cartons += item.total_cartons;
                agg.total_weight += item.total_weight;
                agg.cbm += item.cbm;
                agg.carton_numbers.extend_from_slice(&item.carton_numbers);
            }
            None => {
                index.insert(item.code.clone(), arena.len());
                arena.push(item.clone());
            }
        }
    }

    for agg in &mut arena {
        agg.unit_weight = if agg.total_quantity > 0.0 {
            agg.total_weight / agg.total_quantity
        } else {
            0.0
        };
    }

    arena
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, qty: f64, cartons: f64, weight: f64, cbm: f64, ctns: Vec<u32>) -> PackingItem {
        PackingItem {
            code: code.into(),
            description: format!("{code} description"),
            qty_per_carton: if cartons > 0.0 { qty / cartons } else { 0.0 },
            total_cartons: cartons,
            total_quantity: qty,
            unit_weight: 0.0,
            total_weight: weight,
            cbm,
            carton_numbers: ctns,
        }
    }

    #[test]
    fn sums_repeated_codes() {
        // LB010 split over two carton ranges: 60 + 40 pieces.
        let rows = vec![
            item("LB010", 60.0, 2.0, 12.0, 0.12, vec![1, 2]),
            item("MB002", 50.0, 1.0, 5.0, 0.05, vec![3]),
            item("LB010", 40.0, 1.0, 8.0, 0.08, vec![4]),
        ];
        let aggs = aggregate_packing(&rows);
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].code, "LB010");
        assert_eq!(aggs[0].total_quantity, 100.0);
        assert_eq!(aggs[0].total_cartons, 3.0);
        assert_eq!(aggs[0].total_weight, 20.0);
        assert!((aggs[0].cbm - 0.2).abs() < 1e-12);
        assert_eq!(aggs[0].carton_numbers, vec![1, 2, 4]);
    }

    #[test]
    fn first_occurrence_order_kept() {
        let rows = vec![
            item("ZB900", 1.0, 1.0, 1.0, 0.01, vec![1]),
            item("AB100", 1.0, 1.0, 1.0, 0.01, vec![2]),
            item("ZB900", 1.0, 1.0, 1.0, 0.01, vec![3]),
        ];
        let aggs = aggregate_packing(&rows);
        let codes: Vec<&str> = aggs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["ZB900", "AB100"]);
    }

    #[test]
    fn unit_weight_recomputed() {
        let rows = vec![
            item("LB010", 60.0, 2.0, 12.0, 0.12, vec![]),
            item("LB010", 40.0, 1.0, 8.0, 0.08, vec![]),
        ];
        let aggs = aggregate_packing(&rows);
        // 20 kg over 100 pieces
        assert!((aggs[0].unit_weight - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_quantity_guards_unit_weight() {
        let rows = vec![item("LB010", 0.0, 0.0, 5.0, 0.0, vec![])];
        let aggs = aggregate_packing(&rows);
        assert_eq!(aggs[0].unit_weight, 0.0);
    }

    #[test]
    fn quantity_is_conserved() {
        let rows = vec![
            item("LB010", 60.0, 2.0, 12.0, 0.12, vec![]),
            item("MB002", 50.0, 1.0, 5.0, 0.05, vec![]),
            item("LB010", 40.0, 1.0, 8.0, 0.08, vec![]),
            item("MB002", 25.0, 1.0, 2.5, 0.02, vec![]),
        ];
        let raw_total: f64 = rows.iter().map(|r| r.total_quantity).sum();
        let aggs = aggregate_packing(&rows);
        let agg_total: f64 = aggs.iter().map(|a| a.total_quantity).sum();
        assert_eq!(raw_total, agg_total);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_packing(&[]).is_empty());
    }
}
