//! Generic two-set line matching by product code.

use std::collections::HashMap;

use crate::config::ToleranceConfig;
use crate::derived::derive_metrics;
use crate::model::{ComparisonRecord, DocLine};

#[derive(Debug)]
pub struct PairOutput {
    /// One record per left item that found a right item with its key.
    pub records: Vec<ComparisonRecord>,
    pub only_left: Vec<DocLine>,
    pub only_right: Vec<DocLine>,
}

/// Match two sets of lines by exact code equality (verbatim supplier
/// codes). Left order is preserved; a left item first tries its primary
/// code, then its `alt_code` — including when the primary key exists on
/// the right but its line was already consumed by an earlier left item.
/// Each right item matches at most once.
///
/// Price comparison runs only when `compare_price` is set and both sides
/// carry a unit price; otherwise the record's `matches_price` is true.
pub fn compare_lines(
    left: &[DocLine],
    right: &[DocLine],
    tolerance: &ToleranceConfig,
    compare_price: bool,
) -> PairOutput {
    // First occurrence wins on duplicate right codes; upstream aggregation
    // makes duplicates rare but supplier files are untrusted.
    let mut right_index: HashMap<&str, usize> = HashMap::new();
    for (i, line) in right.iter().enumerate() {
        right_index.entry(line.code.as_str()).or_insert(i);
    }

    let mut right_used = vec![false; right.len()];
    let mut records = Vec::new();
    let mut only_left = Vec::new();

    for line in left {
        let hit = [Some(line.code.as_str()), line.alt_code.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|key| right_index.get(key).copied())
            .find(|&i| !right_used[i]);

        match hit {
            Some(i) => {
                right_used[i] = true;
                records.push(build_record(line, &right[i], tolerance, compare_price));
            }
            None => only_left.push(line.clone()),
        }
    }

    let only_right = right
        .iter()
        .enumerate()
        .filter(|(i, _)| !right_used[*i])
        .map(|(_, l)| l.clone())
        .collect();

    PairOutput {
        records,
        only_left,
        only_right,
    }
}

fn build_record(
    left: &DocLine,
    right: &DocLine,
    tolerance: &ToleranceConfig,
    compare_price: bool,
) -> ComparisonRecord {
    let quantity_difference = (left.quantity - right.quantity).abs();
    let matches_quantity = quantity_difference <= tolerance.quantity;

    let price_difference = if compare_price {
        match (left.unit_price, right.unit_price) {
            (Some(l), Some(r)) => Some((l - r).abs()),
            _ => None,
        }
    } else {
        None
    };
    let matches_price = match price_difference {
        Some(d) => d < tolerance.price,
        None => true,
    };

    ComparisonRecord {
        code: left.code.clone(),
        derived: derive_metrics(left, right),
        left: left.clone(),
        right: right.clone(),
        quantity_difference,
        price_difference,
        matches_quantity,
        matches_price,
    }
}
