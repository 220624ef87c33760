//! Derived per-item logistics metrics and the ratio zero policy.

use serde::Serialize;

use crate::model::DocLine;

/// What a ratio yields when its denominator is zero (or non-finite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Substitute 1 for the denominator, so the ratio degrades to the
    /// numerator. Matches the legacy costing sheets this engine replaces;
    /// kept for numeric parity, not because the unit convention is sound.
    DenominatorOne,
    /// Yield 0.
    Zero,
}

/// Named ratio helper: the zero-denominator behavior is a visible policy
/// decision at every call site, never an incidental expression.
pub fn safe_ratio(numerator: f64, denominator: f64, policy: ZeroPolicy) -> f64 {
    if denominator != 0.0 && denominator.is_finite() {
        return numerator / denominator;
    }
    match policy {
        ZeroPolicy::DenominatorOne => numerator,
        ZeroPolicy::Zero => 0.0,
    }
}

/// Cost/weight/volume ratios attached to a comparison record when both the
/// priced side and the packing side are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// `unit_price / unit_weight` (USD per gram basis of the legacy sheets).
    pub cost_per_gram: f64,
    /// `total_fob / cbm`.
    pub cost_per_cbm: f64,
    /// `unit_weight / cbm`.
    pub density: f64,
}

/// Compute derived metrics for a matched pair, when the data allows.
/// Requires a unit price on one side and weight data on the other; returns
/// `None` otherwise (e.g. invoice-vs-order pairs carry no weights).
pub fn derive_metrics(left: &DocLine, right: &DocLine) -> Option<DerivedMetrics> {
    let priced = [left, right]
        .into_iter()
        .find(|l| l.unit_price.is_some())?;
    let packed = [left, right]
        .into_iter()
        .find(|l| l.unit_weight.is_some() && l.cbm.is_some())?;

    let unit_price = priced.unit_price.unwrap_or(0.0);
    let total_fob = priced.total_amount.unwrap_or(0.0);
    let unit_weight = packed.unit_weight.unwrap_or(0.0);
    let cbm = packed.cbm.unwrap_or(0.0);

    Some(DerivedMetrics {
        cost_per_gram: safe_ratio(unit_price, unit_weight, ZeroPolicy::DenominatorOne),
        cost_per_cbm: safe_ratio(total_fob, cbm, ZeroPolicy::DenominatorOne),
        density: safe_ratio(unit_weight, cbm, ZeroPolicy::DenominatorOne),
    })
}
