//! Shipment-level derived metrics.
//!
//! Computed from manually entered or matched aggregate totals. A shipment
//! without pieces has no per-piece figures to offer, so a non-positive
//! quantity is a refused precondition, not a silent zero; every other zero
//! denominator yields 0 rather than dividing.

use serde::{Deserialize, Serialize};

use crate::derived::{safe_ratio, ZeroPolicy};
use crate::error::ReconError;

/// Aggregate totals for one shipment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ShipmentTotals {
    pub total_cartons: f64,
    pub total_weight_kg: f64,
    pub total_cbm: f64,
    pub total_quantity: f64,
    pub total_fob: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShipmentMetrics {
    // Per piece
    pub weight_grams_per_piece: f64,
    pub volume_cm3_per_piece: f64,
    pub fob_per_piece: f64,
    // Per carton
    pub pieces_per_carton: f64,
    pub weight_kg_per_carton: f64,
    pub cbm_per_carton: f64,
    pub fob_per_carton: f64,
    // Ratios
    pub density_g_per_cm3: f64,
    pub weight_kg_per_dollar: f64,
    pub cbm_per_dollar: f64,
}

const GRAMS_PER_KG: f64 = 1_000.0;
const CM3_PER_CBM: f64 = 1_000_000.0;

pub fn shipment_metrics(totals: &ShipmentTotals) -> Result<ShipmentMetrics, ReconError> {
    if !(totals.total_quantity > 0.0) {
        return Err(ReconError::EmptyShipment {
            total_quantity: totals.total_quantity,
        });
    }

    let qty = totals.total_quantity;
    let grams = totals.total_weight_kg * GRAMS_PER_KG;
    let cm3 = totals.total_cbm * CM3_PER_CBM;

    Ok(ShipmentMetrics {
        weight_grams_per_piece: grams / qty,
        volume_cm3_per_piece: cm3 / qty,
        fob_per_piece: totals.total_fob / qty,
        pieces_per_carton: safe_ratio(qty, totals.total_cartons, ZeroPolicy::Zero),
        weight_kg_per_carton: safe_ratio(
            totals.total_weight_kg,
            totals.total_cartons,
            ZeroPolicy::Zero,
        ),
        cbm_per_carton: safe_ratio(totals.total_cbm, totals.total_cartons, ZeroPolicy::Zero),
        fob_per_carton: safe_ratio(totals.total_fob, totals.total_cartons, ZeroPolicy::Zero),
        density_g_per_cm3: safe_ratio(grams, cm3, ZeroPolicy::Zero),
        weight_kg_per_dollar: safe_ratio(totals.total_weight_kg, totals.total_fob, ZeroPolicy::Zero),
        cbm_per_dollar: safe_ratio(totals.total_cbm, totals.total_fob, ZeroPolicy::Zero),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Figures from a typical consolidated shipment.
    fn totals() -> ShipmentTotals {
        ShipmentTotals {
            total_cartons: 620.0,
            total_weight_kg: 2500.5,
            total_cbm: 12.856,
            total_quantity: 15000.0,
            total_fob: 18500.50,
        }
    }

    #[test]
    fn per_piece_metrics() {
        let m = shipment_metrics(&totals()).unwrap();
        assert!((m.weight_grams_per_piece - 166.7).abs() < 1e-9);
        assert!((m.fob_per_piece - 1.2333666666666667).abs() < 1e-12);
        assert!((m.volume_cm3_per_piece - 12.856e6 / 15000.0).abs() < 1e-9);
    }

    #[test]
    fn per_carton_metrics() {
        let m = shipment_metrics(&totals()).unwrap();
        assert!((m.pieces_per_carton - 15000.0 / 620.0).abs() < 1e-9);
        assert!((m.fob_per_carton - 18500.50 / 620.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_metrics() {
        let m = shipment_metrics(&totals()).unwrap();
        assert!((m.density_g_per_cm3 - 2_500_500.0 / 12_856_000.0).abs() < 1e-12);
        assert!((m.weight_kg_per_dollar - 2500.5 / 18500.50).abs() < 1e-12);
    }

    #[test]
    fn zero_quantity_is_refused() {
        let t = ShipmentTotals {
            total_quantity: 0.0,
            ..totals()
        };
        let err = shipment_metrics(&t).unwrap_err();
        assert!(matches!(err, ReconError::EmptyShipment { .. }));

        let t = ShipmentTotals {
            total_quantity: -5.0,
            ..totals()
        };
        assert!(shipment_metrics(&t).is_err());
    }

    #[test]
    fn nan_quantity_is_refused() {
        let t = ShipmentTotals {
            total_quantity: f64::NAN,
            ..totals()
        };
        assert!(shipment_metrics(&t).is_err());
    }

    #[test]
    fn zero_denominators_yield_zero_not_infinity() {
        let t = ShipmentTotals {
            total_cartons: 0.0,
            total_cbm: 0.0,
            total_fob: 0.0,
            total_weight_kg: 2500.5,
            total_quantity: 15000.0,
        };
        let m = shipment_metrics(&t).unwrap();
        assert_eq!(m.pieces_per_carton, 0.0);
        assert_eq!(m.density_g_per_cm3, 0.0);
        assert_eq!(m.weight_kg_per_dollar, 0.0);
        assert_eq!(m.cbm_per_dollar, 0.0);
        assert!(m.weight_grams_per_piece.is_finite());
    }
}
