use serde::Deserialize;

use crate::error::ReconError;

/// Matching tolerances. Quantities compare exactly by default; the price
/// tolerance absorbs the rounding noise suppliers introduce when they echo
/// FOB prices back on invoices.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    pub quantity: f64,
    pub price: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            quantity: 0.0,
            price: 0.01,
        }
    }
}

impl ToleranceConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ToleranceConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.quantity < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "quantity tolerance must be >= 0, got {}",
                self.quantity
            )));
        }
        if self.price < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "price tolerance must be >= 0, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = ToleranceConfig::default();
        assert_eq!(t.quantity, 0.0);
        assert_eq!(t.price, 0.01);
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let t = ToleranceConfig::from_toml("quantity = 1.0").unwrap();
        assert_eq!(t.quantity, 1.0);
        assert_eq!(t.price, 0.01);
    }

    #[test]
    fn reject_negative_tolerance() {
        let err = ToleranceConfig::from_toml("price = -0.5").unwrap_err();
        assert!(err.to_string().contains("price tolerance"));
    }
}
