use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Shipment metrics need a positive total quantity; refusing to divide
    /// rather than emitting Infinity/NaN.
    EmptyShipment { total_quantity: f64 },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Tolerance validation error.
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyShipment { total_quantity } => write!(
                f,
                "shipment metrics require total_quantity > 0, got {total_quantity}"
            ),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
