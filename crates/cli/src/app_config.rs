//! Optional TOML config shared by the analyze/reconcile commands.
//!
//! ```toml
//! [detect.invoice]
//! probe_row = 13
//!
//! [detect.packing]
//! totals_search_offset = 5
//!
//! [tolerance]
//! price = 0.01
//! ```

use std::path::Path;

use serde::Deserialize;

use maredoc_recon::ToleranceConfig;
use maredoc_sheet::DetectConfig;

use crate::CliError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detect: DetectConfig,
    pub tolerance: ToleranceConfig,
}

impl AppConfig {
    /// Load from `path`, or defaults when no config file was given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let input = std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
        let config: AppConfig = toml::from_str(&input)
            .map_err(|e| CliError::parse(format!("{}: {e}", path.display())))?;
        config
            .detect
            .validate()
            .map_err(|e| CliError::parse(e.to_string()))?;
        config
            .tolerance
            .validate()
            .map_err(|e| CliError::parse(e.to_string()))?;
        Ok(config)
    }
}
