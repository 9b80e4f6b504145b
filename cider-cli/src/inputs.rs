//! Simulation inputs read from a TOML file.
//!
//! ```toml
//! [simulation]        # optional
//! years = 11
//! base_volume = 1000
//!
//! [template]          # every CostTemplate field
//! juice_per_liter = 8
//! # ...
//!
//! [scenario]          # optional, defaults to the baseline scenario
//! demand_growth_yearly = 50
//! # ...
//! ```

use std::path::{Path, PathBuf};

use cider_core::calculations::{DEFAULT_BASE_VOLUME_LITERS, DEFAULT_PROJECTION_YEARS};
use cider_core::{CostScenario, CostTemplate, InputValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid inputs file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid input: {0}")]
    Invalid(#[from] InputValidationError),
}

/// The `[simulation]` table. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    pub years: Option<u32>,
    pub base_volume: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputFile {
    #[serde(default)]
    pub simulation: SimulationSettings,
    pub template: CostTemplate,
    #[serde(default)]
    pub scenario: CostScenario,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationInputs {
    pub template: CostTemplate,
    pub scenario: CostScenario,
    pub years: u32,
    pub base_volume: Decimal,
}

impl InputFile {
    pub fn parse(text: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, InputError> {
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Applies command-line overrides, then the file's `[simulation]` table,
    /// then the defaults.
    pub fn resolve(
        self,
        years: Option<u32>,
        base_volume: Option<Decimal>,
    ) -> SimulationInputs {
        SimulationInputs {
            years: years
                .or(self.simulation.years)
                .unwrap_or(DEFAULT_PROJECTION_YEARS),
            base_volume: base_volume
                .or(self.simulation.base_volume)
                .unwrap_or(DEFAULT_BASE_VOLUME_LITERS),
            template: self.template,
            scenario: self.scenario,
        }
    }
}

impl SimulationInputs {
    pub fn validate(&self) -> Result<(), InputError> {
        self.template.validate()?;
        self.scenario.validate()?;
        if self.base_volume < Decimal::ZERO {
            return Err(InputValidationError::Negative {
                field: "base_volume",
                value: self.base_volume,
            }
            .into());
        }
        Ok(())
    }
}
