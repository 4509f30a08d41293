use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Solver configuration for value iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Discount factor. `Solver::from_config` builds with it and `Solver::solve`
    /// rejects a config that disagrees with the solver.
    pub gamma: f64,
    /// Precision target; iteration stops once the largest change drops below
    /// `eps * (1 - gamma) / gamma`.
    pub eps: f64,
    /// Run `Solver::validate` before solving.
    pub strict: bool,
    /// Allowed deviation from 1 for the probability sum of an action.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            gamma: 0.99,
            eps: 1e-10,
            strict: true,
            tolerance: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Serialize this config to YAML.
    pub fn to_yaml(&self) -> Result<String, SolverConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(SolverConfigError::Invalid(format!(
                "gamma must lie in [0, 1), got {}",
                self.gamma
            )));
        }
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(SolverConfigError::Invalid(format!(
                "eps must be finite and > 0, got {}",
                self.eps
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolverConfigError::Invalid(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug, Error)]
pub enum SolverConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid solver config: {0}")]
    Invalid(String),
}
