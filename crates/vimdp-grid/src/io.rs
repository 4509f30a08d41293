use std::{fs, path::Path};

use crate::{GridConfig, GridError, GridMdp};

/// Load a grid scenario from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<GridConfig, GridError> {
    let yaml = fs::read_to_string(path)?;
    GridConfig::from_yaml_str(&yaml)
}

/// Load a grid scenario from a YAML file and build its MDP.
pub fn build_yaml(path: impl AsRef<Path>) -> Result<GridMdp, GridError> {
    let config = load_yaml(path)?;
    config.build()
}

/// Serialize and write a grid scenario to YAML.
pub fn save_yaml(path: impl AsRef<Path>, config: &GridConfig) -> Result<(), GridError> {
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    Ok(())
}
