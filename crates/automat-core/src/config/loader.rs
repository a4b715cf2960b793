use super::schema::AutomatConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./automat.yaml
    /// 2. ~/.automat/config.yaml
    /// 3. Default configuration
    pub fn load_default() -> Result<AutomatConfig, ConfigError> {
        let local_config = PathBuf::from("./automat.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".automat").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config);
            }
        }

        Ok(AutomatConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<AutomatConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AutomatConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
