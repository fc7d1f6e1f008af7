use std::path::Path;

use crate::executor::types::ExecutorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config is neither valid JSON nor YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExecutorConfig {
    /// Parses a JSON document, falling back to YAML. Missing fields take their
    /// defaults and out-of-range values are kept as-is, to be normalized at
    /// run time.
    pub fn from_str_auto(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        if let Ok(config) = serde_json::from_str(content) {
            return Ok(config);
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str_auto(&content)
    }
}
