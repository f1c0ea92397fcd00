use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use std::path::Path;

use super::paths::config_dir;
use crate::domain::error::DomainError;
use crate::domain::repository::Result;

// Embed the entire configs directory at compile time
static CONFIGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/configs");

/// Load a YAML configuration file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Config(format!("cannot read {:?}: {}", path, e)))?;
    parse_yaml(&content)
}

/// Parse YAML from string
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| DomainError::Config(e.to_string()))
}

/// Load a config by name: the user's copy in the config directory wins,
/// then the embedded default, then `T::default()`
pub fn load_config<T: DeserializeOwned + Default>(name: &str) -> T {
    let user_path = config_dir().join(format!("{}.yaml", name));

    if user_path.exists() {
        match load_yaml::<T>(&user_path) {
            Ok(config) => {
                tracing::info!("Loaded config {} from {:?}", name, user_path);
                return config;
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}, using embedded defaults", user_path, e);
            }
        }
    }

    load_embedded_config(name)
}

/// Load embedded configuration by name from the configs directory
pub fn load_embedded_config<T: DeserializeOwned + Default>(name: &str) -> T {
    let file_name = format!("{}.yaml", name);

    let Some(file) = CONFIGS_DIR.get_file(&file_name) else {
        tracing::warn!("Embedded config {} not found, using defaults", name);
        return T::default();
    };

    let Some(content) = file.contents_utf8() else {
        tracing::error!("Embedded config {} is not valid UTF-8", name);
        return T::default();
    };

    match parse_yaml::<T>(content) {
        Ok(config) => {
            tracing::debug!("Loaded embedded config: {}", name);
            config
        }
        Err(e) => {
            tracing::error!("Failed to parse embedded config {}: {}", name, e);
            T::default()
        }
    }
}
