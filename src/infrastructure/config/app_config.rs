use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::paths;
use crate::domain::model::GroupDeletePolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: EnvironmentConfig,
    pub backend: BackendConfig,
    pub window: WindowConfig,
    pub api: ApiConfig,
    pub store: StoreConfig,
}

/// How development mode is detected from the process environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Variable holding the environment name
    pub variable: String,
    /// Value of `variable` that enables development mode
    pub development_value: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            variable: "SAU_ENV".to_string(),
            development_value: "development".to_string(),
        }
    }
}

impl EnvironmentConfig {
    pub fn is_development(&self) -> bool {
        std::env::var(&self.variable)
            .map(|value| value == self.development_value)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Directory holding the backend executable; empty uses the bundled location
    pub dir: String,

    /// Executable name inside `dir`, without platform extension
    pub executable: String,

    /// Environment variable pointing the backend at its module directory
    pub module_path_var: String,

    /// Host the readiness probe binds on; the backend listens on the wildcard address
    pub host: String,

    /// Port the backend listens on
    pub port: u16,

    /// Give up waiting for the backend after this long (milliseconds)
    pub ready_timeout_ms: u64,

    /// Delay between readiness probes (milliseconds)
    pub poll_interval_ms: u64,

    /// Wait this long after a graceful stop before killing (milliseconds)
    pub stop_grace_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            executable: "sau_backend".to_string(),
            module_path_var: "PYTHONPATH".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5409,
            ready_timeout_ms: 30_000,
            poll_interval_ms: 1_000,
            stop_grace_ms: 5_000,
        }
    }
}

impl BackendConfig {
    pub fn effective_dir(&self) -> PathBuf {
        if self.dir.is_empty() {
            paths::default_backend_dir()
        } else {
            PathBuf::from(&self.dir)
        }
    }

    pub fn executable_path(&self) -> PathBuf {
        let dir = self.effective_dir();
        if cfg!(windows) {
            dir.join(format!("{}.exe", self.executable))
        } else {
            dir.join(&self.executable)
        }
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub dev_url: String,
    pub prod_url: String,
    /// Bundled UI build; empty uses the path next to the executable
    pub static_file: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            dev_url: "http://localhost:5173".to_string(),
            prod_url: "http://localhost:5409".to_string(),
            static_file: String::new(),
            width: 1400,
            height: 900,
        }
    }
}

impl WindowConfig {
    pub fn effective_static_file(&self) -> PathBuf {
        if self.static_file.is_empty() {
            paths::default_static_file()
        } else {
            PathBuf::from(&self.static_file)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_sec: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5409".to_string(),
            timeout_sec: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub group_delete_policy: GroupDeletePolicy,
}
