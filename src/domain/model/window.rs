use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the main window ends up displaying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadTarget {
    /// Vite dev server, used when running in development mode
    DevUrl(String),
    /// UI served by the backend once it listens
    ProdUrl(String),
    /// Bundled static build, used when the backend never came up
    StaticFallback(PathBuf),
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DevUrl(url) => write!(f, "dev url {}", url),
            Self::ProdUrl(url) => write!(f, "prod url {}", url),
            Self::StaticFallback(path) => write!(f, "static file {}", path.display()),
        }
    }
}

/// Lifecycle of the main window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    Uninitialized,
    Loading(LoadTarget),
    Shown(LoadTarget),
}

impl WindowState {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown(_))
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::Uninitialized
    }
}
