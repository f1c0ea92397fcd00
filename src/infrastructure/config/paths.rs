use std::path::PathBuf;

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support/sau-desktop")
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sau-desktop")
    }
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Directory of the running executable, used to locate bundled resources
pub fn resources_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("resources")))
        .unwrap_or_else(|| PathBuf::from("resources"))
}

pub fn default_backend_dir() -> PathBuf {
    resources_dir().join("backend")
}

pub fn default_static_file() -> PathBuf {
    resources_dir().join("dist").join("index.html")
}
