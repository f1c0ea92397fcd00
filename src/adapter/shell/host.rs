use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::application::window::WindowHost;
use crate::infrastructure::config::WindowConfig;

/// Window host without a native window; records what would be displayed
pub struct HeadlessWindowHost {
    width: u32,
    height: u32,
    visible: AtomicBool,
}

impl HeadlessWindowHost {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            visible: AtomicBool::new(false),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WindowHost for HeadlessWindowHost {
    async fn load_url(&self, url: &str) -> anyhow::Result<()> {
        tracing::info!("Loading {} ({}x{})", url, self.width, self.height);
        Ok(())
    }

    async fn load_file(&self, path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            tracing::warn!("Bundled UI not found at {:?}", path);
        }
        tracing::info!("Loading file {:?} ({}x{})", path, self.width, self.height);
        Ok(())
    }

    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
        tracing::info!("Main window shown");
    }
}
