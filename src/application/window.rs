use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::eventbus::SharedEventBus;
use crate::domain::event::DomainEvent;
use crate::domain::model::{LoadTarget, WindowState};
use crate::infrastructure::backend::ReadinessProbe;
use crate::infrastructure::config::WindowConfig;

/// Native window the controller drives
#[async_trait]
pub trait WindowHost: Send + Sync {
    async fn load_url(&self, url: &str) -> anyhow::Result<()>;
    async fn load_file(&self, path: &Path) -> anyhow::Result<()>;
    /// Make the window visible
    fn show(&self);
}

/// Decides what the main window loads and when it becomes visible
pub struct WindowController<H: WindowHost, P: ReadinessProbe> {
    host: H,
    probe: P,
    config: WindowConfig,
    ready_timeout: Duration,
    dev_mode: bool,
    state: WindowState,
    event_bus: SharedEventBus,
}

impl<H: WindowHost, P: ReadinessProbe> WindowController<H, P> {
    pub fn new(
        host: H,
        probe: P,
        config: WindowConfig,
        ready_timeout: Duration,
        dev_mode: bool,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            host,
            probe,
            config,
            ready_timeout,
            dev_mode,
            state: WindowState::Uninitialized,
            event_bus,
        }
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Pick a load target, load it, then show the window.
    /// Opening an already shown window returns its current target.
    pub async fn open(&mut self) -> anyhow::Result<LoadTarget> {
        if let WindowState::Shown(target) = &self.state {
            return Ok(target.clone());
        }

        let target = self.choose_target().await;
        self.transition(WindowState::Loading(target.clone()));

        match &target {
            LoadTarget::DevUrl(url) | LoadTarget::ProdUrl(url) => self.host.load_url(url).await?,
            LoadTarget::StaticFallback(path) => self.host.load_file(path).await?,
        }

        self.host.show();
        self.transition(WindowState::Shown(target.clone()));
        Ok(target)
    }

    /// All windows were closed while the app keeps running
    pub fn reactivate(&mut self) {
        self.transition(WindowState::Uninitialized);
    }

    async fn choose_target(&self) -> LoadTarget {
        if self.dev_mode {
            return LoadTarget::DevUrl(self.config.dev_url.clone());
        }

        match self.probe.wait_for_ready(self.ready_timeout).await {
            Ok(()) => LoadTarget::ProdUrl(self.config.prod_url.clone()),
            Err(e) => {
                tracing::warn!("Backend unavailable, loading bundled UI: {}", e);
                LoadTarget::StaticFallback(self.config.effective_static_file())
            }
        }
    }

    fn transition(&mut self, new_state: WindowState) {
        let old_state = std::mem::replace(&mut self.state, new_state.clone());
        tracing::debug!("Window state: {:?} -> {:?}", old_state, new_state);
        self.event_bus.publish(DomainEvent::WindowStateChanged {
            old_state,
            new_state,
        });
    }
}
