pub mod adapter;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use adapter::shell::commands;
use adapter::shell::host::HeadlessWindowHost;
use adapter::shell::state::AppState;
use application::eventbus::create_event_bus;
use application::window::WindowController;
use infrastructure::api::HttpBackendClient;
use infrastructure::backend::{BackendSupervisor, PortProbe};
use infrastructure::config;
use infrastructure::logging;

/// Run one application session until ctrl-c
pub async fn run() -> anyhow::Result<()> {
    // Keep the file writer alive for the whole session
    let _log_guard = logging::setup(!cfg!(debug_assertions));

    config::init();
    let app_config = config::app();
    let dev_mode = app_config.environment.is_development();
    tracing::info!(
        "Starting sau-desktop ({} mode)",
        if dev_mode { "development" } else { "production" }
    );

    let event_bus = create_event_bus();
    let _event_logger = event_bus.spawn_logger();

    let client = HttpBackendClient::new(&app_config.api)?;
    tracing::info!("Backend API at {}", client.base_url());
    let supervisor = Arc::new(BackendSupervisor::new(
        app_config.backend.clone(),
        event_bus.clone(),
    ));

    let state = AppState::new(
        Box::new(client.clone()),
        Box::new(client),
        supervisor.clone(),
        app_config.store.group_delete_policy,
        event_bus.clone(),
    );

    // In development the backend is started by hand
    if !dev_mode {
        if let Err(e) = supervisor.start().await {
            tracing::error!("Continuing without backend: {}", e);
        }
    }

    let mut window = WindowController::new(
        HeadlessWindowHost::new(&app_config.window),
        PortProbe::from_config(&app_config.backend),
        app_config.window.clone(),
        app_config.backend.ready_timeout(),
        dev_mode,
        event_bus,
    );

    match window.open().await {
        Ok(target) => {
            tracing::info!("Main window showing {}", target);
            if let Err(e) = preload(&state).await {
                tracing::warn!("Initial data load failed: {}", e);
            }
        }
        Err(e) => tracing::error!("Failed to open main window: {:#}", e),
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    state.shutdown().await;
    Ok(())
}

async fn preload(state: &AppState) -> Result<(), adapter::shell::error::ApiError> {
    let groups = commands::load_groups(state).await?;
    let accounts = commands::load_accounts(state, false).await?;
    tracing::info!("Loaded {} groups and {} accounts", groups, accounts);
    Ok(())
}
