use crate::application::eventbus::SharedEventBus;
use crate::application::service::{AccountService, GroupService};
use crate::application::store::Stores;
use crate::domain::model::GroupDeletePolicy;
use crate::domain::repository::{AccountRepository, GroupRepository};
use crate::infrastructure::backend::BackendSupervisor;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Type aliases for dynamic repository types
pub type DynAccountRepository = Box<dyn AccountRepository>;
pub type DynGroupRepository = Box<dyn GroupRepository>;

/// Everything one application session owns
pub struct AppState {
    pub stores: RwLock<Stores>,
    pub account_service: AccountService<DynAccountRepository>,
    pub group_service: GroupService<DynGroupRepository>,
    pub supervisor: Arc<BackendSupervisor>,
    pub event_bus: SharedEventBus,
}

impl AppState {
    pub fn new(
        account_repo: DynAccountRepository,
        group_repo: DynGroupRepository,
        supervisor: Arc<BackendSupervisor>,
        policy: GroupDeletePolicy,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            stores: RwLock::new(Stores::new(policy)),
            account_service: AccountService::new(account_repo),
            group_service: GroupService::new(group_repo),
            supervisor,
            event_bus,
        }
    }

    /// Stop the backend and drop all cached state
    pub async fn shutdown(&self) {
        self.supervisor.stop().await;
        self.stores.write().await.clear();
        tracing::info!("Session state torn down");
    }
}
