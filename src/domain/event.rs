use serde::{Deserialize, Serialize};

use super::model::{GroupId, WindowState};

/// Domain events that represent state changes in the shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// Backend child process was spawned
    BackendStarted { pid: u32 },

    /// Backend executable could not be spawned
    BackendStartFailed { reason: String },

    /// Backend exited without being asked to
    BackendExited { status: String },

    /// Backend was stopped by the supervisor
    BackendStopped,

    /// Window state machine moved
    WindowStateChanged {
        old_state: WindowState,
        new_state: WindowState,
    },

    /// Account store was replaced by a fresh load
    AccountsLoaded { count: usize },

    /// Group store was replaced by a fresh load
    GroupsLoaded { count: usize },

    /// A group was deleted and its accounts reconciled
    GroupDeleted { group_id: GroupId, affected_accounts: usize },
}

impl DomainEvent {
    /// Get the event type name for log routing
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::BackendStarted { .. } => "backend_started",
            Self::BackendStartFailed { .. } => "backend_start_failed",
            Self::BackendExited { .. } => "backend_exited",
            Self::BackendStopped => "backend_stopped",
            Self::WindowStateChanged { .. } => "window_state_changed",
            Self::AccountsLoaded { .. } => "accounts_loaded",
            Self::GroupsLoaded { .. } => "groups_loaded",
            Self::GroupDeleted { .. } => "group_deleted",
        }
    }
}
