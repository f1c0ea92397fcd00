use crate::adapter::shell::error::CommandResult;
use crate::adapter::shell::state::AppState;
use crate::application::service::{check_deletable, check_name_available, next_sort_order};
use crate::application::store::{GroupAccountStats, GroupDeletion, GroupKey};
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::model::{
    Account, AccountId, AccountPatch, Group, GroupId, GroupPatch, GroupRef, Platform, UNGROUPED_LABEL,
};
use crate::domain::repository::{AccountDraft, GroupDraft};
use serde::{Deserialize, Serialize};

// ====== Account Commands ======

/// Replace the account store with a fresh fetch
pub async fn load_accounts(state: &AppState, force_check: bool) -> CommandResult<usize> {
    let rows = state.account_service.get_all(force_check).await?;
    let count = state.stores.write().await.accounts.load(rows);

    state.event_bus.publish(DomainEvent::AccountsLoaded { count });
    Ok(count)
}

pub async fn get_accounts(state: &AppState) -> Vec<Account> {
    state.stores.read().await.accounts.all().to_vec()
}

/// Legacy account list without group columns; does not touch the store
pub async fn get_valid_accounts(state: &AppState, force_check: bool) -> CommandResult<Vec<Account>> {
    let rows = state.account_service.get_valid(force_check).await?;
    Ok(rows.into_iter().map(|row| row.into_account()).collect())
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "type")]
    pub account_type: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// The backend does not hand back the new id, so the store is reloaded
pub async fn create_account(state: &AppState, request: CreateAccountRequest) -> CommandResult<usize> {
    state
        .account_service
        .create(AccountDraft {
            id: None,
            account_type: request.account_type,
            user_name: request.user_name,
        })
        .await?;

    load_accounts(state, false).await
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub id: AccountId,
    #[serde(rename = "type")]
    pub account_type: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
}

pub async fn update_account(state: &AppState, request: UpdateAccountRequest) -> CommandResult<()> {
    state
        .account_service
        .update(AccountDraft {
            id: Some(request.id),
            account_type: request.account_type,
            user_name: request.user_name.clone(),
        })
        .await?;

    let patch = AccountPatch {
        account_type: Some(request.account_type),
        name: Some(request.user_name),
        ..Default::default()
    };
    if !state.stores.write().await.accounts.update(request.id, patch) {
        tracing::debug!("Updated account {} is not cached", request.id);
    }
    Ok(())
}

pub async fn delete_account(state: &AppState, id: AccountId) -> CommandResult<()> {
    state.account_service.delete(id).await?;
    state.stores.write().await.accounts.remove(id);
    Ok(())
}

/// Move one account; `None` removes it from its group
pub async fn move_account_to_group(
    state: &AppState,
    account_id: AccountId,
    group_id: Option<GroupId>,
) -> CommandResult<()> {
    state.account_service.move_to_group(account_id, group_id).await?;

    if state
        .stores
        .write()
        .await
        .move_accounts(&[account_id], group_id)
        .is_none()
    {
        tracing::warn!("Moved account {} to uncached group {:?}", account_id, group_id);
    }
    Ok(())
}

/// All-or-nothing on the backend; applied locally only after it succeeds
pub async fn batch_move_accounts(
    state: &AppState,
    account_ids: &[AccountId],
    group_id: GroupId,
) -> CommandResult<u64> {
    let affected = state
        .account_service
        .batch_move_to_group(account_ids, group_id)
        .await?;

    if state
        .stores
        .write()
        .await
        .move_accounts(account_ids, Some(group_id))
        .is_none()
    {
        tracing::warn!("Batch moved accounts to uncached group {}", group_id);
    }
    Ok(affected)
}

// ====== Group Commands ======

pub async fn load_groups(state: &AppState) -> CommandResult<usize> {
    let groups = state.group_service.get_all().await?;
    let count = state.stores.write().await.groups.load(groups);

    state.event_bus.publish(DomainEvent::GroupsLoaded { count });
    Ok(count)
}

/// Groups in display order
pub async fn get_groups(state: &AppState) -> Vec<Group> {
    state
        .stores
        .read()
        .await
        .groups
        .sorted()
        .into_iter()
        .cloned()
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

pub async fn create_group(state: &AppState, request: CreateGroupRequest) -> CommandResult<Group> {
    let sort_order = {
        let stores = state.stores.read().await;
        check_name_available(&stores.groups, &request.name, None)?;
        next_sort_order(&stores.groups)
    };

    let mut draft = GroupDraft::named(request.name);
    if let Some(description) = request.description {
        draft.description = description;
    }
    if let Some(color) = request.color {
        draft.color = color;
    }
    if let Some(icon) = request.icon {
        draft.icon = icon;
    }

    let group = state.group_service.create(draft, sort_order).await?;
    state.stores.write().await.groups.add(group.clone())?;
    Ok(group)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Update a cached group; accounts in it pick up the new display fields
pub async fn update_group(state: &AppState, id: GroupId, request: UpdateGroupRequest) -> CommandResult<Group> {
    let mut draft = {
        let stores = state.stores.read().await;
        let group = stores
            .groups
            .get(id)
            .ok_or_else(|| DomainError::NotFound(format!("group {}", id)))?;
        if let Some(name) = &request.name {
            check_name_available(&stores.groups, name, Some(id))?;
        }
        GroupDraft::from_group(group)
    };

    if let Some(name) = request.name {
        draft.name = name;
    }
    if let Some(description) = request.description {
        draft.description = description;
    }
    if let Some(color) = request.color {
        draft.color = color;
    }
    if let Some(icon) = request.icon {
        draft.icon = icon;
    }

    let saved = state.group_service.update(id, draft).await?;

    let mut stores = state.stores.write().await;
    stores.groups.update(
        id,
        GroupPatch {
            name: Some(saved.name),
            description: Some(saved.description),
            color: Some(saved.color),
            icon: Some(saved.icon),
            ..Default::default()
        },
    );
    if let Some(group_ref) = stores.groups.group_ref(id) {
        stores.accounts.reassign_group(id, &group_ref);
    }

    let group = stores.groups.get(id).cloned();
    group.ok_or_else(|| DomainError::NotFound(format!("group {}", id)).into())
}

/// Delete on the backend, then reconcile the local stores
pub async fn delete_group(state: &AppState, id: GroupId) -> CommandResult<GroupDeletion> {
    check_deletable(&state.stores.read().await.groups, id)?;

    state.group_service.delete(id).await?;

    let deletion = state.stores.write().await.delete_group(id);
    if deletion.group.is_none() {
        tracing::debug!("Deleted group {} was not cached", id);
    }
    state.event_bus.publish(DomainEvent::GroupDeleted {
        group_id: id,
        affected_accounts: deletion.affected_accounts,
    });
    Ok(deletion)
}

pub async fn select_group(state: &AppState, id: Option<GroupId>) {
    let mut stores = state.stores.write().await;
    match id {
        Some(id) => stores.groups.set_selected(id),
        None => stores.groups.clear_selected(),
    }
}

/// Accounts of one group as the backend sees them; does not touch the store
pub async fn get_group_accounts(state: &AppState, group_id: GroupId) -> CommandResult<Vec<Account>> {
    let rows = state.group_service.get_accounts(group_id).await?;
    Ok(rows.into_iter().map(|row| row.into_account()).collect())
}

// ====== View Commands ======

/// One bucket of the grouped account list
#[derive(Debug, Clone, Serialize)]
pub struct AccountGroupView {
    pub key: GroupKey,
    pub group: Option<GroupRef>,
    pub group_name: String,
    pub accounts: Vec<Account>,
    pub stats: GroupAccountStats,
}

/// Accounts bucketed by group with per-bucket stats, in first-seen order
pub async fn get_grouped_accounts(state: &AppState) -> Vec<AccountGroupView> {
    let stores = state.stores.read().await;
    let mut stats = stores.accounts.group_stats();

    stores
        .accounts
        .grouped()
        .into_iter()
        .map(|(key, bucket)| AccountGroupView {
            key,
            group_name: bucket
                .group
                .map_or(UNGROUPED_LABEL, |g| g.name.as_str())
                .to_string(),
            group: bucket.group.cloned(),
            accounts: bucket.accounts.into_iter().cloned().collect(),
            stats: stats.shift_remove(&key).unwrap_or_default(),
        })
        .collect()
}

/// Cached accounts of one group; `None` lists the ungrouped ones
pub async fn get_accounts_in_group(state: &AppState, group_id: Option<GroupId>) -> Vec<Account> {
    state
        .stores
        .read()
        .await
        .accounts
        .accounts_by_group(group_id)
        .into_iter()
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub platform: Platform,
    pub label: &'static str,
    pub color: &'static str,
    pub total: usize,
    pub normal: usize,
}

/// Account counts per platform; `Unknown` only shows up when used
pub async fn get_platform_summary(state: &AppState) -> Vec<PlatformSummary> {
    let stores = state.stores.read().await;

    Platform::ALL
        .into_iter()
        .filter_map(|platform| {
            let accounts = stores.accounts.accounts_by_platform(platform);
            if accounts.is_empty() && platform == Platform::Unknown {
                return None;
            }
            Some(PlatformSummary {
                platform,
                label: platform.label(),
                color: platform.color(),
                total: accounts.len(),
                normal: accounts.iter().filter(|a| a.status.is_normal()).count(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: Group,
    pub account_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupOverview {
    pub groups: Vec<GroupSummary>,
    pub total: usize,
    pub with_accounts: usize,
    pub default_group_id: Option<GroupId>,
    pub current_group: Option<Group>,
}

pub async fn get_group_overview(state: &AppState) -> GroupOverview {
    let stores = state.stores.read().await;
    let groups = &stores.groups;

    GroupOverview {
        groups: groups
            .stats()
            .into_iter()
            .map(|s| GroupSummary {
                group: s.group.clone(),
                account_count: s.account_count,
            })
            .collect(),
        total: groups.total(),
        with_accounts: groups.with_accounts_count(),
        default_group_id: groups.default_group_id(),
        current_group: groups.current_group().cloned(),
    }
}

pub async fn get_current_group(state: &AppState) -> Option<Group> {
    state.stores.read().await.groups.current_group().cloned()
}
