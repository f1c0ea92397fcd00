use async_trait::async_trait;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::model::{AccountId, Group, GroupId, RawAccount, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_ICON};

pub type Result<T> = std::result::Result<T, DomainError>;

/// Body of account create/update calls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountId>,
    #[serde(rename = "type")]
    pub account_type: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// Body of group create/update calls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
}

impl GroupDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: DEFAULT_GROUP_COLOR.to_string(),
            icon: DEFAULT_GROUP_ICON.to_string(),
        }
    }

    /// Draft carrying every display field of an existing group
    pub fn from_group(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            description: group.description.clone(),
            color: group.color.clone(),
            icon: group.icon.clone(),
        }
    }
}

/// Remote account operations exposed by the backend
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_all(&self, force_check: bool) -> Result<Vec<RawAccount>>;
    async fn find_all_with_groups(&self, force_check: bool) -> Result<Vec<RawAccount>>;
    async fn create(&self, draft: &AccountDraft) -> Result<()>;
    async fn update(&self, draft: &AccountDraft) -> Result<()>;
    async fn delete(&self, id: AccountId) -> Result<()>;
    async fn move_to_group(&self, account_id: AccountId, group_id: Option<GroupId>) -> Result<()>;
    /// Returns the number of rows the backend reports as moved
    async fn batch_move_to_group(&self, account_ids: &[AccountId], group_id: GroupId) -> Result<u64>;
}

/// Remote group operations exposed by the backend
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_all(&self) -> Result<Option<Vec<Group>>>;
    async fn create(&self, draft: &GroupDraft) -> Result<GroupId>;
    async fn update(&self, id: GroupId, draft: &GroupDraft) -> Result<()>;
    async fn delete(&self, id: GroupId) -> Result<()>;
    async fn find_accounts(&self, group_id: GroupId) -> Result<Vec<RawAccount>>;
}

// Allow dynamic dispatch through boxed repositories
#[async_trait]
impl AccountRepository for Box<dyn AccountRepository> {
    async fn find_all(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        (**self).find_all(force_check).await
    }

    async fn find_all_with_groups(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        (**self).find_all_with_groups(force_check).await
    }

    async fn create(&self, draft: &AccountDraft) -> Result<()> {
        (**self).create(draft).await
    }

    async fn update(&self, draft: &AccountDraft) -> Result<()> {
        (**self).update(draft).await
    }

    async fn delete(&self, id: AccountId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn move_to_group(&self, account_id: AccountId, group_id: Option<GroupId>) -> Result<()> {
        (**self).move_to_group(account_id, group_id).await
    }

    async fn batch_move_to_group(&self, account_ids: &[AccountId], group_id: GroupId) -> Result<u64> {
        (**self).batch_move_to_group(account_ids, group_id).await
    }
}

#[async_trait]
impl GroupRepository for Box<dyn GroupRepository> {
    async fn find_all(&self) -> Result<Option<Vec<Group>>> {
        (**self).find_all().await
    }

    async fn create(&self, draft: &GroupDraft) -> Result<GroupId> {
        (**self).create(draft).await
    }

    async fn update(&self, id: GroupId, draft: &GroupDraft) -> Result<()> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: GroupId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn find_accounts(&self, group_id: GroupId) -> Result<Vec<RawAccount>> {
        (**self).find_accounts(group_id).await
    }
}
