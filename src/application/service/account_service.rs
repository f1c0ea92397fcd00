use crate::domain::error::DomainError;
use crate::domain::model::{AccountId, GroupId, RawAccount};
use crate::domain::repository::{AccountDraft, AccountRepository, Result};

pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Fetch accounts with their group columns joined in
    pub async fn get_all(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        self.repo.find_all_with_groups(force_check).await
    }

    /// Fetch the legacy positional rows without group information
    pub async fn get_valid(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        self.repo.find_all(force_check).await
    }

    pub async fn create(&self, draft: AccountDraft) -> Result<()> {
        validate_user_name(&draft.user_name)?;
        self.repo.create(&draft).await
    }

    pub async fn update(&self, draft: AccountDraft) -> Result<()> {
        if draft.id.is_none() {
            return Err(DomainError::Validation("account id is required for update".into()));
        }
        validate_user_name(&draft.user_name)?;
        self.repo.update(&draft).await
    }

    pub async fn delete(&self, id: AccountId) -> Result<()> {
        self.repo.delete(id).await
    }

    pub async fn move_to_group(&self, account_id: AccountId, group_id: Option<GroupId>) -> Result<()> {
        self.repo.move_to_group(account_id, group_id).await
    }

    pub async fn batch_move_to_group(&self, account_ids: &[AccountId], group_id: GroupId) -> Result<u64> {
        if account_ids.is_empty() {
            return Err(DomainError::Validation("no accounts selected".into()));
        }
        self.repo.batch_move_to_group(account_ids, group_id).await
    }
}

fn validate_user_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("account name must not be empty".into()));
    }
    Ok(())
}
