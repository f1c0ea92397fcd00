use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Account, AccountId, AccountPatch, GroupId, GroupRef, Platform, RawAccount,
};
use crate::domain::repository::Result;

/// Bucket key for grouped views; accounts without a group share one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    Ungrouped,
    Group(GroupId),
}

impl From<Option<GroupId>> for GroupKey {
    fn from(id: Option<GroupId>) -> Self {
        id.map_or(Self::Ungrouped, Self::Group)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ungrouped => f.write_str("ungrouped"),
            Self::Group(id) => write!(f, "{}", id),
        }
    }
}

/// Accounts sharing a group, with the group's display fields as seen on the
/// first account of the bucket
#[derive(Debug, Clone, Serialize)]
pub struct AccountBucket<'a> {
    pub group: Option<&'a GroupRef>,
    pub accounts: Vec<&'a Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupAccountStats {
    pub total: usize,
    pub normal: usize,
    pub abnormal: usize,
    pub platforms: BTreeSet<Platform>,
}

impl GroupAccountStats {
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }
}

/// Client-side cache of the backend's account list
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with freshly normalized rows
    pub fn load(&mut self, rows: Vec<RawAccount>) -> usize {
        self.accounts = rows.into_iter().map(RawAccount::into_account).collect();
        tracing::debug!("Account store loaded {} accounts", self.accounts.len());
        self.accounts.len()
    }

    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn add(&mut self, account: Account) -> Result<()> {
        if account.id <= 0 {
            return Err(DomainError::Validation(format!(
                "account id must be positive, got {}",
                account.id
            )));
        }
        if self.get(account.id).is_some() {
            return Err(DomainError::Validation(format!(
                "account {} already exists",
                account.id
            )));
        }
        self.accounts.push(account);
        Ok(())
    }

    /// Merge `patch` into the account; returns false for unknown ids
    pub fn update(&mut self, id: AccountId, patch: AccountPatch) -> bool {
        match self.get_mut(id) {
            Some(account) => {
                account.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: AccountId) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.id == id)?;
        Some(self.accounts.remove(index))
    }

    /// Overwrite the denormalized group reference. The group is not checked
    /// against the group store.
    pub fn move_to_group(&mut self, account_id: AccountId, group: Option<GroupRef>) -> bool {
        match self.get_mut(account_id) {
            Some(account) => {
                account.group = group;
                true
            }
            None => false,
        }
    }

    /// Clear the group reference on every account pointing at `group_id`
    pub fn detach_group(&mut self, group_id: GroupId) -> usize {
        let mut count = 0;
        for account in self.accounts.iter_mut() {
            if account.group_id() == Some(group_id) {
                account.group = None;
                count += 1;
            }
        }
        count
    }

    /// Point every account of `from` at `to`
    pub fn reassign_group(&mut self, from: GroupId, to: &GroupRef) -> usize {
        let mut count = 0;
        for account in self.accounts.iter_mut() {
            if account.group_id() == Some(from) {
                account.group = Some(to.clone());
                count += 1;
            }
        }
        count
    }

    /// Accounts of one group, or the ungrouped ones for `None`
    pub fn accounts_by_group(&self, group_id: Option<GroupId>) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.group_id() == group_id)
            .collect()
    }

    pub fn accounts_by_platform(&self, platform: Platform) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.platform == platform)
            .collect()
    }

    /// Accounts bucketed by group, in first-seen order
    pub fn grouped(&self) -> IndexMap<GroupKey, AccountBucket<'_>> {
        let mut buckets: IndexMap<GroupKey, AccountBucket<'_>> = IndexMap::new();
        for account in &self.accounts {
            buckets
                .entry(GroupKey::from(account.group_id()))
                .or_insert_with(|| AccountBucket {
                    group: account.group.as_ref(),
                    accounts: Vec::new(),
                })
                .accounts
                .push(account);
        }
        buckets
    }

    pub fn group_stats(&self) -> IndexMap<GroupKey, GroupAccountStats> {
        let mut stats: IndexMap<GroupKey, GroupAccountStats> = IndexMap::new();
        for account in &self.accounts {
            let entry = stats.entry(GroupKey::from(account.group_id())).or_default();
            entry.total += 1;
            if account.status.is_normal() {
                entry.normal += 1;
            } else {
                entry.abnormal += 1;
            }
            entry.platforms.insert(account.platform);
        }
        stats
    }
}
