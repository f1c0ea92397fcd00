//! Volatile client-side caches of the backend's accounts and groups.

mod account_store;
mod group_store;

pub use account_store::{AccountBucket, AccountStore, GroupAccountStats, GroupKey};
pub use group_store::GroupStore;

use crate::domain::model::{AccountId, Group, GroupDeletePolicy, GroupId};

/// Result of a local group deletion. `group` is `None` when the group was
/// not cached; its accounts are reconciled anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDeletion {
    pub group: Option<Group>,
    pub affected_accounts: usize,
}

/// Both stores of one application session, reconciled together
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub accounts: AccountStore,
    pub groups: GroupStore,
    policy: GroupDeletePolicy,
}

impl Stores {
    pub fn new(policy: GroupDeletePolicy) -> Self {
        Self {
            accounts: AccountStore::new(),
            groups: GroupStore::new(),
            policy,
        }
    }

    /// Remove a group and reconcile the accounts that referenced it
    pub fn delete_group(&mut self, id: GroupId) -> GroupDeletion {
        let group = self.groups.remove(id);

        let affected_accounts = match self.policy {
            GroupDeletePolicy::Keep => 0,
            GroupDeletePolicy::Detach => self.accounts.detach_group(id),
            GroupDeletePolicy::ReassignToDefault => {
                match self.groups.default_group_id().and_then(|d| self.groups.group_ref(d)) {
                    Some(default_ref) => self.accounts.reassign_group(id, &default_ref),
                    None => self.accounts.detach_group(id),
                }
            }
        };

        tracing::debug!(
            "Deleted group {} ({:?}), {} accounts reconciled",
            id,
            self.policy,
            affected_accounts
        );

        GroupDeletion {
            group,
            affected_accounts,
        }
    }

    /// Point accounts at `group_id` using the group's current display fields.
    /// `None` clears the reference; an unknown group id is rejected.
    pub fn move_accounts(&mut self, account_ids: &[AccountId], group_id: Option<GroupId>) -> Option<usize> {
        let group_ref = match group_id {
            Some(id) => Some(self.groups.group_ref(id)?),
            None => None,
        };

        let moved = account_ids
            .iter()
            .filter(|id| self.accounts.move_to_group(**id, group_ref.clone()))
            .count();
        Some(moved)
    }

    /// Teardown at session end
    pub fn clear(&mut self) {
        self.accounts = AccountStore::new();
        self.groups = GroupStore::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RawAccount, DEFAULT_GROUP_NAME};
    use serde_json::json;

    fn stores(policy: GroupDeletePolicy) -> Stores {
        let mut stores = Stores::new(policy);
        let rows: Vec<RawAccount> = serde_json::from_value(json!([
            [1, 3, "/p", "Alice", 1, 10, "Creators", "#111"],
            [2, 1, "/q", "Bob", 0, 10, "Creators", "#111"],
            [3, 4, "/r", "Carol", 1, 20, "Brands", "#222"],
        ]))
        .unwrap();
        stores.accounts.load(rows);
        stores.groups.load(Some(vec![
            Group::new(1, DEFAULT_GROUP_NAME),
            Group::new(10, "Creators"),
            Group::new(20, "Brands"),
        ]));
        stores
    }

    #[test]
    fn test_detach_clears_all_group_fields() {
        let mut stores = stores(GroupDeletePolicy::Detach);

        let deletion = stores.delete_group(10);

        assert_eq!(deletion.group.unwrap().name, "Creators");
        assert_eq!(deletion.affected_accounts, 2);
        assert_eq!(stores.groups.total(), 2);
        for id in [1, 2] {
            let account = stores.accounts.get(id).unwrap();
            assert!(account.group.is_none());
        }
        assert_eq!(stores.accounts.get(3).unwrap().group_id(), Some(20));
    }

    #[test]
    fn test_keep_leaves_accounts_untouched() {
        let mut stores = stores(GroupDeletePolicy::Keep);

        let deletion = stores.delete_group(10);

        assert_eq!(deletion.affected_accounts, 0);
        assert_eq!(stores.accounts.accounts_by_group(Some(10)).len(), 2);
    }

    #[test]
    fn test_reassign_to_default() {
        let mut stores = stores(GroupDeletePolicy::ReassignToDefault);

        stores.delete_group(20);

        let account = stores.accounts.get(3).unwrap();
        assert_eq!(account.group_id(), Some(1));
        assert_eq!(account.group_name(), DEFAULT_GROUP_NAME);
    }

    #[test]
    fn test_reassign_without_default_detaches() {
        let mut stores = stores(GroupDeletePolicy::ReassignToDefault);
        stores.groups.remove(1);

        let deletion = stores.delete_group(20);

        assert_eq!(deletion.affected_accounts, 1);
        assert!(stores.accounts.get(3).unwrap().group.is_none());
    }

    #[test]
    fn test_delete_unknown_group() {
        let mut stores = stores(GroupDeletePolicy::Detach);

        let deletion = stores.delete_group(99);

        assert!(deletion.group.is_none());
        assert_eq!(deletion.affected_accounts, 0);
        assert_eq!(stores.groups.total(), 3);
    }

    #[test]
    fn test_delete_uncached_group_still_detaches_accounts() {
        let mut stores = stores(GroupDeletePolicy::Detach);
        stores.groups.load(None);

        let deletion = stores.delete_group(10);

        assert!(deletion.group.is_none());
        assert_eq!(deletion.affected_accounts, 2);
        assert!(stores.accounts.get(1).unwrap().group.is_none());
        assert!(stores.accounts.accounts_by_group(Some(10)).is_empty());
        assert_eq!(stores.accounts.get(3).unwrap().group_id(), Some(20));
    }

    #[test]
    fn test_move_accounts_resolves_display_fields() {
        let mut stores = stores(GroupDeletePolicy::Detach);

        assert_eq!(stores.move_accounts(&[1, 3, 42], Some(20)), Some(2));
        assert_eq!(stores.accounts.get(1).unwrap().group_name(), "Brands");

        assert_eq!(stores.move_accounts(&[1], Some(99)), None);
        assert_eq!(stores.move_accounts(&[1], None), Some(1));
        assert!(stores.accounts.get(1).unwrap().group.is_none());
    }
}
