use crate::application::store::GroupStore;
use crate::domain::error::DomainError;
use crate::domain::model::{Group, GroupId, RawAccount};
use crate::domain::repository::{GroupDraft, GroupRepository, Result};

pub struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Option<Vec<Group>>> {
        self.repo.find_all().await
    }

    /// Create on the backend and build the local record from the returned id
    pub async fn create(&self, mut draft: GroupDraft, sort_order: i64) -> Result<Group> {
        draft.name = draft.name.trim().to_string();
        if draft.name.is_empty() {
            return Err(DomainError::Validation("group name must not be empty".into()));
        }

        let id = self.repo.create(&draft).await?;

        let mut group = Group::new(id, draft.name);
        group.description = draft.description;
        group.color = draft.color;
        group.icon = draft.icon;
        group.sort_order = sort_order;
        Ok(group)
    }

    pub async fn update(&self, id: GroupId, mut draft: GroupDraft) -> Result<GroupDraft> {
        draft.name = draft.name.trim().to_string();
        if draft.name.is_empty() {
            return Err(DomainError::Validation("group name must not be empty".into()));
        }
        self.repo.update(id, &draft).await?;
        Ok(draft)
    }

    pub async fn delete(&self, id: GroupId) -> Result<()> {
        self.repo.delete(id).await
    }

    pub async fn get_accounts(&self, group_id: GroupId) -> Result<Vec<RawAccount>> {
        self.repo.find_accounts(group_id).await
    }
}

/// Reject names already used by another group
pub fn check_name_available(groups: &GroupStore, name: &str, exclude: Option<GroupId>) -> Result<()> {
    if groups.name_exists(name, exclude) {
        return Err(DomainError::Validation(format!(
            "group name '{}' already exists",
            name.trim()
        )));
    }
    Ok(())
}

/// The default group absorbs accounts of deleted groups and cannot go itself.
/// Groups missing from the local cache are left for the backend to judge.
pub fn check_deletable(groups: &GroupStore, id: GroupId) -> Result<()> {
    match groups.get(id) {
        Some(group) if group.is_default() => Err(DomainError::Validation(
            "the default group cannot be deleted".into(),
        )),
        _ => Ok(()),
    }
}

/// Sort order for a new group: one past the current maximum
pub fn next_sort_order(groups: &GroupStore) -> i64 {
    groups.all().map(|g| g.sort_order).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_GROUP_NAME;

    fn store() -> GroupStore {
        let mut store = GroupStore::new();
        let mut creators = Group::new(2, "Creators");
        creators.sort_order = 4;
        store.load(Some(vec![Group::new(1, DEFAULT_GROUP_NAME), creators]));
        store
    }

    #[test]
    fn test_check_name_available() {
        let store = store();
        assert!(check_name_available(&store, "Creators", None).is_err());
        assert!(check_name_available(&store, "Creators", Some(2)).is_ok());
        assert!(check_name_available(&store, "New", None).is_ok());
    }

    #[test]
    fn test_check_deletable() {
        let store = store();
        assert!(matches!(check_deletable(&store, 1), Err(DomainError::Validation(_))));
        assert!(check_deletable(&store, 2).is_ok());
        assert!(check_deletable(&store, 9).is_ok());
    }

    #[test]
    fn test_next_sort_order() {
        assert_eq!(next_sort_order(&store()), 5);
        assert_eq!(next_sort_order(&GroupStore::new()), 1);
    }
}
