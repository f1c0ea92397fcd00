use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Group, GroupId, GroupPatch, GroupRef, GroupStats, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_ICON,
    NOT_GROUPED_LABEL,
};
use crate::domain::repository::Result;

/// Client-side group catalog with a single selected group
#[derive(Debug, Clone, Default)]
pub struct GroupStore {
    groups: IndexMap<GroupId, Group>,
    selected: Option<GroupId>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog; a missing payload empties it
    pub fn load(&mut self, groups: Option<Vec<Group>>) -> usize {
        self.groups = groups
            .unwrap_or_default()
            .into_iter()
            .map(|g| (g.id, g))
            .collect();
        tracing::debug!("Group store loaded {} groups", self.groups.len());
        self.groups.len()
    }

    pub fn all(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn add(&mut self, group: Group) -> Result<()> {
        if group.id <= 0 {
            return Err(DomainError::Validation(format!(
                "group id must be positive, got {}",
                group.id
            )));
        }
        if self.groups.contains_key(&group.id) {
            return Err(DomainError::Validation(format!(
                "group {} already exists",
                group.id
            )));
        }
        self.groups.insert(group.id, group);
        Ok(())
    }

    pub fn update(&mut self, id: GroupId, patch: GroupPatch) -> bool {
        match self.groups.get_mut(&id) {
            Some(group) => {
                group.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove by id. Accounts referencing the group are not touched here.
    pub fn remove(&mut self, id: GroupId) -> Option<Group> {
        let removed = self.groups.shift_remove(&id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(removed)
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    fn lookup(&self, id: Option<GroupId>) -> Option<&Group> {
        id.and_then(|id| self.groups.get(&id))
    }

    pub fn name(&self, id: Option<GroupId>) -> &str {
        self.lookup(id).map_or(NOT_GROUPED_LABEL, |g| g.name.as_str())
    }

    pub fn color(&self, id: Option<GroupId>) -> &str {
        self.lookup(id).map_or(DEFAULT_GROUP_COLOR, |g| g.color.as_str())
    }

    pub fn icon(&self, id: Option<GroupId>) -> &str {
        self.lookup(id).map_or(DEFAULT_GROUP_ICON, |g| g.icon.as_str())
    }

    /// Display fields of a group for denormalizing onto accounts
    pub fn group_ref(&self, id: GroupId) -> Option<GroupRef> {
        self.groups.get(&id).map(|g| GroupRef {
            id: g.id,
            name: g.name.clone(),
            color: g.color.clone(),
            icon: Some(g.icon.clone()),
        })
    }

    pub fn set_selected(&mut self, id: GroupId) {
        self.selected = Some(id);
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<GroupId> {
        self.selected
    }

    pub fn current_group(&self) -> Option<&Group> {
        self.lookup(self.selected)
    }

    pub fn stats(&self) -> Vec<GroupStats<'_>> {
        self.groups
            .values()
            .map(|group| GroupStats {
                group,
                account_count: group.account_count,
            })
            .collect()
    }

    pub fn default_group(&self) -> Option<&Group> {
        self.groups.values().find(|g| g.is_default())
    }

    pub fn default_group_id(&self) -> Option<GroupId> {
        self.default_group().map(|g| g.id)
    }

    /// Whether another group already uses `name`; `exclude` skips the group
    /// being renamed
    pub fn name_exists(&self, name: &str, exclude: Option<GroupId>) -> bool {
        let name = name.trim();
        self.groups
            .values()
            .any(|g| Some(g.id) != exclude && g.name.trim() == name)
    }

    pub fn total(&self) -> usize {
        self.groups.len()
    }

    pub fn with_accounts_count(&self) -> usize {
        self.groups.values().filter(|g| g.account_count > 0).count()
    }

    /// Stable order: sort order first, then name
    pub fn sorted(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| compare_names(&a.name, &b.name))
        });
        groups
    }
}

/// Case-insensitive comparison with a code-point tiebreak
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
