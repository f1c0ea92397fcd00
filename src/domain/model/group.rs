use serde::{Deserialize, Serialize};

pub type GroupId = i64;

/// Reserved name of the group that absorbs accounts from deleted groups
pub const DEFAULT_GROUP_NAME: &str = "Default Group";

/// Label returned for lookups without a matching group
pub const NOT_GROUPED_LABEL: &str = "Not grouped";

pub const DEFAULT_GROUP_COLOR: &str = "#5B73DE";
pub const DEFAULT_GROUP_ICON: &str = "Users";

fn default_color() -> String {
    DEFAULT_GROUP_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_GROUP_ICON.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Group entity - a named, colored bucket accounts can be assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i64,
    /// Computed by the backend from its account table
    #[serde(default)]
    pub account_count: u32,
    #[serde(default, alias = "created_time")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_time")]
    pub updated_at: Option<String>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            color: default_color(),
            icon: default_icon(),
            sort_order: 0,
            account_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP_NAME
    }

    pub fn apply(&mut self, patch: GroupPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(account_count) = patch.account_count {
            self.account_count = account_count;
        }
    }
}

/// Partial group update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip)]
    pub account_count: Option<u32>,
}

/// What happens to accounts of a group that is deleted locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupDeletePolicy {
    /// Leave account references untouched
    Keep,
    /// Clear the group reference on affected accounts
    #[default]
    Detach,
    /// Move affected accounts to the default group, detaching when none exists
    ReassignToDefault,
}

/// Group joined with its account count for list rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats<'a> {
    pub group: &'a Group,
    pub account_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_row() {
        let group: Group = serde_json::from_value(json!({
            "id": 3,
            "name": "Creators",
            "description": null,
            "color": "#111111",
            "icon": "Star",
            "sort_order": 2,
            "account_count": 5,
            "created_time": "2025-01-01 10:00:00",
        }))
        .unwrap();

        assert_eq!(group.id, 3);
        assert_eq!(group.account_count, 5);
        assert_eq!(group.created_at.as_deref(), Some("2025-01-01 10:00:00"));
        assert!(group.updated_at.is_none());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let group: Group = serde_json::from_value(json!({ "id": 1, "name": "x" })).unwrap();
        assert_eq!(group.color, DEFAULT_GROUP_COLOR);
        assert_eq!(group.icon, DEFAULT_GROUP_ICON);
        assert_eq!(group.account_count, 0);
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut group = Group::new(1, "a");
        group.apply(GroupPatch {
            color: Some("#000000".into()),
            ..Default::default()
        });
        assert_eq!(group.name, "a");
        assert_eq!(group.color, "#000000");
        assert_eq!(group.icon, DEFAULT_GROUP_ICON);
    }
}
