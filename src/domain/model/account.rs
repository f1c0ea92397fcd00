use std::fmt;

use serde::{Deserialize, Serialize};

use super::group::{GroupId, DEFAULT_GROUP_COLOR};

pub type AccountId = i64;

/// Avatar shown until the backend provides a real one
pub const DEFAULT_AVATAR: &str = "/vite.svg";

/// Label used for accounts without a group reference
pub const UNGROUPED_LABEL: &str = "Ungrouped";

/// Publishing platform an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Xiaohongshu,
    WechatChannels,
    Douyin,
    Kuaishou,
    Unknown,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Self::Xiaohongshu,
        Self::WechatChannels,
        Self::Douyin,
        Self::Kuaishou,
        Self::Unknown,
    ];

    /// Map the backend's numeric platform type
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Xiaohongshu,
            2 => Self::WechatChannels,
            3 => Self::Douyin,
            4 => Self::Kuaishou,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Xiaohongshu => "Xiaohongshu",
            Self::WechatChannels => "WeChat Channels",
            Self::Douyin => "Douyin",
            Self::Kuaishou => "Kuaishou",
            Self::Unknown => "unknown",
        }
    }

    /// Brand color used by the UI for platform badges
    pub fn color(&self) -> &'static str {
        match self {
            Self::Xiaohongshu => "#FF2442",
            Self::WechatChannels => "#07C160",
            Self::Douyin => "#FE2C55",
            Self::Kuaishou => "#FF6600",
            Self::Unknown => DEFAULT_GROUP_COLOR,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cookie validity state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Normal,
    Abnormal,
}

impl AccountStatus {
    /// Only `1` means the stored login is still valid
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Self::Normal
        } else {
            Self::Abnormal
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Denormalized copy of a group's display attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: GroupId,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
}

impl GroupRef {
    pub fn new(id: GroupId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            icon: None,
        }
    }
}

/// Account entity as held by the client-side store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub account_type: i64,
    pub platform: Platform,
    pub file_path: String,
    pub name: String,
    pub status: AccountStatus,
    pub avatar: String,
    pub group: Option<GroupRef>,
}

impl Account {
    pub fn new(
        id: AccountId,
        account_type: i64,
        file_path: String,
        name: String,
        status: AccountStatus,
    ) -> Self {
        Self {
            id,
            account_type,
            platform: Platform::from_code(account_type),
            file_path,
            name,
            status,
            avatar: DEFAULT_AVATAR.to_string(),
            group: None,
        }
    }

    pub fn group_id(&self) -> Option<GroupId> {
        self.group.as_ref().map(|g| g.id)
    }

    pub fn group_name(&self) -> &str {
        self.group.as_ref().map_or(UNGROUPED_LABEL, |g| g.name.as_str())
    }

    pub fn group_color(&self) -> &str {
        self.group
            .as_ref()
            .map_or(DEFAULT_GROUP_COLOR, |g| g.color.as_str())
    }

    /// Merge a partial update; absent fields keep their current value
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
            self.platform = Platform::from_code(account_type);
        }
        if let Some(file_path) = patch.file_path {
            self.file_path = file_path;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(group) = patch.group {
            self.group = group;
        }
    }
}

/// Partial account update. `group: Some(None)` clears the group reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub account_type: Option<i64>,
    pub file_path: Option<String>,
    pub name: Option<String>,
    pub status: Option<AccountStatus>,
    pub avatar: Option<String>,
    pub group: Option<Option<GroupRef>>,
}

impl AccountPatch {
    pub fn status(status: AccountStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_codes() {
        assert_eq!(Platform::from_code(1), Platform::Xiaohongshu);
        assert_eq!(Platform::from_code(3), Platform::Douyin);
        assert_eq!(Platform::from_code(4), Platform::Kuaishou);
        assert_eq!(Platform::from_code(9), Platform::Unknown);
        assert_eq!(Platform::from_code(0).label(), "unknown");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AccountStatus::from_code(1), AccountStatus::Normal);
        assert_eq!(AccountStatus::from_code(0), AccountStatus::Abnormal);
        assert_eq!(AccountStatus::from_code(2), AccountStatus::Abnormal);
        assert_eq!(AccountStatus::from_code(-1), AccountStatus::Abnormal);
    }

    #[test]
    fn test_patch_changing_type_updates_platform() {
        let mut account = Account::new(1, 1, "/a".into(), "a".into(), AccountStatus::Normal);
        account.apply(AccountPatch {
            account_type: Some(4),
            ..Default::default()
        });
        assert_eq!(account.platform, Platform::Kuaishou);
        assert_eq!(account.name, "a");
    }

    #[test]
    fn test_group_display_defaults() {
        let mut account = Account::new(1, 2, "/a".into(), "a".into(), AccountStatus::Normal);
        assert_eq!(account.group_name(), UNGROUPED_LABEL);
        assert_eq!(account.group_color(), DEFAULT_GROUP_COLOR);

        account.group = Some(GroupRef::new(7, "Team", "#123456"));
        assert_eq!(account.group_id(), Some(7));
        assert_eq!(account.group_name(), "Team");
    }
}
