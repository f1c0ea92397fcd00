//! Wire shapes of account rows returned by the backend.
//!
//! The backend returns either positional rows (`SELECT *` tuples) or keyed
//! objects depending on the endpoint. Both decode into [`RawAccount`] and are
//! normalized through [`RawAccount::into_account`].

use std::fmt;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::account::{Account, AccountId, AccountStatus, GroupRef, DEFAULT_AVATAR, UNGROUPED_LABEL};
use super::group::{GroupId, DEFAULT_GROUP_COLOR};

/// One account row in either of the two backend shapes. Arrays decode as
/// [`PositionalAccount`], objects as [`KeyedAccount`]; nothing else is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAccount {
    Positional(PositionalAccount),
    Keyed(KeyedAccount),
}

/// `[id, type, filePath, name, status, groupId?, groupName?, groupColor?]`
///
/// Columns are read by position only. A plain `user_info` row from
/// `/getValidAccounts` has `group_id, last_check_time, check_interval` after
/// the status, so its check time lands in `group_name`; it is only shown when
/// `group_id` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalAccount {
    pub id: AccountId,
    pub account_type: i64,
    pub file_path: String,
    pub name: String,
    pub status: i64,
    pub group_id: Option<GroupId>,
    pub group_name: Option<String>,
    pub group_color: Option<String>,
}

/// Object rows from the group-aware endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyedAccount {
    pub id: AccountId,
    #[serde(rename = "type")]
    pub account_type: i64,
    #[serde(rename = "filePath", default)]
    pub file_path: String,
    #[serde(rename = "userName", default)]
    pub user_name: String,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_color: Option<String>,
    #[serde(default)]
    pub group_icon: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl RawAccount {
    /// Normalize into the canonical store record
    pub fn into_account(self) -> Account {
        match self {
            RawAccount::Positional(row) => {
                let mut account = Account::new(
                    row.id,
                    row.account_type,
                    row.file_path,
                    row.name,
                    AccountStatus::from_code(row.status),
                );
                account.group = group_ref(row.group_id, row.group_name, row.group_color, None);
                account
            }
            RawAccount::Keyed(row) => {
                let mut account = Account::new(
                    row.id,
                    row.account_type,
                    row.file_path,
                    row.user_name,
                    AccountStatus::from_code(row.status.unwrap_or_default()),
                );
                account.avatar = non_empty(row.avatar).unwrap_or_else(|| DEFAULT_AVATAR.to_string());
                account.group = group_ref(row.group_id, row.group_name, row.group_color, row.group_icon);
                account
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// A zero or missing id means "no group"; the display fields only exist with an id.
fn group_ref(
    id: Option<GroupId>,
    name: Option<String>,
    color: Option<String>,
    icon: Option<String>,
) -> Option<GroupRef> {
    let id = id.filter(|id| *id != 0)?;
    Some(GroupRef {
        id,
        name: non_empty(name).unwrap_or_else(|| UNGROUPED_LABEL.to_string()),
        color: non_empty(color).unwrap_or_else(|| DEFAULT_GROUP_COLOR.to_string()),
        icon: non_empty(icon),
    })
}

impl<'de> Deserialize<'de> for RawAccount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawAccountVisitor)
    }
}

struct RawAccountVisitor;

impl<'de> Visitor<'de> for RawAccountVisitor {
    type Value = RawAccount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an account row as an array or an object")
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        PositionalVisitor.visit_seq(seq).map(RawAccount::Positional)
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        KeyedAccount::deserialize(MapAccessDeserializer::new(map)).map(RawAccount::Keyed)
    }
}

impl<'de> Deserialize<'de> for PositionalAccount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(PositionalVisitor)
    }
}

struct PositionalVisitor;

impl<'de> Visitor<'de> for PositionalVisitor {
    type Value = PositionalAccount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an account row [id, type, filePath, name, status, ...]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let id = seq
            .next_element::<AccountId>()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let account_type = seq
            .next_element::<i64>()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let file_path = seq
            .next_element::<String>()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        let name = seq
            .next_element::<String>()?
            .ok_or_else(|| de::Error::invalid_length(3, &self))?;
        let status = seq
            .next_element::<Option<i64>>()?
            .ok_or_else(|| de::Error::invalid_length(4, &self))?
            .unwrap_or_default();

        // Trailing columns are loosely typed: older backends put other
        // user_info columns here, so only accept the expected JSON kinds.
        let group_id = seq.next_element::<Value>()?.and_then(|v| v.as_i64());
        let group_name = seq
            .next_element::<Value>()?
            .and_then(|v| v.as_str().map(str::to_string));
        let group_color = seq
            .next_element::<Value>()?
            .and_then(|v| v.as_str().map(str::to_string));

        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(PositionalAccount {
            id,
            account_type,
            file_path,
            name,
            status,
            group_id,
            group_name,
            group_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Platform;
    use serde_json::json;

    fn decode(value: Value) -> Account {
        serde_json::from_value::<RawAccount>(value).unwrap().into_account()
    }

    #[test]
    fn test_positional_full_row() {
        let account = decode(json!([1, 3, "/p", "Alice", 1, 10, "Creators", "#111"]));

        assert_eq!(account.id, 1);
        assert_eq!(account.platform, Platform::Douyin);
        assert_eq!(account.status, AccountStatus::Normal);
        assert_eq!(account.group_id(), Some(10));
        assert_eq!(account.group_name(), "Creators");
        assert_eq!(account.group_color(), "#111");
        assert_eq!(account.avatar, DEFAULT_AVATAR);
    }

    #[test]
    fn test_positional_without_group_columns() {
        let account = decode(json!([2, 1, "/q", "Bob", 0]));

        assert_eq!(account.status, AccountStatus::Abnormal);
        assert!(account.group.is_none());
        assert_eq!(account.group_name(), UNGROUPED_LABEL);
    }

    #[test]
    fn test_positional_tolerates_foreign_trailing_columns() {
        // user_info SELECT * rows: group_id, last_check_time, check_interval
        let account = decode(json!([3, 2, "/r", "Carol", 1, null, "2025-01-01 00:00:00", 3600, "extra"]));

        assert!(account.group.is_none());
        assert_eq!(account.platform, Platform::WechatChannels);
    }

    #[test]
    fn test_positional_too_short_is_rejected() {
        for row in [json!([1, 3, "/p"]), json!([1, 3]), json!([])] {
            let result = serde_json::from_value::<RawAccount>(row.clone());
            assert!(result.is_err(), "accepted {}", row);
        }
    }

    #[test]
    fn test_scalars_are_rejected() {
        assert!(serde_json::from_value::<RawAccount>(json!("1,3,/p,Alice,1")).is_err());
        assert!(serde_json::from_value::<RawAccount>(json!(7)).is_err());
    }

    #[test]
    fn test_shape_picks_variant() {
        let positional = serde_json::from_value::<RawAccount>(json!([1, 3, "/p", "Alice", 1])).unwrap();
        assert!(matches!(positional, RawAccount::Positional(_)));

        let keyed = serde_json::from_value::<RawAccount>(json!({
            "id": 1, "type": 3, "filePath": "/p", "userName": "Alice", "status": 1
        }))
        .unwrap();
        assert!(matches!(keyed, RawAccount::Keyed(_)));
    }

    #[test]
    fn test_null_status_is_abnormal_in_both_shapes() {
        let rows: Vec<RawAccount> = serde_json::from_value(json!([
            { "id": 1, "type": 1, "filePath": "/a", "userName": "a", "status": 1 },
            { "id": 2, "type": 1, "filePath": "/b", "userName": "b", "status": null },
            { "id": 3, "type": 1, "filePath": "/c", "userName": "c" },
            [4, 1, "/d", "d", null],
        ]))
        .unwrap();

        let statuses: Vec<AccountStatus> = rows.into_iter().map(|r| r.into_account().status).collect();
        assert_eq!(
            statuses,
            vec![
                AccountStatus::Normal,
                AccountStatus::Abnormal,
                AccountStatus::Abnormal,
                AccountStatus::Abnormal,
            ]
        );
    }

    #[test]
    fn test_plain_user_info_row_reads_by_position() {
        let account = decode(json!([4, 1, "/s", "Dana", 1, 10, "2025-01-01 00:00:00", 3600]));

        assert_eq!(account.group_id(), Some(10));
        assert_eq!(account.group_name(), "2025-01-01 00:00:00");
        assert_eq!(account.group_color(), DEFAULT_GROUP_COLOR);
    }

    #[test]
    fn test_keyed_row() {
        let account = decode(json!({
            "id": 5,
            "type": 4,
            "filePath": "/k",
            "userName": "Dave",
            "status": 1,
            "group_id": 8,
            "group_name": null,
            "group_color": "",
            "group_icon": "Star",
        }));

        assert_eq!(account.name, "Dave");
        assert_eq!(account.platform, Platform::Kuaishou);
        let group = account.group.unwrap();
        assert_eq!(group.id, 8);
        assert_eq!(group.name, UNGROUPED_LABEL);
        assert_eq!(group.color, DEFAULT_GROUP_COLOR);
        assert_eq!(group.icon.as_deref(), Some("Star"));
    }

    #[test]
    fn test_keyed_unknown_platform_and_status() {
        let account = decode(json!({
            "id": 6,
            "type": 42,
            "filePath": "/u",
            "userName": "Eve",
            "status": 2,
        }));

        assert_eq!(account.platform, Platform::Unknown);
        assert_eq!(account.platform.label(), "unknown");
        assert_eq!(account.status, AccountStatus::Abnormal);
        assert!(account.group.is_none());
    }

    #[test]
    fn test_status_normal_only_for_one_in_both_shapes() {
        for code in [-1, 0, 1, 2, 99] {
            let expected = AccountStatus::from_code(code);
            let positional = decode(json!([1, 1, "/p", "n", code]));
            let keyed = decode(json!({ "id": 1, "type": 1, "filePath": "/p", "userName": "n", "status": code }));
            assert_eq!(positional.status, expected);
            assert_eq!(keyed.status, expected);
            assert_eq!(expected == AccountStatus::Normal, code == 1);
        }
    }
}
