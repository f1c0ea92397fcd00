//! Verb and path of every backend operation.

use reqwest::Method;

use crate::domain::model::{AccountId, GroupId};

/// One backend operation: verb, path and query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn with_query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    fn with_force(self, force_check: bool) -> Self {
        if force_check {
            self.with_query("force", "true")
        } else {
            self
        }
    }

    pub fn valid_accounts(force_check: bool) -> Self {
        Self::new(Method::GET, "/getValidAccounts").with_force(force_check)
    }

    pub fn valid_accounts_with_groups(force_check: bool) -> Self {
        Self::new(Method::GET, "/getValidAccountsWithGroups").with_force(force_check)
    }

    pub fn create_account() -> Self {
        Self::new(Method::POST, "/account")
    }

    pub fn update_account() -> Self {
        Self::new(Method::POST, "/updateUserinfo")
    }

    pub fn delete_account(id: AccountId) -> Self {
        Self::new(Method::GET, "/deleteAccount").with_query("id", id)
    }

    pub fn groups() -> Self {
        Self::new(Method::GET, "/groups")
    }

    pub fn create_group() -> Self {
        Self::new(Method::POST, "/groups")
    }

    pub fn update_group(id: GroupId) -> Self {
        Self::new(Method::PUT, format!("/groups/{}", id))
    }

    pub fn delete_group(id: GroupId) -> Self {
        Self::new(Method::DELETE, format!("/groups/{}", id))
    }

    pub fn group_accounts(id: GroupId) -> Self {
        Self::new(Method::GET, format!("/groups/{}/accounts", id))
    }

    pub fn move_account_to_group() -> Self {
        Self::new(Method::PUT, "/accounts/group")
    }

    pub fn batch_move_accounts_to_group() -> Self {
        Self::new(Method::PUT, "/accounts/batch-group")
    }
}
