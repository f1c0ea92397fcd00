mod account;
mod group;
mod raw;
mod window;

pub use account::{
    Account, AccountId, AccountPatch, AccountStatus, GroupRef, Platform, DEFAULT_AVATAR,
    UNGROUPED_LABEL,
};
pub use group::{
    Group, GroupDeletePolicy, GroupId, GroupPatch, GroupStats, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_ICON,
    DEFAULT_GROUP_NAME, NOT_GROUPED_LABEL,
};
pub use raw::{KeyedAccount, PositionalAccount, RawAccount};
pub use window::{LoadTarget, WindowState};
