mod account_service;
mod group_service;

pub use account_service::AccountService;
pub use group_service::{check_deletable, check_name_available, next_sort_order, GroupService};
