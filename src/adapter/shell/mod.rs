pub mod commands;
pub mod error;
pub mod host;
pub mod state;
