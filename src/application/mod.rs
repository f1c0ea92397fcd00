pub mod eventbus;
pub mod service;
pub mod store;
pub mod window;
