//! REST client for the local backend.
//!
//! Every operation is one request with no retry; transport and HTTP failures
//! are returned to the caller as they are.

mod client;
mod endpoint;
mod envelope;

pub use client::HttpBackendClient;
pub use endpoint::Endpoint;
