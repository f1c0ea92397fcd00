//! Backend process lifecycle and readiness detection.

mod readiness;
mod supervisor;

pub use readiness::{PortProbe, ReadinessProbe};
pub use supervisor::BackendSupervisor;
