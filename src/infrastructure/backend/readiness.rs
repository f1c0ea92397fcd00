use std::net::TcpListener;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::domain::error::DomainError;
use crate::domain::repository::Result;
use crate::infrastructure::config::BackendConfig;

/// Something that can tell when the backend accepts connections
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Resolve once ready, or fail with `BackendUnavailable` after `timeout`
    async fn wait_for_ready(&self, timeout: Duration) -> Result<()>;
}

/// Detects the backend by failing to listen on its port
pub struct PortProbe {
    host: String,
    port: u16,
    interval: Duration,
}

impl PortProbe {
    pub fn new(host: impl Into<String>, port: u16, interval: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            interval,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.poll_interval())
    }

    /// A successful temporary listen means the port is free; any bind
    /// failure is taken as "someone is already bound".
    pub fn is_port_in_use(&self) -> bool {
        match TcpListener::bind((self.host.as_str(), self.port)) {
            Ok(listener) => {
                drop(listener);
                false
            }
            Err(e) => {
                tracing::trace!("Port {} not bindable: {}", self.port, e);
                true
            }
        }
    }
}

#[async_trait]
impl ReadinessProbe for PortProbe {
    async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();

        while started.elapsed() < timeout {
            if self.is_port_in_use() {
                tracing::info!(
                    "Backend is listening on port {} after {}",
                    self.port,
                    humantime::format_duration(Duration::from_millis(started.elapsed().as_millis() as u64))
                );
                return Ok(());
            }
            sleep(self.interval).await;
        }

        tracing::warn!(
            "Backend did not open port {} within {}",
            self.port,
            humantime::format_duration(timeout)
        );
        Err(DomainError::BackendUnavailable(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_bound_port_is_in_use() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = PortProbe::new("127.0.0.1", port, Duration::from_millis(10));

        assert!(probe.is_port_in_use());
        drop(listener);
        assert!(!probe.is_port_in_use());
    }

    #[test]
    fn test_wildcard_host_sees_wildcard_listener() {
        let listener = TcpListener::bind("0.0.0.0:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let checker = PortProbe::from_config(&BackendConfig {
            port,
            ..Default::default()
        });

        assert_eq!(checker.host, "0.0.0.0");
        assert!(checker.is_port_in_use());
    }

    #[tokio::test]
    async fn test_wait_for_ready_when_listening() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = PortProbe::new("127.0.0.1", port, Duration::from_millis(10));

        assert!(probe.wait_for_ready(Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_ready_times_out() {
        let probe = PortProbe::new("127.0.0.1", free_port(), Duration::from_millis(10));

        let result = probe.wait_for_ready(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(DomainError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_wait_for_ready_picks_up_late_listener() {
        let port = free_port();
        let probe = PortProbe::new("127.0.0.1", port, Duration::from_millis(20));

        let server = tokio::spawn(async move {
            sleep(Duration::from_millis(60)).await;
            // The probe binds the same port briefly on every poll
            let listener = loop {
                if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
                    break listener;
                }
                sleep(Duration::from_millis(5)).await;
            };
            sleep(Duration::from_millis(500)).await;
            drop(listener);
        });

        assert!(probe.wait_for_ready(Duration::from_secs(2)).await.is_ok());
        server.abort();
    }
}
