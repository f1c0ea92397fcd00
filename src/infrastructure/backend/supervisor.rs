use std::process::Stdio;
use std::sync::Mutex as StdMutex;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::application::eventbus::SharedEventBus;
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::repository::Result;
use crate::infrastructure::config::BackendConfig;

/// Owns the one backend child process of a session
pub struct BackendSupervisor {
    config: BackendConfig,
    child: Mutex<Option<Child>>,
    last_error: StdMutex<Option<String>>,
    event_bus: SharedEventBus,
}

impl BackendSupervisor {
    pub fn new(config: BackendConfig, event_bus: SharedEventBus) -> Self {
        Self {
            config,
            child: Mutex::new(None),
            last_error: StdMutex::new(None),
            event_bus,
        }
    }

    /// Spawn the backend, or return the pid of the one already running
    pub async fn start(&self) -> Result<u32> {
        let mut guard = self.child.lock().await;

        if let Some(child) = guard.as_mut() {
            if let Ok(None) = child.try_wait() {
                let pid = child.id().unwrap_or_default();
                tracing::debug!("Backend already running (pid {})", pid);
                return Ok(pid);
            }
        }

        let exe = self.config.executable_path();
        let dir = self.config.effective_dir();

        let spawned = Command::new(&exe)
            .current_dir(&dir)
            .env(&self.config.module_path_var, &dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(mut child) => {
                let pid = child.id().unwrap_or_default();
                if let Some(stdout) = child.stdout.take() {
                    forward_output(stdout, OutputStream::Stdout);
                }
                if let Some(stderr) = child.stderr.take() {
                    forward_output(stderr, OutputStream::Stderr);
                }

                *guard = Some(child);
                self.set_last_error(None);
                tracing::info!("Backend started: {:?} (pid {})", exe, pid);
                self.event_bus.publish(DomainEvent::BackendStarted { pid });
                Ok(pid)
            }
            Err(e) => {
                let reason = format!("failed to spawn {:?}: {}", exe, e);
                tracing::error!("Backend start failed: {}", reason);

                *guard = None;
                self.set_last_error(Some(reason.clone()));
                self.event_bus.publish(DomainEvent::BackendStartFailed {
                    reason: reason.clone(),
                });
                Err(DomainError::Process(reason))
            }
        }
    }

    /// Ask the backend to exit, killing it if it is still alive after the
    /// grace period. No-op when nothing runs.
    pub async fn stop(&self) {
        let Some(mut child) = self.child.lock().await.take() else {
            return;
        };

        if let Ok(Some(status)) = child.try_wait() {
            tracing::info!("Backend had already exited: {}", status);
            self.event_bus.publish(DomainEvent::BackendStopped);
            return;
        }

        if let Err(e) = request_termination(&mut child) {
            tracing::warn!("Failed to signal backend: {}", e);
        }

        let grace = self.config.stop_grace();
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => tracing::info!("Backend exited: {}", status),
            Ok(Err(e)) => tracing::warn!("Failed to wait for backend: {}", e),
            Err(_) => {
                tracing::warn!(
                    "Backend still running after {}, killing",
                    humantime::format_duration(grace)
                );
                // Losing the race against a normal exit is harmless here
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill backend: {}", e);
                }
            }
        }

        self.event_bus.publish(DomainEvent::BackendStopped);
    }

    /// Whether the child is alive; reaps and reports an unexpected exit
    pub async fn is_running(&self) -> bool {
        let mut guard = self.child.lock().await;
        let Some(child) = guard.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                let status = status.to_string();
                tracing::warn!("Backend exited unexpectedly: {}", status);
                *guard = None;
                self.set_last_error(Some(format!("backend exited: {}", status)));
                self.event_bus.publish(DomainEvent::BackendExited { status });
                false
            }
            Err(e) => {
                tracing::warn!("Failed to poll backend status: {}", e);
                true
            }
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    fn set_last_error(&self, error: Option<String>) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = error;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

/// Pipe child output into the log, one event per line
fn forward_output<R>(reader: R, stream: OutputStream)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match stream {
                    OutputStream::Stdout => tracing::info!(target: "backend", "{}", line),
                    OutputStream::Stderr => tracing::warn!(target: "backend", "{}", line),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Backend {:?} closed: {}", stream, e);
                    break;
                }
            }
        }
    });
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(std::io::Error::from),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::eventbus::create_event_bus;

    #[tokio::test]
    async fn test_spawn_failure_is_recorded() {
        let bus = create_event_bus();
        let mut events = bus.subscribe();
        let supervisor = BackendSupervisor::new(
            BackendConfig {
                dir: "/definitely/not/here".to_string(),
                ..Default::default()
            },
            bus,
        );

        let result = supervisor.start().await;

        assert!(matches!(result, Err(DomainError::Process(_))));
        assert!(supervisor.last_error().is_some());
        assert!(!supervisor.is_running().await);
        assert!(matches!(
            events.recv().await.unwrap(),
            DomainEvent::BackendStartFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_stop_without_process_is_noop() {
        let supervisor = BackendSupervisor::new(BackendConfig::default(), create_event_bus());
        supervisor.stop().await;
        supervisor.stop().await;
        assert!(!supervisor.is_running().await);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use std::time::Duration;

        fn write_script(dir: &Path, body: &str) {
            let path = dir.join("sau_backend");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn config(dir: &Path, stop_grace_ms: u64) -> BackendConfig {
            BackendConfig {
                dir: dir.to_string_lossy().into_owned(),
                stop_grace_ms,
                ..Default::default()
            }
        }

        #[tokio::test]
        async fn test_start_sets_cwd_and_module_path() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "echo \"$PYTHONPATH\" > env.txt\nexec sleep 30");
            let supervisor = BackendSupervisor::new(config(dir.path(), 2_000), create_event_bus());

            let pid = supervisor.start().await.unwrap();
            assert!(pid > 0);
            assert!(supervisor.is_running().await);
            assert_eq!(supervisor.start().await.unwrap(), pid);

            let env_file = dir.path().join("env.txt");
            for _ in 0..100 {
                if std::fs::read_to_string(&env_file).map(|s| !s.is_empty()).unwrap_or(false) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            let recorded = std::fs::read_to_string(&env_file).unwrap();
            assert_eq!(recorded.trim(), dir.path().to_string_lossy());

            supervisor.stop().await;
            assert!(!supervisor.is_running().await);
        }

        #[tokio::test]
        async fn test_stop_escalates_to_kill() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "trap '' TERM\nwhile true; do sleep 1; done");
            let supervisor = BackendSupervisor::new(config(dir.path(), 200), create_event_bus());

            supervisor.start().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;

            let started = std::time::Instant::now();
            supervisor.stop().await;

            assert!(started.elapsed() < Duration::from_secs(5));
            assert!(!supervisor.is_running().await);
        }

        #[tokio::test]
        async fn test_unexpected_exit_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "exit 3");
            let bus = create_event_bus();
            let supervisor = BackendSupervisor::new(config(dir.path(), 200), bus.clone());
            let mut events = bus.subscribe();

            supervisor.start().await.unwrap();
            for _ in 0..100 {
                if !supervisor.is_running().await {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }

            assert!(supervisor.last_error().is_some());
            assert!(matches!(events.recv().await.unwrap(), DomainEvent::BackendStarted { .. }));
            assert!(matches!(events.recv().await.unwrap(), DomainEvent::BackendExited { .. }));
        }
    }
}
