//! Management and introspection hooks.
//!
//! The bootstrap reports server facts and lifecycle transitions through an
//! injected [`ManagementHook`] rather than depending on one specific
//! monitoring runtime. The default hook publishes through the `metrics`
//! facade; whichever recorder the host process installs receives the values.
//! This is a monitoring surface, not a control path.

pub mod scheduler;

use std::path::PathBuf;

pub use scheduler::StatsScheduler;

/// Static facts about the assembled server, captured during setup.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Port the plaintext listener is configured for.
    pub listen_port: u16,

    /// Fixed context path of the deployed application.
    pub context_path: &'static str,

    /// Worker pool cap.
    pub max_workers: usize,

    /// Directory the packaged artifact was located in.
    pub webapp_dir: PathBuf,
}

/// Lifecycle states reported to the management hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Configured,
    Started,
    Stopped,
}

impl LifecycleState {
    fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Configured => "configured",
            LifecycleState::Started => "started",
            LifecycleState::Stopped => "stopped",
        }
    }

    fn as_gauge_value(&self) -> f64 {
        match self {
            LifecycleState::Configured => 1.0,
            LifecycleState::Started => 2.0,
            LifecycleState::Stopped => 3.0,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection capability injected into the bootstrap.
pub trait ManagementHook: Send + Sync + 'static {
    /// Called once during setup with the assembled server's facts.
    fn register(&self, info: &ServerInfo);

    /// Called on every lifecycle transition.
    fn state_changed(&self, state: LifecycleState);
}

/// Default hook: publishes server facts and state through the `metrics` facade.
pub struct MetricsHook;

impl ManagementHook for MetricsHook {
    fn register(&self, info: &ServerInfo) {
        metrics::describe_gauge!("webapp_host_max_workers", "Configured worker pool cap");
        metrics::describe_gauge!("webapp_host_listen_port", "Configured plaintext listener port");
        metrics::describe_gauge!(
            "webapp_host_state",
            "Server lifecycle state (1=configured, 2=started, 3=stopped)"
        );

        metrics::gauge!("webapp_host_max_workers").set(info.max_workers as f64);
        metrics::gauge!("webapp_host_listen_port").set(info.listen_port as f64);

        tracing::debug!(
            port = info.listen_port,
            context_path = info.context_path,
            "management hook registered"
        );
    }

    fn state_changed(&self, state: LifecycleState) {
        metrics::gauge!("webapp_host_state").set(state.as_gauge_value());
        tracing::debug!(state = %state, "lifecycle state changed");
    }
}

/// Hook that records nothing. Useful for embedders and tests that run without
/// a metrics recorder.
pub struct NoopHook;

impl ManagementHook for NoopHook {
    fn register(&self, _info: &ServerInfo) {}
    fn state_changed(&self, _state: LifecycleState) {}
}
