//! Server assembly and lifecycle.
//!
//! # Responsibilities
//! - Validate construction parameters (fail-fast)
//! - Run the fixed bootstrap sequence: pool → scheduler → handler chain →
//!   lifecycle flags → management hook → application deploy → secure-listener
//!   slot → protocol config → listener bind
//! - Expose start/stop as a one-shot, one-directional lifecycle
//!
//! # Design Decisions
//! - Lifecycle states are types: `ServerBootstrap` (unconfigured) →
//!   [`ConfiguredServer`] → [`RunningServer`]. Calling operations out of order
//!   does not compile, and stopped is terminal because stop() consumes the
//!   running server
//! - The deployed application is composed into the handler chain rather than
//!   replacing it, so the default not-found handler stays reachable
//! - Extension points (secure listener, pre-filters, management) are injected
//!   strategies, absent by default

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue};
use axum::Router;
use hyper::server::conn::http1;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::admin::{admin_router, ADMIN_PATH};
use crate::config::loader::ConfigError;
use crate::config::schema::{HttpProtocolConfig, ServerConfig};
use crate::config::validation::validate_config;
use crate::deploy::{Application, DeployError, WebAppContext, CONTEXT_PATH};
use crate::lifecycle::signals::install_stop_on_shutdown;
use crate::lifecycle::{LifecycleFlags, Shutdown};
use crate::management::{LifecycleState, ManagementHook, MetricsHook, ServerInfo, StatsScheduler};
use crate::net::connection::{http1_builder, serve_http1};
use crate::net::{ConnectionTracker, Listener, ListenerError, WorkerPool};
use crate::server::handlers::HandlerChain;

/// `Server` header value advertised when send-server-version is enabled.
const SERVER_IDENT: &str = concat!("webapp-host/", env!("CARGO_PKG_VERSION"));

/// Upper bound on waiting for in-flight connections during stop.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Error raised while configuring or starting the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("deploy failed: {0}")]
    Deploy(#[from] DeployError),

    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),

    #[error("secure listener error: {0}")]
    SecureListener(std::io::Error),
}

/// Error raised while stopping the server.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("serve task failed: {0}")]
    Task(String),

    #[error("{active} connection(s) still open after the drain deadline")]
    DrainTimedOut { active: u64 },
}

/// Reserved extension point for a future encrypted listener.
///
/// When injected, setup binds the socket the factory produces; nothing serves
/// it yet. TLS material and cipher configuration stay outside this crate.
pub trait SecureListenerFactory: Send + Sync {
    fn bind(&self, protocol: &HttpProtocolConfig) -> Result<std::net::TcpListener, std::io::Error>;
}

/// Reserved extension point for request filters mounted ahead of the deployed
/// application (IP allow-listing, single-sign-on and the like).
pub type PreFilter = Box<dyn FnOnce(Router) -> Router + Send>;

/// The unconfigured server: construction parameters plus injected strategies.
pub struct ServerBootstrap {
    config: ServerConfig,
    management: Box<dyn ManagementHook>,
    secure_listener: Option<Box<dyn SecureListenerFactory>>,
    pre_filters: Vec<PreFilter>,
    flags: LifecycleFlags,
}

impl std::fmt::Debug for ServerBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBootstrap")
            .field("config", &self.config)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl ServerBootstrap {
    /// Build a bootstrap from the three construction parameters.
    ///
    /// Fails immediately if the port is zero or the webapp directory is
    /// empty. `files_dir` is accepted but currently unused; it is reserved
    /// for a static-resource handler that is not wired into the chain.
    pub fn new(
        listen_port: u16,
        webapp_dir: impl Into<PathBuf>,
        files_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::from_config(ServerConfig::new(listen_port, webapp_dir, files_dir))
    }

    /// Build a bootstrap from a full configuration.
    pub fn from_config(config: ServerConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        if config.files_dir.is_some() {
            tracing::debug!("files_dir accepted but not wired to a handler");
        }

        Ok(Self {
            config,
            management: Box::new(MetricsHook),
            secure_listener: None,
            pre_filters: Vec::new(),
            flags: LifecycleFlags::default(),
        })
    }

    /// Replace the default management hook.
    pub fn with_management(mut self, hook: impl ManagementHook) -> Self {
        self.management = Box::new(hook);
        self
    }

    /// Inject the secure-listener factory slot.
    pub fn with_secure_listener(mut self, factory: impl SecureListenerFactory + 'static) -> Self {
        self.secure_listener = Some(Box::new(factory));
        self
    }

    /// Append a pre-filter applied ahead of the deployed application.
    pub fn with_pre_filter(mut self, filter: impl FnOnce(Router) -> Router + Send + 'static) -> Self {
        self.pre_filters.push(Box::new(filter));
        self
    }

    /// Override the process-lifecycle flags.
    pub fn with_flags(mut self, flags: LifecycleFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the bootstrap sequence. Consumes the bootstrap; on success the
    /// listener is bound and the server is ready to start.
    pub async fn setup<A: Application>(self, app: A) -> Result<ConfiguredServer, StartupError> {
        // 1. Worker pool with the fixed conservative cap.
        let pool = WorkerPool::new(self.config.workers.max_workers);

        // 2. Periodic bookkeeping scheduler; runs from start().
        let connections = ConnectionTracker::new();
        let scheduler = StatsScheduler::new(pool.clone(), connections.clone());

        // 3. Handler chain: ordered contexts, default handler last.
        let mut chain = HandlerChain::new();

        // 4. Process-lifecycle flags (dumps off, stop-at-shutdown on by default).
        let flags = self.flags;

        // 5. Management hook, monitoring only.
        let info = ServerInfo {
            listen_port: self.config.listen_port,
            context_path: CONTEXT_PATH,
            max_workers: pool.max_workers(),
            webapp_dir: self.config.webapp_dir.clone(),
        };
        self.management.register(&info);
        chain.add_context(
            ADMIN_PATH,
            admin_router(info, pool.clone(), connections.clone()),
        );

        // 6. Deploy the packaged application into the chain. The default
        // not-found handler stays reachable for unmatched paths.
        let context = WebAppContext::locate(&self.config.webapp_dir)?;
        chain.add_context(context.context_path(), app.mount(&context));
        tracing::info!(
            context_path = context.context_path(),
            artifact = %context.artifact().display(),
            "web application deployed"
        );

        // 7. Secure-listener slot: bound if injected, never served.
        let secure_socket = match &self.secure_listener {
            Some(factory) => {
                let socket = factory
                    .bind(&self.config.protocol)
                    .map_err(StartupError::SecureListener)?;
                tracing::warn!(
                    secure_port = self.config.protocol.secure_port,
                    "secure listener bound; encrypted serving is not implemented"
                );
                Some(socket)
            }
            None => None,
        };

        // 8. Protocol configuration is already fixed in the config; apply the
        // parts expressed as middleware, pre-filters outermost.
        let mut router = chain.into_router();
        for filter in self.pre_filters {
            router = filter(router);
        }
        if self.config.protocol.send_server_version {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                HeaderValue::from_static(SERVER_IDENT),
            ));
        }
        let router = router.layer(TraceLayer::new_for_http());

        // 9. Bind the single plaintext listener.
        let listener = Listener::bind(self.config.listen_port, pool).await?;

        self.management.state_changed(LifecycleState::Configured);

        Ok(ConfiguredServer {
            config: self.config,
            management: self.management,
            flags,
            router,
            listener,
            connections,
            scheduler,
            secure_socket,
        })
    }
}

/// A fully assembled server with its listener bound, not yet accepting.
pub struct ConfiguredServer {
    config: ServerConfig,
    management: Box<dyn ManagementHook>,
    flags: LifecycleFlags,
    router: Router,
    listener: Listener,
    connections: ConnectionTracker,
    scheduler: StatsScheduler,
    secure_socket: Option<std::net::TcpListener>,
}

impl std::fmt::Debug for ConfiguredServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredServer")
            .field("config", &self.config)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl ConfiguredServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Worker pool cap, as configured.
    pub fn max_workers(&self) -> usize {
        self.listener.pool().max_workers()
    }

    /// Whether the secure-listener slot was populated during setup.
    pub fn has_secure_socket(&self) -> bool {
        self.secure_socket.is_some()
    }

    /// Begin accepting connections. Consumes the configured server.
    pub async fn start(self) -> Result<RunningServer, StartupError> {
        let local_addr = self
            .listener
            .local_addr()
            .map_err(|e| StartupError::Listener(ListenerError::Bind(e)))?;

        let shutdown = Shutdown::new();

        let scheduler_handle = tokio::spawn(self.scheduler.run(shutdown.subscribe()));
        let signal_handle = if self.flags.stop_at_shutdown {
            Some(install_stop_on_shutdown(shutdown.clone()))
        } else {
            None
        };

        let builder = http1_builder(&self.config.protocol, self.config.listener.idle_timeout());
        // Subscribe before spawning: a receiver created only once the task is
        // first polled could miss a trigger() that races ahead of it.
        let serve_shutdown_rx = shutdown.subscribe();
        let serve_handle = tokio::spawn(serve(
            self.listener,
            self.router,
            builder,
            self.connections,
            shutdown.clone(),
            serve_shutdown_rx,
        ));

        if self.flags.dump_after_start {
            tracing::debug!(config = ?self.config, "server state after start");
        }
        self.management.state_changed(LifecycleState::Started);
        tracing::info!(
            port = local_addr.port(),
            webapp_dir = %self.config.webapp_dir.display(),
            "server started"
        );

        Ok(RunningServer {
            local_addr,
            config: self.config,
            management: self.management,
            flags: self.flags,
            shutdown,
            serve_handle,
            scheduler_handle,
            signal_handle,
            _secure_socket: self.secure_socket,
        })
    }
}

/// A started server. Stopping consumes it; there is no restart path.
pub struct RunningServer {
    local_addr: SocketAddr,
    config: ServerConfig,
    management: Box<dyn ManagementHook>,
    flags: LifecycleFlags,
    shutdown: Shutdown,
    serve_handle: JoinHandle<Result<(), ShutdownError>>,
    scheduler_handle: JoinHandle<()>,
    signal_handle: Option<JoinHandle<()>>,
    _secure_socket: Option<std::net::TcpListener>,
}

impl RunningServer {
    /// Address the server is accepting on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle for triggering shutdown from another task.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Stop accepting, release the listener socket and drain in-flight
    /// connections. Errors are surfaced, never discarded.
    pub async fn stop(self) -> Result<(), ShutdownError> {
        if self.flags.dump_before_stop {
            tracing::debug!(config = ?self.config, "server state before stop");
        }
        self.shutdown.trigger();
        self.teardown().await
    }

    /// Run until the serve loop exits, e.g. because the process shutdown
    /// hook fired.
    pub async fn wait(self) -> Result<(), ShutdownError> {
        self.teardown().await
    }

    async fn teardown(self) -> Result<(), ShutdownError> {
        let result = match self.serve_handle.await {
            Ok(inner) => inner,
            Err(err) => Err(ShutdownError::Task(err.to_string())),
        };

        if let Some(handle) = self.signal_handle {
            handle.abort();
        }
        // The scheduler subscribes to the same shutdown broadcast and exits
        // on its own once it fires.
        if let Err(err) = self.scheduler_handle.await {
            tracing::warn!(error = %err, "stats scheduler task failed");
        }

        self.management.state_changed(LifecycleState::Stopped);
        match &result {
            Ok(()) => tracing::info!(port = self.local_addr.port(), "server stopped"),
            Err(err) => tracing::warn!(port = self.local_addr.port(), error = %err, "server stopped uncleanly"),
        }
        result
    }
}

/// Accept loop: runs until shutdown, then releases the port and drains.
async fn serve(
    listener: Listener,
    router: Router,
    builder: http1::Builder,
    connections: ConnectionTracker,
    shutdown: Shutdown,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ShutdownError> {
    let builder = Arc::new(builder);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = connections.track();
                        tokio::spawn(serve_http1(
                            stream,
                            peer,
                            router.clone(),
                            Arc::clone(&builder),
                            shutdown.subscribe(),
                            guard,
                            permit,
                        ));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "accept failed");
                    }
                }
            }
        }
    }

    // Release the port before draining so stop() leaves no listener behind.
    drop(listener);

    if connections.wait_idle(DRAIN_TIMEOUT).await {
        tracing::info!("in-flight connections drained");
        Ok(())
    } else {
        Err(ShutdownError::DrainTimedOut {
            active: connections.active_count(),
        })
    }
}
