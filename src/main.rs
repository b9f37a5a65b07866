//! Process entry point for webapp-host.
//!
//! Thin by design: parses arguments, initializes logging and the metrics
//! recorder, then hands everything to the library's bootstrap sequence. The
//! real application handler is supplied by embedders; this binary deploys a
//! placeholder that acknowledges the artifact without serving it.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::Router;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;

use webapp_host::config::loader::load_config;
use webapp_host::deploy::{Application, WebAppContext};
use webapp_host::observability;
use webapp_host::ServerBootstrap;

#[derive(Parser, Debug)]
#[command(name = "webapp-host", about = "Embedded HTTP host for a packaged web application")]
struct Args {
    /// Path to a TOML configuration file; overrides the flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port for the plaintext HTTP listener.
    #[arg(long, default_value_t = 8081)]
    port: u16,

    /// Directory containing the packaged application artifact.
    #[arg(long, default_value = "/srv/app")]
    webapp_dir: PathBuf,

    /// Directory for static files. Accepted but currently unused.
    #[arg(long)]
    files_dir: Option<PathBuf>,

    /// Address to expose Prometheus metrics on, if any.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

/// Stand-in application for standalone runs: the artifact is deployed but no
/// native handler exists for it, and every request says so.
struct PlaceholderApp;

impl Application for PlaceholderApp {
    fn mount(&self, context: &WebAppContext) -> Router {
        let banner = format!(
            "packaged application {} is deployed without a native handler\n",
            context.artifact().display()
        );
        Router::new().fallback(move || {
            let banner = banner.clone();
            async move { (StatusCode::NOT_IMPLEMENTED, banner) }
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let args = Args::parse();

    if let Some(addr) = args.metrics_address {
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        tracing::info!(address = %addr, "metrics exporter installed");
    }

    let bootstrap = match &args.config {
        Some(path) => ServerBootstrap::from_config(load_config(path)?)?,
        None => ServerBootstrap::new(args.port, args.webapp_dir, args.files_dir)?,
    };

    tracing::info!(
        port = bootstrap.config().listen_port,
        webapp_dir = %bootstrap.config().webapp_dir.display(),
        "webapp-host starting"
    );

    let configured = bootstrap.setup(PlaceholderApp).await?;
    let running = configured.start().await?;

    // The stop-at-shutdown hook ends the serve loop on the process signal.
    running.wait().await?;

    tracing::info!("shutdown complete");
    Ok(())
}
