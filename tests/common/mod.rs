//! Shared utilities for integration tests.

use std::net::TcpListener as StdTcpListener;

use axum::routing::get;
use axum::Router;

use webapp_host::deploy::{Application, WebAppContext, ARTIFACT_FILE};

/// Stand-in packaged application with a couple of fixed routes.
pub struct TestApp;

impl Application for TestApp {
    fn mount(&self, _context: &WebAppContext) -> Router {
        Router::new()
            .route("/", get(|| async { "test application root" }))
            .route("/ping", get(|| async { "pong" }))
    }
}

/// Reserve a free TCP port by binding port 0 and dropping the socket.
pub fn free_port() -> u16 {
    StdTcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .expect("local addr")
        .port()
}

/// Create a webapp directory containing a placeholder packaged artifact.
pub fn webapp_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join(ARTIFACT_FILE), b"placeholder artifact")
        .expect("write artifact");
    dir
}
