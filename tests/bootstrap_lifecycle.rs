//! End-to-end lifecycle tests: construction validation, the bootstrap
//! sequence, request routing through the handler chain, and clean shutdown.

mod common;

use std::net::TcpListener as StdTcpListener;

use common::{free_port, webapp_fixture, TestApp};
use webapp_host::config::ConfigError;
use webapp_host::{ServerBootstrap, StartupError};

#[test]
fn construction_rejects_port_zero() {
    let err = ServerBootstrap::new(0, "/srv/app", None).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn construction_rejects_empty_webapp_dir() {
    let err = ServerBootstrap::new(8081, "", None).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn construction_allows_absent_files_dir() {
    assert!(ServerBootstrap::new(8081, "/srv/app", None).is_ok());
}

#[tokio::test]
async fn setup_binds_listener_with_fixed_worker_cap() {
    let webapp = webapp_fixture();
    let port = free_port();

    let configured = ServerBootstrap::new(port, webapp.path(), None)
        .unwrap()
        .setup(TestApp)
        .await
        .unwrap();

    assert_eq!(configured.local_addr().unwrap().port(), port);
    assert_eq!(configured.max_workers(), 500);
    assert!(!configured.has_secure_socket());

    // Exactly one listener holds the port.
    assert!(StdTcpListener::bind(("0.0.0.0", port)).is_err());
}

#[tokio::test]
async fn setup_fails_when_artifact_missing() {
    let empty_dir = tempfile::tempdir().unwrap();
    let port = free_port();

    let err = ServerBootstrap::new(port, empty_dir.path(), None)
        .unwrap()
        .setup(TestApp)
        .await
        .unwrap_err();
    assert!(matches!(err, StartupError::Deploy(_)));
}

#[tokio::test]
async fn setup_fails_when_port_in_use() {
    let webapp = webapp_fixture();
    let port = free_port();
    let _holder = StdTcpListener::bind(("0.0.0.0", port)).unwrap();

    let err = ServerBootstrap::new(port, webapp.path(), None)
        .unwrap()
        .setup(TestApp)
        .await
        .unwrap_err();
    assert!(matches!(err, StartupError::Listener(_)));
}

#[tokio::test]
async fn lifecycle_round_trip() {
    let webapp = webapp_fixture();
    let port = free_port();

    let running = ServerBootstrap::new(port, webapp.path(), None)
        .unwrap()
        .setup(TestApp)
        .await
        .unwrap()
        .start()
        .await
        .unwrap();

    let base = format!("http://127.0.0.1:{port}");

    // Request to the deployed application's context path is routed to it.
    let response = reqwest::get(format!("{base}/artifactory/ping")).await.unwrap();
    assert_eq!(response.status(), 200);
    let server_header = response
        .headers()
        .get(reqwest::header::SERVER)
        .expect("Server header advertised")
        .to_str()
        .unwrap()
        .to_string();
    assert!(server_header.starts_with("webapp-host/"));
    // send-date-header is off.
    assert!(response.headers().get(reqwest::header::DATE).is_none());
    assert_eq!(response.text().await.unwrap(), "pong");

    // Context root is served by the application as well.
    let response = reqwest::get(format!("{base}/artifactory")).await.unwrap();
    assert_eq!(response.status(), 200);

    // Unmatched path falls through to the default handler.
    let response = reqwest::get(format!("{base}/nonexistent")).await.unwrap();
    assert_eq!(response.status(), 404);

    // Administrative context answers while running.
    let response = reqwest::get(format!("{base}/admin/status")).await.unwrap();
    assert_eq!(response.status(), 200);
    let status: serde_json::Value = response.json().await.unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["listen_port"], port);

    let response = reqwest::get(format!("{base}/admin/workers")).await.unwrap();
    let workers: serde_json::Value = response.json().await.unwrap();
    assert_eq!(workers["max_workers"], 500);

    running.stop().await.unwrap();

    // The listener socket is released; nothing accepts on the port anymore.
    let err = reqwest::Client::new()
        .get(format!("{base}/artifactory/ping"))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_connect());
}

#[tokio::test]
async fn stop_immediately_after_start_completes() {
    let webapp = webapp_fixture();
    let port = free_port();

    let running = ServerBootstrap::new(port, webapp.path(), None)
        .unwrap()
        .setup(TestApp)
        .await
        .unwrap()
        .start()
        .await
        .unwrap();

    // No await between start() and stop(): the serve loop may not have been
    // polled yet, and the shutdown signal must still reach it.
    tokio::time::timeout(std::time::Duration::from_secs(5), running.stop())
        .await
        .expect("stop() did not complete: serve loop missed the shutdown signal")
        .unwrap();
}

#[tokio::test]
async fn pre_filter_runs_ahead_of_the_application() {
    use axum::http::StatusCode;
    use axum::Router;

    let webapp = webapp_fixture();
    let port = free_port();

    // A blunt stand-in for an IP-filter/SSO hook: reject everything.
    let reject_all = |router: Router| {
        router.layer(axum::middleware::from_fn(
            |_req: axum::extract::Request, _next: axum::middleware::Next| async {
                StatusCode::FORBIDDEN
            },
        ))
    };

    let running = ServerBootstrap::new(port, webapp.path(), None)
        .unwrap()
        .with_pre_filter(reject_all)
        .setup(TestApp)
        .await
        .unwrap()
        .start()
        .await
        .unwrap();

    let response = reqwest::get(format!("http://127.0.0.1:{port}/artifactory/ping"))
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    running.stop().await.unwrap();
}
