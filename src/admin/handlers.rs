use axum::{extract::State, Json};
use serde::Serialize;

use crate::management::ServerInfo;
use crate::net::{ConnectionTracker, WorkerPool};

/// State shared by the administrative handlers.
#[derive(Clone)]
pub struct AdminState {
    pub info: ServerInfo,
    pub pool: WorkerPool,
    pub connections: ConnectionTracker,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub listen_port: u16,
    pub context_path: &'static str,
}

#[derive(Serialize)]
pub struct WorkerStatus {
    pub max_workers: usize,
    pub active_workers: usize,
    pub active_connections: u64,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        listen_port: state.info.listen_port,
        context_path: state.info.context_path,
    })
}

pub async fn get_workers(State(state): State<AdminState>) -> Json<WorkerStatus> {
    Json(WorkerStatus {
        max_workers: state.pool.max_workers(),
        active_workers: state.pool.active(),
        active_connections: state.connections.active_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn test_state() -> AdminState {
        AdminState {
            info: ServerInfo {
                listen_port: 8081,
                context_path: "/artifactory",
                max_workers: 500,
                webapp_dir: PathBuf::from("/srv/app"),
            },
            pool: WorkerPool::new(500),
            connections: ConnectionTracker::new(),
        }
    }

    #[tokio::test]
    async fn status_reports_port_and_context() {
        let router = crate::admin::admin_router(
            test_state().info,
            WorkerPool::new(500),
            ConnectionTracker::new(),
        );

        let response = router
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["listen_port"], 8081);
        assert_eq!(json["context_path"], "/artifactory");
        assert_eq!(json["status"], "operational");
    }

    #[tokio::test]
    async fn workers_reports_pool_occupancy() {
        let state = test_state();
        let pool = state.pool.clone();
        let router = crate::admin::admin_router(state.info, pool.clone(), state.connections);

        let _held = pool.acquire().await;

        let response = router
            .oneshot(Request::builder().uri("/workers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["max_workers"], 500);
        assert_eq!(json["active_workers"], 1);
    }
}
