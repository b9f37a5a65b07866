//! Administrative context.
//!
//! Small read-only status surface mounted in the handler chain alongside the
//! deployed application. Reports the same facts the management hook receives;
//! it is a monitoring convenience, never a control path.

pub mod handlers;

use axum::{routing::get, Router};

use crate::management::ServerInfo;
use crate::net::{ConnectionTracker, WorkerPool};

use self::handlers::{get_status, get_workers, AdminState};

/// Fixed context path the administrative handlers are mounted under.
pub const ADMIN_PATH: &str = "/admin";

/// Build the administrative router.
pub fn admin_router(info: ServerInfo, pool: WorkerPool, connections: ConnectionTracker) -> Router {
    let state = AdminState {
        info,
        pool,
        connections,
    };

    Router::new()
        .route("/status", get(get_status))
        .route("/workers", get(get_workers))
        .with_state(state)
}
