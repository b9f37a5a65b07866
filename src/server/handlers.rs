//! Handler chain assembly.
//!
//! An ordered collection of contexts, each a router mounted under a path
//! prefix, terminated by a default handler that answers everything unmatched
//! with a not-found response. Order is significant: first matching context
//! wins, the default handler is always last.

use axum::http::StatusCode;
use axum::Router;

/// Ordered collection of contexts with a default not-found fallback.
///
/// Built during setup step 3 so it exists before the application is deployed
/// into it; converted to the final router once all contexts are in place.
#[derive(Default)]
pub struct HandlerChain {
    contexts: Vec<(String, Router)>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a context. `path` is a prefix such as `/artifactory`.
    pub fn add_context(&mut self, path: impl Into<String>, router: Router) {
        self.contexts.push((path.into(), router));
    }

    /// Number of mounted contexts (the default handler is not counted).
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Collapse the chain into a single router, default handler last.
    pub fn into_router(self) -> Router {
        let mut root = Router::new();
        for (path, context) in self.contexts {
            root = root.nest(&path, context);
        }
        root.fallback(default_handler)
    }
}

/// The terminal handler: answers unmatched requests with 404.
async fn default_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    fn chain_with_app() -> Router {
        let mut chain = HandlerChain::new();
        chain.add_context(
            "/app",
            Router::new().route("/ping", get(|| async { "pong" })),
        );
        assert_eq!(chain.len(), 1);
        chain.into_router()
    }

    #[tokio::test]
    async fn matching_context_serves_request() {
        let router = chain_with_app();
        let response = router
            .oneshot(Request::builder().uri("/app/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn unmatched_path_hits_default_handler() {
        let router = chain_with_app();
        let response = router
            .oneshot(Request::builder().uri("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_chain_is_all_not_found() {
        let router = HandlerChain::new().into_router();
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
