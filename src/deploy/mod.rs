//! Web application deployment.
//!
//! The packaged application is an opaque artifact: this module locates it on
//! disk and mounts the handler its [`Application`] collaborator builds for it
//! under a fixed context path. What the application does with requests is
//! entirely outside this crate's concern.

use std::path::{Path, PathBuf};

use axum::Router;
use thiserror::Error;

/// Fixed context path the deployed application is mounted under.
pub const CONTEXT_PATH: &str = "/artifactory";

/// Fixed artifact filename expected inside the webapp directory.
pub const ARTIFACT_FILE: &str = "artifactory.war";

/// Error raised while deploying the packaged application.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("application artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),
}

/// The deployed application's context: a fixed path and the located artifact.
#[derive(Debug, Clone)]
pub struct WebAppContext {
    artifact: PathBuf,
}

impl WebAppContext {
    /// Locate the packaged artifact under `webapp_dir`.
    ///
    /// The artifact must exist before the listener opens; a missing file is a
    /// startup-class failure, not a deferred one.
    pub fn locate(webapp_dir: &Path) -> Result<Self, DeployError> {
        let artifact = webapp_dir.join(ARTIFACT_FILE);
        if !artifact.is_file() {
            return Err(DeployError::ArtifactMissing(artifact));
        }
        Ok(Self { artifact })
    }

    /// The fixed context path this application is served under.
    pub fn context_path(&self) -> &'static str {
        CONTEXT_PATH
    }

    /// Absolute or configured location of the packaged artifact.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }
}

/// The packaged web application, supplied by the embedder.
///
/// The bootstrap never defines request-handling behavior of its own; it calls
/// `mount` once during setup and nests the returned router at the fixed
/// context path, alongside the default not-found fallback.
pub trait Application: Send + Sync + 'static {
    /// Build the request handler for the located artifact.
    fn mount(&self, context: &WebAppContext) -> Router;
}
