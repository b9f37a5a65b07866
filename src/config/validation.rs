//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Fail-fast checks performed at bootstrap construction, never deferred to start
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic configuration defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listen port may not be zero")]
    ZeroListenPort,

    #[error("web application directory may not be empty")]
    EmptyWebAppDir,

    #[error("worker pool cap may not be zero")]
    ZeroWorkerCap,
}

/// Validate a configuration, collecting every defect found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listen_port == 0 {
        errors.push(ValidationError::ZeroListenPort);
    }
    if config.webapp_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyWebAppDir);
    }
    if config.workers.max_workers == 0 {
        errors.push(ValidationError::ZeroWorkerCap);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = ServerConfig::new(8081, "/srv/app", None);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let config = ServerConfig::new(0, "/srv/app", None);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroListenPort]);
    }

    #[test]
    fn empty_webapp_dir_rejected() {
        let config = ServerConfig::new(8081, "", None);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyWebAppDir]);
    }

    #[test]
    fn all_errors_collected() {
        let mut config = ServerConfig::new(0, "", None);
        config.workers.max_workers = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn absent_files_dir_is_fine() {
        let config = ServerConfig::new(8081, "/srv/app", None);
        assert!(validate_config(&config).is_ok());
    }
}
