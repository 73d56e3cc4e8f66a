//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacities > 0, timeouts > 0)
//! - Check cross-field consistency (login path must be public)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GateConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "rate_limit.bucket_capacity").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.rate_limit.bucket_capacity == 0 {
        errors.push(ValidationError {
            field: "rate_limit.bucket_capacity".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.rate_limit.tokens_per_minute == 0 {
        errors.push(ValidationError {
            field: "rate_limit.tokens_per_minute".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError {
            field: "rate_limit.sweep_interval_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.session.secret.is_empty() {
        errors.push(ValidationError {
            field: "session.secret".to_string(),
            message: "must not be empty (set it in the config file or via SESSION_SECRET)"
                .to_string(),
        });
    }

    if config.session.ttl_hours <= 0 {
        errors.push(ValidationError {
            field: "session.ttl_hours".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.routes.api_marker.is_empty() {
        errors.push(ValidationError {
            field: "routes.api_marker".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    // An unauthenticated client must be able to reach the login path,
    // otherwise the redirect loops forever.
    if !config.routes.public_paths.contains(&config.routes.login_path) {
        errors.push(ValidationError {
            field: "routes.login_path".to_string(),
            message: format!(
                "login path {} must be listed in routes.public_paths",
                config.routes.login_path
            ),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        });
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

    fn valid_config() -> GateConfig {
        let mut config = GateConfig::default();
        config.session.secret = "test-secret".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_secret_rejected() {
        let mut config = valid_config();
        config.session.secret.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "session.secret"));
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = valid_config();
        config.rate_limit.bucket_capacity = 0;
        config.rate_limit.tokens_per_minute = 0;
        config.listener.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_login_path_must_be_public() {
        let mut config = valid_config();
        config.routes.login_path = "/signin".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "routes.login_path"));
    }
}
