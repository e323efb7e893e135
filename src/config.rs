//! Environment-based configuration

use std::env;

/// Deployment environment name, defaulting to "sandbox".
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// HTTP listen port, defaulting to 8080.
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}
