//! Shared error type for configuration loading
//!
//! Everything the client layer reads at startup (the TOML file, the
//! `API_BASE_URL` override) funnels its failures through this enum so
//! config problems print uniformly wherever they surface.

use thiserror::Error;

/// Failure while loading or validating client configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Environment error: {0}")]
    Env(String),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_reports_the_offending_field() {
        let err = Error::Config("base_url must start with http:// or https://".into());
        let message = err.to_string();
        assert!(message.starts_with("Configuration error:"), "got: {message}");
        assert!(message.contains("base_url"));
    }

    #[test]
    fn env_error_names_the_variable() {
        let err = Error::Env("API_BASE_URL is set but empty".into());
        assert_eq!(
            err.to_string(),
            "Environment error: API_BASE_URL is set but empty"
        );
    }

    #[test]
    fn toml_error_converts_from_parse_failure() {
        let parse_err = toml::from_str::<toml::Value>("timeout_secs = ").unwrap_err();
        let err = Error::from(parse_err);
        assert!(
            err.to_string().starts_with("TOML parse error:"),
            "got: {err}"
        );
    }

    #[test]
    fn io_error_converts_from_read_failure() {
        let read_err = std::fs::read_to_string("/nonexistent/client-config.toml").unwrap_err();
        let err = Error::from(read_err);
        assert!(err.to_string().starts_with("I/O error:"), "got: {err}");
        assert!(
            format!("{err:?}").contains("Io"),
            "Debug should include variant name"
        );
    }
}
