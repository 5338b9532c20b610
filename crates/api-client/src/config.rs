//! Client configuration and loading
//!
//! Config precedence: env vars > config file > defaults. The base URL can
//! be overridden with `API_BASE_URL` so the same binary talks to local,
//! staging, or production backends without editing the TOML.

use std::path::Path;

use serde::Deserialize;

/// API client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API, including the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Also bounds the refresh call.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Path the user is sent to when the session cannot be renewed.
    #[serde(default = "default_signin_path")]
    pub signin_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5005/api/v1".into()
}

fn default_timeout() -> u64 {
    10
}

fn default_signin_path() -> String {
    "/signin".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            signin_path: default_signin_path(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// `API_BASE_URL` takes precedence over the file's `base_url`.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = toml::from_str(&contents)?;

        if let Ok(url) = std::env::var("API_BASE_URL") {
            if url.trim().is_empty() {
                return Err(common::Error::Env("API_BASE_URL is set but empty".into()));
            }
            config.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate field constraints shared by `load` and hand-built configs.
    pub fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !self.signin_path.starts_with('/') {
            return Err(common::Error::Config(format!(
                "signin_path must be absolute (start with /), got: {}",
                self.signin_path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn valid_toml() -> &'static str {
        r#"
base_url = "https://assets.example.com/api/v1"
timeout_secs = 15
signin_path = "/signin"
"#
    }

    #[test]
    fn load_valid_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("api-client-test-valid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        unsafe { remove_env("API_BASE_URL") };

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://assets.example.com/api/v1");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.signin_path, "/signin");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn defaults_apply_for_missing_fields() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("api-client-test-defaults");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        unsafe { remove_env("API_BASE_URL") };

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:5005/api/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.signin_path, "/signin");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn env_var_overrides_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("api-client-test-env");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        unsafe { set_env("API_BASE_URL", "https://staging.example.com/api/v1") };
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com/api/v1");
        unsafe { remove_env("API_BASE_URL") };

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_is_error() {
        let result = ClientConfig::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig {
            base_url: "ftp://example.com".into(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_relative_signin_path() {
        let config = ClientConfig {
            signin_path: "signin".into(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
