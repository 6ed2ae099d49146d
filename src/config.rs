//! Connection configuration for the adapter.

use serde::{Deserialize, Serialize};

/// Connection configuration for an Elasticsearch-compatible backend.
///
/// A plain value object: nothing is validated at construction. An unreachable
/// host or bad port only surfaces when [`connect`](crate::ElasticDao::connect)
/// is attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Backend hostname or IP address.
    pub host: String,

    /// Backend port (e.g. 9200).
    pub port: u16,

    /// Username for basic authentication. Credentials are only sent when
    /// both `username` and `password` are present.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Whether to connect over TLS. Determines the URL scheme.
    #[serde(default)]
    pub tls: bool,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,

    /// Request timeout in seconds (default: 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries for a timed-out request (default: 10).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Whether timed-out requests are retried at all (default: true).
    #[serde(default = "default_retry_on_timeout")]
    pub retry_on_timeout: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    10
}

fn default_retry_on_timeout() -> bool {
    true
}

impl DaoConfig {
    /// Creates a configuration for the given host and port with defaults for
    /// everything else: no auth, no TLS, 60s timeout, 10 retries on timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            tls: false,
            disable_certificate_validation: false,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_on_timeout: default_retry_on_timeout(),
        }
    }

    /// Sets basic-auth credentials.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Enables TLS.
    pub fn with_tls(mut self) -> Self {
        self.tls = true;
        self
    }

    /// Returns the URL scheme derived from the TLS flag.
    pub fn scheme(&self) -> &'static str {
        if self.tls { "https" } else { "http" }
    }

    /// Returns the node URL, e.g. `http://localhost:9200`.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Returns the `(username, password)` pair when both are present.
    pub(crate) fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self::new("localhost", 9200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DaoConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9200);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 10);
        assert!(config.retry_on_timeout);
        assert!(!config.tls);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_scheme_follows_tls_flag() {
        let config = DaoConfig::new("search.example.com", 9200);
        assert_eq!(config.scheme(), "http");
        assert_eq!(config.url(), "http://search.example.com:9200");

        let config = config.with_tls();
        assert_eq!(config.scheme(), "https");
        assert_eq!(config.url(), "https://search.example.com:9200");
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut config = DaoConfig::new("localhost", 9200);
        config.username = Some("elastic".to_string());
        assert!(config.credentials().is_none());

        let config = DaoConfig::new("localhost", 9200).with_auth("elastic", "changeme");
        assert_eq!(config.credentials(), Some(("elastic", "changeme")));
    }

    #[test]
    fn test_serialization_fills_defaults() {
        let config: DaoConfig =
            serde_json::from_str(r#"{"host": "es1", "port": 9200}"#).unwrap();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 10);
        assert!(config.retry_on_timeout);
        assert!(!config.disable_certificate_validation);
    }
}
