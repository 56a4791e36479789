//! Configuration Management
//!
//! Declarative records describing the provider and one REST resource, plus
//! the harness file that bundles them.

use crate::error::ConfigError;
use crate::http::{Headers, RequestConfig};
use crate::json::FilterSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_method() -> String {
    "GET".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    1
}

/// Provider-wide settings shared read-only by every resource
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// Base headers sent with every request, overridable per resource
    #[serde(default)]
    pub headers: Headers,
}

/// One REST resource (or data source) declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// The request URL
    pub url: String,
    /// The HTTP request verb
    #[serde(default = "default_method")]
    pub method: String,
    /// Extra headers for the request
    #[serde(default)]
    pub headers: Headers,
    /// JSON payload sent with the request
    #[serde(default)]
    pub data: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
    /// Replace the resource when any of these values change
    #[serde(default)]
    pub force_new: Vec<String>,
    /// Path to the id inside the narrowed response
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Retries on transport failure
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Log request and response dumps
    #[serde(default)]
    pub debug: bool,
    /// At most one filter is honored: the last one
    #[serde(default)]
    pub filter: Vec<FilterSpec>,
    /// Limit the response to the value under this top-level key
    #[serde(default)]
    pub key: Option<String>,
}

impl ResourceConfig {
    /// A GET of `url` with every other field at its default
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: default_method(),
            headers: Headers::new(),
            data: None,
            insecure: false,
            force_new: Vec::new(),
            id_field: default_id_field(),
            timeout: default_timeout(),
            retries: default_retries(),
            username: None,
            password: None,
            debug: false,
            filter: Vec::new(),
            key: None,
        }
    }

    /// The filter in effect
    pub fn active_filter(&self) -> Option<&FilterSpec> {
        if self.filter.len() > 1 {
            tracing::warn!(
                "{} filters configured, only the last one is used",
                self.filter.len()
            );
        }
        self.filter.last()
    }

    /// The outbound request this resource describes
    pub fn request(&self) -> RequestConfig {
        RequestConfig {
            url: self.url.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.data.clone(),
            insecure: self.insecure,
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
            username: self.username.clone(),
            password: self.password.clone(),
            debug: self.debug,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Invalid("url is required".to_string()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".to_string()));
        }
        let has_user = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let has_pass = self.password.as_deref().is_some_and(|p| !p.is_empty());
        if has_user != has_pass {
            return Err(ConfigError::Invalid(
                "username and password must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

/// File consumed by the command-line harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    pub resource: ResourceConfig,
}

impl HarnessConfig {
    /// Load from YAML or JSON (YAML parses both)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.resource.validate()?;
        Ok(config)
    }
}

/// Where the harness keeps resource state when no path is given
pub fn default_state_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("resty").join("state.json");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".resty").join("state.json");
    }
    PathBuf::from("resty-state.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<HarnessConfig, ConfigError> {
        HarnessConfig::parse(content, Path::new("test.yaml"))
    }

    #[test]
    fn test_defaults() {
        let config = parse("resource:\n  url: http://localhost/test\n").unwrap();
        let resource = config.resource;
        assert_eq!(resource.method, "GET");
        assert_eq!(resource.id_field, "id");
        assert_eq!(resource.timeout, 10);
        assert_eq!(resource.retries, 1);
        assert!(!resource.insecure);
        assert!(resource.active_filter().is_none());
        assert!(config.provider.headers.is_empty());
    }

    #[test]
    fn test_json_config_loads() {
        let config = parse(
            r#"{
                "provider": {"headers": {"X-Base": "1"}},
                "resource": {
                    "url": "http://localhost/filter",
                    "key": "content",
                    "filter": [{"name": "interesting", "value": "value"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.provider.headers.get("X-Base").unwrap(), "1");
        assert_eq!(config.resource.key.as_deref(), Some("content"));
        assert_eq!(
            config.resource.active_filter(),
            Some(&FilterSpec::new("interesting", "value"))
        );
    }

    #[test]
    fn test_last_filter_wins() {
        let mut resource = ResourceConfig::new("http://localhost/");
        resource.filter = vec![FilterSpec::new("a", "1"), FilterSpec::new("b", "2")];
        assert_eq!(resource.active_filter(), Some(&FilterSpec::new("b", "2")));
    }

    #[test]
    fn test_request_mapping() {
        let mut resource = ResourceConfig::new("http://localhost/");
        resource.data = Some("{}".to_string());
        resource.timeout = 3;
        resource.retries = 2;
        let request = resource.request();
        assert_eq!(request.timeout, Duration::from_secs(3));
        assert_eq!(request.retries, 2);
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_missing_url_fails_to_parse() {
        assert!(matches!(
            parse("resource:\n  method: POST\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_lone_username_is_invalid() {
        let err = parse("resource:\n  url: http://x/\n  username: bob\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resty.yaml");
        std::fs::write(&path, "resource:\n  url: http://localhost/x\n  retries: 0\n").unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.resource.url, "http://localhost/x");
        assert_eq!(config.resource.retries, 0);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = HarnessConfig::load(Path::new("/nonexistent/resty.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
