//! Bridge configuration.
//!
//! Loaded once at startup from a JSON file whose keys follow the camelCase
//! layout of `config.example.json`. Only `serverURL` is required.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

/// Backend fields the remapper reads. Sent as the `fields` selector unless
/// the config overrides it.
pub const DEFAULT_POST_FIELDS: &str = "id,creationTime,lastEditTime,score,source,safety,\
canvasWidth,canvasHeight,checksum,mimeType,user,tags,relations,contentUrl,thumbnailUrl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    #[serde(default = "default_port")]
    pub bridge_port: u16,
    #[serde(default = "default_hostname")]
    pub bridge_hostname: String,
    /// Backend base URL; relative content URLs are resolved against it.
    #[serde(rename = "serverURL")]
    pub server_url: Url,
    #[serde(default = "default_post_fields")]
    pub request_post_fields: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_port() -> u16 {
    8080
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_post_fields() -> String {
    DEFAULT_POST_FIELDS.to_string()
}

fn default_user_agent() -> String {
    concat!("booru-bridge/", env!("CARGO_PKG_VERSION")).to_string()
}

impl BridgeConfig {
    /// Config pointing at `server_url` with every other field defaulted.
    pub fn new(server_url: Url) -> Self {
        Self {
            bridge_port: default_port(),
            bridge_hostname: default_hostname(),
            server_url,
            request_post_fields: default_post_fields(),
            user_agent: default_user_agent(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// `host[:port]` of the backend, as sent in the `Host` header.
    pub fn backend_host(&self) -> String {
        let host = self.server_url.host_str().unwrap_or_default();
        match self.server_url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

/// Errors raised while loading a `BridgeConfig`.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid JSON or misses required keys.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {msg}"),
            ConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = BridgeConfig::from_json_str(
            r#"{
                "bridgePort": 9000,
                "bridgeHostname": "0.0.0.0",
                "serverURL": "https://booru.example.org",
                "requestPostFields": "id,tags",
                "userAgent": "abox-bridge"
            }"#,
        )
        .unwrap();
        assert_eq!(config.bridge_port, 9000);
        assert_eq!(config.bridge_hostname, "0.0.0.0");
        assert_eq!(config.server_url.as_str(), "https://booru.example.org/");
        assert_eq!(config.request_post_fields, "id,tags");
        assert_eq!(config.user_agent, "abox-bridge");
    }

    #[test]
    fn only_server_url_is_required() {
        let config = BridgeConfig::from_json_str(r#"{"serverURL":"http://localhost:8081"}"#).unwrap();
        assert_eq!(config.bridge_port, 8080);
        assert_eq!(config.bridge_hostname, "127.0.0.1");
        assert_eq!(config.request_post_fields, DEFAULT_POST_FIELDS);
        assert!(config.user_agent.starts_with("booru-bridge/"));
    }

    #[test]
    fn missing_server_url_is_rejected() {
        let err = BridgeConfig::from_json_str(r#"{"bridgePort":9000}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let err = BridgeConfig::from_json_str(r#"{"serverURL":"not a url"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn backend_host_includes_explicit_port() {
        let config = BridgeConfig::new(Url::parse("http://localhost:8081/").unwrap());
        assert_eq!(config.backend_host(), "localhost:8081");

        let config = BridgeConfig::new(Url::parse("https://booru.example.org/").unwrap());
        assert_eq!(config.backend_host(), "booru.example.org");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BridgeConfig::load("/nonexistent/bridge-config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
