//! Configuration for the index trigger.

use std::fmt;
use std::path::Path;

use content_index_observation::ListenerConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriggerError};
use crate::normalizer::DEFAULT_METADATA_PREFIX;

/// Supplies the search server coordinates.
///
/// Read on every dispatch, so implementations may change their answers at
/// runtime.
pub trait SolrConfigProvider: Send + Sync {
    /// URL scheme, e.g. `http`.
    fn protocol(&self) -> String;

    /// Server host name.
    fn host(&self) -> String;

    /// Server port.
    fn port(&self) -> String;

    /// Name of the Solr core.
    fn core_name(&self) -> String;

    /// Snapshot the current endpoint.
    fn endpoint(&self) -> SolrEndpoint {
        SolrEndpoint {
            protocol: self.protocol(),
            host: self.host(),
            port: self.port(),
            core_name: self.core_name(),
        }
    }
}

/// Resolved search server coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolrEndpoint {
    pub protocol: String,
    pub host: String,
    pub port: String,
    pub core_name: String,
}

impl SolrEndpoint {
    /// Base URL of the core: `protocol://host:port/solr/core_name`.
    pub fn base_url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SolrEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}/solr/{}",
            self.protocol, self.host, self.port, self.core_name
        )
    }
}

/// Static search server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolrServerConfig {
    pub protocol: String,
    pub host: String,
    pub port: String,
    pub core_name: String,
}

impl SolrServerConfig {
    /// Create a config for the given server and core.
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        core_name: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: port.into(),
            core_name: core_name.into(),
        }
    }

    /// Base URL of the configured core.
    pub fn base_url(&self) -> String {
        self.endpoint().base_url()
    }
}

impl Default for SolrServerConfig {
    fn default() -> Self {
        Self::new("http", "localhost", "8983", "collection1")
    }
}

impl SolrConfigProvider for SolrServerConfig {
    fn protocol(&self) -> String {
        self.protocol.clone()
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn core_name(&self) -> String {
        self.core_name.clone()
    }
}

/// Complete trigger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Repository subscription.
    pub listener: ListenerConfig,

    /// Search server.
    pub solr: SolrServerConfig,

    /// Segment prefix marking repository metadata below a content item.
    pub metadata_prefix: String,
}

impl TriggerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&source)
    }

    /// Set the observed subtree.
    pub fn with_observed_path(mut self, path: impl Into<String>) -> Self {
        self.listener.observed_path = path.into();
        self
    }

    /// Set the search server.
    pub fn with_solr(mut self, solr: SolrServerConfig) -> Self {
        self.solr = solr;
        self
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        if !self.listener.observed_path.starts_with('/') {
            return Err(TriggerError::Config(format!(
                "observed path must be absolute: {}",
                self.listener.observed_path
            )));
        }
        if self.metadata_prefix.is_empty() || self.metadata_prefix.contains('/') {
            return Err(TriggerError::Config(format!(
                "invalid metadata prefix: {:?}",
                self.metadata_prefix
            )));
        }
        Ok(())
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            solr: SolrServerConfig::default(),
            metadata_prefix: DEFAULT_METADATA_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_base_url() {
        let config = SolrServerConfig::new("http", "solr.local", "8983", "main");
        assert_eq!(config.base_url(), "http://solr.local:8983/solr/main");
    }

    #[test]
    fn test_defaults() {
        let config = TriggerConfig::default();

        assert_eq!(config.listener.observed_path, "/content/tcs");
        assert_eq!(config.metadata_prefix, "jcr:");
        assert_eq!(config.solr.base_url(), "http://localhost:8983/solr/collection1");
    }

    #[test]
    fn test_partial_toml() {
        let config = TriggerConfig::from_toml_str(
            r#"
            [listener]
            observed_path = "/content/site"

            [solr]
            host = "search.internal"
            core_name = "pages"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.observed_path, "/content/site");
        assert!(config.listener.recursive);
        assert_eq!(config.solr.base_url(), "http://search.internal:8983/solr/pages");
    }

    #[test]
    fn test_event_kinds_are_not_configurable() {
        let err = TriggerConfig::from_toml_str(
            r#"
            [listener]
            event_kinds = ["node_added"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, TriggerError::Toml(_)));
    }

    #[test]
    fn test_rejects_relative_path() {
        let err = TriggerConfig::from_toml_str("[listener]\nobserved_path = \"content\"\n")
            .unwrap_err();
        assert!(matches!(err, TriggerError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_prefix() {
        let err = TriggerConfig::from_toml_str("metadata_prefix = \"a/b\"\n").unwrap_err();
        assert!(matches!(err, TriggerError::Config(_)));
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let config = TriggerConfig {
            metadata_prefix: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TriggerError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let err = TriggerConfig::from_toml_str("[solr\nhost = 1").unwrap_err();
        assert!(matches!(err, TriggerError::Toml(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[solr]\nprotocol = \"https\"\nport = \"443\"").unwrap();

        let config = TriggerConfig::load(file.path()).await.unwrap();
        assert_eq!(config.solr.base_url(), "https://localhost:443/solr/collection1");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = TriggerConfig::load("/nonexistent/trigger.toml").await.unwrap_err();
        assert!(matches!(err, TriggerError::Io(_)));
    }
}
