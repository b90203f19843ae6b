//! Configuration types for Clientdesk.
//!
//! Configuration is loaded from a single YAML file (`clientdesk.yaml`) and
//! combined into an [`AppConfig`]. Every section has serde defaults so a
//! partial file (or none at all) yields a runnable development setup.

pub mod database;
pub mod http;
pub mod mail;
pub mod notifier;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use database::DatabaseConfig;
pub use http::HttpConfig;
pub use mail::{MailConfig, MailKind};
pub use notifier::{NotifierConfig, NotifierKind};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`AppConfig`].
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Complete Clientdesk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Postgres connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Outbound notification channel.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Outbound mail delivery.
    #[serde(default)]
    pub mail: MailConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.http.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.notifier.kind, NotifierKind::None);
        assert_eq!(config.mail.kind, MailKind::Log);
    }

    #[test]
    fn partial_yaml_overrides_one_section() {
        let yaml = r#"
notifier:
  kind: slack
  webhook_url: "https://hooks.slack.com/services/T0/B0/xyz"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.notifier.kind, NotifierKind::Slack);
        assert_eq!(
            config.notifier.webhook_url.as_deref(),
            Some("https://hooks.slack.com/services/T0/B0/xyz")
        );
        // Untouched sections keep their defaults
        assert_eq!(config.http.bind_addr, "0.0.0.0:8080");
    }
}
