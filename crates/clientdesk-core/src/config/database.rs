//! Postgres connection configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Postgres connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string. Usually overridden by `DATABASE_URL`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_url() -> String {
    "postgres://localhost/clientdesk".to_string()
}

fn default_max_connections() -> u32 {
    5
}
