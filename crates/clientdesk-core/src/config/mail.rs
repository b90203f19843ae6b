//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Which mail backend to bind at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailKind {
    /// POST messages to an HTTP mail relay.
    Http,
    /// Log messages instead of sending (development default).
    #[default]
    Log,
}

/// Configuration for the client-created mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Backend selection.
    #[serde(default)]
    pub kind: MailKind,

    /// Relay endpoint, required when `kind` is `http`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            kind: MailKind::default(),
            endpoint: None,
            from: default_from(),
        }
    }
}

fn default_from() -> String {
    "no-reply@clientdesk.local".to_string()
}
