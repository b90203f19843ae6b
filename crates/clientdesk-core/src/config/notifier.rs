//! Outbound notification channel configuration.

use serde::{Deserialize, Serialize};

/// Which notification backend to bind at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Post to a Slack incoming webhook.
    Slack,
    /// Discard notifications (development default).
    #[default]
    None,
}

/// Configuration for the creation-notification channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Backend selection.
    #[serde(default)]
    pub kind: NotifierKind,

    /// Webhook URL, required when `kind` is `slack`.
    #[serde(default)]
    pub webhook_url: Option<String>,
}
