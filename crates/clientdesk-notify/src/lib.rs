//! # clientdesk-notify
//!
//! Outbound side-effect dispatch for Clientdesk.
//!
//! Two seams, both swappable at process start from configuration:
//!
//! - [`NotificationDispatcher`]: pushes a text message to an external
//!   channel. [`SlackWebhook`] posts to a Slack incoming webhook;
//!   [`NoopDispatcher`] discards.
//! - [`Mailer`]: delivers the client-created mail to the acting user.
//!   [`HttpMailer`] posts to an HTTP mail relay; [`LogMailer`] logs the
//!   message instead of sending (development default).
//!
//! Delivery is best-effort. Failures surface as [`DispatchError`] and the
//! caller logs and swallows them; they never roll back or fail the
//! operation that triggered the dispatch.

pub mod error;

pub use error::DispatchError;

use async_trait::async_trait;
use clientdesk_core::config::{MailConfig, MailKind, NotifierConfig, NotifierKind};
use std::sync::Arc;

/// Pushes a message to an external notification channel.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_notification(&self, message: &str) -> Result<(), DispatchError>;
}

/// Delivers mail to a user.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError>;
}

/// Slack incoming-webhook dispatcher.
pub struct SlackWebhook {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for SlackWebhook {
    async fn send_notification(&self, message: &str) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "text": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!("notification delivered to slack webhook");
        Ok(())
    }
}

/// Dispatcher that discards every message.
pub struct NoopDispatcher;

#[async_trait]
impl NotificationDispatcher for NoopDispatcher {
    async fn send_notification(&self, message: &str) -> Result<(), DispatchError> {
        tracing::debug!(message, "notification discarded (noop dispatcher)");
        Ok(())
    }
}

/// Mailer posting messages to an HTTP mail relay.
pub struct HttpMailer {
    endpoint: String,
    from: String,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            from: from.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Mailer that logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), DispatchError> {
        tracing::info!(to, subject, "mail logged (log mailer)");
        Ok(())
    }
}

/// Bind the notification backend selected by configuration.
pub fn dispatcher_from_config(
    config: &NotifierConfig,
) -> Result<Arc<dyn NotificationDispatcher>, DispatchError> {
    match config.kind {
        NotifierKind::Slack => {
            let url = config
                .webhook_url
                .as_deref()
                .ok_or(DispatchError::NotConfigured("notifier.webhook_url"))?;
            Ok(Arc::new(SlackWebhook::new(url)))
        }
        NotifierKind::None => Ok(Arc::new(NoopDispatcher)),
    }
}

/// Bind the mail backend selected by configuration.
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, DispatchError> {
    match config.kind {
        MailKind::Http => {
            let endpoint = config
                .endpoint
                .as_deref()
                .ok_or(DispatchError::NotConfigured("mail.endpoint"))?;
            Ok(Arc::new(HttpMailer::new(endpoint, config.from.clone())))
        }
        MailKind::Log => Ok(Arc::new(LogMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_dispatcher_accepts_everything() {
        NoopDispatcher
            .send_notification("a client record was created")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        LogMailer
            .send("user@example.com", "Client Created", "hello")
            .await
            .unwrap();
    }

    #[test]
    fn slack_without_webhook_url_is_rejected() {
        let config = NotifierConfig {
            kind: NotifierKind::Slack,
            webhook_url: None,
        };
        let err = dispatcher_from_config(&config).err().unwrap();
        assert!(matches!(err, DispatchError::NotConfigured(_)));
    }

    #[test]
    fn http_mail_without_endpoint_is_rejected() {
        let config = MailConfig {
            kind: MailKind::Http,
            endpoint: None,
            ..Default::default()
        };
        let err = mailer_from_config(&config).err().unwrap();
        assert!(matches!(err, DispatchError::NotConfigured(_)));
    }

    #[test]
    fn default_config_binds_noop_backends() {
        assert!(dispatcher_from_config(&NotifierConfig::default()).is_ok());
        assert!(mailer_from_config(&MailConfig::default()).is_ok());
    }
}
