//! # clientdesk-audit
//!
//! Audit logging for Clientdesk mutations.
//!
//! Every successful mutating action appends exactly one
//! [`AuditEntry`](clientdesk_core::AuditEntry) of `{action, user_id,
//! date_created}` through the *caller's* open transaction handle. The
//! logger never opens its own connection and never commits on its own, so
//! the audit row and the primary write persist or roll back together.
//!
//! The entry is mirrored to `tracing` for operational visibility; the
//! persisted row is the authoritative record.

use chrono::Utc;
use clientdesk_core::{AuditAction, AuditEntry, UserId};
use clientdesk_store::{RecordTx, StoreError};

/// Appends audit entries into the caller's ambient transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    /// Append one entry for `action` performed by `actor`.
    ///
    /// Must be called after the primary write, inside the same open
    /// transaction. Has no business rules of its own, so the only failure
    /// mode is the underlying storage.
    pub async fn append(
        &self,
        tx: &mut dyn RecordTx,
        action: AuditAction,
        actor: UserId,
    ) -> Result<(), StoreError> {
        let entry = AuditEntry {
            action,
            user_id: actor,
            date_created: Utc::now(),
        };

        tracing::debug!(
            action = %entry.action,
            user_id = %entry.user_id,
            "audit entry"
        );

        tx.append_log(&entry).await
    }
}
