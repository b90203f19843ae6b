//! Domain types for client records and audit entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an authenticated user.
pub type UserId = Uuid;

/// Identity of a client record.
pub type ClientId = Uuid;

/// An authenticated user performing an action.
///
/// Actors own client records; they are referenced by this core but the
/// user account itself lives in the `users` table and is not managed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    /// Address used for the client-created mail.
    pub email: String,
}

/// One client contact record, owned by a single user.
///
/// `owner_id` is immutable after creation and never settable from a
/// request payload. `email` is unique across all records, not per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub owner_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub linkedin_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating a client record.
///
/// The owner is supplied by the pipeline from the acting user, never by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub linkedin_url: String,
}

/// A sparse update: fields left as `None` keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub linkedin_url: Option<String>,
}

impl ClientPatch {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.age.is_none()
            && self.linkedin_url.is_none()
    }

    /// Merge the provided fields into `record`, leaving the rest untouched.
    ///
    /// Does not bump `updated_at`; the store owns timestamps.
    pub fn apply_to(&self, record: &mut ClientRecord) {
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(linkedin_url) = &self.linkedin_url {
            record.linkedin_url = linkedin_url.clone();
        }
    }
}

/// Kind of recorded mutation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A client record was created.
    ClientCreated,
    /// A client record was updated.
    ClientUpdated,
    /// A client record was deleted.
    ClientDeleted,
}

impl AuditAction {
    /// Persisted string form (`client_created` / `client_updated` /
    /// `client_deleted`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientCreated => "client_created",
            Self::ClientUpdated => "client_updated",
            Self::ClientDeleted => "client_deleted",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded mutation event: `{action, user_id, date_created}`.
///
/// Append-only, written in the same transaction as the primary write.
/// Deliberately not linked to a specific client record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: UserId,
    pub date_created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ClientRecord {
        let now = Utc::now();
        ClientRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane@example.com".to_string(),
            age: 29,
            linkedin_url: "https://linkedin.com/in/janesmith".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_applies_only_provided_fields() {
        let mut record = sample_record();
        let patch = ClientPatch {
            first_name: Some("Janet".to_string()),
            age: Some(30),
            ..Default::default()
        };

        patch.apply_to(&mut record);

        assert_eq!(record.first_name, "Janet");
        assert_eq!(record.age, 30);
        assert_eq!(record.last_name, "Smith");
        assert_eq!(record.email, "jane@example.com");
        assert_eq!(record.linkedin_url, "https://linkedin.com/in/janesmith");
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ClientPatch::default().is_empty());
        assert!(
            !ClientPatch {
                email: Some("new@example.com".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn audit_action_string_form() {
        assert_eq!(AuditAction::ClientCreated.as_str(), "client_created");
        assert_eq!(AuditAction::ClientUpdated.as_str(), "client_updated");
        assert_eq!(AuditAction::ClientDeleted.as_str(), "client_deleted");
    }

    #[test]
    fn audit_action_serializes_snake_case() {
        let json = serde_json::to_string(&AuditAction::ClientCreated).unwrap();
        assert_eq!(json, "\"client_created\"");
    }
}
