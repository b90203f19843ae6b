//! Mutation and read pipeline for client records.
//!
//! Each operation runs the same sequence: resolve the target (missing
//! record wins over a policy denial, so non-owners cannot probe for
//! existence of ids they can guess), check the ownership policy, validate
//! uniqueness, then perform the write and its audit entry inside one
//! transaction. Post-commit side effects (mail and notification on
//! create) are best-effort: a failure is logged and absorbed, never
//! rolled back.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use clientdesk_audit::AuditLogger;
use clientdesk_core::{Actor, AuditAction, ClientId, ClientPatch, ClientRecord, NewClient};
use clientdesk_notify::{Mailer, NotificationDispatcher};
use clientdesk_policy::{ClientAction, ClientPolicy};
use clientdesk_store::RecordStore;

use crate::error::{ApiError, EMAIL_TAKEN_MESSAGE};
use crate::validate::FieldErrors;

const MAIL_SUBJECT: &str = "Client Created";
const MAIL_BODY: &str = "A new client record was created on your account.";

/// Executes client operations against the store, policy, and audit log.
pub struct ClientPipeline {
    store: Arc<dyn RecordStore>,
    policy: ClientPolicy,
    audit: AuditLogger,
    dispatcher: Arc<dyn NotificationDispatcher>,
    mailer: Arc<dyn Mailer>,
}

impl ClientPipeline {
    pub fn new(
        store: Arc<dyn RecordStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            store,
            policy: ClientPolicy::new(),
            audit: AuditLogger::new(),
            dispatcher,
            mailer,
        }
    }

    /// All records owned by the actor. Never leaks other users' records.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<ClientRecord>, ApiError> {
        self.authorize(actor, ClientAction::List, None)?;
        Ok(self.store.list_owned_by(actor.id).await?)
    }

    /// A single record, if it exists and the actor owns it.
    pub async fn view(&self, actor: &Actor, id: ClientId) -> Result<ClientRecord, ApiError> {
        let record = self.fetch(id).await?;
        self.authorize(actor, ClientAction::View, Some(&record))?;
        Ok(record)
    }

    /// Create a record owned by the actor, audit it, and fire the
    /// post-commit side effects.
    pub async fn create(&self, actor: &Actor, new: NewClient) -> Result<ClientRecord, ApiError> {
        self.authorize(actor, ClientAction::Create, None)?;

        if self.store.email_taken(&new.email, None).await? {
            return Err(email_taken());
        }

        let now = Utc::now();
        let record = ClientRecord {
            id: Uuid::new_v4(),
            owner_id: actor.id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            age: new.age,
            linkedin_url: new.linkedin_url,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.store.begin().await?;
        tx.insert_client(&record).await?;
        self.audit
            .append(tx.as_mut(), AuditAction::ClientCreated, actor.id)
            .await?;
        tx.commit().await?;

        tracing::info!(client_id = %record.id, user_id = %actor.id, "client created");
        self.creation_side_effects(actor).await;

        Ok(record)
    }

    /// Apply a partial update to an owned record and audit it.
    ///
    /// An empty patch is accepted; it rewrites nothing but still counts
    /// as an update, audit entry included.
    pub async fn update(
        &self,
        actor: &Actor,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<ClientRecord, ApiError> {
        let record = self.fetch(id).await?;
        self.authorize(actor, ClientAction::Update, Some(&record))?;

        if let Some(email) = &patch.email
            && *email != record.email
            && self.store.email_taken(email, Some(id)).await?
        {
            return Err(email_taken());
        }

        let mut tx = self.store.begin().await?;
        let updated = tx.update_client(id, &patch).await?;
        self.audit
            .append(tx.as_mut(), AuditAction::ClientUpdated, actor.id)
            .await?;
        tx.commit().await?;

        tracing::info!(client_id = %id, user_id = %actor.id, "client updated");
        Ok(updated)
    }

    /// Delete an owned record and audit it.
    pub async fn delete(&self, actor: &Actor, id: ClientId) -> Result<(), ApiError> {
        let record = self.fetch(id).await?;
        self.authorize(actor, ClientAction::Delete, Some(&record))?;

        let mut tx = self.store.begin().await?;
        tx.delete_client(id).await?;
        self.audit
            .append(tx.as_mut(), AuditAction::ClientDeleted, actor.id)
            .await?;
        tx.commit().await?;

        tracing::info!(client_id = %id, user_id = %actor.id, "client deleted");
        Ok(())
    }

    async fn fetch(&self, id: ClientId) -> Result<ClientRecord, ApiError> {
        self.store.get(id).await?.ok_or(ApiError::NotFound)
    }

    fn authorize(
        &self,
        actor: &Actor,
        action: ClientAction,
        target: Option<&ClientRecord>,
    ) -> Result<(), ApiError> {
        let owner = target.map(|record| record.owner_id);
        if self.policy.decide(actor.id, action, owner).is_allow() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Mail the acting user and push a notification. Each channel fails
    /// independently; neither failure reaches the caller.
    async fn creation_side_effects(&self, actor: &Actor) {
        if let Err(err) = self
            .mailer
            .send(&actor.email, MAIL_SUBJECT, MAIL_BODY)
            .await
        {
            tracing::warn!(error = %err, to = %actor.email, "client-created mail failed");
        }

        let message = format!("A client record was created by user {}", actor.id);
        if let Err(err) = self.dispatcher.send_notification(&message).await {
            tracing::warn!(error = %err, "client-created notification failed");
        }
    }
}

fn email_taken() -> ApiError {
    ApiError::Validation(FieldErrors::single("email", EMAIL_TAKEN_MESSAGE))
}
