//! # clientdesk-store
//!
//! Persistence for Clientdesk.
//!
//! This crate owns the authoritative persisted state of client records and
//! the append-only audit log rows, behind two seams:
//!
//! - [`RecordStore`]: pool-level reads plus [`RecordStore::begin`], which
//!   opens a scoped transaction handle.
//! - [`RecordTx`]: the transaction handle. Primary writes and the audit
//!   append go through the same handle, so they commit or roll back as one
//!   atomic unit. Dropping a handle without calling [`RecordTx::commit`]
//!   rolls back.
//!
//! Implementations:
//! - [`pg::PgStore`]: Postgres via `sqlx`, the production backend.
//! - [`mem::MemStore`]: in-memory backend with staged writes, used by
//!   tests (including a fault injection point for the audit append).

pub mod error;
pub mod mem;
pub mod pg;

pub use error::StoreError;
pub use mem::MemStore;
pub use pg::PgStore;

use async_trait::async_trait;
use clientdesk_core::{Actor, AuditEntry, ClientId, ClientPatch, ClientRecord, UserId};

/// A scoped transaction over the record store.
///
/// Writes are visible to other callers only after [`RecordTx::commit`];
/// any other exit path rolls the whole unit back.
#[async_trait]
pub trait RecordTx: Send {
    /// Insert a fully-formed client record.
    async fn insert_client(&mut self, client: &ClientRecord) -> Result<(), StoreError>;

    /// Apply a sparse update to the record with `id` and return the merged
    /// record. The row is locked for the remainder of the transaction.
    async fn update_client(
        &mut self,
        id: ClientId,
        patch: &ClientPatch,
    ) -> Result<ClientRecord, StoreError>;

    /// Hard-delete the record with `id`.
    async fn delete_client(&mut self, id: ClientId) -> Result<(), StoreError>;

    /// Append an audit log row in this transaction.
    async fn append_log(&mut self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Commit the transaction, making all writes durable together.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// The record store: owner-scoped reads and transaction entry point.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a transaction handle.
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError>;

    /// Fetch a record by id, regardless of owner.
    async fn get(&self, id: ClientId) -> Result<Option<ClientRecord>, StoreError>;

    /// All records owned by `owner`.
    async fn list_owned_by(&self, owner: UserId) -> Result<Vec<ClientRecord>, StoreError>;

    /// Whether `email` is already used by a record other than `exclude`.
    async fn email_taken(
        &self,
        email: &str,
        exclude: Option<ClientId>,
    ) -> Result<bool, StoreError>;

    /// Resolve an API token to its user.
    async fn actor_by_token(&self, token: &str) -> Result<Option<Actor>, StoreError>;
}
