//! In-memory record store.
//!
//! Mirrors the Postgres backend's transaction semantics: a [`MemTx`]
//! stages writes and applies them to the shared state only on commit, so
//! dropping the handle discards everything. Used by tests, including a
//! fault injection point that makes the audit append fail mid-transaction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use clientdesk_core::{Actor, AuditEntry, ClientId, ClientPatch, ClientRecord, UserId};

use crate::error::StoreError;
use crate::{RecordStore, RecordTx};

#[derive(Default)]
struct MemState {
    tokens: HashMap<String, Actor>,
    clients: HashMap<ClientId, ClientRecord>,
    logs: Vec<AuditEntry>,
}

/// In-memory implementation of [`RecordStore`].
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<MemState>>,
    fail_log_append: Arc<AtomicBool>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user resolvable through [`RecordStore::actor_by_token`].
    pub fn register_actor(&self, token: &str, actor: Actor) {
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token.to_string(), actor);
    }

    /// Make every subsequent audit append fail, simulating a storage
    /// failure between the primary write and the log append.
    pub fn fail_log_appends(&self, fail: bool) {
        self.fail_log_append.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the committed audit log.
    pub fn logs(&self) -> Vec<AuditEntry> {
        self.state.lock().unwrap().logs.clone()
    }

    /// Insert a record directly into committed state (test seeding).
    pub fn seed_client(&self, record: ClientRecord) {
        self.state.lock().unwrap().clients.insert(record.id, record);
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError> {
        Ok(Box::new(MemTx {
            state: Arc::clone(&self.state),
            fail_log_append: self.fail_log_append.load(Ordering::SeqCst),
            staged: Vec::new(),
        }))
    }

    async fn get(&self, id: ClientId) -> Result<Option<ClientRecord>, StoreError> {
        Ok(self.state.lock().unwrap().clients.get(&id).cloned())
    }

    async fn list_owned_by(&self, owner: UserId) -> Result<Vec<ClientRecord>, StoreError> {
        let mut records: Vec<ClientRecord> = self
            .state
            .lock()
            .unwrap()
            .clients
            .values()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(records)
    }

    async fn email_taken(
        &self,
        email: &str,
        exclude: Option<ClientId>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .clients
            .values()
            .any(|r| r.email == email && Some(r.id) != exclude))
    }

    async fn actor_by_token(&self, token: &str) -> Result<Option<Actor>, StoreError> {
        Ok(self.state.lock().unwrap().tokens.get(token).cloned())
    }
}

enum Staged {
    Insert(ClientRecord),
    Update(ClientRecord),
    Delete(ClientId),
    Log(AuditEntry),
}

/// Staged-write transaction over [`MemStore`].
pub struct MemTx {
    state: Arc<Mutex<MemState>>,
    fail_log_append: bool,
    staged: Vec<Staged>,
}

impl MemTx {
    /// Committed state with this transaction's staged writes applied.
    fn view(&self) -> HashMap<ClientId, ClientRecord> {
        let mut view = self.state.lock().unwrap().clients.clone();
        for op in &self.staged {
            match op {
                Staged::Insert(record) | Staged::Update(record) => {
                    view.insert(record.id, record.clone());
                }
                Staged::Delete(id) => {
                    view.remove(id);
                }
                Staged::Log(_) => {}
            }
        }
        view
    }

    fn email_conflicts(&self, email: &str, exclude: ClientId) -> bool {
        self.view()
            .values()
            .any(|r| r.email == email && r.id != exclude)
    }
}

#[async_trait]
impl RecordTx for MemTx {
    async fn insert_client(&mut self, client: &ClientRecord) -> Result<(), StoreError> {
        if self.email_conflicts(&client.email, client.id) {
            return Err(StoreError::DuplicateEmail {
                email: client.email.clone(),
            });
        }
        self.staged.push(Staged::Insert(client.clone()));
        Ok(())
    }

    async fn update_client(
        &mut self,
        id: ClientId,
        patch: &ClientPatch,
    ) -> Result<ClientRecord, StoreError> {
        let mut record = self.view().get(&id).cloned().ok_or(StoreError::NotFound)?;
        patch.apply_to(&mut record);
        record.updated_at = Utc::now();
        if self.email_conflicts(&record.email, id) {
            return Err(StoreError::DuplicateEmail {
                email: record.email.clone(),
            });
        }
        self.staged.push(Staged::Update(record.clone()));
        Ok(record)
    }

    async fn delete_client(&mut self, id: ClientId) -> Result<(), StoreError> {
        if !self.view().contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        self.staged.push(Staged::Delete(id));
        Ok(())
    }

    async fn append_log(&mut self, entry: &AuditEntry) -> Result<(), StoreError> {
        if self.fail_log_append {
            return Err(StoreError::Backend(
                "injected audit-append failure".to_string(),
            ));
        }
        self.staged.push(Staged::Log(entry.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        for op in self.staged {
            match op {
                Staged::Insert(record) | Staged::Update(record) => {
                    state.clients.insert(record.id, record);
                }
                Staged::Delete(id) => {
                    state.clients.remove(&id);
                }
                Staged::Log(entry) => {
                    state.logs.push(entry);
                }
            }
        }
        Ok(())
    }
}
