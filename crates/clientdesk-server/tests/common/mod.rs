#![allow(dead_code)]

//! Shared fixtures: an in-memory environment with recording (or failing)
//! outbound backends.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use clientdesk_core::{Actor, ClientRecord, UserId};
use clientdesk_notify::{DispatchError, Mailer, NotificationDispatcher};
use clientdesk_server::pipeline::ClientPipeline;
use clientdesk_server::state::AppState;
use clientdesk_store::{MemStore, RecordStore};

/// Dispatcher that records every message.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub messages: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_notification(&self, message: &str) -> Result<(), DispatchError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Dispatcher that always fails.
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send_notification(&self, _message: &str) -> Result<(), DispatchError> {
        Err(DispatchError::Unreachable("dispatcher down".to_string()))
    }
}

/// Mailer that records `(to, subject)` for every send.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Mailer that always fails.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), DispatchError> {
        Err(DispatchError::Unreachable("mail relay down".to_string()))
    }
}

/// In-memory environment wired with recording outbound backends.
pub struct TestEnv {
    pub store: MemStore,
    pub state: AppState,
    pub dispatcher: RecordingDispatcher,
    pub mailer: RecordingMailer,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = MemStore::new();
        let dispatcher = RecordingDispatcher::default();
        let mailer = RecordingMailer::default();

        let shared: Arc<dyn RecordStore> = Arc::new(store.clone());
        let pipeline = ClientPipeline::new(
            Arc::clone(&shared),
            Arc::new(dispatcher.clone()),
            Arc::new(mailer.clone()),
        );
        let state = AppState::new(shared, pipeline);

        Self {
            store,
            state,
            dispatcher,
            mailer,
        }
    }

    /// Environment whose outbound channels always fail.
    pub fn with_failing_side_effects() -> Self {
        let env = Self::new();
        let shared: Arc<dyn RecordStore> = Arc::new(env.store.clone());
        let pipeline =
            ClientPipeline::new(Arc::clone(&shared), Arc::new(FailingDispatcher), Arc::new(FailingMailer));
        Self {
            state: AppState::new(shared, pipeline),
            ..env
        }
    }

    /// Register a user resolvable by `token`.
    pub fn register_actor(&self, token: &str) -> Actor {
        let actor = Actor {
            id: Uuid::new_v4(),
            email: format!("{token}@example.com"),
        };
        self.store.register_actor(token, actor.clone());
        actor
    }

    /// Seed a committed client record owned by `owner`.
    pub fn seed_client(&self, owner: UserId, email: &str) -> ClientRecord {
        let now = Utc::now();
        let record = ClientRecord {
            id: Uuid::new_v4(),
            owner_id: owner,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: email.to_string(),
            age: 29,
            linkedin_url: "https://linkedin.com/in/janesmith".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.seed_client(record.clone());
        record
    }
}
