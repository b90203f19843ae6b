//! Shared application state.

use std::sync::Arc;

use clientdesk_store::RecordStore;

use crate::pipeline::ClientPipeline;

/// Cloneable handle to everything the handlers need.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn RecordStore>,
    pipeline: ClientPipeline,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, pipeline: ClientPipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, pipeline }),
        }
    }

    /// Store handle used by authentication; business reads/writes go
    /// through the pipeline instead.
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    pub fn pipeline(&self) -> &ClientPipeline {
        &self.inner.pipeline
    }
}
