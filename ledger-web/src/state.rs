//! Application state management.

use std::sync::Arc;

use tokio::sync::Mutex;

use ledger_core::MemoryStore;

use crate::config::Config;

/// Shared application state.
///
/// The store is serialized behind a single mutex so that, from the
/// engine's point of view, every batch still runs one at a time even
/// though requests arrive concurrently.
pub struct AppState {
    /// The in-process ledger store.
    pub store: Mutex<MemoryStore>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Create new, empty application state.
    pub fn new(config: Config) -> Arc<Self> {
        tracing::info!("starting with a fresh in-process store");
        Arc::new(Self {
            store: Mutex::new(MemoryStore::new()),
            config,
        })
    }
}
