//! ChatRelay Core - domain logic for the message-relay service
//!
//! Composes the two halves of a relay: the user directory (lazy upsert of
//! user records keyed by phone number) and the agent relay (one outbound
//! call to the remote reasoning service per inbound message).

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{DirectoryError, RelayError};
pub use models::{StoredUser, UserRecord};
pub use services::{AgentRelay, AgentReply, UserDirectory};

use chatrelay_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Core application state shared across request handlers.
///
/// Owns the storage handle and the two services; constructed once at process
/// start and dependency-injected, never held as a global.
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub directory: UserDirectory,
    pub relay: AgentRelay,
}

impl AppCore {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new(&config.db_path)?);
        let directory = UserDirectory::new(storage.clone());
        let relay = AgentRelay::new(
            config.agent_url.clone(),
            Duration::from_secs(config.agent_timeout_secs),
        );

        info!(db_path = %config.db_path, agent_url = %config.agent_url, "Initialized ChatRelay core");

        Ok(Self {
            storage,
            directory,
            relay,
        })
    }
}
