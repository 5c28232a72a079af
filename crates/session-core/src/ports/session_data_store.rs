//! Session persistence contract offered to the host's session manager

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::SessionRecord;
use crate::error::StoreError;

#[async_trait]
pub trait SessionDataStore: Send + Sync {
    fn start(&self) -> Result<(), StoreError>;

    fn stop(&self) -> Result<(), StoreError>;

    /// Persist `record`. On success `record.last_saved` holds the persisted stamp.
    async fn store(&self, id: &str, record: &mut SessionRecord) -> Result<(), StoreError>;

    /// `Ok(None)` when no session is stored under `id`.
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, StoreError>;

    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// `true` when exactly one stored session was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Ids among `candidates` that have expired and need cleanup.
    fn get_expired(&self, candidates: &HashSet<String>) -> HashSet<String>;

    /// Whether attribute values are passivated (serialized objects that
    /// need activation callbacks) when written.
    fn is_passivating(&self) -> bool {
        false
    }
}
