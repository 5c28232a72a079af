// ============================================================================
// Session Core - Session Store Service
// File: crates/session-core/src/services/session_store.rs
// ============================================================================
//! Maps session records onto key-value hashes and runs them through a pooled
//! executor, retrying transient failures.

use std::collections::HashSet;

use async_trait::async_trait;
use session_shared::utils::now_millis;
use tracing::{debug, info};

use crate::domain::SessionRecord;
use crate::error::{KvError, StoreError};
use crate::fields::{self, LOAD_FIELDS};
use crate::keys::session_key;
use crate::ports::{KeyValueExecutor, KvConnection, Serializer, SessionDataStore};
use crate::services::retry::RetryPolicy;

/// Session store over any [`KeyValueExecutor`].
pub struct SessionStore<E, S> {
    executor: E,
    serializer: S,
    retry: RetryPolicy,
}

impl<E: KeyValueExecutor, S: Serializer> SessionStore<E, S> {
    pub fn new(executor: E, serializer: S) -> Self {
        Self::with_retry_policy(executor, serializer, RetryPolicy::default())
    }

    pub fn with_retry_policy(executor: E, serializer: S, retry: RetryPolicy) -> Self {
        Self {
            executor,
            serializer,
            retry,
        }
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.trim().is_empty() {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// How long after a save the record may live; `None` keeps it until deleted.
fn expiry_window(max_inactive_ms: i64) -> Option<i64> {
    (max_inactive_ms > 0).then_some(max_inactive_ms)
}

#[async_trait]
impl<E, S> SessionDataStore for SessionStore<E, S>
where
    E: KeyValueExecutor + 'static,
    S: Serializer + 'static,
{
    fn start(&self) -> Result<(), StoreError> {
        self.serializer.start()?;
        info!("Session store started");
        Ok(())
    }

    fn stop(&self) -> Result<(), StoreError> {
        self.serializer.stop()?;
        info!("Session store stopped");
        Ok(())
    }

    async fn store(&self, id: &str, record: &mut SessionRecord) -> Result<(), StoreError> {
        validate_id(id)?;
        if record.id != id {
            return Err(StoreError::InvalidId(format!(
                "record id `{}` does not match `{}`",
                record.id, id
            )));
        }

        let key = session_key(&record.id);
        let attributes = self.serializer.serialize_attributes(&record.attributes)?;
        let to_store = fields::to_fields(record, attributes);
        let window = expiry_window(record.max_inactive_ms);
        debug!(key = %key, "Storing session");

        let last_saved = self
            .retry
            .run("store", id, |_| {
                let key = key.clone();
                let mut to_store = to_store.clone();
                async move {
                    self.executor
                        .execute("sessionStore", move |conn| {
                            Box::pin(async move {
                                // stamped per attempt so it matches the write that lands
                                let last_saved = now_millis();
                                fields::stamp_last_saved(&mut to_store, last_saved);
                                let expire_at = window.map(|ms| last_saved.saturating_add(ms));
                                conn.write_hash(&key, &to_store, expire_at).await?;
                                Ok::<i64, KvError>(last_saved)
                            })
                        })
                        .await
                        .map_err(StoreError::from)
                }
            })
            .await?;

        record.last_saved = last_saved;
        debug!(key = %key, last_saved, "Session saved");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        validate_id(id)?;
        let key = session_key(id);

        let values = self
            .retry
            .run("load", id, |_| {
                let key = key.clone();
                async move {
                    self.executor
                        .execute("sessionLoad", move |conn| {
                            Box::pin(async move { conn.read_hash(&key, &LOAD_FIELDS).await })
                        })
                        .await
                        .map_err(StoreError::from)
                }
            })
            .await?;

        let record = fields::from_values(id, values, |raw| self.serializer.deserialize_attributes(raw))?;
        debug!(key = %key, found = record.is_some(), "Session loaded");
        Ok(record)
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        validate_id(id)?;
        let key = session_key(id);

        let exists = self
            .executor
            .execute("sessionExists", move |conn| {
                Box::pin(async move { conn.exists(&key).await })
            })
            .await?;
        Ok(exists)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        validate_id(id)?;
        let key = session_key(id);

        let removed = self
            .executor
            .execute("sessionDelete", move |conn| {
                Box::pin(async move { conn.delete(&key).await })
            })
            .await?;
        debug!(session_id = id, removed, "Session deleted");
        Ok(removed == 1)
    }

    fn get_expired(&self, candidates: &HashSet<String>) -> HashSet<String> {
        // expiry is left to the store's own TTL
        debug!(candidates = candidates.len(), "Expiry scan skipped");
        HashSet::new()
    }
}
