//! In-process key-value executor.
//!
//! Hashes live in a `DashMap` with a per-key deadline that is enforced
//! lazily on access, the way Redis reports an expired key as missing.
//! Connections are bounded by a semaphore. Used for local runs and tests,
//! where the fault hooks stand in for a flaky network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use session_core::error::KvError;
use session_core::ports::{KeyValueExecutor, KvConnection, OpFuture};
use session_shared::utils::now_millis;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct HashEntry {
    fields: HashMap<String, String>,
    /// epoch ms, 0 = no expiry
    expires_at_ms: i64,
}

impl HashEntry {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at_ms != 0 && now >= self.expires_at_ms
    }
}

#[derive(Debug, Default)]
struct FaultPlan {
    failing_checkouts: AtomicU32,
    fail_before_expiry: AtomicBool,
}

type Hashes = Arc<DashMap<String, HashEntry>>;

#[derive(Clone)]
pub struct MemoryExecutor {
    hashes: Hashes,
    permits: Arc<Semaphore>,
    max_connections: usize,
    faults: Arc<FaultPlan>,
    checkouts: Arc<AtomicU64>,
}

impl MemoryExecutor {
    pub fn new(max_connections: usize) -> Self {
        let max_connections = max_connections.max(1);
        Self {
            hashes: Arc::new(DashMap::new()),
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            faults: Arc::new(FaultPlan::default()),
            checkouts: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Make the next `count` checkouts fail with a connection error.
    pub fn fail_next_checkouts(&self, count: u32) {
        self.faults.failing_checkouts.store(count, Ordering::SeqCst);
    }

    /// Make atomic writes die after the fields are staged but before the
    /// expiry is applied. Nothing from such a write is committed.
    pub fn fail_writes_before_expiry(&self, enabled: bool) {
        self.faults.fail_before_expiry.store(enabled, Ordering::SeqCst);
    }

    /// Total checkouts attempted, failed ones included.
    pub fn checkouts(&self) -> u64 {
        self.checkouts.load(Ordering::SeqCst)
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn idle_connections(&self) -> usize {
        self.permits.available_permits()
    }

    /// Deadline (epoch ms) of a live key, `None` if absent or persistent.
    pub fn expires_at(&self, key: &str) -> Option<i64> {
        live_entry(&self.hashes, key, now_millis())
            .map(|e| e.expires_at_ms)
            .filter(|at| *at != 0)
    }

    /// Raw field value of a live key.
    pub fn field(&self, key: &str, field: &str) -> Option<String> {
        live_entry(&self.hashes, key, now_millis()).and_then(|e| e.fields.get(field).cloned())
    }
}

impl Default for MemoryExecutor {
    fn default() -> Self {
        Self::new(session_shared::constants::DEFAULT_REDIS_MAX_CONNECTIONS as usize)
    }
}

fn take_fault(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Snapshot of a key, dropping it first if its deadline has passed.
fn live_entry(hashes: &DashMap<String, HashEntry>, key: &str, now: i64) -> Option<HashEntry> {
    if hashes.remove_if(key, |_, e| e.is_expired(now)).is_some() {
        return None;
    }
    hashes.get(key).map(|e| e.value().clone())
}

/// Holds one permit of the executor's bound until dropped.
pub struct MemoryConnection {
    hashes: Hashes,
    faults: Arc<FaultPlan>,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl KeyValueExecutor for MemoryExecutor {
    type Connection = MemoryConnection;

    async fn execute<T, F>(&self, label: &'static str, op: F) -> Result<T, KvError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c mut Self::Connection) -> OpFuture<'c, T> + Send + 'static,
    {
        self.checkouts.fetch_add(1, Ordering::SeqCst);
        if take_fault(&self.faults.failing_checkouts) {
            debug!(label, "Injected checkout failure");
            return Err(KvError::Connection("injected connection failure".into()));
        }

        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| KvError::Connection("memory pool closed".into()))?;
        debug!(label, idle = self.permits.available_permits(), "Memory connection checked out");

        let mut conn = MemoryConnection {
            hashes: self.hashes.clone(),
            faults: self.faults.clone(),
            _permit: permit,
        };
        op(&mut conn).await
    }
}

#[async_trait]
impl KvConnection for MemoryConnection {
    async fn write_hash(
        &mut self,
        key: &str,
        fields: &[(String, String)],
        expire_at_ms: Option<i64>,
    ) -> Result<(), KvError> {
        let now = now_millis();
        let mut staged = live_entry(&self.hashes, key, now).unwrap_or_default();
        staged.fields.extend(fields.iter().cloned());

        if self.faults.fail_before_expiry.load(Ordering::SeqCst) {
            return Err(KvError::Connection("connection reset before EXEC".into()));
        }
        staged.expires_at_ms = expire_at_ms.unwrap_or(0);

        self.hashes.insert(key.to_string(), staged);
        Ok(())
    }

    async fn read_hash(&mut self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>, KvError> {
        let entry = live_entry(&self.hashes, key, now_millis());
        Ok(fields
            .iter()
            .map(|f| entry.as_ref().and_then(|e| e.fields.get(*f).cloned()))
            .collect())
    }

    async fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        Ok(live_entry(&self.hashes, key, now_millis()).is_some())
    }

    async fn delete(&mut self, key: &str) -> Result<u64, KvError> {
        let now = now_millis();
        match self.hashes.remove(key) {
            Some((_, entry)) if !entry.is_expired(now) => Ok(1),
            _ => Ok(0),
        }
    }
}
