// ============================================================================
// Session Infrastructure - Redis Executor
// File: crates/session-infrastructure/src/cache/redis_executor.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis::{self, RedisError};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use session_core::error::KvError;
use session_core::ports::{KeyValueExecutor, KvConnection, OpFuture};
use session_shared::AppError;
use tracing::{debug, warn};

/// Build a bounded Redis pool.
pub fn create_pool(url: &str, max_connections: u32) -> Result<Pool, AppError> {
    let mut pool = PoolConfig::new(max_connections.max(1) as usize);
    pool.timeouts.wait = Some(Duration::from_secs(3));

    let mut config = Config::from_url(url);
    config.pool = Some(pool);
    config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| AppError::PoolError(e.to_string()))
}

/// Communication problems are retryable, anything else the server said is not.
fn classify(err: RedisError) -> KvError {
    if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() || err.is_connection_refusal() {
        KvError::Connection(err.to_string())
    } else {
        KvError::Command(err.to_string())
    }
}

/// `MULTI` / `HSET` / `PEXPIREAT` or `PERSIST` / `EXEC`. A write without a
/// deadline clears any expiry left by an earlier save.
fn write_pipeline(key: &str, fields: &[(String, String)], expire_at_ms: Option<i64>) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic();
    pipe.cmd("HSET").arg(key).arg(fields).ignore();
    match expire_at_ms {
        Some(at) => pipe.cmd("PEXPIREAT").arg(key).arg(at).ignore(),
        None => pipe.cmd("PERSIST").arg(key).ignore(),
    };
    pipe
}

pub struct RedisExecutor {
    pool: Pool,
}

impl RedisExecutor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn from_url(url: &str, max_connections: u32) -> Result<Self, AppError> {
        Ok(Self::new(create_pool(url, max_connections)?))
    }
}

/// A pooled connection; returned to the pool when dropped.
pub struct RedisConnection {
    inner: Connection,
}

#[async_trait]
impl KeyValueExecutor for RedisExecutor {
    type Connection = RedisConnection;

    async fn execute<T, F>(&self, label: &'static str, op: F) -> Result<T, KvError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c mut Self::Connection) -> OpFuture<'c, T> + Send + 'static,
    {
        let inner = self.pool.get().await.map_err(|e| {
            warn!(label, error = %e, "Redis connection checkout failed");
            KvError::Connection(e.to_string())
        })?;
        debug!(label, "Redis connection checked out");

        let mut conn = RedisConnection { inner };
        op(&mut conn).await
    }
}

#[async_trait]
impl KvConnection for RedisConnection {
    async fn write_hash(
        &mut self,
        key: &str,
        fields: &[(String, String)],
        expire_at_ms: Option<i64>,
    ) -> Result<(), KvError> {
        let _: () = write_pipeline(key, fields, expire_at_ms)
            .query_async(&mut self.inner)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn read_hash(&mut self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>, KvError> {
        let values: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(key)
            .arg(fields)
            .query_async(&mut self.inner)
            .await
            .map_err(classify)?;
        Ok(values)
    }

    async fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        let exists: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut self.inner)
            .await
            .map_err(classify)?;
        Ok(exists)
    }

    async fn delete(&mut self, key: &str) -> Result<u64, KvError> {
        let removed: u64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.inner)
            .await
            .map_err(classify)?;
        Ok(removed)
    }
}
