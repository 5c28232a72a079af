//! Pooled key-value access (port)

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::KvError;

/// Future returned by an operation run against a checked-out connection.
pub type OpFuture<'c, T> = BoxFuture<'c, Result<T, KvError>>;

/// The commands a session store needs from a live connection.
#[async_trait]
pub trait KvConnection: Send {
    /// Set every field of the hash and its expiry deadline (epoch ms) as one
    /// all-or-nothing operation. `None` leaves the key without any expiry,
    /// clearing a deadline set by an earlier write.
    async fn write_hash(
        &mut self,
        key: &str,
        fields: &[(String, String)],
        expire_at_ms: Option<i64>,
    ) -> Result<(), KvError>;

    /// Values for `fields`, in order; `None` for a field that is not set.
    async fn read_hash(&mut self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>, KvError>;

    async fn exists(&mut self, key: &str) -> Result<bool, KvError>;

    /// Number of keys removed.
    async fn delete(&mut self, key: &str) -> Result<u64, KvError>;
}

/// Runs operations on pooled connections.
///
/// Implementations check a connection out, hand it to `op`, and give it back
/// on every exit path, including when `op` fails. `label` names the operation
/// for diagnostics only.
#[async_trait]
pub trait KeyValueExecutor: Send + Sync {
    type Connection: KvConnection;

    async fn execute<T, F>(&self, label: &'static str, op: F) -> Result<T, KvError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c mut Self::Connection) -> OpFuture<'c, T> + Send + 'static;
}
