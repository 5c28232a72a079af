//! Session store errors

use thiserror::Error;

/// Failures reported by a key-value backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Communication-class failure: pool checkout, I/O, dropped connection, timeout.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store understood the request and rejected it.
    #[error("Command error: {0}")]
    Command(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializerError {
    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Deserialize error: {0}")]
    Deserialize(String),

    #[error("Serializer lifecycle error: {0}")]
    Lifecycle(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid session id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    KeyValue(#[from] KvError),

    #[error(transparent)]
    Serializer(#[from] SerializerError),

    #[error("Malformed session data for `{id}`: {reason}")]
    Malformed { id: String, reason: String },
}

impl StoreError {
    /// Only communication failures are worth another attempt; corrupt data
    /// and rejected commands fail the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::KeyValue(KvError::Connection(_)))
    }

    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        StoreError::Malformed {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
