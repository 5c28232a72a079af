// ============================================================================
// Session Core - Session Record Entity
// File: crates/session-core/src/domain/session.rs
// Description: Durable server-side session state
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Caller-owned attribute values. The store only ever sees their serialized form.
pub type Attributes = BTreeMap<String, Value>;

/// Session record entity
///
/// All timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub context_path: String,
    pub virtual_host: String,
    pub created: i64,
    pub accessed: i64,
    pub last_accessed: i64,
    /// `<= 0` never expires
    pub max_inactive_ms: i64,
    #[serde(default)]
    pub cookie_set: i64,
    /// Written by the store on every successful persist.
    #[serde(default)]
    pub last_saved: i64,
    #[serde(default)]
    pub attributes: Attributes,
}

impl SessionRecord {
    /// Create a brand new session, first touched at `created`.
    pub fn new(
        id: impl Into<String>,
        context_path: impl Into<String>,
        virtual_host: impl Into<String>,
        created: i64,
        max_inactive_ms: i64,
    ) -> Result<Self, StoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StoreError::InvalidId(id));
        }

        Ok(Self {
            id,
            context_path: context_path.into(),
            virtual_host: virtual_host.into(),
            created,
            accessed: created,
            last_accessed: created,
            max_inactive_ms,
            cookie_set: 0,
            last_saved: 0,
            attributes: Attributes::new(),
        })
    }

    /// Record a request touching this session.
    pub fn access(&mut self, now: i64) {
        self.accessed = self.last_accessed;
        self.last_accessed = now;
    }

    pub fn never_expires(&self) -> bool {
        self.max_inactive_ms <= 0
    }

    /// Instant after which an idle session is considered gone.
    pub fn expires_at(&self) -> Option<i64> {
        if self.never_expires() {
            None
        } else {
            Some(self.last_accessed.saturating_add(self.max_inactive_ms))
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at().map_or(false, |at| now >= at)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the previous value, if any.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }
}
