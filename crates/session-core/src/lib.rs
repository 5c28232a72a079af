//! # Session Core
//! 
//! Session record domain, key/field mapping, ports, and the session store service.

pub mod domain;
pub mod error;
pub mod fields;
pub mod keys;
pub mod ports;
pub mod services;

pub use domain::{Attributes, SessionRecord};
pub use error::{KvError, SerializerError, StoreError};
pub use ports::{KeyValueExecutor, KvConnection, Serializer, SessionDataStore};
pub use services::{RetryPolicy, SessionStore};
