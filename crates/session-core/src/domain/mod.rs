//! # Session Core - Domain Module
//! 
//! Domain entities for the session store.

pub mod session;

pub use session::{Attributes, SessionRecord};
