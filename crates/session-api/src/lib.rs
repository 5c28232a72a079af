//! # Session API
//! 
//! HTTP handlers, routing, and the failure boundary over a session store.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
