//! Session store services

pub mod retry;
pub mod session_store;

pub use retry::RetryPolicy;
pub use session_store::SessionStore;
