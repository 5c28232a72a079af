//! Traits (ports) the session store talks through

pub mod executor;
pub mod serializer;
pub mod session_data_store;

pub use executor::{KeyValueExecutor, KvConnection, OpFuture};
pub use serializer::Serializer;
pub use session_data_store::SessionDataStore;
