//! Key-value executors

pub mod memory;
pub mod redis_executor;

pub use memory::{MemoryConnection, MemoryExecutor};
pub use redis_executor::{create_pool, RedisConnection, RedisExecutor};
