//! # Session Infrastructure
//! 
//! Key-value executors (Redis, in-memory) and attribute serializers (adapters).

pub mod cache;
pub mod serializer;

pub use cache::{create_pool, MemoryExecutor, RedisExecutor};
pub use serializer::JsonSerializer;
