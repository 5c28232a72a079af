//! Store-wide constants

/// Namespace prepended to every session id to form its key.
pub const SESSION_KEY_PREFIX: &str = "jetty-session-";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_REDIS_MAX_CONNECTIONS: u32 = 16;

pub const BACKEND_REDIS: &str = "redis";
pub const BACKEND_MEMORY: &str = "memory";
