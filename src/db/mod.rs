pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStore;
pub use self::redis::StoreWriterHandle;

use crate::error::AppResult;

/// Small string key-value store for client-side view state
///
/// Reads are awaited; writes are fire-and-forget so they can be issued while a
/// view holds its state lock. Values never expire.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, if any
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrites the value for `key`
    fn set(&self, key: &str, value: &str);
}
