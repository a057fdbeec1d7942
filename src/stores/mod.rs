// src/stores/mod.rs - Link persistence
use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::LinkRecord;

mod memory;
mod postgres;
mod redis;
mod timeout;

pub use self::memory::MemoryLinkStore;
pub use self::postgres::PgLinkStore;
pub use self::redis::RedisLinkStore;
pub use self::timeout::TimedLinkStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable mapping from short id to `LinkRecord`.
///
/// Short ids share one global namespace regardless of `custom_domain`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Inserts the record unless its short id is already present
    ///
    /// Must be atomic: of several concurrent callers inserting the same
    /// short id, exactly one succeeds.
    ///
    /// ### Errors
    /// * `StoreError::Conflict` - The short id is already taken
    /// * `StoreError::Timeout` - The backend did not answer in time
    /// * `StoreError::Database` / `StoreError::Redis` - Backend failure
    async fn insert_if_absent(&self, record: &LinkRecord) -> Result<()>;

    /// Looks up a record by short id
    ///
    /// ### Errors
    /// * `StoreError::NotFound` - No record under this short id
    async fn get(&self, short_id: &str) -> Result<LinkRecord>;

    /// Cheap liveness probe for health reporting
    async fn ping(&self) -> Result<()>;

    /// Short label for logs and health output
    fn backend_name(&self) -> &'static str;
}
