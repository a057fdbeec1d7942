use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use log::warn;
use tokio::time::timeout;

use super::{LinkStore, Result};
use crate::errors::StoreError;
use crate::models::LinkRecord;

/// Bounds every operation of the wrapped store by a fixed deadline
pub struct TimedLinkStore {
    inner: Arc<dyn LinkStore>,
    limit: Duration,
}

impl TimedLinkStore {
    pub fn new(inner: Arc<dyn LinkStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn expired(&self, operation: &str) -> StoreError {
        warn!(
            "{} store {} exceeded {:?}",
            self.inner.backend_name(),
            operation,
            self.limit
        );
        StoreError::Timeout(self.limit)
    }
}

#[async_trait]
impl LinkStore for TimedLinkStore {
    async fn insert_if_absent(&self, record: &LinkRecord) -> Result<()> {
        timeout(self.limit, self.inner.insert_if_absent(record))
            .await
            .map_err(|_| self.expired("insert"))?
    }

    async fn get(&self, short_id: &str) -> Result<LinkRecord> {
        timeout(self.limit, self.inner.get(short_id))
            .await
            .map_err(|_| self.expired("get"))?
    }

    async fn ping(&self) -> Result<()> {
        timeout(self.limit, self.inner.ping())
            .await
            .map_err(|_| self.expired("ping"))?
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
