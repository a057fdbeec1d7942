use std::sync::Arc;

use log::debug;

use crate::errors::ShortenError;
use crate::stores::LinkStore;

/// Read side of the service: short id to target URL
pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// ### Errors
    /// * `ShortenError::NotFound` - No link under this id
    pub async fn resolve(&self, short_id: &str) -> Result<String, ShortenError> {
        let record = self.store.get(short_id).await?;
        debug!("Resolved '{}' to '{}'", short_id, record.long_url);
        Ok(record.long_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::models::LinkRecord;
    use crate::stores::MockLinkStore;

    #[tokio::test]
    async fn returns_stored_url() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .withf(|id| id == "abc123")
            .times(1)
            .returning(|id| {
                Ok(LinkRecord::new(
                    id.to_string(),
                    "https://example.com/page".to_string(),
                    None,
                ))
            });

        let resolver = RedirectResolver::new(Arc::new(store));
        assert_eq!(
            resolver.resolve("abc123").await.unwrap(),
            "https://example.com/page"
        );
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .returning(|id| Err(StoreError::NotFound(id.to_string())));

        let resolver = RedirectResolver::new(Arc::new(store));
        assert!(matches!(
            resolver.resolve("missing").await,
            Err(ShortenError::NotFound(_))
        ));
    }
}
