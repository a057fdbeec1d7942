// src/stores/postgres.rs - Postgres backend
use async_trait::async_trait;
use log::{debug, error};
use sqlx::PgPool;

use super::{LinkStore, Result};
use crate::db::Database;
use crate::errors::StoreError;
use crate::models::LinkRecord;

/// Backend on the `links` table; the primary key on `short_id` makes
/// inserts atomic across every service instance sharing the database.
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn insert_if_absent(&self, record: &LinkRecord) -> Result<()> {
        sqlx::query(
            r#"
                INSERT INTO links (short_id, long_url, custom_domain, created_at)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.short_id)
        .bind(&record.long_url)
        .bind(&record.custom_domain)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::Conflict(_) => {
                debug!("Short id '{}' already exists", record.short_id);
                StoreError::Conflict(format!("Short id '{}' already exists", record.short_id))
            }
            other => {
                error!("Failed to insert link '{}': {}", record.short_id, other);
                other
            }
        })?;

        Ok(())
    }

    async fn get(&self, short_id: &str) -> Result<LinkRecord> {
        sqlx::query_as::<_, LinkRecord>(
            r#"
                SELECT short_id, long_url, custom_domain, created_at
                FROM links
                WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Short id '{}' not found", short_id)))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
