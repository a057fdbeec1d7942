// src/stores/redis.rs - Redis backend
use async_trait::async_trait;
use log::{debug, info};
use redis::aio::ConnectionManager;

use super::{LinkStore, Result};
use crate::config::RedisConfig;
use crate::errors::StoreError;
use crate::models::LinkRecord;

/// Backend storing each record as JSON under `{prefix}{short_id}`.
/// `SET ... NX` is the atomic insert primitive.
pub struct RedisLinkStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisLinkStore {
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        info!("Connecting to redis link store");
        let client = redis::Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        info!("Successfully connected to redis");

        Ok(Self {
            connection,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, short_id: &str) -> String {
        format!("{}{}", self.key_prefix, short_id)
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn insert_if_absent(&self, record: &LinkRecord) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        let mut conn = self.connection.clone();

        // Reply is "OK" when written, nil when the key already existed
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(&record.short_id))
            .arg(payload)
            .arg("NX")
            .query_async(&mut conn)
            .await?;

        match reply {
            Some(_) => Ok(()),
            None => {
                debug!("Short id '{}' already exists", record.short_id);
                Err(StoreError::Conflict(format!(
                    "Short id '{}' already exists",
                    record.short_id
                )))
            }
        }
    }

    async fn get(&self, short_id: &str) -> Result<LinkRecord> {
        let mut conn = self.connection.clone();
        let payload: Option<String> = redis::cmd("GET")
            .arg(self.key(short_id))
            .query_async(&mut conn)
            .await?;

        match payload {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::NotFound(format!(
                "Short id '{}' not found",
                short_id
            ))),
        }
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
