//! Redis-backed association backend.

use crate::keys::TagKeys;
use crate::AssociationBackend;
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use std::collections::BTreeSet;
use tagsweep_config::RedisConfig;
use tagsweep_core::{CacheTag, NonEmptyTags, QueryId, TagsweepError, TagsweepResult};
use tracing::{debug, info};

/// Create a Redis connection pool and check that the server answers.
pub async fn create_pool(config: &RedisConfig) -> TagsweepResult<Pool> {
    info!("Creating Redis connection pool for association store...");

    let cfg = Config::from_url(&config.url);

    let pool = cfg
        .builder()
        .map_err(|e| TagsweepError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| TagsweepError::Configuration(format!("Failed to create pool: {}", e)))?;

    let mut conn = pool
        .get()
        .await
        .map_err(|e| TagsweepError::backend(format!("Failed to get Redis connection: {}", e)))?;
    redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| TagsweepError::backend(format!("Redis PING failed: {}", e)))?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}

/// Association backend storing one Redis set per tag.
pub struct RedisBackend {
    pool: Pool,
    keys: TagKeys,
}

impl RedisBackend {
    /// Create a backend over an existing pool.
    #[must_use]
    pub fn new(pool: Pool, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            keys: TagKeys::new(key_prefix),
        }
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> TagsweepResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| TagsweepError::backend(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl AssociationBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn add(&self, tag: &CacheTag, query_id: &QueryId) -> TagsweepResult<()> {
        let mut conn = self.conn().await?;
        let key = self.keys.tag(tag);

        let added: u64 = conn.sadd(&key, query_id.as_str()).await.map_err(|e| {
            TagsweepError::backend(format!("SADD '{}' failed: {}", key, e))
        })?;

        debug!(tag = %tag, query_id = %query_id, new_member = added > 0, "Indexed query under tag");
        Ok(())
    }

    async fn union(&self, tags: &NonEmptyTags) -> TagsweepResult<BTreeSet<QueryId>> {
        let mut conn = self.conn().await?;
        let keys = self.keys.tags(tags);

        let members: Vec<String> = conn.sunion(&keys).await.map_err(|e| {
            TagsweepError::backend(format!("SUNION over {} keys failed: {}", keys.len(), e))
        })?;

        Ok(members.into_iter().map(QueryId::from).collect())
    }

    async fn delete(&self, tags: &NonEmptyTags) -> TagsweepResult<u64> {
        let mut conn = self.conn().await?;
        let keys = self.keys.tags(tags);

        let deleted: u64 = conn.del(&keys).await.map_err(|e| {
            TagsweepError::backend(format!("DEL over {} keys failed: {}", keys.len(), e))
        })?;

        debug!(requested = keys.len(), deleted, "Deleted tag sets");
        Ok(deleted)
    }

    async fn clear(&self) -> TagsweepResult<()> {
        let mut conn = self.conn().await?;

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TagsweepError::backend(format!("FLUSHDB failed: {}", e)))?;

        info!("Flushed Redis association store");
        Ok(())
    }

    async fn ping(&self) -> TagsweepResult<()> {
        let mut conn = self.conn().await?;

        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| TagsweepError::backend(format!("Redis PING failed: {}", e)))?;

        Ok(())
    }
}
