//! Redis implementation of `CacheBackend`

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Redis backend sharing one multiplexed connection across all callers
#[derive(Clone)]
pub struct RedisBackend {
    client: Arc<Client>,
    connect_timeout: Duration,
    connection: Arc<RwLock<Option<redis::aio::MultiplexedConnection>>>,
}

impl Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_read() {
            Ok(conn) => {
                if conn.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisBackend")
            .field("connect_timeout", &self.connect_timeout)
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisBackend {
    /// Create a backend; no connection is attempted until the first command
    pub fn new(redis_url: &str, connect_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;

        Ok(Self {
            client: Arc::new(client),
            connect_timeout,
            connection: Arc::new(RwLock::new(None)),
        })
    }

    /// Get or create the shared connection.
    ///
    /// A failed attempt leaves the slot empty so the next command retries.
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        if let Some(conn) = self.connection.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.connection.write().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| CacheError::Connection("timed out connecting to Redis".into()))??;

        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the cached connection after an I/O failure
    async fn reset_on_io_error(&self, err: &redis::RedisError) {
        if err.is_io_error() || err.is_connection_dropped() {
            *self.connection.write().await = None;
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.get_connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.reset_on_io_error(&e).await;
                Err(e.into())
            }
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;
        match conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reset_on_io_error(&e).await;
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let mut conn = self.get_connection().await?;
        match conn.del::<_, u64>(key).await {
            Ok(deleted) => Ok(deleted),
            Err(e) => {
                self.reset_on_io_error(&e).await;
                Err(e.into())
            }
        }
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.get_connection().await?;

        let keys = match conn.keys::<_, Vec<String>>(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                self.reset_on_io_error(&e).await;
                return Err(e.into());
            }
        };

        if keys.is_empty() {
            return Ok(0);
        }

        // One DEL with every key is applied atomically by Redis
        match conn.del::<_, u64>(keys).await {
            Ok(deleted) => Ok(deleted),
            Err(e) => {
                self.reset_on_io_error(&e).await;
                Err(e.into())
            }
        }
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::General(format!("unexpected PING reply: {}", pong)))
        }
    }
}
