use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use redis::{Client, aio::ConnectionManager};

use crate::PingboardError;

/// Pool of multiplexed Redis connections, handed out round-robin.
///
/// Each [`ConnectionManager`] reconnects on its own; the pool only decides
/// which one the next command rides on. A single connection covers most
/// deployments since the manager already multiplexes; raise the count when
/// one pipeline becomes the bottleneck.
pub struct PingboardRedisClient {
    connection_managers: Arc<Vec<ConnectionManager>>,
    next_index: AtomicUsize,
}

impl PingboardRedisClient {
    /// Build a single-connection pool from `client`.
    pub async fn default_from_client(client: Client) -> Result<Self, PingboardError> {
        Self::from_client(client, 1).await
    }

    /// Build a pool of `connection_count` connections from `client`.
    ///
    /// Fails with [`PingboardError::InvalidConnectionCount`] when
    /// `connection_count` is zero, and with the underlying
    /// [`redis::RedisError`] when any connection cannot be established.
    pub async fn from_client(
        client: Client,
        connection_count: usize,
    ) -> Result<Self, PingboardError> {
        if connection_count == 0 {
            return Err(PingboardError::InvalidConnectionCount(
                "connection count must be > 0".to_string(),
            ));
        }

        let mut connection_managers = Vec::with_capacity(connection_count);

        for _ in 0..connection_count {
            connection_managers.push(client.get_connection_manager().await?);
        }

        Ok(Self {
            connection_managers: Arc::new(connection_managers),
            next_index: AtomicUsize::new(0),
        })
    }

    /// Hand out the next connection in round-robin order.
    pub(crate) fn get(&self) -> ConnectionManager {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.connection_managers[index % self.connection_managers.len()].clone()
    } // end method get
} // end impl PingboardRedisClient

// Manual impl: `ConnectionManager` does not implement `Debug`.
impl std::fmt::Debug for PingboardRedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PingboardRedisClient")
            .field(
                "connection_managers",
                &format_args!("<{} connections>", self.connection_managers.len()),
            )
            .field("next_index", &self.next_index)
            .finish()
    }
}

// Manual impl: clones share the pool but restart their own rotation.
impl Clone for PingboardRedisClient {
    fn clone(&self) -> Self {
        Self {
            connection_managers: self.connection_managers.clone(),
            next_index: AtomicUsize::new(0),
        }
    }
}
