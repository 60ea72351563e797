use std::time::Duration;

use redis::AsyncCommands;

use crate::{PingboardError, SortOrder, Store, redis::PingboardRedisClient};

/// A [`Store`] backed by Redis.
///
/// Thin command mapping; all semantics (atomic INCR, TTL behavior, sorted-set
/// tie order, HyperLogLog error bounds) are Redis's own.
#[derive(Clone, Debug)]
pub struct RedisStore {
    client: PingboardRedisClient,
}

impl RedisStore {
    /// Create a new [`RedisStore`] over an existing client.
    pub fn new(client: PingboardRedisClient) -> Self {
        Self { client }
    }

    /// Connect to `url` with a single managed connection.
    pub async fn connect(url: &str) -> Result<Self, PingboardError> {
        let client = redis::Client::open(url)?;

        Ok(Self::new(
            PingboardRedisClient::default_from_client(client).await?,
        ))
    }
}

impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PingboardError> {
        let mut conn = self.client.get();
        let value: Option<String> = conn.get(key).await?;

        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), PingboardError> {
        let mut conn = self.client.get();

        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }

        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, PingboardError> {
        let mut conn = self.client.get();
        let updated: bool = conn.expire(key, ttl.as_secs().max(1) as i64).await?;

        Ok(updated)
    }

    async fn incr(&self, key: &str) -> Result<i64, PingboardError> {
        let mut conn = self.client.get();
        let value: i64 = conn.incr(key, 1).await?;

        Ok(value)
    }

    async fn set_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError> {
        let mut conn = self.client.get();
        let _: i64 = conn.sadd(key, members).await?;

        Ok(())
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, PingboardError> {
        let mut conn = self.client.get();
        let found: bool = conn.sismember(key, member).await?;

        Ok(found)
    }

    async fn sorted_set_add(
        &self,
        key: &str,
        entries: &[(&str, f64)],
    ) -> Result<(), PingboardError> {
        let items: Vec<(f64, &str)> = entries
            .iter()
            .map(|(member, score)| (*score, *member))
            .collect();

        let mut conn = self.client.get();
        let _: i64 = conn.zadd_multiple(key, &items).await?;

        Ok(())
    }

    async fn sorted_set_range(
        &self,
        key: &str,
        order: SortOrder,
    ) -> Result<Vec<(String, f64)>, PingboardError> {
        let mut conn = self.client.get();

        let rows: Vec<(String, f64)> = match order {
            SortOrder::Ascending => conn.zrange_withscores(key, 0, -1).await?,
            SortOrder::Descending => conn.zrevrange_withscores(key, 0, -1).await?,
        };

        Ok(rows)
    }

    async fn estimator_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError> {
        let mut conn = self.client.get();
        let _: i64 = conn.pfadd(key, members).await?;

        Ok(())
    }

    async fn estimator_count(&self, key: &str) -> Result<u64, PingboardError> {
        let mut conn = self.client.get();
        let count: u64 = conn.pfcount(key).await?;

        Ok(count)
    }
}
