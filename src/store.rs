use std::time::Duration;

use crate::{PingboardError, SortOrder};

/// Contract over the backing key-value service.
///
/// Every operation is a single remote call from the caller's point of view:
/// it either completes, fails with a store error, or (for [`Store::get`])
/// reports the value as absent. Partial results are never returned.
///
/// Two adapters ship with this crate: [`LocalStore`](crate::local::LocalStore)
/// (in-memory, TTL simulated against [`std::time::Instant`]) and
/// [`RedisStore`](crate::redis::RedisStore) behind the redis features. Both
/// implement identical semantics, including the not-found signal and expiry.
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Read a scalar value. `Ok(None)` is the distinguished not-found signal.
    async fn get(&self, key: &str) -> Result<Option<String>, PingboardError>;

    /// Overwrite a scalar value. `ttl = None` means no expiry.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), PingboardError>;

    /// Set or refresh the expiry on an existing key.
    ///
    /// Returns `false` when the key does not exist (a no-op in that case).
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, PingboardError>;

    /// Atomically increment an integer value by 1, initializing an absent key
    /// to 0 first. Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64, PingboardError>;

    /// Add members to an unordered set.
    async fn set_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError>;

    /// Membership test against an unordered set. Absent keys read as empty.
    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, PingboardError>;

    /// Upsert `(member, score)` pairs into a sorted set, replacing the score
    /// of members already present.
    async fn sorted_set_add(
        &self,
        key: &str,
        entries: &[(&str, f64)],
    ) -> Result<(), PingboardError>;

    /// Full-range read of a sorted set in the given score order.
    ///
    /// Tie order between equal scores is the store's native order; it must be
    /// deterministic for a given state but is otherwise unspecified.
    async fn sorted_set_range(
        &self,
        key: &str,
        order: SortOrder,
    ) -> Result<Vec<(String, f64)>, PingboardError>;

    /// Feed members into a cardinality sketch.
    async fn estimator_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError>;

    /// Approximate count of distinct members ever fed into the sketch.
    async fn estimator_count(&self, key: &str) -> Result<u64, PingboardError>;
}
