//! In-process store adapter.
//!
//! [`LocalStore`] keeps the whole keyspace in a [`DashMap`](dashmap::DashMap)
//! and implements the same observable semantics as the Redis adapter: the
//! not-found signal, lazy TTL expiry (deadlines against
//! [`std::time::Instant`]), init-to-zero increment, deterministic sorted-set
//! tie order, and a real HyperLogLog sketch for the estimator operations.
//!
//! Use it for tests and for single-process deployments that do not need
//! shared state. Nothing is persisted and nothing is evicted except by TTL.

mod local_store;
pub use local_store::*;

mod hyperloglog;
pub(crate) use hyperloglog::HyperLogLog;
