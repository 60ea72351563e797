//! Redis store adapter.
//!
//! Production [`Store`](crate::Store) implementation over
//! [`redis::aio::ConnectionManager`]. Every trait operation maps to a single
//! Redis command: GET, SET EX, EXPIRE, INCR, SADD, SISMEMBER, ZADD,
//! ZRANGE/ZREVRANGE WITHSCORES, PFADD and PFCOUNT.
//!
//! Requires Redis >= 6.2 and either the `redis-tokio` or `redis-smol`
//! feature.

mod common;
pub use common::*;

mod redis_store;
pub use redis_store::*;
