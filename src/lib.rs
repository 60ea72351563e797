#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod ping_service;
pub use ping_service::*;

mod session_registry;
pub use session_registry::*;

mod rate_limiter;
pub use rate_limiter::*;

mod leaderboard;
pub use leaderboard::*;

mod estimator;
pub use estimator::*;

mod store;
pub use store::*;

mod keys;
pub use keys::*;

pub mod local;

#[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
pub mod redis;

mod error;
pub use error::*;

mod common;
pub use common::{
    CooldownSeconds, ScoreEntry, Session, SessionId, SortOrder, UserName, WindowLimit,
    WindowSizeSeconds,
};

#[cfg(test)]
mod tests;
