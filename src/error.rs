use crate::RateLimitKind;

/// Error type for this crate.
///
/// The variants split into user-correctable conditions ([`Self::is_user_error`])
/// and internal/store failures, so a transport layer can map them to status
/// codes without inspecting messages.
#[derive(Debug, thiserror::Error)]
pub enum PingboardError {
    /// The requested user name is already claimed by another session.
    #[error("username {0:?} is taken by another session")]
    UsernameTaken(String),

    /// No session record exists for the given token.
    #[error("unknown session {0:?}")]
    SessionNotFound(String),

    /// A ping was rejected by one of the rate-limit gates.
    #[error("{0}")]
    RateLimited(RateLimitKind),

    /// A stored value was present but did not decode as the expected shape.
    ///
    /// Distinct from [`Self::SessionNotFound`]: the key existed, its payload
    /// was wrong. Treated as an internal defect, not user input.
    #[error("undecodable value at {key:?}: {reason}")]
    Decode {
        /// Store key holding the offending value.
        key: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A key, key prefix or option failed validation.
    #[error("invalid store key: {0}")]
    InvalidKey(String),

    /// Redis error.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
    #[error("redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    /// Redis client construction was asked for zero connections.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
    #[error("invalid redis connection count: {0}")]
    InvalidConnectionCount(String),
}

impl PingboardError {
    /// Whether the error is correctable by the caller (bad input, taken name,
    /// rate limit) as opposed to an internal or store failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken(_) | Self::SessionNotFound(_) | Self::RateLimited(_)
        )
    }

    /// Whether the error is a rate-limit rejection.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
