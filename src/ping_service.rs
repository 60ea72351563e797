//! Top-level entrypoint that wires the components over one injected store.
//!
//! The service owns a [`SessionRegistry`], a [`PingRateLimiter`], a
//! [`Leaderboard`] and a [`DistinctPingers`] estimator, all reading and
//! writing through the same [`Store`] handle under a shared key prefix.

use std::sync::Arc;

use crate::{
    CooldownSeconds, DistinctPingers, KeyGenerator, Leaderboard, PingDecision, PingRateLimiter,
    PingboardError, ScoreEntry, Session, SessionId, SessionRegistry, SortOrder, Store, StoreKey,
    UserName, WindowLimit, WindowSizeSeconds,
};

/// Top-level configuration for [`PingService`].
#[derive(Clone, Debug, Default)]
pub struct PingServiceOptions {
    /// Prefix for all store keys. `None` uses [`StoreKey::default_prefix`].
    pub prefix: Option<StoreKey>,
    /// Cooldown after each accepted ping. Defaults to 5 seconds.
    pub cooldown_seconds: CooldownSeconds,
    /// Window gate length. Defaults to 60 seconds.
    pub window_size_seconds: WindowSizeSeconds,
    /// Accepted pings per window. Defaults to 2.
    pub window_limit: WindowLimit,
}

/// Ping service entrypoint.
///
/// Construct one per backing store and share it; all state lives in the store,
/// none in this value beyond the handle and configuration.
pub struct PingService<S> {
    sessions: SessionRegistry<S>,
    limiter: PingRateLimiter<S>,
    leaderboard: Leaderboard<S>,
    pingers: DistinctPingers<S>,
}

/// Leaderboard fetch size served to clients that do not name one.
pub const DEFAULT_TOP_LIMIT: usize = 10;

impl<S: Store + Clone> PingService<S> {
    /// Create a new [`PingService`] over `store`.
    pub fn new(store: S, options: PingServiceOptions) -> Self {
        let prefix = options.prefix.unwrap_or_else(StoreKey::default_prefix);
        let keys = Arc::new(KeyGenerator::new(prefix));

        Self {
            sessions: SessionRegistry::new(store.clone(), keys.clone()),
            limiter: PingRateLimiter::new(
                store.clone(),
                keys.clone(),
                options.cooldown_seconds,
                options.window_size_seconds,
                options.window_limit,
            ),
            leaderboard: Leaderboard::new(store.clone(), keys.clone()),
            pingers: DistinctPingers::new(store, keys),
        }
    }

    /// Create a session owned by `user_name` under the token `session_id`.
    pub async fn create_session(
        &self,
        session_id: &SessionId,
        user_name: &UserName,
    ) -> Result<(), PingboardError> {
        self.sessions.create_session(session_id, user_name).await
    }

    /// Read the session record for `session_id`.
    pub async fn session(&self, session_id: &SessionId) -> Result<Session, PingboardError> {
        self.sessions.get_session(session_id).await
    }

    /// Register one ping for `session_id` and return the new ping count.
    ///
    /// Canonical flow, short-circuiting on the first failure or rejection:
    /// cooldown gate, window gate, count increment, cooldown marker,
    /// leaderboard upsert, estimator add. A rejection surfaces as
    /// [`PingboardError::RateLimited`] and mutates no session state; the
    /// window gate does consume a slot once passed, even if a later step
    /// fails.
    pub async fn ping(&self, session_id: &SessionId) -> Result<u64, PingboardError> {
        if let PingDecision::Rejected(kind) = self.limiter.is_allowed(session_id).await? {
            tracing::debug!(session_id = %session_id, %kind, "ping rejected");
            return Err(PingboardError::RateLimited(kind));
        }

        if let PingDecision::Rejected(kind) = self.limiter.register_attempt(session_id).await? {
            tracing::debug!(session_id = %session_id, %kind, "ping rejected");
            return Err(PingboardError::RateLimited(kind));
        }

        let session = self.sessions.increment_ping(session_id).await?;

        self.limiter.arm_cooldown(session_id).await?;

        self.leaderboard
            .update(&session.user_name, session.ping_count)
            .await?;

        self.pingers.add(&session.user_name).await?;

        tracing::debug!(
            session_id = %session_id,
            user_name = %session.user_name,
            ping_count = session.ping_count,
            "ping accepted"
        );

        Ok(session.ping_count)
    } // end method ping

    /// Read at most `limit` leaderboard entries in the given score order.
    pub async fn top(
        &self,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<ScoreEntry>, PingboardError> {
        self.leaderboard.top(limit, order).await
    }

    /// Read the top [`DEFAULT_TOP_LIMIT`] leaderboard entries, highest score
    /// first.
    pub async fn top_default(&self) -> Result<Vec<ScoreEntry>, PingboardError> {
        self.top(DEFAULT_TOP_LIMIT, SortOrder::Descending).await
    }

    /// Approximate count of distinct users that have ever pinged.
    pub async fn distinct_pingers(&self) -> Result<u64, PingboardError> {
        self.pingers.count().await
    }

    /// Access the session registry.
    pub fn sessions(&self) -> &SessionRegistry<S> {
        &self.sessions
    }

    /// Access the rate limiter.
    pub fn limiter(&self) -> &PingRateLimiter<S> {
        &self.limiter
    }

    /// Access the leaderboard.
    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// Access the distinct-pinger estimator.
    pub fn pingers(&self) -> &DistinctPingers<S> {
        &self.pingers
    }
}
