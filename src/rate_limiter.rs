use std::{sync::Arc, time::Duration};

use crate::{
    CooldownSeconds, KeyGenerator, PingboardError, SessionId, Store, WindowLimit,
    WindowSizeSeconds,
};

/// Outcome of a rate-limit gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingDecision {
    /// The ping may proceed.
    Allowed,
    /// The ping is rejected; no session state was mutated by the check.
    Rejected(RateLimitKind),
}

/// Which gate rejected a ping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitKind {
    /// A previous ping landed less than a cooldown ago.
    #[error("you just pinged, try again after {cooldown_seconds}s")]
    CooldownActive {
        /// Cooldown length; the retry becomes possible at most this many
        /// seconds after the rejected attempt.
        cooldown_seconds: u64,
    },
    /// The fixed window has no accepted-ping slots left.
    #[error("ping limit of {limit} per {window_size_seconds}s exceeded")]
    WindowExhausted {
        /// Accepted pings allowed per window.
        limit: u64,
        /// Window length in seconds.
        window_size_seconds: u64,
    },
}

/// Two independent per-session throttles gating ping acceptance.
///
/// The **cooldown gate** caps frequency to one accepted ping per cooldown
/// interval: a marker key with a short TTL exists iff a ping was recently
/// accepted. The **window gate** caps volume: a counter keyed by session,
/// expiring a fixed window after its first accepted attempt, rejects once it
/// reaches capacity. The window is anchored to its first event; later
/// attempts never extend it.
pub struct PingRateLimiter<S> {
    store: S,
    keys: Arc<KeyGenerator>,
    cooldown_seconds: CooldownSeconds,
    window_size_seconds: WindowSizeSeconds,
    window_limit: WindowLimit,
}

impl<S: Store> PingRateLimiter<S> {
    pub(crate) fn new(
        store: S,
        keys: Arc<KeyGenerator>,
        cooldown_seconds: CooldownSeconds,
        window_size_seconds: WindowSizeSeconds,
        window_limit: WindowLimit,
    ) -> Self {
        Self {
            store,
            keys,
            cooldown_seconds,
            window_size_seconds,
            window_limit,
        }
    }

    /// Cooldown gate: allowed iff no cooldown marker exists for the session.
    ///
    /// Read-only; the marker is set by [`arm_cooldown`](Self::arm_cooldown)
    /// after a ping fully succeeds.
    pub async fn is_allowed(&self, session_id: &SessionId) -> Result<PingDecision, PingboardError> {
        let marker = self.store.get(&self.keys.cooldown_key(session_id)).await?;

        match marker {
            None => Ok(PingDecision::Allowed),
            Some(_) => Ok(PingDecision::Rejected(RateLimitKind::CooldownActive {
                cooldown_seconds: *self.cooldown_seconds,
            })),
        }
    }

    /// Window gate: consume one accepted-ping slot in the current window, or
    /// reject without mutating anything when the window is exhausted.
    ///
    /// The counter's expiry is set only when this attempt opened the window;
    /// a later attempt inside the same window must not reset it.
    ///
    /// Note the slot is consumed before the caller increments the ping count:
    /// an increment that fails afterwards does not refund the slot.
    pub async fn register_attempt(
        &self,
        session_id: &SessionId,
    ) -> Result<PingDecision, PingboardError> {
        let window_key = self.keys.window_key(session_id);

        let current = match self.store.get(&window_key).await? {
            None => None,
            Some(raw) => {
                let count = raw.parse::<u64>().map_err(|err| PingboardError::Decode {
                    key: window_key.to_string(),
                    reason: err.to_string(),
                })?;

                Some(count)
            }
        };

        if let Some(count) = current
            && count >= *self.window_limit
        {
            return Ok(PingDecision::Rejected(RateLimitKind::WindowExhausted {
                limit: *self.window_limit,
                window_size_seconds: *self.window_size_seconds,
            }));
        }

        let new_count = self.store.incr(&window_key).await?;

        if new_count == 1 {
            // First accepted attempt anchors the window. Keyed to the
            // post-increment value, not the pre-read: the counter can expire
            // between the read and the increment, in which case the increment
            // recreates it without a TTL and this attempt is the first event
            // of the new window.
            self.store
                .expire(&window_key, Duration::from_secs(*self.window_size_seconds))
                .await?;
        }

        Ok(PingDecision::Allowed)
    } // end method register_attempt

    /// Set the cooldown marker for the session, expiring a cooldown from now.
    ///
    /// Called after the ping count increment succeeds, so a ping that fails
    /// mid-flight does not start a cooldown.
    pub async fn arm_cooldown(&self, session_id: &SessionId) -> Result<(), PingboardError> {
        self.store
            .set(
                &self.keys.cooldown_key(session_id),
                "1",
                Some(Duration::from_secs(*self.cooldown_seconds)),
            )
            .await
    }
}
