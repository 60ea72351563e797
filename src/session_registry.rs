use std::sync::Arc;

use crate::{KeyGenerator, PingboardError, Session, SessionId, Store, UserName};

/// Creates and retrieves per-session state, enforcing global username
/// uniqueness.
///
/// Uniqueness is a check-then-act over separate store round trips: two
/// near-simultaneous [`create_session`](Self::create_session) calls with the
/// same name can both observe the name as available before either write
/// lands. The race is documented, not prevented; serialize session creation
/// upstream if it matters.
pub struct SessionRegistry<S> {
    store: S,
    keys: Arc<KeyGenerator>,
}

impl<S: Store> SessionRegistry<S> {
    pub(crate) fn new(store: S, keys: Arc<KeyGenerator>) -> Self {
        Self { store, keys }
    }

    /// Register `user_name` and write a fresh session record with
    /// `ping_count = 0`.
    ///
    /// Fails with [`PingboardError::UsernameTaken`] when the name is already
    /// in the shared username set.
    pub async fn create_session(
        &self,
        session_id: &SessionId,
        user_name: &UserName,
    ) -> Result<(), PingboardError> {
        let usernames_key = self.keys.usernames_key();

        if self.store.set_contains(&usernames_key, user_name).await? {
            return Err(PingboardError::UsernameTaken(user_name.to_string()));
        }

        self.store.set_add(&usernames_key, &[&**user_name]).await?;

        self.write_session(
            session_id,
            &Session {
                user_name: user_name.to_string(),
                ping_count: 0,
            },
        )
        .await?;

        tracing::debug!(session_id = %session_id, user_name = %user_name, "session created");

        Ok(())
    } // end method create_session

    /// Read and decode the session record for `session_id`.
    ///
    /// An absent key is [`PingboardError::SessionNotFound`]; a present but
    /// undecodable value is [`PingboardError::Decode`].
    pub async fn get_session(&self, session_id: &SessionId) -> Result<Session, PingboardError> {
        let session_key = self.keys.session_key(session_id);

        let raw = self
            .store
            .get(&session_key)
            .await?
            .ok_or_else(|| PingboardError::SessionNotFound(session_id.to_string()))?;

        serde_json::from_str(&raw).map_err(|err| {
            tracing::warn!(key = %session_key, error = %err, "stored session did not decode");

            PingboardError::Decode {
                key: session_key.to_string(),
                reason: err.to_string(),
            }
        })
    }

    /// Increment the session's ping count by exactly 1.
    ///
    /// Returns the updated record; `ping_count` on it is the new count.
    ///
    /// This is a read-modify-write over two remote calls, not an atomic
    /// increment: concurrent pings on the same session may lose an increment.
    /// Tolerated because the rate limiter keeps same-session pings at least a
    /// cooldown apart in practice.
    pub async fn increment_ping(&self, session_id: &SessionId) -> Result<Session, PingboardError> {
        let mut session = self.get_session(session_id).await?;
        session.ping_count += 1;

        self.write_session(session_id, &session).await?;

        Ok(session)
    } // end method increment_ping

    async fn write_session(
        &self,
        session_id: &SessionId,
        session: &Session,
    ) -> Result<(), PingboardError> {
        let payload = serde_json::to_string(session).map_err(|err| PingboardError::Decode {
            key: self.keys.session_key(session_id).to_string(),
            reason: err.to_string(),
        })?;

        // Session records never expire; lifetime is bounded only by external
        // eviction of the backing store.
        self.store
            .set(&self.keys.session_key(session_id), &payload, None)
            .await
    }
}
