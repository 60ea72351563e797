use std::{ops::Deref, sync::Arc};

use dashmap::DashMap;

use crate::{PingboardError, SessionId};

/// A validated newtype for store key prefixes.
///
/// This is a string with the following constraints:
/// - Must not be empty
/// - Must not be longer than 255 bytes
/// - Must not contain colons
#[derive(Debug, Clone, PartialEq, PartialOrd, Hash, Eq)]
pub struct StoreKey(Arc<str>);

impl StoreKey {
    /// Create the default prefix.
    pub fn default_prefix() -> Self {
        Self(Arc::from("pingboard"))
    }
}

impl Deref for StoreKey {
    type Target = Arc<str>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for StoreKey {
    type Error = PingboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(PingboardError::InvalidKey(
                "Store key must not be empty".to_string(),
            ))
        } else if value.len() > 255 {
            Err(PingboardError::InvalidKey(
                "Store key must not be longer than 255 characters".to_string(),
            ))
        } else if value.contains(':') {
            Err(PingboardError::InvalidKey(
                "Store key must not contain colons".to_string(),
            ))
        } else {
            Ok(Self(Arc::from(value)))
        }
    }
}

/// Derives the namespaced keys every component reads and writes.
///
/// Shared keys (`usernames`, `leaderboard`, `pingers`) are built once;
/// per-session keys are cached so the hot ping path does not re-format them.
#[derive(Clone, Debug)]
pub(crate) struct KeyGenerator {
    prefix: StoreKey,
    usernames_key: Arc<str>,
    leaderboard_key: Arc<str>,
    pingers_key: Arc<str>,

    // caches
    session_key_cache: DashMap<SessionId, Arc<str>>,
    cooldown_key_cache: DashMap<SessionId, Arc<str>>,
    window_key_cache: DashMap<SessionId, Arc<str>>,
}

impl KeyGenerator {
    pub(crate) fn new(prefix: StoreKey) -> Self {
        let usernames_key: Arc<str> = Arc::from(format!("{}:usernames", *prefix));
        let leaderboard_key: Arc<str> = Arc::from(format!("{}:leaderboard", *prefix));
        let pingers_key: Arc<str> = Arc::from(format!("{}:pingers", *prefix));

        Self {
            prefix,
            usernames_key,
            leaderboard_key,
            pingers_key,
            session_key_cache: DashMap::new(),
            cooldown_key_cache: DashMap::new(),
            window_key_cache: DashMap::new(),
        }
    }

    fn session_scoped(&self, kind: &str, session_id: &SessionId) -> Arc<str> {
        Arc::from(format!("{}:{}:{}", *self.prefix, kind, &**session_id))
    }

    fn cached(
        &self,
        cache: &DashMap<SessionId, Arc<str>>,
        kind: &str,
        session_id: &SessionId,
    ) -> Arc<str> {
        match cache.get(session_id) {
            Some(value) => value.clone(),
            None => {
                let value = self.session_scoped(kind, session_id);
                cache.insert(session_id.clone(), value.clone());

                value
            }
        }
    }

    /// `<prefix>:session:<id>` — the JSON session record.
    pub(crate) fn session_key(&self, session_id: &SessionId) -> Arc<str> {
        self.cached(&self.session_key_cache, "session", session_id)
    }

    /// `<prefix>:cooldown:<id>` — presence-only marker, 5s-class TTL.
    pub(crate) fn cooldown_key(&self, session_id: &SessionId) -> Arc<str> {
        self.cached(&self.cooldown_key_cache, "cooldown", session_id)
    }

    /// `<prefix>:window:<id>` — accepted-ping counter for the current window.
    pub(crate) fn window_key(&self, session_id: &SessionId) -> Arc<str> {
        self.cached(&self.window_key_cache, "window", session_id)
    }

    /// `<prefix>:usernames` — the process-wide claimed-name set.
    pub(crate) fn usernames_key(&self) -> Arc<str> {
        self.usernames_key.clone()
    }

    /// `<prefix>:leaderboard` — the sorted set of ping counts.
    pub(crate) fn leaderboard_key(&self) -> Arc<str> {
        self.leaderboard_key.clone()
    }

    /// `<prefix>:pingers` — the distinct-pinger cardinality sketch.
    pub(crate) fn pingers_key(&self) -> Arc<str> {
        self.pingers_key.clone()
    }
}
