use std::{fmt, ops::Deref, sync::Arc};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::PingboardError;

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn validate_key_fragment(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        Err("must not be empty")
    } else if value.len() > 255 {
        Err("must not be longer than 255 bytes")
    } else if value.contains(':') {
        Err("must not contain colons")
    } else {
        Ok(())
    }
}

/// An opaque session token.
///
/// Tokens become path segments of store keys, so the same constraints as
/// [`StoreKey`](crate::StoreKey) apply: non-empty, at most 255 bytes, no
/// colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Generate a random token of `len` lowercase alphanumeric characters.
    pub fn generate(len: usize) -> Self {
        let mut rng = rand::rng();
        let token: String = (0..len.max(1))
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect();

        Self(Arc::from(token))
    }
}

impl Deref for SessionId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<String> for SessionId {
    type Error = PingboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_key_fragment(&value)
            .map_err(|reason| PingboardError::InvalidKey(format!("session id {reason}")))?;

        Ok(Self(Arc::from(value)))
    }
}

/// A claimed user name.
///
/// Validated like [`SessionId`]; user names are stored in the shared username
/// set and as leaderboard members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(Arc<str>);

impl Deref for UserName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<String> for UserName {
    type Error = PingboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_key_fragment(&value)
            .map_err(|reason| PingboardError::InvalidKey(format!("username {reason}")))?;

        Ok(Self(Arc::from(value)))
    }
}

/// Stored session record.
///
/// Serialized as JSON under `<prefix>:session:<id>`; created once, mutated
/// only by incrementing [`Self::ping_count`], never deleted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owner of the session.
    pub user_name: String,
    /// Accepted pings since creation.
    pub ping_count: u64,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Leaderboard member.
    pub user_name: String,
    /// Score at the member's last successful ping.
    pub ping_count: u64,
}

/// Score ordering for leaderboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lowest score first.
    Ascending,
    /// Highest score first.
    Descending,
}

/// Cooldown duration in seconds after each accepted ping.
#[derive(Clone, Copy, Debug)]
pub struct CooldownSeconds(u64);

impl Default for CooldownSeconds {
    fn default() -> Self {
        Self(5)
    }
}

impl Deref for CooldownSeconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for CooldownSeconds {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Cooldown must be at least 1 second");
        }

        Ok(Self(value))
    }
}

/// Fixed-window length in seconds for the window gate.
#[derive(Clone, Copy, Debug)]
pub struct WindowSizeSeconds(u64);

impl Default for WindowSizeSeconds {
    fn default() -> Self {
        Self(60)
    }
}

impl Deref for WindowSizeSeconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for WindowSizeSeconds {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Window size must be at least 1");
        }

        Ok(Self(value))
    }
}

/// Maximum accepted pings per window.
#[derive(Clone, Copy, Debug)]
pub struct WindowLimit(u64);

impl Default for WindowLimit {
    fn default() -> Self {
        Self(2)
    }
}

impl Deref for WindowLimit {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for WindowLimit {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err("Window limit must be greater than 0");
        }

        Ok(Self(value))
    }
}
