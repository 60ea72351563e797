use std::sync::Arc;

use crate::{KeyGenerator, PingboardError, ScoreEntry, SortOrder, Store};

/// Ranked view of ping counts keyed by user name.
pub struct Leaderboard<S> {
    store: S,
    keys: Arc<KeyGenerator>,
}

impl<S: Store> Leaderboard<S> {
    pub(crate) fn new(store: S, keys: Arc<KeyGenerator>) -> Self {
        Self { store, keys }
    }

    /// Upsert `(user_name, score)`, replacing (not accumulating) any score the
    /// member already holds.
    pub async fn update(&self, user_name: &str, score: u64) -> Result<(), PingboardError> {
        self.store
            .sorted_set_add(
                &self.keys.leaderboard_key(),
                &[(user_name, score as f64)],
            )
            .await
    }

    /// Read at most `limit` entries sorted by score in the given order.
    ///
    /// `limit = 0` yields an empty list; a limit past the collection size
    /// yields the whole collection. Ties are in the store's native order.
    pub async fn top(
        &self,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<ScoreEntry>, PingboardError> {
        let mut rows = self
            .store
            .sorted_set_range(&self.keys.leaderboard_key(), order)
            .await?;

        rows.truncate(limit);

        Ok(rows
            .into_iter()
            .map(|(user_name, score)| ScoreEntry {
                user_name,
                ping_count: score as u64,
            })
            .collect())
    } // end method top
}
