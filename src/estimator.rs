use std::sync::Arc;

use crate::{KeyGenerator, PingboardError, Store};

/// Approximate count of distinct user names that have ever pinged.
///
/// Backed by the store's cardinality sketch: constant memory regardless of
/// how many names are added, relative error on the order of 1%. Adding the
/// same name repeatedly does not materially move the estimate.
pub struct DistinctPingers<S> {
    store: S,
    keys: Arc<KeyGenerator>,
}

impl<S: Store> DistinctPingers<S> {
    pub(crate) fn new(store: S, keys: Arc<KeyGenerator>) -> Self {
        Self { store, keys }
    }

    /// Record that `user_name` pinged.
    pub async fn add(&self, user_name: &str) -> Result<(), PingboardError> {
        self.store
            .estimator_add(&self.keys.pingers_key(), &[user_name])
            .await
    }

    /// Current approximate distinct-pinger count.
    pub async fn count(&self) -> Result<u64, PingboardError> {
        self.store.estimator_count(&self.keys.pingers_key()).await
    }
}
