use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::{PingboardError, SortOrder, Store, local::HyperLogLog};

#[derive(Clone, Debug)]
enum Value {
    Scalar(String),
    Set(HashSet<String>),
    SortedSet(HashMap<String, f64>),
    Estimator(HyperLogLog),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Set(_) => "set",
            Value::SortedSet(_) => "sorted set",
            Value::Estimator(_) => "estimator",
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn unexpiring(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= Instant::now())
    }
}

/// In-memory [`Store`] adapter.
///
/// Cloning is cheap and shares the underlying keyspace, so one `LocalStore`
/// can back every component of a service. TTLs are simulated with
/// [`Instant`] deadlines and enforced lazily on access, so an expired key
/// behaves exactly like an absent one.
#[derive(Clone, Debug, Default)]
pub struct LocalStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl LocalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys, for inspection in tests.
    pub fn len(&self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    /// Whether no live keys exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Lazy eviction: drop the key if its deadline passed.
    fn purge(&self, key: &str) {
        self.entries.remove_if(key, |_, entry| entry.expired());
    }

    fn purge_expired(&self) {
        self.entries.retain(|_, entry| !entry.expired());
    }

    fn wrong_type(key: &str, expected: &str, found: &Value) -> PingboardError {
        PingboardError::Decode {
            key: key.to_string(),
            reason: format!("expected {expected}, found {}", found.type_name()),
        }
    }
}

impl Store for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PingboardError> {
        self.purge(key);

        match self.entries.get(key) {
            None => Ok(None),
            Some(entry) => match &entry.value {
                Value::Scalar(value) => Ok(Some(value.clone())),
                other => Err(Self::wrong_type(key, "scalar", other)),
            },
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), PingboardError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_string()),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );

        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, PingboardError> {
        self.purge(key);

        match self.entries.get_mut(key) {
            None => Ok(false),
            Some(mut entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, PingboardError> {
        self.purge(key);

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::unexpiring(Value::Scalar("0".to_string())));

        match &mut entry.value {
            Value::Scalar(value) => {
                let current: i64 = value.parse().map_err(|_| PingboardError::Decode {
                    key: key.to_string(),
                    reason: format!("value {value:?} is not an integer"),
                })?;

                let next = current + 1;
                *value = next.to_string();

                Ok(next)
            }
            other => Err(Self::wrong_type(key, "scalar", other)),
        }
    } // end method incr

    async fn set_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError> {
        self.purge(key);

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::unexpiring(Value::Set(HashSet::new())));

        match &mut entry.value {
            Value::Set(set) => {
                set.extend(members.iter().map(|member| member.to_string()));
                Ok(())
            }
            other => Err(Self::wrong_type(key, "set", other)),
        }
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, PingboardError> {
        self.purge(key);

        match self.entries.get(key) {
            None => Ok(false),
            Some(entry) => match &entry.value {
                Value::Set(set) => Ok(set.contains(member)),
                other => Err(Self::wrong_type(key, "set", other)),
            },
        }
    }

    async fn sorted_set_add(
        &self,
        key: &str,
        entries: &[(&str, f64)],
    ) -> Result<(), PingboardError> {
        self.purge(key);

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::unexpiring(Value::SortedSet(HashMap::new())));

        match &mut entry.value {
            Value::SortedSet(map) => {
                for (member, score) in entries {
                    map.insert(member.to_string(), *score);
                }
                Ok(())
            }
            other => Err(Self::wrong_type(key, "sorted set", other)),
        }
    }

    async fn sorted_set_range(
        &self,
        key: &str,
        order: SortOrder,
    ) -> Result<Vec<(String, f64)>, PingboardError> {
        self.purge(key);

        let mut rows: Vec<(String, f64)> = match self.entries.get(key) {
            None => return Ok(Vec::new()),
            Some(entry) => match &entry.value {
                Value::SortedSet(map) => map
                    .iter()
                    .map(|(member, score)| (member.clone(), *score))
                    .collect(),
                other => return Err(Self::wrong_type(key, "sorted set", other)),
            },
        };

        // Native order: by score, ties lexicographically by member. The
        // descending read reverses both, matching Redis ZREVRANGE.
        rows.sort_by(|(member_a, score_a), (member_b, score_b)| {
            score_a
                .total_cmp(score_b)
                .then_with(|| member_a.cmp(member_b))
        });

        if order == SortOrder::Descending {
            rows.reverse();
        }

        Ok(rows)
    } // end method sorted_set_range

    async fn estimator_add(&self, key: &str, members: &[&str]) -> Result<(), PingboardError> {
        self.purge(key);

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::unexpiring(Value::Estimator(HyperLogLog::new())));

        match &mut entry.value {
            Value::Estimator(sketch) => {
                for member in members {
                    sketch.add(member);
                }
                Ok(())
            }
            other => Err(Self::wrong_type(key, "estimator", other)),
        }
    }

    async fn estimator_count(&self, key: &str) -> Result<u64, PingboardError> {
        self.purge(key);

        match self.entries.get(key) {
            None => Ok(0),
            Some(entry) => match &entry.value {
                Value::Estimator(sketch) => Ok(sketch.count()),
                other => Err(Self::wrong_type(key, "estimator", other)),
            },
        }
    }
}
