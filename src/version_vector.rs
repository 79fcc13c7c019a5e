use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SyncError};

/// Per-tree causal counters.
///
/// Maps a tree id to the number of net changes observed from that tree. An
/// id that is absent has an implicit counter of 0. The value is immutable:
/// [`join`](Self::join) and [`advance`](Self::advance) return new vectors.
///
/// Keys are kept ordered so the serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionVector(BTreeMap<String, u64>);

impl VersionVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from an untyped JSON value, rejecting anything that is
    /// not an object of non-negative integers.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SyncError::Validation("version vector is not an object".to_string()))?;

        object
            .iter()
            .map(|(id, counter)| {
                counter.as_u64().map(|n| (id.clone(), n)).ok_or_else(|| {
                    SyncError::Validation(format!(
                        "version vector value for {id:?} is not a non-negative integer"
                    ))
                })
            })
            .collect()
    }

    /// Counter for `id`, 0 when absent.
    pub fn get(&self, id: &str) -> u64 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Strict causal precedence.
    ///
    /// True iff the vectors differ and every id present in `self` is present
    /// in `other` with a counter at least as large. Ids only in `other` are
    /// ignored.
    pub fn precedes(&self, other: &Self) -> bool {
        self != other
            && self
                .0
                .iter()
                .all(|(id, n)| other.0.get(id).is_some_and(|m| n <= m))
    }

    /// Least upper bound: union of ids, maximum counter per id.
    pub fn join(&self, other: &Self) -> Self {
        let mut joined = self.0.clone();
        for (id, &n) in &other.0 {
            let entry = joined.entry(id.clone()).or_insert(n);
            *entry = (*entry).max(n);
        }
        Self(joined)
    }

    /// One net change made by tree `id`.
    pub fn advance(&self, id: &str) -> Self {
        let mut advanced = self.0.clone();
        let counter = advanced.entry(id.to_string()).or_insert(0);
        *counter = counter.saturating_add(1);
        Self(advanced)
    }
}

impl PartialOrd for VersionVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.precedes(other) {
            Some(Ordering::Less)
        } else if other.precedes(self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for VersionVector {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, n)| (id.into(), n)).collect())
    }
}

impl fmt::Display for VersionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, n)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id:?}: {n}")?;
        }
        write!(f, "}}")
    }
}
