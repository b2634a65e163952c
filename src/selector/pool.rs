use std::collections::HashSet;

use thiserror::Error;

/// Raised when a pool cannot back a selector
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("{kind} pool is empty")]
    Empty { kind: &'static str },

    #[error("{kind} pool has no well-formed items ({rejected} rejected)")]
    NoValidItems { kind: &'static str, rejected: usize },

    #[error("{kind} pool could not be read: {reason}")]
    Unreadable { kind: &'static str, reason: String },
}

/// An element a daily selector can choose
pub trait PoolItem: Clone + Send + Sync {
    /// Name of the pool kind, used in logs and errors
    const KIND: &'static str;

    /// Stable, lower-case identity used for history and repeat checks
    fn identity(&self) -> String;

    /// Shape check applied when the pool is built
    fn is_well_formed(&self) -> bool {
        true
    }
}

/// Ordered, non-empty, de-duplicated set of candidates
#[derive(Debug, Clone)]
pub struct CandidatePool<T> {
    items: Vec<T>,
    identities: Vec<String>,
}

impl<T: PoolItem> CandidatePool<T> {
    /// Builds a pool, dropping malformed items and later duplicates
    pub fn new(items: impl IntoIterator<Item = T>) -> Result<Self, PoolError> {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut identities = Vec::new();
        let mut total = 0usize;

        for item in items {
            total += 1;
            if !item.is_well_formed() {
                tracing::debug!(kind = T::KIND, identity = %item.identity(), "Dropping malformed pool item");
                continue;
            }
            let identity = item.identity();
            if !seen.insert(identity.clone()) {
                continue;
            }
            identities.push(identity);
            kept.push(item);
        }

        if total == 0 {
            return Err(PoolError::Empty { kind: T::KIND });
        }
        if kept.is_empty() {
            return Err(PoolError::NoValidItems {
                kind: T::KIND,
                rejected: total,
            });
        }

        tracing::debug!(kind = T::KIND, size = kept.len(), dropped = total - kept.len(), "Pool built");

        Ok(Self {
            items: kept,
            identities,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Identities in pool order
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    pub fn find_by_identity(&self, identity: &str) -> Option<&T> {
        let identity = identity.trim().to_lowercase();
        self.identities
            .iter()
            .position(|id| *id == identity)
            .map(|index| &self.items[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Tag(&'static str);

    impl PoolItem for Tag {
        const KIND: &'static str = "tag";

        fn identity(&self) -> String {
            self.0.to_lowercase()
        }

        fn is_well_formed(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let err = CandidatePool::<Tag>::new(Vec::new()).unwrap_err();
        assert_eq!(err, PoolError::Empty { kind: "tag" });
    }

    #[test]
    fn test_all_malformed_is_rejected() {
        let err = CandidatePool::new(vec![Tag(""), Tag("")]).unwrap_err();
        assert_eq!(err, PoolError::NoValidItems { kind: "tag", rejected: 2 });
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let pool = CandidatePool::new(vec![Tag("One"), Tag("two"), Tag("ONE"), Tag("")]).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.identities(), &["one".to_string(), "two".to_string()]);
        assert_eq!(pool.get(0).map(|t| t.0), Some("One"));
    }

    #[test]
    fn test_find_by_identity_normalizes() {
        let pool = CandidatePool::new(vec![Tag("Alpha")]).unwrap();
        assert!(pool.find_by_identity("  ALPHA ").is_some());
        assert!(pool.find_by_identity("beta").is_none());
    }
}
