//! Request Deduplicator: rejects a generation call while an identical one
//! (same job description, résumé and section) is still in flight.
//!
//! In-memory and single-process. Different keys never wait on each other and
//! a rejected call is not queued. Keys are content-derived, so two users with
//! identical inputs share a key.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::generation::section::SectionId;

/// Deterministic key for one (job description, résumé, section) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InFlightKey(String);

impl InFlightKey {
    pub fn derive(job_description: &str, resume_text: &str, section: SectionId) -> Self {
        let mut hasher = Sha256::new();
        // Length prefixes keep ("ab", "c") and ("a", "bc") apart.
        for field in [job_description, resume_text, section.label()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        InFlightKey(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared set of in-flight keys. Cloning shares the same set.
#[derive(Debug, Clone, Default)]
pub struct RequestDeduplicator {
    in_flight: Arc<Mutex<HashSet<InFlightKey>>>,
}

impl RequestDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self) -> MutexGuard<'_, HashSet<InFlightKey>> {
        // No code path panics while holding the lock; recover the set if one ever does.
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Atomically claims `key`. Returns `false` if it is already held.
    pub fn try_acquire(&self, key: &InFlightKey) -> bool {
        let acquired = self.set().insert(key.clone());
        debug!(key = key.as_str(), acquired, "try_acquire");
        acquired
    }

    /// Releases a key claimed by `try_acquire`.
    pub fn release(&self, key: &InFlightKey) {
        self.set().remove(key);
        debug!(key = key.as_str(), "release");
    }

    /// Claims `key` for the lifetime of the returned guard.
    pub fn acquire(&self, key: InFlightKey) -> Option<InFlightGuard> {
        self.try_acquire(&key).then(|| InFlightGuard {
            dedup: self.clone(),
            key,
        })
    }

    pub fn len(&self) -> usize {
        self.set().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.set().is_empty()
    }
}

/// Releases its key when dropped, whichever way the holder exits.
#[derive(Debug)]
pub struct InFlightGuard {
    dedup: RequestDeduplicator,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.dedup.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    #[test]
    fn test_key_is_deterministic() {
        let a = InFlightKey::derive("jd", "cv", SectionId::OpenHook);
        let b = InFlightKey::derive("jd", "cv", SectionId::OpenHook);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_key_distinguishes_every_field() {
        let base = InFlightKey::derive("jd", "cv", SectionId::OpenHook);
        assert_ne!(base, InFlightKey::derive("jd2", "cv", SectionId::OpenHook));
        assert_ne!(base, InFlightKey::derive("jd", "cv2", SectionId::OpenHook));
        assert_ne!(base, InFlightKey::derive("jd", "cv", SectionId::KeyExperiences));
        assert_ne!(
            InFlightKey::derive("ab", "c", SectionId::OpenHook),
            InFlightKey::derive("a", "bc", SectionId::OpenHook)
        );
    }

    #[test]
    fn test_acquire_release_cycle() {
        let dedup = RequestDeduplicator::new();
        let key = InFlightKey::derive("jd", "cv", SectionId::OpenHook);

        assert!(dedup.try_acquire(&key));
        assert!(!dedup.try_acquire(&key));
        dedup.release(&key);
        assert!(dedup.try_acquire(&key));
    }

    #[test]
    fn test_different_keys_do_not_block_each_other() {
        let dedup = RequestDeduplicator::new();
        assert!(dedup.try_acquire(&InFlightKey::derive("jd", "cv", SectionId::OpenHook)));
        assert!(dedup.try_acquire(&InFlightKey::derive("jd", "cv", SectionId::PersonalValues)));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let dedup = RequestDeduplicator::new();
        let key = InFlightKey::derive("jd", "cv", SectionId::ClosingStatement);
        {
            let guard = dedup.acquire(key.clone());
            assert!(guard.is_some());
            assert!(dedup.acquire(key.clone()).is_none());
        }
        assert!(dedup.is_empty());
        assert!(dedup.acquire(key).is_some());
    }

    #[test]
    fn test_independent_instances_do_not_share_state() {
        let a = RequestDeduplicator::new();
        let b = RequestDeduplicator::new();
        let key = InFlightKey::derive("jd", "cv", SectionId::OpenHook);
        assert!(a.try_acquire(&key));
        assert!(b.try_acquire(&key));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_acquire_exactly_one_wins() {
        const TASKS: usize = 32;
        let dedup = RequestDeduplicator::new();
        let key = InFlightKey::derive("jd", "cv", SectionId::OpenHook);
        let barrier = Arc::new(Barrier::new(TASKS));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..TASKS)
            .map(|_| {
                let dedup = dedup.clone();
                let key = key.clone();
                let barrier = barrier.clone();
                let winners = winners.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    if dedup.try_acquire(&key) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        dedup.release(&key);
        assert!(dedup.try_acquire(&key));
    }
}
