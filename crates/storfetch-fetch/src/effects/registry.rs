use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use storfetch_verify::Sha256Digest;

/// Digests currently being fetched by some worker.
///
/// Guarantees at most one concurrent transfer per digest. It is not a record
/// of completed work: an entry is removed as soon as its fetch ends, whether
/// it succeeded or not.
#[derive(Debug, Default)]
pub struct InFlight {
    digests: Mutex<HashSet<Sha256Digest>>,
}

impl InFlight {
    pub fn new() -> Self { Self::default() }

    /// Record `digest` and return true, or return false if it is already
    /// recorded. The check and insert happen under one lock.
    pub fn test_and_add(&self, digest: Sha256Digest) -> bool { self.lock().insert(digest) }

    pub fn remove(&self, digest: &Sha256Digest) { self.lock().remove(digest); }

    pub fn contains(&self, digest: &Sha256Digest) -> bool { self.lock().contains(digest) }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// [`test_and_add`](Self::test_and_add) whose entry is removed when the
    /// returned claim drops.
    pub fn claim(&self, digest: Sha256Digest) -> Option<Claim<'_>> {
        self.test_and_add(digest).then_some(Claim {
            registry: self,
            digest,
        })
    }

    // The set stays consistent even if a holder panicked: every critical
    // section is a single insert or remove.
    fn lock(&self) -> MutexGuard<'_, HashSet<Sha256Digest>> {
        self.digests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[must_use = "the digest is released as soon as the claim is dropped"]
#[derive(Debug)]
pub struct Claim<'a> {
    registry: &'a InFlight,
    digest:   Sha256Digest,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) { self.registry.remove(&self.digest); }
}
