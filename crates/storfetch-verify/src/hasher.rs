use sha2::Digest;

use crate::Sha256Digest;

/// Incremental hasher fed chunk by chunk as a body streams through.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    /// Finalize into a typed digest.
    pub fn finish(self) -> Sha256Digest { Sha256Digest::from_bytes(self.0.finalize().into()) }

    pub fn digest(data: &[u8]) -> Sha256Digest { Sha256Digest::from_bytes(sha2::Sha256::digest(data).into()) }
}
