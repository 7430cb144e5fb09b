//! Content digests and incremental hashing for content-addressed objects.
//!
//! Objects are named by the SHA-256 of their bytes. This crate provides the
//! [`Sha256Digest`] value type used as both lookup key and integrity check,
//! and a minimal [`Hasher`] trait for computing digests while data streams
//! through, so bytes are touched once for both hashing and writing.
//!
//! # Example
//!
//! ```
//! use storfetch_verify::{Hasher, Sha256Digest, Sha256Hasher};
//!
//! let expected: Sha256Digest =
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".parse().unwrap();
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//!
//! assert_eq!(hasher.finish(), expected);
//! ```

pub use self::digest::Sha256Digest;
pub use self::error::{Result, VerifyError};
pub use self::hasher::{Hasher, Sha256Hasher};

mod digest;
mod error;
mod hasher;
