use std::fmt;
use std::str::FromStr;

use crate::{Result, VerifyError};

pub const SHA256_LEN: usize = 32;

/// SHA-256 of an object's content.
///
/// Displays as lowercase hex. Parsing accepts either case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha256Digest([u8; SHA256_LEN]);

impl Sha256Digest {
    pub const fn from_bytes(bytes: [u8; SHA256_LEN]) -> Self { Self(bytes) }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SHA256_LEN] = bytes.try_into().map_err(|_| VerifyError::InvalidLength {
            expected: SHA256_LEN,
            actual:   bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self> { s.parse() }

    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] { &self.0 }

    pub fn to_hex(&self) -> String { hex::encode(self.0) }

    pub fn to_hex_upper(&self) -> String { hex::encode_upper(self.0) }
}

impl FromStr for Sha256Digest {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| VerifyError::InvalidHex(s.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sha256Digest").field(&self.to_hex()).finish()
    }
}

impl AsRef<[u8]> for Sha256Digest {
    fn as_ref(&self) -> &[u8] { &self.0 }
}
