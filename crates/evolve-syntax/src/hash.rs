//! Content digests
//!
//! Provides [`ContentHash`], a 32-byte blake3 digest used to fingerprint
//! trees and plans. Two plans are byte-identical exactly when their digests
//! match.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Compute hash from serializable value (JSON encoding)
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn compute_serializable<T>(value: &T) -> Result<Self, HashError>
    where
        T: serde::Serialize,
    {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// First eight bytes as a little-endian integer
    ///
    /// Used to derive independent random sub-streams.
    #[inline]
    #[must_use]
    pub fn prefix_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Errors for hash operations
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_compute_deterministic() {
        let a = ContentHash::compute(b"hello world");
        let b = ContentHash::compute(b"hello world");
        assert_eq!(a, b);
        assert_ne!(a, ContentHash::compute(b"hello worlds"));
    }

    #[test]
    fn hash_displays_as_hex() {
        let hash = ContentHash::compute(b"plan");
        assert_eq!(hash.to_string(), hex::encode(hash.as_bytes()));
        assert!(hash.to_string().starts_with(&hash.short()));
        assert_eq!(hash.short().len(), 16);
    }

    #[test]
    fn hash_serializable_matches_json_bytes() {
        let value = vec![1u32, 2, 3];
        let hash = ContentHash::compute_serializable(&value).unwrap();
        assert_eq!(hash, ContentHash::compute(b"[1,2,3]"));
    }
}
