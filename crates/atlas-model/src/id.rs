use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Content-addressed identifier for any revision object.
///
/// A `ContentId` is the 160-bit hash of an object's canonical encoding,
/// packed into three integer fields so that storing, comparing, and hashing
/// ids never touches a byte array. Identical content always produces the
/// same `ContentId`, making objects deduplicatable and verifiable.
///
/// The first field `h1` is itself a uniformly distributed hash and is used
/// directly as the in-memory hash code; full equality compares all three
/// fields. The all-zero id is the null sentinel ("no object"): empty trees,
/// absent parents, absent metadata.
///
/// Canonical hashing lives with the serializer, outside this crate. Callers
/// supply genuine hashes; no validation beyond the fixed width is done here.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentId {
    h1: u32,
    h2: u64,
    h3: u64,
}

impl ContentId {
    /// The null id (all zeros). Represents "no object".
    pub const NULL: ContentId = ContentId { h1: 0, h2: 0, h3: 0 };

    /// Create an id from its three packed hash fields.
    pub const fn new(h1: u32, h2: u64, h3: u64) -> Self {
        Self { h1, h2, h3 }
    }

    /// Create an id from its 20-byte big-endian representation.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        let mut b4 = [0u8; 4];
        let mut b8 = [0u8; 8];
        b4.copy_from_slice(&bytes[..4]);
        let h1 = u32::from_be_bytes(b4);
        b8.copy_from_slice(&bytes[4..12]);
        let h2 = u64::from_be_bytes(b8);
        b8.copy_from_slice(&bytes[12..20]);
        let h3 = u64::from_be_bytes(b8);
        Self { h1, h2, h3 }
    }

    /// Hash raw bytes into an id (BLAKE3 truncated to 160 bits).
    ///
    /// Convenience for callers that need a genuine content hash; the
    /// canonical object encoding is a serializer concern.
    pub fn hash_of(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[..20]);
        Self::from_bytes(bytes)
    }

    /// Returns `true` if this is the null id.
    pub fn is_null(&self) -> bool {
        self.h1 == 0 && self.h2 == 0 && self.h3 == 0
    }

    /// The first packed field, a valid standalone hash code.
    pub fn h1(&self) -> u32 {
        self.h1
    }

    /// The second packed field.
    pub fn h2(&self) -> u64 {
        self.h2
    }

    /// The third packed field.
    pub fn h3(&self) -> u64 {
        self.h3
    }

    /// The 20-byte big-endian representation.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&self.h1.to_be_bytes());
        bytes[4..12].copy_from_slice(&self.h2.to_be_bytes());
        bytes[12..20].copy_from_slice(&self.h3.to_be_bytes());
        bytes
    }

    /// Hex-encoded string representation (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.to_bytes()[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, ModelError> {
        let bytes = hex::decode(s).map_err(|e| ModelError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(ModelError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self::from_bytes(arr))
    }
}

impl Hash for ContentId {
    // `h1` alone is uniformly distributed; equal ids always share it.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.h1);
    }
}

impl PartialOrd for ContentId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContentId {
    // Matches lexicographic order of the big-endian byte representation.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.h1, self.h2, self.h3).cmp(&(other.h1, other.h2, other.h3))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short_hex())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
