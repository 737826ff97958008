//! Pool identity.

use core::fmt;

/// The registry key of a pool.
///
/// Opaque 32 bytes; the vault never interprets the contents. A pool id is
/// bound to its token list, configuration, and pricing backend at
/// registration and keeps them for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// Creates a `PoolId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_short_hex(f, &self.0)
    }
}
