//! Party identity.

use core::fmt;

/// The identity of a party interacting with the vault: a router, a
/// liquidity provider, a hook, or the vault itself.
///
/// Like [`TokenAddress`](super::TokenAddress), this wraps an opaque
/// 32-byte identity and is infallible to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account([u8; 32]);

impl Account {
    /// Creates an `Account` from raw bytes.
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

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_short_hex(f, &self.0)
    }
}
