//! Chain-agnostic token address.

use core::fmt;

/// A generic, chain-agnostic address identifying a token.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// considered valid addresses, so construction is infallible. The vault
/// keys its delta ledger, reserve cache, and protocol-fee accrual by this
/// type.
///
/// # Examples
///
/// ```
/// use basin::domain::TokenAddress;
///
/// let addr = TokenAddress::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenAddress([u8; 32]);

impl TokenAddress {
    /// Creates a `TokenAddress` from raw bytes.
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

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_short_hex(f, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        let addr = TokenAddress::from_bytes(bytes);
        assert_eq!(addr.as_bytes(), bytes);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let lo = TokenAddress::from_bytes([0u8; 32]);
        let hi = TokenAddress::from_bytes([1u8; 32]);
        assert!(lo < hi);
    }

    #[test]
    fn display_is_short_hex() {
        let addr = TokenAddress::from_bytes([0xabu8; 32]);
        assert_eq!(format!("{addr}"), "abababab…");
    }
}
