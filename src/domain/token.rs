//! Token identity type.

use super::{Decimals, TokenAddress};

/// The canonical identity of a token: a [`TokenAddress`] combined with
/// its native [`Decimals`].
///
/// Two tokens are considered equal only if both address and decimals
/// match.
///
/// # Examples
///
/// ```
/// use basin::domain::{Decimals, Token, TokenAddress};
///
/// let addr = TokenAddress::from_bytes([1u8; 32]);
/// let dec  = Decimals::new(6).expect("valid");
/// let tok  = Token::new(addr, dec);
///
/// assert_eq!(tok.address(), addr);
/// assert_eq!(tok.decimals(), dec);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    address: TokenAddress,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    ///
    /// Construction is infallible because both components are already
    /// validated at their own construction site.
    #[must_use]
    pub const fn new(address: TokenAddress, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> TokenAddress {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Converts a human-readable amount to this token's smallest raw
    /// unit. For example, `1` of a 6-decimal token becomes `1_000_000`.
    #[must_use]
    pub const fn to_raw_amount(&self, human: u64) -> u128 {
        self.decimals.scale_up(human)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample_token(addr_byte: u8, dec: u8) -> Token {
        let Ok(d) = Decimals::new(dec) else {
            panic!("invalid decimals in test: {dec}");
        };
        Token::new(TokenAddress::from_bytes([addr_byte; 32]), d)
    }

    #[test]
    fn accessors() {
        let tok = sample_token(1, 6);
        assert_eq!(tok.address(), TokenAddress::from_bytes([1u8; 32]));
        assert_eq!(tok.decimals().get(), 6);
    }

    #[test]
    fn to_raw_amount_six_decimals() {
        let tok = sample_token(1, 6);
        assert_eq!(tok.to_raw_amount(5), 5_000_000);
    }

    #[test]
    fn equality_requires_both_fields() {
        assert_ne!(sample_token(1, 6), sample_token(1, 8));
        assert_eq!(sample_token(1, 6), sample_token(1, 6));
    }
}
