//! Token decimal places.

use crate::error::{Result, VaultError};

/// Maximum allowed decimal places; also the common precision the vault
/// scales every balance to.
const MAX_DECIMALS: u8 = 18;

/// The number of decimal places of a token's native precision.
///
/// Valid range is `0..=18`. Construction is validated: values above 18
/// are rejected, because the scaling pipeline normalizes everything *up*
/// to 18 decimals and has no representation for finer precisions.
///
/// # Examples
///
/// ```
/// use basin::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.get(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::MAX
    }
}

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// The common 18-decimal precision.
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidDecimals`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self> {
        if value > MAX_DECIMALS {
            return Err(VaultError::InvalidDecimals("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Converts a human-readable amount to the smallest raw unit.
    ///
    /// For example, with `decimals = 6`, an input of `1` yields
    /// `1_000_000`. Cannot overflow: `u64::MAX * 10^18 < u128::MAX`.
    #[must_use]
    pub const fn scale_up(&self, amount: u64) -> u128 {
        (amount as u128) * 10u128.pow(self.0 as u32)
    }

    /// Returns `10^(18 - decimals)`, the factor that lifts a raw amount
    /// of this precision to the common 18-decimal precision.
    #[must_use]
    pub const fn scaling_factor(&self) -> u128 {
        10u128.pow((MAX_DECIMALS - self.0) as u32)
    }
}
