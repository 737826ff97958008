//! Basis-point representation for fee percentages.

use core::fmt;

use super::Rounding;
use crate::error::{Result, VaultError};
use crate::math::fixed_point;

/// Maximum value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for the static and dynamic swap fee of a pool and for the
/// protocol's cut of collected fees. Swap fees must be strictly below
/// 100% so that the exact-out fee uplift `amount / (1 − fee)` is
/// defined; [`is_valid_swap_fee`](Self::is_valid_swap_fee) checks that.
///
/// # Examples
///
/// ```
/// use basin::domain::{BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(100); // 1%
/// assert_eq!(fee.apply(10_000, Rounding::Down).expect("fits"), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is in the valid percentage range
    /// (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `true` if the value can be used as a swap fee, i.e. is
    /// strictly below 100%.
    #[must_use]
    pub const fn is_valid_swap_fee(&self) -> bool {
        self.0 < MAX_BPS
    }

    /// Computes `amount * (self / 10_000)` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if the result does not fit `u128`.
    pub fn apply(&self, amount: u128, rounding: Rounding) -> Result<u128> {
        fixed_point::mul_div(amount, self.0 as u128, MAX_BPS as u128, rounding)
    }

    /// Computes `amount * 10_000 / (10_000 − self)` with explicit
    /// rounding: the gross amount a pricing function must see so that
    /// after this fee is taken, `amount` remains.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::DivisionByZero`] if the fee is 100% or
    /// more, and [`VaultError::Overflow`] if the result does not fit
    /// `u128`.
    pub fn gross_up(&self, amount: u128, rounding: Rounding) -> Result<u128> {
        if self.0 >= MAX_BPS {
            return Err(VaultError::DivisionByZero("fee gross-up"));
        }
        fixed_point::mul_div(
            amount,
            MAX_BPS as u128,
            (MAX_BPS - self.0) as u128,
            rounding,
        )
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
