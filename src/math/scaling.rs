//! Conversions between raw and common 18-decimal precision.
//!
//! A raw amount is expressed in a token's native decimals. The scaling
//! pipeline lifts it to 18 decimals with the token's decimal scaling
//! factor (a power of ten, exact) and then applies the token's exchange
//! rate (a WAD-scaled fixed-point value, rounded). The inverse divides
//! out the rate and the factor, rounding at each step in the same
//! explicit direction.

use crate::domain::Rounding;
use crate::error::Result;
use crate::math::fixed_point::{self, WAD};

/// Converts a raw amount to common 18-decimal, rate-adjusted precision.
///
/// `scaled = raw * factor * rate / WAD`, with the rate application
/// rounded in `rounding`'s direction. The decimal lift itself is exact.
///
/// # Errors
///
/// Returns an arithmetic error if any step overflows `u128`.
pub fn to_scaled_18(raw: u128, factor: u128, rate: u128, rounding: Rounding) -> Result<u128> {
    let lifted = fixed_point::mul_div(raw, factor, 1, rounding)?;
    fixed_point::mul_wad(lifted, rate, rounding)
}

/// Converts a common-precision amount back to raw precision.
///
/// `raw = scaled * WAD / rate / factor`, rounding each division in
/// `rounding`'s direction.
///
/// # Errors
///
/// Returns an arithmetic error on overflow or a zero rate.
pub fn to_raw(scaled18: u128, factor: u128, rate: u128, rounding: Rounding) -> Result<u128> {
    let unrated = fixed_point::div_wad(scaled18, rate, rounding)?;
    fixed_point::div_rounded(unrated, factor, rounding)
}
