//! Overflow-safe multiply-divide with explicit rounding.
//!
//! Balances scaled to 18 decimals routinely exceed `2^64`, so a product
//! of two of them does not fit `u128`. Every multiply-then-divide in the
//! crate goes through [`mul_div`], which widens to 256 bits for the
//! intermediate product and only then checks that the quotient fits.

use primitive_types::U256;

use crate::domain::Rounding;
use crate::error::{Result, VaultError};

/// One unit in the common 18-decimal fixed-point representation.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Computes `a * b / denominator` with an explicit rounding direction.
///
/// The product is taken at 256-bit width, so the only overflow condition
/// is the final quotient not fitting `u128`.
///
/// # Errors
///
/// - [`VaultError::DivisionByZero`] if `denominator` is zero.
/// - [`VaultError::Overflow`] if the quotient exceeds `u128::MAX`.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    if denominator == 0 {
        return Err(VaultError::DivisionByZero("mul_div"));
    }
    let product = U256::from(a) * U256::from(b);
    let denom = U256::from(denominator);
    let mut quotient = product / denom;
    if rounding.is_up() && !(product % denom).is_zero() {
        quotient += U256::one();
    }
    if quotient.bits() > 128 {
        return Err(VaultError::Overflow("mul_div"));
    }
    Ok(quotient.low_u128())
}

/// Computes `a * b / WAD`: multiplication of two 18-decimal fixed-point
/// values.
pub fn mul_wad(a: u128, b: u128, rounding: Rounding) -> Result<u128> {
    mul_div(a, b, WAD, rounding)
}

/// Computes `a * WAD / b`: division of two 18-decimal fixed-point
/// values.
pub fn div_wad(a: u128, b: u128, rounding: Rounding) -> Result<u128> {
    mul_div(a, WAD, b, rounding)
}

/// Plain integer division with an explicit rounding direction.
pub fn div_rounded(a: u128, b: u128, rounding: Rounding) -> Result<u128> {
    mul_div(a, 1, b, rounding)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn exact_division_ignores_rounding() {
        let Ok(down) = mul_div(100, 10, 4, Rounding::Down) else {
            panic!("expected Ok");
        };
        let Ok(up) = mul_div(100, 10, 4, Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(down, 250);
        assert_eq!(up, 250);
    }

    #[test]
    fn remainder_rounds_by_direction() {
        let Ok(down) = mul_div(10, 1, 3, Rounding::Down) else {
            panic!("expected Ok");
        };
        let Ok(up) = mul_div(10, 1, 3, Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(down, 3);
        assert_eq!(up, 4);
    }

    #[test]
    fn wide_intermediate_product() {
        // (2^127) * 4 / 8 = 2^126: the product needs 129 bits.
        let a = 1u128 << 127;
        let Ok(q) = mul_div(a, 4, 8, Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(q, 1u128 << 126);
    }

    #[test]
    fn quotient_overflow_detected() {
        let Err(e) = mul_div(u128::MAX, 2, 1, Rounding::Down) else {
            panic!("expected Err");
        };
        assert_eq!(e, VaultError::Overflow("mul_div"));
    }

    #[test]
    fn division_by_zero_detected() {
        let Err(e) = mul_div(1, 1, 0, Rounding::Down) else {
            panic!("expected Err");
        };
        assert_eq!(e, VaultError::DivisionByZero("mul_div"));
    }

    #[test]
    fn max_value_round_trips() {
        let Ok(q) = mul_div(u128::MAX, 1, 1, Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(q, u128::MAX);
    }

    #[test]
    fn wad_helpers_agree_with_mul_div() {
        let Ok(m) = mul_wad(3 * WAD, 2 * WAD, Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(m, 6 * WAD);
        let Ok(d) = div_wad(6 * WAD, 2 * WAD, Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(d, 3 * WAD);
    }

    #[test]
    fn div_rounded_directions() {
        let Ok(down) = div_rounded(7, 2, Rounding::Down) else {
            panic!("expected Ok");
        };
        let Ok(up) = div_rounded(7, 2, Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(down, 3);
        assert_eq!(up, 4);
    }
}
