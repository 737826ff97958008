//! Constant-product pricing backend (two tokens, `x · y = k`).

use primitive_types::U256;

use crate::domain::{Rounding, SwapComputeRequest, SwapKind};
use crate::error::{Result, VaultError};
use crate::math::fixed_point;
use crate::traits::PoolBackend;

/// A two-token constant-product curve.
///
/// # Swap algorithm (exact-in, token A → token B)
///
/// ```text
/// amount_out = reserve_b × amount_in / (reserve_a + amount_in)
/// ```
///
/// and the exact-out inverse, rounded up:
///
/// ```text
/// amount_in = reserve_a × amount_out / (reserve_b − amount_out)
/// ```
///
/// The invariant is the geometric mean `√(x · y)`, which keeps share
/// math linear in balance growth: doubling both balances doubles the
/// invariant. Fees are the vault engine's concern, never deducted here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantProductPool;

impl ConstantProductPool {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Integer square root of a 256-bit value via Newton's method.
    fn isqrt(n: U256) -> U256 {
        if n.is_zero() {
            return U256::zero();
        }
        let mut x = n;
        let mut y = (x + U256::one()) >> 1;
        while y < x {
            x = y;
            y = (x + n / x) >> 1;
        }
        x
    }

    fn require_two_tokens(balances: &[u128]) -> Result<()> {
        if balances.len() != 2 {
            return Err(VaultError::InvalidTokenCount(balances.len()));
        }
        Ok(())
    }
}

impl PoolBackend for ConstantProductPool {
    fn on_swap(&self, request: &SwapComputeRequest<'_>) -> Result<u128> {
        Self::require_two_tokens(request.balances_scaled18)?;
        let reserve_in = request.balances_scaled18[request.index_in];
        let reserve_out = request.balances_scaled18[request.index_out];
        if reserve_in == 0 || reserve_out == 0 {
            return Err(VaultError::DivisionByZero("constant-product reserves"));
        }

        match request.kind {
            SwapKind::ExactIn => {
                let amount_in = request.amount_given_scaled18;
                let denominator = reserve_in
                    .checked_add(amount_in)
                    .ok_or(VaultError::Overflow("constant-product denominator"))?;
                // output rounds down, in the pool's favor
                fixed_point::mul_div(reserve_out, amount_in, denominator, Rounding::Down)
            }
            SwapKind::ExactOut => {
                let amount_out = request.amount_given_scaled18;
                let denominator = reserve_out
                    .checked_sub(amount_out)
                    .ok_or(VaultError::Underflow("constant-product output exceeds reserve"))?;
                if denominator == 0 {
                    return Err(VaultError::DivisionByZero("constant-product reserves"));
                }
                // required input rounds up, in the pool's favor
                fixed_point::mul_div(reserve_in, amount_out, denominator, Rounding::Up)
            }
        }
    }

    fn compute_invariant(&self, balances_scaled18: &[u128], rounding: Rounding) -> Result<u128> {
        Self::require_two_tokens(balances_scaled18)?;
        let product = U256::from(balances_scaled18[0]) * U256::from(balances_scaled18[1]);
        let mut root = Self::isqrt(product);
        if rounding.is_up() && root * root < product {
            root += U256::one();
        }
        if root.bits() > 128 {
            return Err(VaultError::Overflow("constant-product invariant"));
        }
        Ok(root.low_u128())
    }

    fn compute_balance(
        &self,
        balances_scaled18: &[u128],
        token_index: usize,
        invariant_ratio: u128,
    ) -> Result<u128> {
        Self::require_two_tokens(balances_scaled18)?;
        // Scaling the invariant √(x·y) by r with y fixed requires
        // x' = r² · x.
        let scaled_once = fixed_point::mul_wad(
            balances_scaled18[token_index],
            invariant_ratio,
            Rounding::Up,
        )?;
        fixed_point::mul_wad(scaled_once, invariant_ratio, Rounding::Up)
    }
}
