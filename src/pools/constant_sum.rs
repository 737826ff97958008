//! Constant-sum pricing backend.

use crate::domain::{Rounding, SwapComputeRequest, SwapKind};
use crate::error::{Result, VaultError};
use crate::math::fixed_point;
use crate::traits::PoolBackend;

/// A constant-sum curve: one unit in, one unit out, any token count.
///
/// The invariant is the plain sum of balances, so every quantity the
/// vault derives from this backend is exact — which is why the test
/// suites price against it. Economically it models a basket of
/// hard-pegged assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSumPool;

impl ConstantSumPool {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PoolBackend for ConstantSumPool {
    fn on_swap(&self, request: &SwapComputeRequest<'_>) -> Result<u128> {
        // Identical both ways on a 1:1 curve: the calculated side
        // always equals the given side. The only constraint is that the
        // pool can part with the output.
        let amount = match request.kind {
            SwapKind::ExactIn => request.amount_given_scaled18,
            SwapKind::ExactOut => request.amount_given_scaled18,
        };
        let available = request.balances_scaled18[request.index_out];
        if amount > available {
            return Err(VaultError::Underflow("constant-sum output exceeds balance"));
        }
        Ok(amount)
    }

    fn compute_invariant(&self, balances_scaled18: &[u128], _rounding: Rounding) -> Result<u128> {
        balances_scaled18.iter().try_fold(0u128, |acc, &b| {
            acc.checked_add(b)
                .ok_or(VaultError::Overflow("constant-sum invariant"))
        })
    }

    fn compute_balance(
        &self,
        balances_scaled18: &[u128],
        token_index: usize,
        invariant_ratio: u128,
    ) -> Result<u128> {
        let sum = self.compute_invariant(balances_scaled18, Rounding::Down)?;
        let target = fixed_point::mul_wad(sum, invariant_ratio, Rounding::Up)?;
        let others = sum - balances_scaled18[token_index];
        target
            .checked_sub(others)
            .ok_or(VaultError::Underflow("constant-sum compute_balance"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::math::fixed_point::WAD;

    fn request(kind: SwapKind, amount: u128, balances: &[u128]) -> SwapComputeRequest<'_> {
        SwapComputeRequest {
            kind,
            amount_given_scaled18: amount,
            balances_scaled18: balances,
            index_in: 0,
            index_out: 1,
            user_data: &[],
        }
    }

    #[test]
    fn swaps_one_to_one() {
        let pool = ConstantSumPool::new();
        let balances = [1_000 * WAD, 1_000 * WAD];
        let Ok(out) = pool.on_swap(&request(SwapKind::ExactIn, 100 * WAD, &balances)) else {
            panic!("expected Ok");
        };
        assert_eq!(out, 100 * WAD);
        let Ok(input) = pool.on_swap(&request(SwapKind::ExactOut, 100 * WAD, &balances)) else {
            panic!("expected Ok");
        };
        assert_eq!(input, 100 * WAD);
    }

    #[test]
    fn cannot_drain_beyond_balance() {
        let pool = ConstantSumPool::new();
        let balances = [1_000 * WAD, 50 * WAD];
        let result = pool.on_swap(&request(SwapKind::ExactIn, 51 * WAD, &balances));
        assert!(result.is_err());
    }

    #[test]
    fn invariant_is_sum() {
        let pool = ConstantSumPool::new();
        let Ok(invariant) = pool.compute_invariant(&[WAD, 2 * WAD, 3 * WAD], Rounding::Down)
        else {
            panic!("expected Ok");
        };
        assert_eq!(invariant, 6 * WAD);
    }

    #[test]
    fn compute_balance_hits_target_ratio() {
        let pool = ConstantSumPool::new();
        let balances = [1_000 * WAD, 1_000 * WAD];
        // ratio 1.25 → target sum 2500 → new balance 1500
        let Ok(new_balance) = pool.compute_balance(&balances, 0, WAD + WAD / 4) else {
            panic!("expected Ok");
        };
        assert_eq!(new_balance, 1_500 * WAD);
    }
}
