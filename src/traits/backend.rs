//! Pricing backend trait: the curve-specific math of a pool.

use crate::domain::{BasisPoints, Rounding, SwapComputeRequest};
use crate::error::{Result, VaultError};

/// Parameters handed to a pool's custom add-liquidity callback.
///
/// All amounts are in common 18-decimal, rate-adjusted precision.
#[derive(Debug, Clone, Copy)]
pub struct CustomAddLiquidityParams<'a> {
    /// Live pool balances.
    pub balances_scaled18: &'a [u128],
    /// Caller's per-token maximums.
    pub max_amounts_in_scaled18: &'a [u128],
    /// Caller's minimum share amount.
    pub min_bpt_out: u128,
    /// Current share supply.
    pub total_supply: u128,
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Parameters handed to a pool's custom remove-liquidity callback.
#[derive(Debug, Clone, Copy)]
pub struct CustomRemoveLiquidityParams<'a> {
    /// Live pool balances.
    pub balances_scaled18: &'a [u128],
    /// Caller's per-token minimums.
    pub min_amounts_out_scaled18: &'a [u128],
    /// Caller's maximum share amount.
    pub max_bpt_in: u128,
    /// Current share supply.
    pub total_supply: u128,
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Result of a custom liquidity callback.
///
/// `amounts_scaled18` are deposits for an add and withdrawals for a
/// remove; `bpt` is minted shares for an add and burned shares for a
/// remove. `swap_fees_scaled18` feed the protocol fee accountant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLiquidityResult {
    /// Per-token amounts, pool token order.
    pub amounts_scaled18: Vec<u128>,
    /// Share amount minted or burned.
    pub bpt: u128,
    /// Per-token swap fee amounts charged by the pool.
    pub swap_fees_scaled18: Vec<u128>,
    /// Opaque bytes returned to the caller.
    pub return_data: Vec<u8>,
}

/// The pricing and invariant math of one pool.
///
/// The vault owns all accounting; the backend owns the curve. Backends
/// receive balances in common precision and must never mutate vault
/// state — a backend that needs its own state uses interior mutability.
///
/// # Contract
///
/// - [`on_swap`](Self::on_swap) returns the calculated side of the swap:
///   the output amount for exact-in, the required input for exact-out.
/// - [`compute_invariant`](Self::compute_invariant) must be monotonically
///   non-decreasing in every balance.
/// - [`compute_balance`](Self::compute_balance) solves for the one
///   balance that scales the invariant by `invariant_ratio` (WAD-scaled)
///   with all other balances fixed.
pub trait PoolBackend {
    /// Computes the calculated amount of a swap, in common precision.
    ///
    /// # Errors
    ///
    /// Implementations return an error for amounts their curve cannot
    /// satisfy (for example an exact-out request of the entire balance).
    fn on_swap(&self, request: &SwapComputeRequest<'_>) -> Result<u128>;

    /// Computes the pool invariant for the given balances.
    fn compute_invariant(&self, balances_scaled18: &[u128], rounding: Rounding) -> Result<u128>;

    /// Solves for the balance of `token_index` that multiplies the
    /// invariant by `invariant_ratio`, all other balances unchanged.
    fn compute_balance(
        &self,
        balances_scaled18: &[u128],
        token_index: usize,
        invariant_ratio: u128,
    ) -> Result<u128>;

    /// Optional dynamic swap-fee override.
    ///
    /// Returning `None` keeps the pool's static fee. The default
    /// implementation always returns `None`.
    fn dynamic_swap_fee(
        &self,
        request: &SwapComputeRequest<'_>,
        static_fee: BasisPoints,
    ) -> Option<BasisPoints> {
        let _ = (request, static_fee);
        None
    }

    /// Custom add-liquidity computation.
    ///
    /// Only invoked for
    /// [`AddLiquidityKind::Custom`](crate::domain::AddLiquidityKind::Custom)
    /// on pools that declare the capability. The default implementation
    /// rejects the call.
    fn on_add_liquidity_custom(
        &self,
        params: &CustomAddLiquidityParams<'_>,
    ) -> Result<CustomLiquidityResult> {
        let _ = params;
        Err(VaultError::UnsupportedOperation("custom add liquidity"))
    }

    /// Custom remove-liquidity computation.
    ///
    /// Only invoked for
    /// [`RemoveLiquidityKind::Custom`](crate::domain::RemoveLiquidityKind::Custom)
    /// on pools that declare the capability. The default implementation
    /// rejects the call.
    fn on_remove_liquidity_custom(
        &self,
        params: &CustomRemoveLiquidityParams<'_>,
    ) -> Result<CustomLiquidityResult> {
        let _ = params;
        Err(VaultError::UnsupportedOperation("custom remove liquidity"))
    }
}
