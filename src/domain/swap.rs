//! Swap request and result types.

use super::{PoolId, TokenAddress};

/// Whether the caller fixes the input or the output side of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapKind {
    /// The caller fixes `amount_given_raw` as the exact input; the
    /// engine computes the output.
    ExactIn,
    /// The caller fixes `amount_given_raw` as the exact output; the
    /// engine computes the required input.
    ExactOut,
}

/// Caller-supplied parameters of a single swap.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapParams {
    /// Pool to swap against.
    pub pool: PoolId,
    /// Token supplied by the caller.
    pub token_in: TokenAddress,
    /// Token received by the caller.
    pub token_out: TokenAddress,
    /// Which side of the swap is fixed.
    pub kind: SwapKind,
    /// The fixed amount, in the fixed token's native precision.
    pub amount_given_raw: u128,
    /// Slippage bound: minimum output for [`SwapKind::ExactIn`],
    /// maximum input for [`SwapKind::ExactOut`], in raw precision.
    pub limit_raw: u128,
    /// Opaque bytes forwarded to the pool's pricing function and hooks.
    pub user_data: Vec<u8>,
}

/// Final raw amounts of a completed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapOutcome {
    /// The computed side: output for exact-in, input for exact-out.
    pub amount_calculated_raw: u128,
    /// Raw amount debited to the caller in `token_in`.
    pub amount_in_raw: u128,
    /// Raw amount credited to the caller in `token_out`.
    pub amount_out_raw: u128,
}

/// The request a pool's pricing function receives.
///
/// Amounts and balances are in common 18-decimal, rate-adjusted
/// precision. For exact-out swaps with a fee, `amount_given_scaled18`
/// already includes the fee uplift, so the pricing function solves for
/// the gross output the pool must part with.
#[derive(Debug, Clone, Copy)]
pub struct SwapComputeRequest<'a> {
    /// Which side of the swap is fixed.
    pub kind: SwapKind,
    /// The fixed amount, scaled to common precision.
    pub amount_given_scaled18: u128,
    /// Live pool balances, scaled to common precision.
    pub balances_scaled18: &'a [u128],
    /// Pool-local index of the input token.
    pub index_in: usize,
    /// Pool-local index of the output token.
    pub index_out: usize,
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}
