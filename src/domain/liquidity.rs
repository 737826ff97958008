//! Liquidity request and result types.

use super::{Account, PoolId};

/// The strategy used to compute an add-liquidity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddLiquidityKind {
    /// The caller fixes the share amount (`min_bpt_out`); token amounts
    /// are the proportional deposit for that many shares.
    Proportional,
    /// The caller supplies exact per-token amounts; the pool math
    /// computes the shares minted, charging swap fees on the
    /// non-proportional excess.
    Unbalanced,
    /// The caller fixes the share amount and names one token (the
    /// single nonzero entry of `max_amounts_in_raw`); the pool solves
    /// for that token's required amount.
    SingleTokenExactOut,
    /// Both amounts and shares are delegated to the pool's custom
    /// callback. Requires the pool's custom-add capability flag.
    Custom,
}

/// The strategy used to compute a remove-liquidity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemoveLiquidityKind {
    /// The caller fixes the share amount (`max_bpt_in`); token amounts
    /// are the proportional withdrawal for that many shares.
    Proportional,
    /// The caller fixes the share amount and names one token (the
    /// single nonzero entry of `min_amounts_out_raw`); the pool solves
    /// for that token's withdrawal amount.
    SingleTokenExactIn,
    /// The caller fixes one token's exact withdrawal amount; the pool
    /// solves for the shares burned.
    SingleTokenExactOut,
    /// Both amounts and shares are delegated to the pool's custom
    /// callback. Requires the pool's custom-remove capability flag.
    Custom,
}

/// Caller-supplied parameters of an add-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddLiquidityParams {
    /// Pool to deposit into.
    pub pool: PoolId,
    /// Recipient of the minted shares.
    pub to: Account,
    /// Per-token maximum deposits, raw precision, pool token order.
    /// For [`AddLiquidityKind::Unbalanced`] these are the exact
    /// deposits.
    pub max_amounts_in_raw: Vec<u128>,
    /// Minimum shares to mint. For [`AddLiquidityKind::Proportional`]
    /// and [`AddLiquidityKind::SingleTokenExactOut`] this is the exact
    /// share amount.
    pub min_bpt_out: u128,
    /// Computation strategy.
    pub kind: AddLiquidityKind,
    /// Opaque bytes forwarded to the pool's callbacks and hooks.
    pub user_data: Vec<u8>,
}

/// Final amounts of a completed add-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddLiquidityOutcome {
    /// Raw per-token amounts debited to the caller.
    pub amounts_in_raw: Vec<u128>,
    /// Shares minted to `to`.
    pub bpt_out: u128,
    /// Opaque bytes returned by a custom callback, empty otherwise.
    pub return_data: Vec<u8>,
}

/// Caller-supplied parameters of a remove-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveLiquidityParams {
    /// Pool to withdraw from.
    pub pool: PoolId,
    /// Holder whose shares are burned. If this is not the current
    /// locker, the locker spends the holder's share allowance.
    pub from: Account,
    /// Per-token minimum withdrawals, raw precision, pool token order.
    /// For [`RemoveLiquidityKind::SingleTokenExactOut`] the single
    /// nonzero entry is the exact withdrawal.
    pub min_amounts_out_raw: Vec<u128>,
    /// Maximum shares to burn. For [`RemoveLiquidityKind::Proportional`]
    /// and [`RemoveLiquidityKind::SingleTokenExactIn`] this is the
    /// exact share amount.
    pub max_bpt_in: u128,
    /// Computation strategy.
    pub kind: RemoveLiquidityKind,
    /// Opaque bytes forwarded to the pool's callbacks and hooks.
    pub user_data: Vec<u8>,
}

/// Final amounts of a completed remove-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveLiquidityOutcome {
    /// Shares burned from `from`.
    pub bpt_in: u128,
    /// Raw per-token amounts credited to the caller.
    pub amounts_out_raw: Vec<u128>,
    /// Opaque bytes returned by a custom callback, empty otherwise.
    pub return_data: Vec<u8>,
}
