//! Pool hook trait: before/after callbacks around vault operations.

use crate::domain::{Account, PoolId, SwapKind, TokenAddress};
use crate::vault::Vault;

/// Parameters of a before-swap hook call.
///
/// Amounts and balances are in common precision, as of the snapshot
/// taken before the hook runs. Because the hook may re-enter the vault
/// and move balances, the engine discards this snapshot and re-derives
/// everything after the hook returns.
#[derive(Debug, Clone, Copy)]
pub struct BeforeSwapHookParams<'a> {
    /// Pool being swapped against.
    pub pool: PoolId,
    /// Which side of the swap is fixed.
    pub kind: SwapKind,
    /// Token supplied by the caller.
    pub token_in: TokenAddress,
    /// Token received by the caller.
    pub token_out: TokenAddress,
    /// The fixed amount, scaled to common precision.
    pub amount_given_scaled18: u128,
    /// Live pool balances at snapshot time.
    pub balances_scaled18: &'a [u128],
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Parameters of an after-swap hook call, with the final settled
/// amounts.
#[derive(Debug, Clone, Copy)]
pub struct AfterSwapHookParams<'a> {
    /// Pool that was swapped against.
    pub pool: PoolId,
    /// Which side of the swap was fixed.
    pub kind: SwapKind,
    /// Token supplied by the caller.
    pub token_in: TokenAddress,
    /// Token received by the caller.
    pub token_out: TokenAddress,
    /// Settled input amount, common precision.
    pub amount_in_scaled18: u128,
    /// Settled output amount, common precision.
    pub amount_out_scaled18: u128,
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Parameters of a before-add/remove-liquidity hook call.
#[derive(Debug, Clone, Copy)]
pub struct BeforeLiquidityHookParams<'a> {
    /// Pool being modified.
    pub pool: PoolId,
    /// Party whose shares are minted or burned.
    pub party: Account,
    /// Caller's per-token bounds, raw precision.
    pub bounds_raw: &'a [u128],
    /// Caller's share bound (min for add, max for remove).
    pub bpt_bound: u128,
    /// Live pool balances at snapshot time, common precision.
    pub balances_scaled18: &'a [u128],
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Parameters of an after-add/remove-liquidity hook call, with the
/// final settled amounts.
#[derive(Debug, Clone, Copy)]
pub struct AfterLiquidityHookParams<'a> {
    /// Pool that was modified.
    pub pool: PoolId,
    /// Party whose shares were minted or burned.
    pub party: Account,
    /// Settled per-token amounts, raw precision.
    pub amounts_raw: &'a [u128],
    /// Settled share amount.
    pub bpt: u128,
    /// Opaque bytes from the caller.
    pub user_data: &'a [u8],
}

/// Before/after callbacks a pool may attach to vault operations.
///
/// Each callback returns `true` to let the operation proceed; `false`
/// aborts it with the corresponding hook-failure error. Hooks receive
/// `&mut Vault` and are free to re-enter it — settle, swap against other
/// pools, even nest another locked context. The one thing a hook cannot
/// do is re-enter the balance-mutation path of the operation it is
/// wrapping; that path is guarded separately.
///
/// Which callbacks actually run is data-driven: the pool's
/// [`HookFlags`](crate::pool::HookFlags) select them individually, and a
/// disabled flag skips the call entirely. Every method defaults to
/// `true`, so implementations override only what they observe.
pub trait PoolHooks {
    /// Called before the swap engine re-derives balances and prices.
    fn on_before_swap(&self, vault: &mut Vault, params: &BeforeSwapHookParams<'_>) -> bool {
        let _ = (vault, params);
        true
    }

    /// Called after swap settlement, before the call returns.
    fn on_after_swap(&self, vault: &mut Vault, params: &AfterSwapHookParams<'_>) -> bool {
        let _ = (vault, params);
        true
    }

    /// Called before add-liquidity computation.
    fn on_before_add_liquidity(
        &self,
        vault: &mut Vault,
        params: &BeforeLiquidityHookParams<'_>,
    ) -> bool {
        let _ = (vault, params);
        true
    }

    /// Called after add-liquidity settlement.
    fn on_after_add_liquidity(
        &self,
        vault: &mut Vault,
        params: &AfterLiquidityHookParams<'_>,
    ) -> bool {
        let _ = (vault, params);
        true
    }

    /// Called before remove-liquidity computation.
    fn on_before_remove_liquidity(
        &self,
        vault: &mut Vault,
        params: &BeforeLiquidityHookParams<'_>,
    ) -> bool {
        let _ = (vault, params);
        true
    }

    /// Called after remove-liquidity settlement.
    fn on_after_remove_liquidity(
        &self,
        vault: &mut Vault,
        params: &AfterLiquidityHookParams<'_>,
    ) -> bool {
        let _ = (vault, params);
        true
    }
}
