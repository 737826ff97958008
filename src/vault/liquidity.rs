//! The liquidity engine: initialize, add, and remove.
//!
//! Shares the swap engine's shape — snapshot, optional before-hook with
//! mandatory re-snapshot, kind dispatch, one guarded settlement pass,
//! optional after-hook — with the snapshot rounding up for adds and
//! down for removes: the conservative direction depends on whether
//! higher apparent balances help or hurt the caller.
//!
//! Share minting and burning happen inside the same settlement pass as
//! the balance updates, never before pricing is finalized and never
//! deferred, because pricing for several kinds depends on the current
//! share supply.

use tracing::debug;

use super::Vault;
use crate::domain::{
    Account, AddLiquidityKind, AddLiquidityOutcome, AddLiquidityParams, PoolId,
    RemoveLiquidityKind, RemoveLiquidityOutcome, RemoveLiquidityParams, Rounding, TokenAddress,
};
use crate::error::{Result, VaultError};
use crate::events::VaultEvent;
use crate::math::pool_math;
use crate::pool::PoolSnapshot;
use crate::traits::{
    AfterLiquidityHookParams, BeforeLiquidityHookParams, CustomAddLiquidityParams,
    CustomRemoveLiquidityParams,
};

/// Index of the single nonzero entry, for the single-token kinds.
fn single_nonzero_index(amounts: &[u128]) -> Result<usize> {
    let mut found = None;
    for (i, &amount) in amounts.iter().enumerate() {
        if amount > 0 {
            if found.is_some() {
                return Err(VaultError::ExactlyOneNonzeroAmountRequired);
            }
            found = Some(i);
        }
    }
    found.ok_or(VaultError::ExactlyOneNonzeroAmountRequired)
}

fn to_signed_deltas(amounts: &[u128], negate: bool) -> Result<Vec<i128>> {
    amounts
        .iter()
        .map(|&a| {
            let signed = i128::try_from(a).map_err(|_| VaultError::AmountOverflow)?;
            Ok(if negate { -signed } else { signed })
        })
        .collect()
}

impl Vault {
    /// Seeds an empty pool: sets its starting balances, mints the first
    /// shares (the pool invariant over the scaled amounts), and debits
    /// the caller for the deposits. Returns the minted share amount.
    ///
    /// # Errors
    ///
    /// Fails on an already-initialized or paused pool, a length
    /// mismatch, or outside a locked context.
    pub fn initialize(&mut self, pool: PoolId, to: Account, amounts_raw: &[u128]) -> Result<u128> {
        self.require_locked()?;
        self.transactional(|vault| vault.initialize_inner(pool, to, amounts_raw))
    }

    fn initialize_inner(&mut self, pool: PoolId, to: Account, amounts_raw: &[u128]) -> Result<u128> {
        let (backend, _hooks, config, initialized) = self.pool_parts(pool)?;
        if config.paused {
            return Err(VaultError::PoolPaused(pool));
        }
        if initialized {
            return Err(VaultError::PoolAlreadyInitialized(pool));
        }

        let snapshot = self.snapshot_pool(pool, Rounding::Down)?;
        if amounts_raw.len() != snapshot.token_count() {
            return Err(VaultError::InputLengthMismatch {
                expected: snapshot.token_count(),
                actual: amounts_raw.len(),
            });
        }

        let mut amounts_scaled18 = Vec::with_capacity(amounts_raw.len());
        for (i, &raw) in amounts_raw.iter().enumerate() {
            amounts_scaled18.push(snapshot.to_scaled_18(i, raw, Rounding::Down)?);
        }
        let bpt_out = backend.compute_invariant(&amounts_scaled18, Rounding::Down)?;

        self.with_settlement_guard(|vault| {
            let entry = vault.pool_mut(pool)?;
            entry.balances_raw = amounts_raw.to_vec();
            entry.initialized = true;
            for (i, &raw) in amounts_raw.iter().enumerate() {
                if raw > 0 {
                    vault.deltas_mut().debit(snapshot.token_address(i), raw)?;
                }
            }
            vault.shares_mut().mint(pool, to, bpt_out)?;
            let tokens: Vec<TokenAddress> =
                (0..snapshot.token_count()).map(|i| snapshot.token_address(i)).collect();
            let deltas = to_signed_deltas(amounts_raw, false)?;
            vault.record_event(VaultEvent::PoolBalanceChanged {
                pool,
                party: to,
                tokens,
                deltas,
            });
            Ok(())
        })?;

        debug!(%pool, bpt_out, "pool initialized");
        Ok(bpt_out)
    }

    /// Adds liquidity to a pool using one of the four strategies.
    ///
    /// Returns the settled per-token deposits, the shares minted to
    /// `params.to`, and any custom-callback return data. The caller is
    /// debited each deposit in the delta ledger.
    ///
    /// # Errors
    ///
    /// See the crate error taxonomy; any failure restores the vault's
    /// accounting state as of this call's entry.
    pub fn add_liquidity(&mut self, params: AddLiquidityParams) -> Result<AddLiquidityOutcome> {
        self.require_locked()?;
        self.transactional(|vault| vault.add_liquidity_inner(&params))
    }

    fn add_liquidity_inner(&mut self, params: &AddLiquidityParams) -> Result<AddLiquidityOutcome> {
        let (backend, hooks, config, initialized) = self.pool_parts(params.pool)?;
        if config.paused {
            return Err(VaultError::PoolPaused(params.pool));
        }
        if !initialized {
            return Err(VaultError::PoolNotInitialized(params.pool));
        }

        // Higher apparent balances make a deposit look cheaper, so the
        // add snapshot rounds up.
        let mut snapshot = self.snapshot_pool(params.pool, Rounding::Up)?;
        let token_count = snapshot.token_count();
        if params.max_amounts_in_raw.len() != token_count {
            return Err(VaultError::InputLengthMismatch {
                expected: token_count,
                actual: params.max_amounts_in_raw.len(),
            });
        }

        if config.hooks.before_add_liquidity {
            if let Some(hooks) = &hooks {
                let hook_params = BeforeLiquidityHookParams {
                    pool: params.pool,
                    party: params.to,
                    bounds_raw: &params.max_amounts_in_raw,
                    bpt_bound: params.min_bpt_out,
                    balances_scaled18: snapshot.balances_live_scaled18(),
                    user_data: &params.user_data,
                };
                if !hooks.on_before_add_liquidity(self, &hook_params) {
                    return Err(VaultError::BeforeAddLiquidityHookFailed);
                }
                snapshot = self.snapshot_pool(params.pool, Rounding::Up)?;
            }
        }

        let mut max_in_scaled18 = Vec::with_capacity(token_count);
        for (i, &raw) in params.max_amounts_in_raw.iter().enumerate() {
            max_in_scaled18.push(snapshot.to_scaled_18(i, raw, Rounding::Down)?);
        }
        let supply = self.total_supply(params.pool);
        let swap_fee = snapshot.config().static_swap_fee;

        let (amounts_in_scaled18, bpt_out, swap_fees_scaled18, return_data) = match params.kind {
            AddLiquidityKind::Proportional => {
                let bpt_out = params.min_bpt_out;
                let amounts = pool_math::compute_proportional_amounts_in(
                    snapshot.balances_live_scaled18(),
                    supply,
                    bpt_out,
                )?;
                (amounts, bpt_out, vec![0; token_count], Vec::new())
            }
            AddLiquidityKind::Unbalanced => {
                let (bpt_out, fees) = pool_math::compute_add_liquidity_unbalanced(
                    snapshot.balances_live_scaled18(),
                    &max_in_scaled18,
                    supply,
                    swap_fee,
                    backend.as_ref(),
                )?;
                (max_in_scaled18.clone(), bpt_out, fees, Vec::new())
            }
            AddLiquidityKind::SingleTokenExactOut => {
                let index = single_nonzero_index(&params.max_amounts_in_raw)?;
                let bpt_out = params.min_bpt_out;
                let (amount_in, fees) = pool_math::compute_add_liquidity_single_token_exact_out(
                    snapshot.balances_live_scaled18(),
                    index,
                    bpt_out,
                    supply,
                    swap_fee,
                    backend.as_ref(),
                )?;
                let mut amounts = vec![0; token_count];
                amounts[index] = amount_in;
                (amounts, bpt_out, fees, Vec::new())
            }
            AddLiquidityKind::Custom => {
                if !config.supports_add_liquidity_custom {
                    return Err(VaultError::DoesNotSupportAddLiquidityCustom(params.pool));
                }
                let result = backend.on_add_liquidity_custom(&CustomAddLiquidityParams {
                    balances_scaled18: snapshot.balances_live_scaled18(),
                    max_amounts_in_scaled18: &max_in_scaled18,
                    min_bpt_out: params.min_bpt_out,
                    total_supply: supply,
                    user_data: &params.user_data,
                })?;
                if result.amounts_scaled18.len() != token_count
                    || result.swap_fees_scaled18.len() != token_count
                {
                    return Err(VaultError::InputLengthMismatch {
                        expected: token_count,
                        actual: result.amounts_scaled18.len(),
                    });
                }
                (
                    result.amounts_scaled18,
                    result.bpt,
                    result.swap_fees_scaled18,
                    result.return_data,
                )
            }
        };

        if bpt_out < params.min_bpt_out {
            return Err(VaultError::BptBelowMin {
                amount: bpt_out,
                min: params.min_bpt_out,
            });
        }

        let amounts_in_raw = self.with_settlement_guard(|vault| {
            vault.settle_add(params, &snapshot, &amounts_in_scaled18, &swap_fees_scaled18, bpt_out)
        })?;

        if config.hooks.after_add_liquidity {
            if let Some(hooks) = &hooks {
                let hook_params = AfterLiquidityHookParams {
                    pool: params.pool,
                    party: params.to,
                    amounts_raw: &amounts_in_raw,
                    bpt: bpt_out,
                    user_data: &params.user_data,
                };
                if !hooks.on_after_add_liquidity(self, &hook_params) {
                    return Err(VaultError::AfterAddLiquidityHookFailed);
                }
            }
        }

        debug!(pool = %params.pool, bpt_out, "liquidity added");
        Ok(AddLiquidityOutcome {
            amounts_in_raw,
            bpt_out,
            return_data,
        })
    }

    /// The guarded settlement pass of an add: raw conversion, per-token
    /// bounds, protocol fees, balance updates, debits, share mint.
    fn settle_add(
        &mut self,
        params: &AddLiquidityParams,
        snapshot: &PoolSnapshot,
        amounts_in_scaled18: &[u128],
        swap_fees_scaled18: &[u128],
        bpt_out: u128,
    ) -> Result<Vec<u128>> {
        let token_count = snapshot.token_count();
        let mut amounts_in_raw = vec![0u128; token_count];
        for i in 0..token_count {
            // Charging the caller rounds up; the unbalanced kind settles
            // the caller's exact raw amounts to avoid a double rounding.
            let raw = if params.kind == AddLiquidityKind::Unbalanced {
                params.max_amounts_in_raw[i]
            } else {
                snapshot.to_raw(i, amounts_in_scaled18[i], Rounding::Up)?
            };
            if raw > params.max_amounts_in_raw[i] {
                return Err(VaultError::AmountInAboveMax {
                    token: snapshot.token_address(i),
                    amount: raw,
                    max: params.max_amounts_in_raw[i],
                });
            }
            amounts_in_raw[i] = raw;
        }

        for i in 0..token_count {
            let fee_raw =
                self.charge_protocol_fee(params.pool, snapshot, i, swap_fees_scaled18[i])?;
            let token = snapshot.token_address(i);
            let entry = self.pool_mut(params.pool)?;
            let grown = entry.balances_raw[i]
                .checked_add(amounts_in_raw[i])
                .ok_or(VaultError::Overflow("pool balance"))?;
            entry.balances_raw[i] =
                grown
                    .checked_sub(fee_raw)
                    .ok_or(VaultError::InsufficientPoolBalance {
                        token,
                        balance: grown,
                        needed: fee_raw,
                    })?;
            if amounts_in_raw[i] > 0 {
                self.deltas_mut().debit(token, amounts_in_raw[i])?;
            }
        }

        self.shares_mut().mint(params.pool, params.to, bpt_out)?;

        let tokens: Vec<TokenAddress> =
            (0..token_count).map(|i| snapshot.token_address(i)).collect();
        let deltas = to_signed_deltas(&amounts_in_raw, false)?;
        self.record_event(VaultEvent::PoolBalanceChanged {
            pool: params.pool,
            party: params.to,
            tokens,
            deltas,
        });
        Ok(amounts_in_raw)
    }

    /// Removes liquidity from a pool using one of the four strategies.
    ///
    /// Burns shares from `params.from` (spending the locker's allowance
    /// if they differ) and credits the caller each withdrawal in the
    /// delta ledger.
    ///
    /// # Errors
    ///
    /// See the crate error taxonomy; any failure restores the vault's
    /// accounting state as of this call's entry.
    pub fn remove_liquidity(
        &mut self,
        params: RemoveLiquidityParams,
    ) -> Result<RemoveLiquidityOutcome> {
        self.require_locked()?;
        self.transactional(|vault| vault.remove_liquidity_inner(&params))
    }

    fn remove_liquidity_inner(
        &mut self,
        params: &RemoveLiquidityParams,
    ) -> Result<RemoveLiquidityOutcome> {
        let (backend, hooks, config, initialized) = self.pool_parts(params.pool)?;
        if config.paused {
            return Err(VaultError::PoolPaused(params.pool));
        }
        if !initialized {
            return Err(VaultError::PoolNotInitialized(params.pool));
        }

        // Higher apparent balances make a withdrawal look richer, so the
        // remove snapshot rounds down.
        let mut snapshot = self.snapshot_pool(params.pool, Rounding::Down)?;
        let token_count = snapshot.token_count();
        if params.min_amounts_out_raw.len() != token_count {
            return Err(VaultError::InputLengthMismatch {
                expected: token_count,
                actual: params.min_amounts_out_raw.len(),
            });
        }

        if config.hooks.before_remove_liquidity {
            if let Some(hooks) = &hooks {
                let hook_params = BeforeLiquidityHookParams {
                    pool: params.pool,
                    party: params.from,
                    bounds_raw: &params.min_amounts_out_raw,
                    bpt_bound: params.max_bpt_in,
                    balances_scaled18: snapshot.balances_live_scaled18(),
                    user_data: &params.user_data,
                };
                if !hooks.on_before_remove_liquidity(self, &hook_params) {
                    return Err(VaultError::BeforeRemoveLiquidityHookFailed);
                }
                snapshot = self.snapshot_pool(params.pool, Rounding::Down)?;
            }
        }

        let mut min_out_scaled18 = Vec::with_capacity(token_count);
        for (i, &raw) in params.min_amounts_out_raw.iter().enumerate() {
            min_out_scaled18.push(snapshot.to_scaled_18(i, raw, Rounding::Up)?);
        }
        let supply = self.total_supply(params.pool);
        let swap_fee = snapshot.config().static_swap_fee;

        let (amounts_out_scaled18, bpt_in, swap_fees_scaled18, return_data) = match params.kind {
            RemoveLiquidityKind::Proportional => {
                let bpt_in = params.max_bpt_in;
                let amounts = pool_math::compute_proportional_amounts_out(
                    snapshot.balances_live_scaled18(),
                    supply,
                    bpt_in,
                )?;
                (amounts, bpt_in, vec![0; token_count], Vec::new())
            }
            RemoveLiquidityKind::SingleTokenExactIn => {
                let index = single_nonzero_index(&params.min_amounts_out_raw)?;
                let bpt_in = params.max_bpt_in;
                let (amount_out, fees) =
                    pool_math::compute_remove_liquidity_single_token_exact_in(
                        snapshot.balances_live_scaled18(),
                        index,
                        bpt_in,
                        supply,
                        swap_fee,
                        backend.as_ref(),
                    )?;
                let mut amounts = vec![0; token_count];
                amounts[index] = amount_out;
                (amounts, bpt_in, fees, Vec::new())
            }
            RemoveLiquidityKind::SingleTokenExactOut => {
                let index = single_nonzero_index(&params.min_amounts_out_raw)?;
                let (bpt_in, fees) =
                    pool_math::compute_remove_liquidity_single_token_exact_out(
                        snapshot.balances_live_scaled18(),
                        index,
                        min_out_scaled18[index],
                        supply,
                        swap_fee,
                        backend.as_ref(),
                    )?;
                let mut amounts = vec![0; token_count];
                amounts[index] = min_out_scaled18[index];
                (amounts, bpt_in, fees, Vec::new())
            }
            RemoveLiquidityKind::Custom => {
                if !config.supports_remove_liquidity_custom {
                    return Err(VaultError::DoesNotSupportRemoveLiquidityCustom(params.pool));
                }
                let result = backend.on_remove_liquidity_custom(&CustomRemoveLiquidityParams {
                    balances_scaled18: snapshot.balances_live_scaled18(),
                    min_amounts_out_scaled18: &min_out_scaled18,
                    max_bpt_in: params.max_bpt_in,
                    total_supply: supply,
                    user_data: &params.user_data,
                })?;
                if result.amounts_scaled18.len() != token_count
                    || result.swap_fees_scaled18.len() != token_count
                {
                    return Err(VaultError::InputLengthMismatch {
                        expected: token_count,
                        actual: result.amounts_scaled18.len(),
                    });
                }
                (
                    result.amounts_scaled18,
                    result.bpt,
                    result.swap_fees_scaled18,
                    result.return_data,
                )
            }
        };

        if bpt_in > params.max_bpt_in {
            return Err(VaultError::BptAboveMax {
                amount: bpt_in,
                max: params.max_bpt_in,
            });
        }

        let amounts_out_raw = self.with_settlement_guard(|vault| {
            vault.settle_remove(params, &snapshot, &amounts_out_scaled18, &swap_fees_scaled18, bpt_in)
        })?;

        if config.hooks.after_remove_liquidity {
            if let Some(hooks) = &hooks {
                let hook_params = AfterLiquidityHookParams {
                    pool: params.pool,
                    party: params.from,
                    amounts_raw: &amounts_out_raw,
                    bpt: bpt_in,
                    user_data: &params.user_data,
                };
                if !hooks.on_after_remove_liquidity(self, &hook_params) {
                    return Err(VaultError::AfterRemoveLiquidityHookFailed);
                }
            }
        }

        debug!(pool = %params.pool, bpt_in, "liquidity removed");
        Ok(RemoveLiquidityOutcome {
            bpt_in,
            amounts_out_raw,
            return_data,
        })
    }

    /// The guarded settlement pass of a remove: raw conversion,
    /// per-token bounds, protocol fees, balance updates, credits,
    /// allowance spend, share burn.
    fn settle_remove(
        &mut self,
        params: &RemoveLiquidityParams,
        snapshot: &PoolSnapshot,
        amounts_out_scaled18: &[u128],
        swap_fees_scaled18: &[u128],
        bpt_in: u128,
    ) -> Result<Vec<u128>> {
        let token_count = snapshot.token_count();
        let mut amounts_out_raw = vec![0u128; token_count];
        for i in 0..token_count {
            // Paying the caller rounds down; the exact-out kind settles
            // the caller's exact raw request.
            let raw = if params.kind == RemoveLiquidityKind::SingleTokenExactOut
                && params.min_amounts_out_raw[i] > 0
            {
                params.min_amounts_out_raw[i]
            } else {
                snapshot.to_raw(i, amounts_out_scaled18[i], Rounding::Down)?
            };
            if raw < params.min_amounts_out_raw[i] {
                return Err(VaultError::AmountOutBelowMin {
                    token: snapshot.token_address(i),
                    amount: raw,
                    min: params.min_amounts_out_raw[i],
                });
            }
            amounts_out_raw[i] = raw;
        }

        for i in 0..token_count {
            let fee_raw =
                self.charge_protocol_fee(params.pool, snapshot, i, swap_fees_scaled18[i])?;
            let token = snapshot.token_address(i);
            let needed = amounts_out_raw[i]
                .checked_add(fee_raw)
                .ok_or(VaultError::Overflow("pool balance"))?;
            let entry = self.pool_mut(params.pool)?;
            let balance = entry.balances_raw[i];
            entry.balances_raw[i] =
                balance
                    .checked_sub(needed)
                    .ok_or(VaultError::InsufficientPoolBalance {
                        token,
                        balance,
                        needed,
                    })?;
            if amounts_out_raw[i] > 0 {
                self.deltas_mut().credit(token, amounts_out_raw[i])?;
            }
        }

        let caller = self.current_locker()?;
        if caller != params.from {
            self.shares_mut()
                .spend_allowance(params.pool, params.from, caller, bpt_in)?;
        }
        self.shares_mut().burn(params.pool, params.from, bpt_in)?;

        let tokens: Vec<TokenAddress> =
            (0..token_count).map(|i| snapshot.token_address(i)).collect();
        let deltas = to_signed_deltas(&amounts_out_raw, true)?;
        self.record_event(VaultEvent::PoolBalanceChanged {
            pool: params.pool,
            party: params.from,
            tokens,
            deltas,
        });
        Ok(amounts_out_raw)
    }
}
