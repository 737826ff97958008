//! The swap engine.
//!
//! One pass per swap, no persisted intermediate state: snapshot, scale,
//! optional before-hook (with mandatory re-derivation), pricing, fees,
//! limits, settlement, optional after-hook, event. The balance-mutation
//! steps run under the settlement guard; everything that calls out to
//! collaborator code runs outside it.
//!
//! Rounding rules, in order of appearance:
//! - the snapshot entering the math rounds down;
//! - the given amount rounds down for exact-in and up for exact-out;
//! - the exact-out fee uplift (`given / (1 − fee)`) rounds up;
//! - the exact-in fee on the calculated output rounds up;
//! - the raw conversion rounds down for value leaving the vault
//!   (exact-in output) and up for value entering it (exact-out input).

use tracing::debug;

use super::Vault;
use crate::domain::{
    BasisPoints, Rounding, SwapComputeRequest, SwapKind, SwapOutcome, SwapParams,
};
use crate::error::{Result, VaultError};
use crate::events::VaultEvent;
use crate::pool::PoolSnapshot;
use crate::traits::{AfterSwapHookParams, BeforeSwapHookParams, PoolBackend};

/// Scaled input state, re-derived from scratch whenever a hook may have
/// run.
struct ScaledInput {
    /// Amount fed to the pricing function; for exact-out this already
    /// includes the fee uplift.
    amount_given_scaled18: u128,
    /// Resolved swap fee (static, unless the backend overrides it).
    swap_fee: BasisPoints,
    /// For exact-out, the uplift portion the pool keeps as its fee.
    fee_scaled18: u128,
}

fn scale_input(
    snapshot: &PoolSnapshot,
    params: &SwapParams,
    index_in: usize,
    index_out: usize,
    backend: &dyn PoolBackend,
) -> Result<ScaledInput> {
    // Whichever side feeds the pricing function must be conservative in
    // the vault's favor: exact-in rounds the input down, exact-out
    // rounds the requested output up.
    let (scale_index, rounding) = match params.kind {
        SwapKind::ExactIn => (index_in, Rounding::Down),
        SwapKind::ExactOut => (index_out, Rounding::Up),
    };
    let given_scaled18 = snapshot.to_scaled_18(scale_index, params.amount_given_raw, rounding)?;

    let request = SwapComputeRequest {
        kind: params.kind,
        amount_given_scaled18: given_scaled18,
        balances_scaled18: snapshot.balances_live_scaled18(),
        index_in,
        index_out,
        user_data: &params.user_data,
    };
    let static_fee = snapshot.config().static_swap_fee;
    let swap_fee = backend
        .dynamic_swap_fee(&request, static_fee)
        .unwrap_or(static_fee);

    match params.kind {
        SwapKind::ExactIn => Ok(ScaledInput {
            amount_given_scaled18: given_scaled18,
            swap_fee,
            fee_scaled18: 0,
        }),
        SwapKind::ExactOut => {
            // The pricing function must see the gross output so that
            // after the pool keeps its fee, the caller's exact amount
            // remains.
            let grossed = swap_fee.gross_up(given_scaled18, Rounding::Up)?;
            Ok(ScaledInput {
                amount_given_scaled18: grossed,
                swap_fee,
                fee_scaled18: grossed - given_scaled18,
            })
        }
    }
}

impl Vault {
    /// Swaps `token_in` for `token_out` against one pool.
    ///
    /// Returns the calculated amount (output for exact-in, input for
    /// exact-out) together with both settled raw amounts. The caller is
    /// debited `amount_in` and credited `amount_out` in the delta
    /// ledger and settles both before its locked context closes.
    ///
    /// # Errors
    ///
    /// See the crate error taxonomy; any failure restores the vault's
    /// accounting state as of this call's entry.
    pub fn swap(&mut self, params: SwapParams) -> Result<SwapOutcome> {
        self.require_locked()?;
        self.transactional(|vault| vault.swap_inner(&params))
    }

    fn swap_inner(&mut self, params: &SwapParams) -> Result<SwapOutcome> {
        if params.amount_given_raw == 0 {
            return Err(VaultError::AmountGivenZero);
        }
        if params.token_in == params.token_out {
            return Err(VaultError::CannotSwapSameToken);
        }

        let (backend, hooks, config, initialized) = self.pool_parts(params.pool)?;
        if config.paused {
            return Err(VaultError::PoolPaused(params.pool));
        }
        if !initialized {
            return Err(VaultError::PoolNotInitialized(params.pool));
        }

        let mut snapshot = self.snapshot_pool(params.pool, Rounding::Down)?;
        let index_in = snapshot
            .index_of(params.token_in)
            .ok_or(VaultError::TokenNotRegistered(params.token_in))?;
        let index_out = snapshot
            .index_of(params.token_out)
            .ok_or(VaultError::TokenNotRegistered(params.token_out))?;

        let mut input = scale_input(&snapshot, params, index_in, index_out, backend.as_ref())?;

        if config.hooks.before_swap {
            if let Some(hooks) = &hooks {
                let hook_params = BeforeSwapHookParams {
                    pool: params.pool,
                    kind: params.kind,
                    token_in: params.token_in,
                    token_out: params.token_out,
                    amount_given_scaled18: input.amount_given_scaled18,
                    balances_scaled18: snapshot.balances_live_scaled18(),
                    user_data: &params.user_data,
                };
                if !hooks.on_before_swap(self, &hook_params) {
                    return Err(VaultError::BeforeSwapHookFailed);
                }
                // The hook is arbitrary external code: everything read
                // or derived before it ran is stale now.
                snapshot = self.snapshot_pool(params.pool, Rounding::Down)?;
                input = scale_input(&snapshot, params, index_in, index_out, backend.as_ref())?;
            }
        }

        let request = SwapComputeRequest {
            kind: params.kind,
            amount_given_scaled18: input.amount_given_scaled18,
            balances_scaled18: snapshot.balances_live_scaled18(),
            index_in,
            index_out,
            user_data: &params.user_data,
        };
        let amount_calculated_scaled18 = backend.on_swap(&request)?;

        let (outcome, amount_in_scaled18, amount_out_scaled18, protocol_fee_raw) = self
            .with_settlement_guard(|vault| {
                vault.settle_swap(
                    params,
                    &snapshot,
                    index_in,
                    index_out,
                    &input,
                    amount_calculated_scaled18,
                )
            })?;

        if config.hooks.after_swap {
            if let Some(hooks) = &hooks {
                let hook_params = AfterSwapHookParams {
                    pool: params.pool,
                    kind: params.kind,
                    token_in: params.token_in,
                    token_out: params.token_out,
                    amount_in_scaled18,
                    amount_out_scaled18,
                    user_data: &params.user_data,
                };
                if !hooks.on_after_swap(self, &hook_params) {
                    return Err(VaultError::AfterSwapHookFailed);
                }
            }
        }

        debug!(
            pool = %params.pool,
            token_in = %params.token_in,
            token_out = %params.token_out,
            amount_in = outcome.amount_in_raw,
            amount_out = outcome.amount_out_raw,
            "swap settled"
        );
        self.record_event(VaultEvent::Swap {
            pool: params.pool,
            token_in: params.token_in,
            token_out: params.token_out,
            amount_in_raw: outcome.amount_in_raw,
            amount_out_raw: outcome.amount_out_raw,
            protocol_fee_raw,
        });
        Ok(outcome)
    }

    /// Steps 9–12 of the swap state machine: raw conversion, limit
    /// enforcement, protocol fee skim, balance updates, ledger
    /// debit/credit. Runs under the settlement guard.
    #[allow(clippy::too_many_arguments)]
    fn settle_swap(
        &mut self,
        params: &SwapParams,
        snapshot: &PoolSnapshot,
        index_in: usize,
        index_out: usize,
        input: &ScaledInput,
        amount_calculated_scaled18: u128,
    ) -> Result<(SwapOutcome, u128, u128, u128)> {
        let (amount_in_scaled18, amount_out_scaled18, fee_scaled18, outcome) = match params.kind {
            SwapKind::ExactIn => {
                // Fee comes off the calculated output, rounded up in the
                // pool's favor.
                let fee_scaled18 = input
                    .swap_fee
                    .apply(amount_calculated_scaled18, Rounding::Up)?;
                let out_scaled18 = amount_calculated_scaled18
                    .checked_sub(fee_scaled18)
                    .ok_or(VaultError::Underflow("swap fee exceeds output"))?;
                // Value leaving the vault rounds down.
                let amount_out_raw = snapshot.to_raw(index_out, out_scaled18, Rounding::Down)?;
                if amount_out_raw < params.limit_raw {
                    return Err(VaultError::SwapLimitExceeded {
                        amount: amount_out_raw,
                        limit: params.limit_raw,
                    });
                }
                (
                    input.amount_given_scaled18,
                    out_scaled18,
                    fee_scaled18,
                    SwapOutcome {
                        amount_calculated_raw: amount_out_raw,
                        amount_in_raw: params.amount_given_raw,
                        amount_out_raw,
                    },
                )
            }
            SwapKind::ExactOut => {
                // Value entering the vault rounds up.
                let amount_in_raw =
                    snapshot.to_raw(index_in, amount_calculated_scaled18, Rounding::Up)?;
                if amount_in_raw > params.limit_raw {
                    return Err(VaultError::SwapLimitExceeded {
                        amount: amount_in_raw,
                        limit: params.limit_raw,
                    });
                }
                // The caller receives exactly what they asked for; the
                // uplift stays in the pool as its fee.
                let out_scaled18 = input.amount_given_scaled18 - input.fee_scaled18;
                (
                    amount_calculated_scaled18,
                    out_scaled18,
                    input.fee_scaled18,
                    SwapOutcome {
                        amount_calculated_raw: amount_in_raw,
                        amount_in_raw,
                        amount_out_raw: params.amount_given_raw,
                    },
                )
            }
        };

        let protocol_fee_raw =
            self.charge_protocol_fee(params.pool, snapshot, index_out, fee_scaled18)?;

        let pool = self.pool_mut(params.pool)?;
        pool.balances_raw[index_in] = pool.balances_raw[index_in]
            .checked_add(outcome.amount_in_raw)
            .ok_or(VaultError::Overflow("pool balance"))?;
        let debit_total = outcome
            .amount_out_raw
            .checked_add(protocol_fee_raw)
            .ok_or(VaultError::Overflow("pool balance"))?;
        let balance_out = pool.balances_raw[index_out];
        pool.balances_raw[index_out] =
            balance_out
                .checked_sub(debit_total)
                .ok_or(VaultError::InsufficientPoolBalance {
                    token: params.token_out,
                    balance: balance_out,
                    needed: debit_total,
                })?;

        self.deltas_mut().debit(params.token_in, outcome.amount_in_raw)?;
        self.deltas_mut()
            .credit(params.token_out, outcome.amount_out_raw)?;

        Ok((outcome, amount_in_scaled18, amount_out_scaled18, protocol_fee_raw))
    }
}
