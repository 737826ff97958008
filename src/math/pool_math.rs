//! Share accounting for liquidity operations.
//!
//! These are the pure computations behind the liquidity engine's four
//! add and four remove strategies. None of them touch vault state: they
//! take common-precision balances, the current share supply, and the
//! pool's swap fee, and call back into the pool's own
//! [`compute_invariant`](crate::traits::PoolBackend::compute_invariant) /
//! [`compute_balance`](crate::traits::PoolBackend::compute_balance) for
//! anything curve-specific.
//!
//! Fee model: a non-proportional deposit or withdrawal is economically a
//! partial swap, so the amount in excess of the proportional part (the
//! "taxable" amount) is charged the pool's swap fee. Fees always round
//! up and share amounts round in the pool's favor.

use crate::domain::{BasisPoints, Rounding};
use crate::error::{Result, VaultError};
use crate::math::fixed_point;
use crate::traits::PoolBackend;

/// Per-token deposits for minting exactly `bpt_out` shares, rounded up.
///
/// `amounts_in[i] = ceil(balances[i] * bpt_out / total_supply)`.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `total_supply` is zero.
pub fn compute_proportional_amounts_in(
    balances_scaled18: &[u128],
    total_supply: u128,
    bpt_out: u128,
) -> Result<Vec<u128>> {
    balances_scaled18
        .iter()
        .map(|&b| fixed_point::mul_div(b, bpt_out, total_supply, Rounding::Up))
        .collect()
}

/// Per-token withdrawals for burning exactly `bpt_in` shares, rounded
/// down.
///
/// `amounts_out[i] = floor(balances[i] * bpt_in / total_supply)`.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `total_supply` is zero.
pub fn compute_proportional_amounts_out(
    balances_scaled18: &[u128],
    total_supply: u128,
    bpt_in: u128,
) -> Result<Vec<u128>> {
    balances_scaled18
        .iter()
        .map(|&b| fixed_point::mul_div(b, bpt_in, total_supply, Rounding::Down))
        .collect()
}

/// Shares minted for exact per-token deposits, with swap fees charged on
/// each token's non-proportional excess.
///
/// Returns `(bpt_out, swap_fee_amounts_scaled18)`.
pub fn compute_add_liquidity_unbalanced(
    balances_scaled18: &[u128],
    exact_amounts_in: &[u128],
    total_supply: u128,
    swap_fee: BasisPoints,
    backend: &dyn PoolBackend,
) -> Result<(u128, Vec<u128>)> {
    let current_invariant = backend.compute_invariant(balances_scaled18, Rounding::Down)?;
    if current_invariant == 0 {
        return Err(VaultError::DivisionByZero("unbalanced add invariant"));
    }

    let mut new_balances = Vec::with_capacity(balances_scaled18.len());
    for (b, a) in balances_scaled18.iter().zip(exact_amounts_in) {
        new_balances.push(
            b.checked_add(*a)
                .ok_or(VaultError::Overflow("unbalanced add balance"))?,
        );
    }

    let new_invariant = backend.compute_invariant(&new_balances, Rounding::Down)?;
    let invariant_ratio = fixed_point::div_wad(new_invariant, current_invariant, Rounding::Down)?;

    // Charge the swap fee on each token's growth beyond the proportional
    // growth implied by the invariant ratio.
    let mut swap_fees = vec![0u128; balances_scaled18.len()];
    for i in 0..new_balances.len() {
        let proportional = fixed_point::mul_wad(balances_scaled18[i], invariant_ratio, Rounding::Up)?;
        if new_balances[i] > proportional {
            let taxable = new_balances[i] - proportional;
            let fee = swap_fee.apply(taxable, Rounding::Up)?;
            swap_fees[i] = fee;
            new_balances[i] = new_balances[i]
                .checked_sub(fee)
                .ok_or(VaultError::Underflow("unbalanced add fee"))?;
        }
    }

    let invariant_with_fees = backend.compute_invariant(&new_balances, Rounding::Down)?;
    // Rounding can eat all measurable growth for dust-sized deposits; the
    // caller's minimum-share bound rejects those.
    let growth = invariant_with_fees.saturating_sub(current_invariant);
    let bpt_out = fixed_point::mul_div(total_supply, growth, current_invariant, Rounding::Down)?;
    Ok((bpt_out, swap_fees))
}

/// Required deposit of one token for minting exactly `bpt_out` shares.
///
/// Returns `(amount_in_scaled18, swap_fee_amounts_scaled18)`; the fee is
/// included in the returned amount.
pub fn compute_add_liquidity_single_token_exact_out(
    balances_scaled18: &[u128],
    token_index: usize,
    bpt_out: u128,
    total_supply: u128,
    swap_fee: BasisPoints,
    backend: &dyn PoolBackend,
) -> Result<(u128, Vec<u128>)> {
    let new_supply = total_supply
        .checked_add(bpt_out)
        .ok_or(VaultError::Overflow("share supply"))?;
    let invariant_ratio = fixed_point::div_wad(new_supply, total_supply, Rounding::Up)?;

    let new_balance = backend.compute_balance(balances_scaled18, token_index, invariant_ratio)?;
    let balance = balances_scaled18[token_index];
    let amount_in = new_balance
        .checked_sub(balance)
        .ok_or(VaultError::Underflow("single-token add balance"))?;

    // The proportional part of the deposit is fee-free; only the excess
    // (the implicit swap into the other tokens) is taxable. The fee is
    // charged on top so that `amount_in` net of fee still reaches the
    // target invariant.
    let proportional = fixed_point::mul_wad(balance, invariant_ratio, Rounding::Down)?
        .saturating_sub(balance);
    let taxable = amount_in.saturating_sub(proportional);
    let fee = taxed_fee_on_top(taxable, swap_fee)?;

    let mut swap_fees = vec![0u128; balances_scaled18.len()];
    swap_fees[token_index] = fee;
    let amount_in_with_fee = amount_in
        .checked_add(fee)
        .ok_or(VaultError::Overflow("single-token add fee"))?;
    Ok((amount_in_with_fee, swap_fees))
}

/// Withdrawal of one token for burning exactly `bpt_in` shares.
///
/// Returns `(amount_out_scaled18, swap_fee_amounts_scaled18)`; the fee
/// has already been deducted from the returned amount.
pub fn compute_remove_liquidity_single_token_exact_in(
    balances_scaled18: &[u128],
    token_index: usize,
    bpt_in: u128,
    total_supply: u128,
    swap_fee: BasisPoints,
    backend: &dyn PoolBackend,
) -> Result<(u128, Vec<u128>)> {
    let new_supply = total_supply
        .checked_sub(bpt_in)
        .ok_or(VaultError::Underflow("share supply"))?;
    let invariant_ratio = fixed_point::div_wad(new_supply, total_supply, Rounding::Up)?;

    let balance = balances_scaled18[token_index];
    let new_balance = backend.compute_balance(balances_scaled18, token_index, invariant_ratio)?;
    let amount_out = balance
        .checked_sub(new_balance)
        .ok_or(VaultError::Underflow("single-token remove balance"))?;

    // Everything beyond the proportional withdrawal is an implicit swap
    // out of the other tokens and pays the swap fee.
    let proportional = fixed_point::mul_div(balance, bpt_in, total_supply, Rounding::Down)?;
    let taxable = amount_out.saturating_sub(proportional);
    let fee = swap_fee.apply(taxable, Rounding::Up)?;

    let mut swap_fees = vec![0u128; balances_scaled18.len()];
    swap_fees[token_index] = fee;
    let amount_out_net = amount_out
        .checked_sub(fee)
        .ok_or(VaultError::Underflow("single-token remove fee"))?;
    Ok((amount_out_net, swap_fees))
}

/// Shares burned for withdrawing exactly `amount_out` of one token.
///
/// Returns `(bpt_in, swap_fee_amounts_scaled18)`.
pub fn compute_remove_liquidity_single_token_exact_out(
    balances_scaled18: &[u128],
    token_index: usize,
    amount_out: u128,
    total_supply: u128,
    swap_fee: BasisPoints,
    backend: &dyn PoolBackend,
) -> Result<(u128, Vec<u128>)> {
    let current_invariant = backend.compute_invariant(balances_scaled18, Rounding::Up)?;
    if current_invariant == 0 {
        return Err(VaultError::DivisionByZero("single-token remove invariant"));
    }

    let balance = balances_scaled18[token_index];
    let mut new_balances = balances_scaled18.to_vec();
    new_balances[token_index] = balance.checked_sub(amount_out).ok_or_else(|| {
        VaultError::Underflow("single-token remove exceeds balance")
    })?;

    let new_invariant = backend.compute_invariant(&new_balances, Rounding::Down)?;
    let invariant_ratio = fixed_point::div_wad(new_invariant, current_invariant, Rounding::Down)?;

    // The pool would keep `balance * ratio` under a proportional exit at
    // this invariant drop; whatever the caller takes below that is the
    // taxable excess.
    let proportional_balance = fixed_point::mul_wad(balance, invariant_ratio, Rounding::Up)?;
    let taxable = proportional_balance.saturating_sub(new_balances[token_index]);
    let fee = taxed_fee_on_top(taxable, swap_fee)?;

    new_balances[token_index] = new_balances[token_index]
        .checked_sub(fee)
        .ok_or(VaultError::Underflow("single-token remove fee"))?;
    let invariant_with_fees = backend.compute_invariant(&new_balances, Rounding::Down)?;

    let drop = current_invariant
        .checked_sub(invariant_with_fees)
        .ok_or(VaultError::Underflow("single-token remove invariant drop"))?;
    let bpt_in = fixed_point::mul_div(total_supply, drop, current_invariant, Rounding::Up)?;

    let mut swap_fees = vec![0u128; balances_scaled18.len()];
    swap_fees[token_index] = fee;
    Ok((bpt_in, swap_fees))
}

/// Fee charged on top of a taxable amount: `taxable * fee / (1 − fee)`,
/// rounded up.
fn taxed_fee_on_top(taxable: u128, swap_fee: BasisPoints) -> Result<u128> {
    if taxable == 0 || swap_fee.is_zero() {
        return Ok(0);
    }
    let grossed = swap_fee.gross_up(taxable, Rounding::Up)?;
    Ok(grossed - taxable)
}
