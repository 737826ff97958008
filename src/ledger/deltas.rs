//! Signed per-token delta tracking and the reserve cache.

use std::collections::HashMap;

use crate::domain::TokenAddress;
use crate::error::{Result, VaultError};

/// The per-call delta ledger.
///
/// For each token touched inside the current locked context, `deltas`
/// holds the signed net amount outstanding: positive means the external
/// party still owes the vault (a debit not yet settled), negative means
/// the vault still owes the external party (a credit not yet sent out).
/// The context may only close when every entry is exactly zero.
///
/// `nonzero` counts entries with a nonzero delta so the settlement check
/// is O(1) instead of a scan. `reserves` caches the vault's
/// last-observed actual holdings per token; [`settle`](crate::vault::Vault::settle)
/// compares live balances against it to discover external deposits.
#[derive(Debug, Clone, Default)]
pub struct DeltaLedger {
    deltas: HashMap<TokenAddress, i128>,
    nonzero: usize,
    reserves: HashMap<TokenAddress, u128>,
}

impl DeltaLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current delta for `token` (zero if never touched).
    #[must_use]
    pub fn delta(&self, token: TokenAddress) -> i128 {
        self.deltas.get(&token).copied().unwrap_or(0)
    }

    /// Returns the number of tokens with a nonzero delta.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.nonzero
    }

    /// Returns `true` if every delta is exactly zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.nonzero == 0
    }

    /// Records that the external party owes the vault `amount` more of
    /// `token`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AmountOverflow`] if `amount` does not fit
    /// the signed range, or [`VaultError::Overflow`] if the running
    /// delta would.
    pub fn debit(&mut self, token: TokenAddress, amount: u128) -> Result<()> {
        self.shift(token, to_signed(amount)?)
    }

    /// Records that the vault owes the external party `amount` more of
    /// `token`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`debit`](Self::debit).
    pub fn credit(&mut self, token: TokenAddress, amount: u128) -> Result<()> {
        let signed = to_signed(amount)?;
        self.shift(token, -signed)
    }

    fn shift(&mut self, token: TokenAddress, signed: i128) -> Result<()> {
        let entry = self.deltas.entry(token).or_insert(0);
        let was_nonzero = *entry != 0;
        *entry = entry
            .checked_add(signed)
            .ok_or(VaultError::Overflow("delta accumulation"))?;
        let is_nonzero = *entry != 0;
        match (was_nonzero, is_nonzero) {
            (false, true) => self.nonzero += 1,
            (true, false) => self.nonzero -= 1,
            _ => {}
        }
        Ok(())
    }

    /// Returns the cached reserve for `token` (zero if never observed).
    #[must_use]
    pub fn reserve(&self, token: TokenAddress) -> u128 {
        self.reserves.get(&token).copied().unwrap_or(0)
    }

    /// Overwrites the cached reserve for `token` with an observed
    /// balance.
    pub fn sync_reserve(&mut self, token: TokenAddress, observed: u128) {
        self.reserves.insert(token, observed);
    }

    /// Increases the cached reserve for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] on reserve overflow.
    pub fn add_reserve(&mut self, token: TokenAddress, amount: u128) -> Result<()> {
        let entry = self.reserves.entry(token).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(VaultError::Overflow("reserve accumulation"))?;
        Ok(())
    }

    /// Decreases the cached reserve for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InsufficientVaultReserve`] if the cache
    /// holds less than `amount`.
    pub fn sub_reserve(&mut self, token: TokenAddress, amount: u128) -> Result<()> {
        let entry = self.reserves.entry(token).or_insert(0);
        *entry = entry
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientVaultReserve {
                token,
                reserve: *entry,
                needed: amount,
            })?;
        Ok(())
    }

    /// Drops all deltas and the nonzero count. Reserves are kept: they
    /// describe actual holdings, not per-call obligations.
    pub fn clear_deltas(&mut self) {
        self.deltas.clear();
        self.nonzero = 0;
    }
}

/// Checked conversion into the signed delta domain.
fn to_signed(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| VaultError::AmountOverflow)
}
