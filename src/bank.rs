//! In-memory fungible-token ledger.
//!
//! A minimal [`TokenLedger`] implementation: one balance table for any
//! number of tokens. It exists so the vault is usable standalone — in
//! tests, demos, and simulations — without a real token system behind
//! it.

use std::collections::HashMap;

use crate::domain::{Account, TokenAddress};
use crate::error::{Result, VaultError};
use crate::traits::TokenLedger;

/// Balance table keyed by `(token, holder)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<(TokenAddress, Account), u128>,
}

impl InMemoryTokenLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `token` to `to` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if the balance would overflow.
    pub fn mint(&mut self, token: TokenAddress, to: Account, amount: u128) -> Result<()> {
        let entry = self.balances.entry((token, to)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(VaultError::Overflow("token mint"))?;
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn balance_of(&self, token: TokenAddress, holder: Account) -> u128 {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: TokenAddress,
        from: Account,
        to: Account,
        amount: u128,
    ) -> Result<()> {
        let from_balance = self.balance_of(token, from);
        if from_balance < amount {
            return Err(VaultError::InsufficientTokenBalance {
                token,
                balance: from_balance,
                needed: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        self.balances.insert((token, from), from_balance - amount);
        let entry = self.balances.entry((token, to)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(VaultError::Overflow("token transfer"))?;
        Ok(())
    }
}
