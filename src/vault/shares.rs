//! Pool-share accounting.
//!
//! A standard fungible ledger per pool: supply, balances, allowances.
//! Minting and burning happen only inside the liquidity engine's
//! settlement pass, because pricing for some operation kinds depends on
//! the current supply.

use std::collections::HashMap;

use crate::domain::{Account, PoolId};
use crate::error::{Result, VaultError};

/// Share supply and holdings for every registered pool.
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    supplies: HashMap<PoolId, u128>,
    balances: HashMap<(PoolId, Account), u128>,
    allowances: HashMap<(PoolId, Account, Account), u128>,
}

impl ShareLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding share supply of `pool`.
    #[must_use]
    pub fn total_supply(&self, pool: PoolId) -> u128 {
        self.supplies.get(&pool).copied().unwrap_or(0)
    }

    /// Returns `owner`'s share balance in `pool`.
    #[must_use]
    pub fn balance_of(&self, pool: PoolId, owner: Account) -> u128 {
        self.balances.get(&(pool, owner)).copied().unwrap_or(0)
    }

    /// Returns the allowance `owner` granted `spender` in `pool`.
    #[must_use]
    pub fn allowance(&self, pool: PoolId, owner: Account, spender: Account) -> u128 {
        self.allowances
            .get(&(pool, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Grants `spender` the right to burn up to `amount` of `owner`'s
    /// shares. `u128::MAX` is treated as unlimited and never decremented.
    pub fn approve(&mut self, pool: PoolId, owner: Account, spender: Account, amount: u128) {
        self.allowances.insert((pool, owner, spender), amount);
    }

    /// Consumes `amount` from `spender`'s allowance over `owner`'s
    /// shares.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AllowanceExceeded`] if the allowance is too
    /// small.
    pub fn spend_allowance(
        &mut self,
        pool: PoolId,
        owner: Account,
        spender: Account,
        amount: u128,
    ) -> Result<()> {
        let allowance = self.allowance(pool, owner, spender);
        if allowance == u128::MAX {
            return Ok(());
        }
        if allowance < amount {
            return Err(VaultError::AllowanceExceeded {
                allowance,
                needed: amount,
            });
        }
        self.allowances
            .insert((pool, owner, spender), allowance - amount);
        Ok(())
    }

    /// Mints `amount` shares of `pool` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] on supply or balance overflow.
    pub fn mint(&mut self, pool: PoolId, to: Account, amount: u128) -> Result<()> {
        let supply = self.supplies.entry(pool).or_insert(0);
        *supply = supply
            .checked_add(amount)
            .ok_or(VaultError::Overflow("share supply"))?;
        let balance = self.balances.entry((pool, to)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(VaultError::Overflow("share balance"))?;
        Ok(())
    }

    /// Burns `amount` shares of `pool` from `from`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InsufficientShares`] if `from` holds less
    /// than `amount`.
    pub fn burn(&mut self, pool: PoolId, from: Account, amount: u128) -> Result<()> {
        let balance = self.balances.entry((pool, from)).or_insert(0);
        if *balance < amount {
            return Err(VaultError::InsufficientShares {
                balance: *balance,
                needed: amount,
            });
        }
        *balance -= amount;
        let supply = self.supplies.entry(pool).or_insert(0);
        // Supply is the sum of balances, so the subtraction cannot fail
        // if balances never did.
        *supply = supply
            .checked_sub(amount)
            .ok_or(VaultError::Underflow("share supply"))?;
        Ok(())
    }
}
