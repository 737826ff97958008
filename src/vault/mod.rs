//! The vault: a single ledger for every pool's token balances.
//!
//! All value movement runs through one [`Vault`] instance. A top-level
//! caller opens a locked context with [`Vault::lock`], performs any
//! number of swaps, liquidity operations, and raw settlement calls
//! (possibly through nested re-entrant callbacks), and the context only
//! closes successfully if the delta ledger nets to exactly zero.
//!
//! This module holds the locker, the settlement primitives, and the
//! registration/admin surface; the `swap` and `liquidity` submodules
//! hold the two engines, `fees` the protocol fee accountant, and
//! `shares` the pool-share ledger.

mod fees;
mod liquidity;
mod shares;
mod swap;

pub use shares::ShareLedger;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::domain::{Account, BasisPoints, PoolId, Rounding, TokenAddress};
use crate::error::{Result, VaultError};
use crate::events::VaultEvent;
use crate::ledger::{DeltaLedger, LockerStack};
use crate::pool::{
    PoolConfig, PoolRegistration, PoolSnapshot, RegisteredPool, TokenConfig, MAX_TOKENS,
    MIN_TOKENS,
};
use crate::traits::{PoolBackend, PoolHooks, TokenLedger};

/// The accounting core of a multi-asset exchange vault.
///
/// Holds every pool's token balances, the transient delta ledger and
/// locker stack, the pool-share ledger, and the protocol-fee accrual.
/// Token transfers themselves are delegated to an external
/// [`TokenLedger`].
///
/// # Atomicity
///
/// Every locked context and every engine operation snapshots the vault's
/// accounting state on entry and restores it on failure, so no partial
/// balance or ledger mutation survives an error. State owned by
/// collaborators — hook internals, rate providers, the external token
/// ledger — is outside that boundary.
pub struct Vault {
    account: Account,
    tokens: Rc<RefCell<dyn TokenLedger>>,
    pools: HashMap<PoolId, RegisteredPool>,
    shares: ShareLedger,
    protocol_fees: HashMap<TokenAddress, u128>,
    protocol_swap_fee: BasisPoints,
    trusted_routers: HashSet<Account>,
    deltas: DeltaLedger,
    lockers: LockerStack,
    settling: bool,
    events: Vec<VaultEvent>,
}

/// Restorable accounting state, captured at lock and operation entry.
struct Checkpoint {
    pool_state: HashMap<PoolId, (Vec<u128>, bool)>,
    protocol_fees: HashMap<TokenAddress, u128>,
    deltas: DeltaLedger,
    shares: ShareLedger,
    events_len: usize,
    settling: bool,
}

impl Vault {
    /// Creates an empty vault settling against `tokens`, identified on
    /// that ledger as `account`.
    #[must_use]
    pub fn new(account: Account, tokens: Rc<RefCell<dyn TokenLedger>>) -> Self {
        Self {
            account,
            tokens,
            pools: HashMap::new(),
            shares: ShareLedger::new(),
            protocol_fees: HashMap::new(),
            protocol_swap_fee: BasisPoints::ZERO,
            trusted_routers: HashSet::new(),
            deltas: DeltaLedger::new(),
            lockers: LockerStack::new(),
            settling: false,
            events: Vec::new(),
        }
    }

    /// The vault's own identity on the external token ledger.
    #[must_use]
    pub fn account(&self) -> Account {
        self.account
    }

    // -- Locked contexts ----------------------------------------------------

    /// Opens a locked context for `caller` and runs `payload` inside it.
    ///
    /// Nested calls push further frames. When the outermost frame
    /// closes, every delta must be exactly zero, otherwise the whole
    /// context fails with [`VaultError::UnsettledBalance`] and all
    /// accounting changes made inside it are discarded.
    ///
    /// # Errors
    ///
    /// Propagates any error from `payload` after restoring the state
    /// captured at this frame's entry.
    pub fn lock<T>(
        &mut self,
        caller: Account,
        payload: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.lockers.push(caller);
        debug!(depth = self.lockers.depth(), %caller, "locker frame opened");
        let checkpoint = self.checkpoint();

        let result = payload(self);
        let outermost = self.lockers.depth() == 1;
        let result = result.and_then(|value| {
            if outermost {
                if !self.deltas.is_settled() {
                    return Err(VaultError::UnsettledBalance {
                        nonzero: self.deltas.nonzero_count(),
                    });
                }
                self.deltas.clear_deltas();
            }
            Ok(value)
        });

        if result.is_err() {
            self.restore(checkpoint);
        }
        self.lockers.pop();
        debug!(
            depth = self.lockers.depth(),
            settled = result.is_ok(),
            "locker frame closed"
        );
        result
    }

    /// Fails with [`VaultError::NoActiveLocker`] outside a locked
    /// context.
    pub(crate) fn require_locked(&self) -> Result<()> {
        if self.lockers.is_empty() {
            return Err(VaultError::NoActiveLocker);
        }
        Ok(())
    }

    /// Returns `true` while any locked context is active.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.lockers.is_empty()
    }

    // -- Settlement primitives ----------------------------------------------

    /// Credits the caller with any externally supplied deposit of
    /// `token`: the positive difference between the vault's actual
    /// holdings and its cached reserve. Returns the amount credited.
    ///
    /// # Errors
    ///
    /// Fails outside a locked context.
    pub fn settle(&mut self, token: TokenAddress) -> Result<u128> {
        self.require_locked()?;
        let actual = self.tokens.borrow().balance_of(token, self.account);
        let cached = self.deltas.reserve(token);
        let credited = actual.saturating_sub(cached);
        if credited > 0 {
            self.deltas.credit(token, credited)?;
        }
        self.deltas.sync_reserve(token, actual);
        trace!(%token, credited, "settle");
        Ok(credited)
    }

    /// Sends `amount` of `token` from the vault to `to`, debiting the
    /// caller. The debit and reserve decrement happen before the
    /// external transfer, so a re-entrant callee observes consistent
    /// ledger state.
    ///
    /// # Errors
    ///
    /// Fails outside a locked context, or if the vault's reserve or the
    /// token ledger cannot cover the transfer.
    pub fn send_to(&mut self, token: TokenAddress, to: Account, amount: u128) -> Result<()> {
        self.require_locked()?;
        self.transactional(|vault| {
            vault.deltas.debit(token, amount)?;
            vault.deltas.sub_reserve(token, amount)?;
            trace!(%token, %to, amount, "send_to");
            let vault_account = vault.account;
            vault
                .tokens
                .borrow_mut()
                .transfer(token, vault_account, to, amount)
        })
    }

    /// Pulls `amount` of `token` from `from` into the vault, crediting
    /// the caller. Restricted to trusted routers, because it moves a
    /// third party's tokens on the caller's say-so.
    ///
    /// # Errors
    ///
    /// Fails outside a locked context, if the current locker is not a
    /// trusted router, or if the token ledger rejects the transfer.
    pub fn take_from(&mut self, token: TokenAddress, from: Account, amount: u128) -> Result<()> {
        self.require_locked()?;
        let caller = self.lockers.current().ok_or(VaultError::NoActiveLocker)?;
        if !self.trusted_routers.contains(&caller) {
            return Err(VaultError::RouterNotTrusted(caller));
        }
        self.transactional(|vault| {
            vault.deltas.credit(token, amount)?;
            vault.deltas.add_reserve(token, amount)?;
            trace!(%token, %from, amount, "take_from");
            let vault_account = vault.account;
            vault
                .tokens
                .borrow_mut()
                .transfer(token, from, vault_account, amount)
        })
    }

    /// Returns the caller's outstanding delta for `token`.
    #[must_use]
    pub fn delta_of(&self, token: TokenAddress) -> i128 {
        self.deltas.delta(token)
    }

    // -- Registration and admin ---------------------------------------------

    /// Registers a pool. The token list and its order become the pool's
    /// canonical index space for its lifetime; balances start at zero
    /// and the pool must be initialized before it can trade.
    ///
    /// # Errors
    ///
    /// Rejects duplicate pool ids, token counts outside `2..=8`,
    /// duplicate tokens, swap fees of 100% or more, and hook flags
    /// without a hooks implementation.
    pub fn register_pool(&mut self, registration: PoolRegistration) -> Result<()> {
        let PoolRegistration {
            pool,
            tokens,
            config,
            backend,
            hooks,
        } = registration;

        if self.pools.contains_key(&pool) {
            return Err(VaultError::PoolAlreadyRegistered(pool));
        }
        if tokens.len() < MIN_TOKENS || tokens.len() > MAX_TOKENS {
            return Err(VaultError::InvalidTokenCount(tokens.len()));
        }
        for (i, a) in tokens.iter().enumerate() {
            for b in &tokens[i + 1..] {
                if a.token.address() == b.token.address() {
                    return Err(VaultError::InvalidTokenCount(tokens.len()));
                }
            }
        }
        if !config.static_swap_fee.is_valid_swap_fee() {
            return Err(VaultError::InvalidFeePercentage(
                "swap fee must be below 100%",
            ));
        }
        if config.hooks.any() && hooks.is_none() {
            return Err(VaultError::UnsupportedOperation(
                "hook flags require a hooks implementation",
            ));
        }

        let token_count = tokens.len();
        debug!(%pool, token_count, "pool registered");
        self.pools.insert(
            pool,
            RegisteredPool {
                tokens,
                balances_raw: vec![0; token_count],
                config,
                backend,
                hooks,
                initialized: false,
            },
        );
        Ok(())
    }

    /// Sets the protocol's share of collected swap fees.
    ///
    /// # Errors
    ///
    /// Rejects percentages above 100%.
    pub fn set_protocol_swap_fee(&mut self, fee: BasisPoints) -> Result<()> {
        if !fee.is_valid_percent() {
            return Err(VaultError::InvalidFeePercentage(
                "protocol fee must be at most 100%",
            ));
        }
        self.protocol_swap_fee = fee;
        Ok(())
    }

    /// Replaces a pool's static swap fee.
    ///
    /// # Errors
    ///
    /// Rejects unknown pools and fees of 100% or more.
    pub fn set_static_swap_fee(&mut self, pool: PoolId, fee: BasisPoints) -> Result<()> {
        if !fee.is_valid_swap_fee() {
            return Err(VaultError::InvalidFeePercentage(
                "swap fee must be below 100%",
            ));
        }
        self.pool_mut(pool)?.config.static_swap_fee = fee;
        Ok(())
    }

    /// Pauses or unpauses a pool.
    pub fn set_pool_paused(&mut self, pool: PoolId, paused: bool) -> Result<()> {
        self.pool_mut(pool)?.config.paused = paused;
        Ok(())
    }

    /// Enters or leaves recovery mode, which disables protocol-fee
    /// skimming for the pool.
    pub fn set_recovery_mode(&mut self, pool: PoolId, recovery: bool) -> Result<()> {
        self.pool_mut(pool)?.config.recovery_mode = recovery;
        Ok(())
    }

    /// Adds `router` to the allow-list for [`take_from`](Self::take_from).
    pub fn add_trusted_router(&mut self, router: Account) {
        self.trusted_routers.insert(router);
    }

    /// Removes `router` from the allow-list.
    pub fn remove_trusted_router(&mut self, router: Account) {
        self.trusted_routers.remove(&router);
    }

    // -- Shares -------------------------------------------------------------

    /// Returns the outstanding share supply of `pool`.
    #[must_use]
    pub fn total_supply(&self, pool: PoolId) -> u128 {
        self.shares.total_supply(pool)
    }

    /// Returns `owner`'s share balance in `pool`.
    #[must_use]
    pub fn share_balance(&self, pool: PoolId, owner: Account) -> u128 {
        self.shares.balance_of(pool, owner)
    }

    /// Grants `spender` the right to burn up to `amount` of `owner`'s
    /// shares when removing liquidity on their behalf.
    pub fn approve_shares(
        &mut self,
        pool: PoolId,
        owner: Account,
        spender: Account,
        amount: u128,
    ) {
        self.shares.approve(pool, owner, spender, amount);
    }

    // -- Inspection ---------------------------------------------------------

    /// Returns a pool's raw balances in registration order.
    pub fn pool_balances(&self, pool: PoolId) -> Result<Vec<u128>> {
        Ok(self.pool(pool)?.balances_raw.clone())
    }

    /// Returns a pool's registered token configurations.
    pub fn pool_tokens(&self, pool: PoolId) -> Result<Vec<TokenConfig>> {
        Ok(self.pool(pool)?.tokens.clone())
    }

    /// Returns a pool's current configuration.
    pub fn pool_config(&self, pool: PoolId) -> Result<PoolConfig> {
        Ok(self.pool(pool)?.config)
    }

    /// Builds a fresh snapshot of `pool`, scaling live balances in
    /// `rounding`'s direction.
    pub fn snapshot_pool(&self, pool: PoolId, rounding: Rounding) -> Result<PoolSnapshot> {
        PoolSnapshot::build(self.pool(pool)?, rounding)
    }

    /// Drains and returns all buffered events.
    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the buffered events without draining them.
    #[must_use]
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    // -- Internal plumbing --------------------------------------------------

    pub(crate) fn pool(&self, pool: PoolId) -> Result<&RegisteredPool> {
        self.pools
            .get(&pool)
            .ok_or(VaultError::PoolNotRegistered(pool))
    }

    pub(crate) fn pool_mut(&mut self, pool: PoolId) -> Result<&mut RegisteredPool> {
        self.pools
            .get_mut(&pool)
            .ok_or(VaultError::PoolNotRegistered(pool))
    }

    /// Clones the handles an engine needs so it can call out to
    /// collaborator code without borrowing the registry.
    pub(crate) fn pool_parts(
        &self,
        pool: PoolId,
    ) -> Result<(Rc<dyn PoolBackend>, Option<Rc<dyn PoolHooks>>, PoolConfig, bool)> {
        let entry = self.pool(pool)?;
        Ok((
            entry.backend.clone(),
            entry.hooks.clone(),
            entry.config,
            entry.initialized,
        ))
    }

    pub(crate) fn current_locker(&self) -> Result<Account> {
        self.lockers.current().ok_or(VaultError::NoActiveLocker)
    }

    pub(crate) fn record_event(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    pub(crate) fn shares_mut(&mut self) -> &mut ShareLedger {
        &mut self.shares
    }

    pub(crate) fn deltas_mut(&mut self) -> &mut DeltaLedger {
        &mut self.deltas
    }

    pub(crate) fn protocol_swap_fee(&self) -> BasisPoints {
        self.protocol_swap_fee
    }

    pub(crate) fn accrue_protocol_fee(
        &mut self,
        token: TokenAddress,
        amount_raw: u128,
    ) -> Result<()> {
        let entry = self.protocol_fees.entry(token).or_insert(0);
        *entry = entry
            .checked_add(amount_raw)
            .ok_or(VaultError::Overflow("protocol fee accrual"))?;
        Ok(())
    }

    /// Runs `f` and restores the entry state if it fails, so a failed
    /// operation leaves no partial mutation behind even when the caller
    /// catches the error and carries on inside the same locked context.
    pub(crate) fn transactional<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                self.restore(checkpoint);
                Err(error)
            }
        }
    }

    /// Runs `f` under the settlement re-entrancy guard: the guard is
    /// distinct from the locker stack and only forbids recursive entry
    /// into the balance-mutation path, leaving every other vault entry
    /// point open to callbacks.
    pub(crate) fn with_settlement_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.settling {
            return Err(VaultError::ReentrantSettlement);
        }
        self.settling = true;
        let result = f(self);
        self.settling = false;
        result
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pool_state: self
                .pools
                .iter()
                .map(|(id, p)| (*id, (p.balances_raw.clone(), p.initialized)))
                .collect(),
            protocol_fees: self.protocol_fees.clone(),
            deltas: self.deltas.clone(),
            shares: self.shares.clone(),
            events_len: self.events.len(),
            settling: self.settling,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        for (id, (balances, initialized)) in checkpoint.pool_state {
            if let Some(pool) = self.pools.get_mut(&id) {
                pool.balances_raw = balances;
                pool.initialized = initialized;
            }
        }
        self.protocol_fees = checkpoint.protocol_fees;
        self.deltas = checkpoint.deltas;
        self.shares = checkpoint.shares;
        self.events.truncate(checkpoint.events_len);
        self.settling = checkpoint.settling;
    }
}
