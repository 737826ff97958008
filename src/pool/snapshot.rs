//! Ephemeral per-operation view of one pool.

use super::{PoolConfig, RegisteredPool, TokenConfig};
use crate::domain::{Rounding, TokenAddress};
use crate::error::Result;
use crate::math::scaling;

/// Everything an engine needs to know about a pool, assembled at the
/// start of an operation and discarded at its end.
///
/// All five per-token sequences have identical length equal to the
/// pool's registered token count, and index `i` refers to the same token
/// across all of them for the snapshot's lifetime.
///
/// A snapshot is a copy: it never observes state changes made after it
/// was built. Engines therefore rebuild it after any hook call, and may
/// use [`refresh_live`](Self::refresh_live) to re-read rates without
/// re-reading raw balances.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub(crate) tokens: Vec<TokenConfig>,
    pub(crate) balances_raw: Vec<u128>,
    pub(crate) balances_live_scaled18: Vec<u128>,
    pub(crate) decimal_scaling_factors: Vec<u128>,
    pub(crate) token_rates: Vec<u128>,
    pub(crate) config: PoolConfig,
}

impl PoolSnapshot {
    /// Assembles a snapshot from registered pool state, polling each
    /// token's rate provider and scaling raw balances to live balances
    /// in `rounding`'s direction.
    pub(crate) fn build(pool: &RegisteredPool, rounding: Rounding) -> Result<Self> {
        let tokens = pool.tokens.clone();
        let balances_raw = pool.balances_raw.clone();
        let decimal_scaling_factors: Vec<u128> = tokens
            .iter()
            .map(|t| t.token.decimals().scaling_factor())
            .collect();
        let token_rates: Vec<u128> = tokens.iter().map(TokenConfig::current_rate).collect();

        let mut snapshot = Self {
            tokens,
            balances_raw,
            balances_live_scaled18: Vec::new(),
            decimal_scaling_factors,
            token_rates,
            config: pool.config,
        };
        snapshot.recompute_live(rounding)?;
        Ok(snapshot)
    }

    /// Re-polls every token's rate provider and recomputes live
    /// balances in place, without re-reading raw balances.
    ///
    /// Calling this twice with no intervening state change yields
    /// identical live balances.
    pub fn refresh_live(&mut self, rounding: Rounding) -> Result<()> {
        for (rate, token) in self.token_rates.iter_mut().zip(&self.tokens) {
            *rate = token.current_rate();
        }
        self.recompute_live(rounding)
    }

    fn recompute_live(&mut self, rounding: Rounding) -> Result<()> {
        let mut live = Vec::with_capacity(self.balances_raw.len());
        for i in 0..self.balances_raw.len() {
            live.push(scaling::to_scaled_18(
                self.balances_raw[i],
                self.decimal_scaling_factors[i],
                self.token_rates[i],
                rounding,
            )?);
        }
        self.balances_live_scaled18 = live;
        Ok(())
    }

    /// Returns the pool-local index of `token`, if registered.
    #[must_use]
    pub fn index_of(&self, token: TokenAddress) -> Option<usize> {
        self.tokens
            .iter()
            .position(|t| t.token.address() == token)
    }

    /// Returns the registered token count.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Returns the token address at pool-local index `i`.
    #[must_use]
    pub fn token_address(&self, i: usize) -> TokenAddress {
        self.tokens[i].token.address()
    }

    /// Returns the live (scaled, rate-adjusted) balances.
    #[must_use]
    pub fn balances_live_scaled18(&self) -> &[u128] {
        &self.balances_live_scaled18
    }

    /// Returns the raw balances as of snapshot time.
    #[must_use]
    pub fn balances_raw(&self) -> &[u128] {
        &self.balances_raw
    }

    /// Returns the pool configuration as of snapshot time.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Scales a raw amount of token `i` to common precision.
    pub fn to_scaled_18(&self, i: usize, raw: u128, rounding: Rounding) -> Result<u128> {
        scaling::to_scaled_18(
            raw,
            self.decimal_scaling_factors[i],
            self.token_rates[i],
            rounding,
        )
    }

    /// Converts a common-precision amount of token `i` back to raw
    /// precision.
    pub fn to_raw(&self, i: usize, scaled18: u128, rounding: Rounding) -> Result<u128> {
        scaling::to_raw(
            scaled18,
            self.decimal_scaling_factors[i],
            self.token_rates[i],
            rounding,
        )
    }
}
