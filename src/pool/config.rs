//! Pool configuration: capability flags and per-token settings.

use core::fmt;
use std::rc::Rc;

use crate::domain::{BasisPoints, PoolId, Token};
use crate::math::fixed_point::WAD;
use crate::traits::{PoolBackend, PoolHooks, RateProvider};

/// Which hook callbacks a pool has enabled.
///
/// The engines branch on these flags, not on the hook object: a flag
/// that is off skips the callback entirely even if a hooks object is
/// attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookFlags {
    /// Run the before-swap callback.
    pub before_swap: bool,
    /// Run the after-swap callback.
    pub after_swap: bool,
    /// Run the before-add-liquidity callback.
    pub before_add_liquidity: bool,
    /// Run the after-add-liquidity callback.
    pub after_add_liquidity: bool,
    /// Run the before-remove-liquidity callback.
    pub before_remove_liquidity: bool,
    /// Run the after-remove-liquidity callback.
    pub after_remove_liquidity: bool,
}

impl HookFlags {
    /// Returns `true` if any callback is enabled.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.before_swap
            || self.after_swap
            || self.before_add_liquidity
            || self.after_add_liquidity
            || self.before_remove_liquidity
            || self.after_remove_liquidity
    }
}

/// Per-pool configuration fixed at registration (fees and capability
/// flags) or toggled by admin operations (pause, recovery mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// The pool's static swap fee. A backend may override it per swap
    /// via its dynamic-fee callback.
    pub static_swap_fee: BasisPoints,
    /// Enabled hook callbacks.
    pub hooks: HookFlags,
    /// Paused pools reject swaps and liquidity operations.
    pub paused: bool,
    /// In recovery mode, protocol-fee skimming is disabled.
    pub recovery_mode: bool,
    /// The pool implements the custom add-liquidity callback.
    pub supports_add_liquidity_custom: bool,
    /// The pool implements the custom remove-liquidity callback.
    pub supports_remove_liquidity_custom: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            static_swap_fee: BasisPoints::ZERO,
            hooks: HookFlags::default(),
            paused: false,
            recovery_mode: false,
            supports_add_liquidity_custom: false,
            supports_remove_liquidity_custom: false,
        }
    }
}

/// One registered token of a pool.
#[derive(Clone)]
pub struct TokenConfig {
    /// Token identity (address and native decimals).
    pub token: Token,
    /// Optional exchange-rate source. `None` means a constant rate of
    /// one.
    pub rate_provider: Option<Rc<dyn RateProvider>>,
    /// Exempt from yield fees on rate appreciation.
    pub yield_fee_exempt: bool,
}

impl TokenConfig {
    /// A token with no rate provider and no exemptions.
    #[must_use]
    pub fn standard(token: Token) -> Self {
        Self {
            token,
            rate_provider: None,
            yield_fee_exempt: false,
        }
    }

    /// A token whose live balance is adjusted by an external rate.
    #[must_use]
    pub fn with_rate_provider(token: Token, provider: Rc<dyn RateProvider>) -> Self {
        Self {
            token,
            rate_provider: Some(provider),
            yield_fee_exempt: false,
        }
    }

    /// Reads the current rate: the provider's answer, or one.
    #[must_use]
    pub fn current_rate(&self) -> u128 {
        self.rate_provider.as_ref().map_or(WAD, |p| p.rate())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("token", &self.token)
            .field("has_rate_provider", &self.rate_provider.is_some())
            .field("yield_fee_exempt", &self.yield_fee_exempt)
            .finish()
    }
}

/// Everything needed to register a pool.
#[derive(Clone)]
pub struct PoolRegistration {
    /// Registry key.
    pub pool: PoolId,
    /// Token list; the order becomes the pool's canonical index space.
    pub tokens: Vec<TokenConfig>,
    /// Initial configuration.
    pub config: PoolConfig,
    /// Pricing backend.
    pub backend: Rc<dyn PoolBackend>,
    /// Hook callbacks; required if any hook flag is set.
    pub hooks: Option<Rc<dyn PoolHooks>>,
}
