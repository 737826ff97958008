//! Per-pool registered state and the ephemeral operation snapshot.

mod config;
mod snapshot;

pub use config::{HookFlags, PoolConfig, PoolRegistration, TokenConfig};
pub use snapshot::PoolSnapshot;

use std::rc::Rc;

use crate::traits::{PoolBackend, PoolHooks};

/// Minimum tokens a pool may register.
pub const MIN_TOKENS: usize = 2;

/// Maximum tokens a pool may register.
pub const MAX_TOKENS: usize = 8;

/// A pool as the vault's registry stores it.
///
/// The token list and its order are fixed at registration; that order is
/// the canonical index space every per-token sequence uses.
pub(crate) struct RegisteredPool {
    pub(crate) tokens: Vec<TokenConfig>,
    pub(crate) balances_raw: Vec<u128>,
    pub(crate) config: PoolConfig,
    pub(crate) backend: Rc<dyn PoolBackend>,
    pub(crate) hooks: Option<Rc<dyn PoolHooks>>,
    pub(crate) initialized: bool,
}
