//! Convenience re-exports for common types and traits.
//!
//! A single import brings the frequently used surface into scope:
//!
//! ```rust
//! use basin::prelude::*;
//! ```

pub use crate::domain::{
    Account, AddLiquidityKind, AddLiquidityOutcome, AddLiquidityParams, BasisPoints, Decimals,
    PoolId, RemoveLiquidityKind, RemoveLiquidityOutcome, RemoveLiquidityParams, Rounding,
    SwapKind, SwapOutcome, SwapParams, Token, TokenAddress,
};
pub use crate::error::{Result, VaultError};
pub use crate::events::VaultEvent;
pub use crate::pool::{HookFlags, PoolConfig, PoolRegistration, TokenConfig};
pub use crate::traits::{PoolBackend, PoolHooks, RateProvider, TokenLedger};
pub use crate::vault::Vault;
