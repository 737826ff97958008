//! Collaborator seams consumed by the vault.
//!
//! The vault core deliberately knows nothing about pricing curves, token
//! transfer mechanics, or exchange-rate sources. Each of those concerns
//! enters through one trait here:
//!
//! - [`PoolBackend`] — the pool's pricing and invariant math, plus the
//!   optional custom liquidity callbacks and the dynamic-fee override.
//! - [`PoolHooks`] — before/after callbacks around swaps and liquidity
//!   operations; hooks receive `&mut Vault` and may re-enter it.
//! - [`RateProvider`] — per-token exchange rates for the scaling
//!   pipeline.
//! - [`TokenLedger`] — the external token-transfer primitive and balance
//!   oracle.

mod backend;
mod hooks;
mod rate;
mod tokens;

pub use backend::{
    CustomAddLiquidityParams, CustomLiquidityResult, CustomRemoveLiquidityParams, PoolBackend,
};
pub use hooks::{
    AfterLiquidityHookParams, AfterSwapHookParams, BeforeLiquidityHookParams,
    BeforeSwapHookParams, PoolHooks,
};
pub use rate::RateProvider;
pub use tokens::TokenLedger;
