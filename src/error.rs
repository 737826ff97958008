//! Unified error type for the vault.
//!
//! Every fallible operation across the crate returns [`VaultError`]. No
//! error is swallowed or retried internally: a failure at any step of a
//! swap or liquidity operation unwinds the whole top-level call, and the
//! vault restores its accounting state as of the enclosing locked
//! context's entry.

use thiserror::Error;

use crate::domain::{Account, PoolId, TokenAddress};

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, VaultError>;

/// All failure conditions the vault can report.
///
/// Variants carry the operands a caller needs to diagnose the violation
/// (computed vs. limit amounts, the offending token or pool). None of
/// these are retryable; each aborts the entire top-level operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    // -- Precondition violations --------------------------------------------
    /// A swap was requested with a zero given amount.
    #[error("amount given is zero")]
    AmountGivenZero,

    /// `token_in` and `token_out` are the same token.
    #[error("cannot swap a token for itself")]
    CannotSwapSameToken,

    /// The pool id is not present in the registry.
    #[error("pool {0} is not registered")]
    PoolNotRegistered(PoolId),

    /// A pool id was registered twice.
    #[error("pool {0} is already registered")]
    PoolAlreadyRegistered(PoolId),

    /// The pool has no seeded balances or share supply yet.
    #[error("pool {0} is not initialized")]
    PoolNotInitialized(PoolId),

    /// `initialize` was called on a pool that already has supply.
    #[error("pool {0} is already initialized")]
    PoolAlreadyInitialized(PoolId),

    /// The token is not part of the pool's registered token list.
    #[error("token {0} is not registered in the pool")]
    TokenNotRegistered(TokenAddress),

    /// A pool must register between two and eight distinct tokens.
    #[error("invalid token count: {0}")]
    InvalidTokenCount(usize),

    /// A per-token input sequence does not match the pool's token count.
    #[error("input length mismatch: expected {expected}, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },

    /// A single-token operation needs exactly one nonzero per-token amount.
    #[error("exactly one nonzero per-token amount is required")]
    ExactlyOneNonzeroAmountRequired,

    /// The pool does not declare the custom add-liquidity capability.
    #[error("pool {0} does not support custom add liquidity")]
    DoesNotSupportAddLiquidityCustom(PoolId),

    /// The pool does not declare the custom remove-liquidity capability.
    #[error("pool {0} does not support custom remove liquidity")]
    DoesNotSupportRemoveLiquidityCustom(PoolId),

    /// An operation the collaborator does not implement was requested.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    // -- Policy violations ---------------------------------------------------
    /// The pool is paused for swaps and liquidity operations.
    #[error("pool {0} is paused")]
    PoolPaused(PoolId),

    /// The swap output (exact-in) or input (exact-out) violated the
    /// caller's slippage limit.
    #[error("swap limit exceeded: amount {amount}, limit {limit}")]
    SwapLimitExceeded { amount: u128, limit: u128 },

    /// Computed pool shares fell below the caller's minimum.
    #[error("share amount {amount} below minimum {min}")]
    BptBelowMin { amount: u128, min: u128 },

    /// Computed pool shares exceeded the caller's maximum.
    #[error("share amount {amount} above maximum {max}")]
    BptAboveMax { amount: u128, max: u128 },

    /// A per-token input exceeded the caller's bound for that token.
    #[error("amount in {amount} for token {token} above maximum {max}")]
    AmountInAboveMax {
        token: TokenAddress,
        amount: u128,
        max: u128,
    },

    /// A per-token output fell below the caller's bound for that token.
    #[error("amount out {amount} for token {token} below minimum {min}")]
    AmountOutBelowMin {
        token: TokenAddress,
        amount: u128,
        min: u128,
    },

    /// `take_from` was invoked by a caller outside the router allow-list.
    #[error("caller {0} is not a trusted router")]
    RouterNotTrusted(Account),

    // -- Hook failures -------------------------------------------------------
    /// The pool's before-swap hook returned failure.
    #[error("before-swap hook rejected the operation")]
    BeforeSwapHookFailed,

    /// The pool's after-swap hook returned failure.
    #[error("after-swap hook rejected the operation")]
    AfterSwapHookFailed,

    /// The pool's before-add-liquidity hook returned failure.
    #[error("before-add-liquidity hook rejected the operation")]
    BeforeAddLiquidityHookFailed,

    /// The pool's after-add-liquidity hook returned failure.
    #[error("after-add-liquidity hook rejected the operation")]
    AfterAddLiquidityHookFailed,

    /// The pool's before-remove-liquidity hook returned failure.
    #[error("before-remove-liquidity hook rejected the operation")]
    BeforeRemoveLiquidityHookFailed,

    /// The pool's after-remove-liquidity hook returned failure.
    #[error("after-remove-liquidity hook rejected the operation")]
    AfterRemoveLiquidityHookFailed,

    // -- Ledger-integrity violations -----------------------------------------
    /// A value-moving call ran outside an active locked context.
    #[error("no active locker")]
    NoActiveLocker,

    /// The outermost locked context closed with outstanding deltas.
    #[error("unsettled balances: {nonzero} tokens with nonzero deltas")]
    UnsettledBalance { nonzero: usize },

    /// A hook attempted to re-enter the balance-mutation path of an
    /// in-flight operation.
    #[error("reentrant settlement")]
    ReentrantSettlement,

    // -- Balance violations --------------------------------------------------
    /// A pool balance would go negative.
    #[error("insufficient pool balance for token {token}: have {balance}, need {needed}")]
    InsufficientPoolBalance {
        token: TokenAddress,
        balance: u128,
        needed: u128,
    },

    /// The vault's cached reserve of a token would go negative.
    #[error("insufficient vault reserve for token {token}: have {reserve}, need {needed}")]
    InsufficientVaultReserve {
        token: TokenAddress,
        reserve: u128,
        needed: u128,
    },

    /// A share burn exceeds the holder's balance.
    #[error("insufficient shares: have {balance}, need {needed}")]
    InsufficientShares { balance: u128, needed: u128 },

    /// A share spend exceeds the granted allowance.
    #[error("share allowance exceeded: allowed {allowance}, need {needed}")]
    AllowanceExceeded { allowance: u128, needed: u128 },

    /// A token transfer exceeds the sender's balance.
    #[error("insufficient token balance for {token}: have {balance}, need {needed}")]
    InsufficientTokenBalance {
        token: TokenAddress,
        balance: u128,
        needed: u128,
    },

    // -- Arithmetic ----------------------------------------------------------
    /// An unsigned amount does not fit the signed delta representation.
    #[error("amount does not fit the signed delta range")]
    AmountOverflow,

    /// Arithmetic overflow; the payload names the computation.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow; the payload names the computation.
    #[error("arithmetic underflow in {0}")]
    Underflow(&'static str),

    /// Division by zero; the payload names the computation.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),

    /// A decimal count outside the supported `0..=18` range.
    #[error("invalid decimals: {0}")]
    InvalidDecimals(&'static str),

    /// A fee percentage outside the valid range.
    #[error("invalid fee percentage: {0}")]
    InvalidFeePercentage(&'static str),
}
