//! Events emitted by vault operations.

use crate::domain::{Account, PoolId, TokenAddress};

/// One event recorded during a vault operation.
///
/// The vault buffers events internally; callers drain them with
/// [`Vault::drain_events`](crate::vault::Vault::drain_events). Events
/// recorded inside a failed operation are discarded along with its
/// state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VaultEvent {
    /// A completed swap, with raw settled amounts and the raw protocol
    /// fee charged.
    Swap {
        /// Pool swapped against.
        pool: PoolId,
        /// Token supplied by the caller.
        token_in: TokenAddress,
        /// Token received by the caller.
        token_out: TokenAddress,
        /// Raw input amount.
        amount_in_raw: u128,
        /// Raw output amount.
        amount_out_raw: u128,
        /// Raw protocol fee skimmed from the out token.
        protocol_fee_raw: u128,
    },
    /// Pool balances changed through a liquidity operation.
    PoolBalanceChanged {
        /// Pool that was modified.
        pool: PoolId,
        /// Party whose shares were minted or burned.
        party: Account,
        /// Token addresses, pool token order.
        tokens: Vec<TokenAddress>,
        /// Signed raw balance deltas, positive for deposits.
        deltas: Vec<i128>,
    },
    /// The protocol fee accountant skimmed a fee into the accrual.
    ProtocolFeeCharged {
        /// Pool whose fee was skimmed.
        pool: PoolId,
        /// Token the fee is denominated in.
        token: TokenAddress,
        /// Raw amount added to the accrual.
        amount_raw: u128,
    },
}
