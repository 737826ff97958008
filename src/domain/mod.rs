//! Fundamental domain value types used throughout the vault.
//!
//! This module contains the core value types that model the vault domain:
//! token and party identities, decimal precisions, fee percentages, the
//! explicit rounding direction, and the swap / liquidity request and
//! result types. All types use newtypes with validated constructors to
//! enforce invariants.

mod account;
mod basis_points;
mod decimals;
mod liquidity;
mod pool_id;
mod rounding;
mod swap;
mod token;
mod token_address;

pub use account::Account;
pub use basis_points::BasisPoints;
pub use decimals::Decimals;
pub use liquidity::{
    AddLiquidityKind, AddLiquidityOutcome, AddLiquidityParams, RemoveLiquidityKind,
    RemoveLiquidityOutcome, RemoveLiquidityParams,
};
pub use pool_id::PoolId;
pub use rounding::Rounding;
pub use swap::{SwapComputeRequest, SwapKind, SwapOutcome, SwapParams};
pub use token::Token;
pub use token_address::TokenAddress;

/// Writes the first four bytes of a 32-byte identity as hex, followed by
/// an ellipsis. Shared by the `Display` impls of the identity newtypes.
pub(crate) fn write_short_hex(
    f: &mut core::fmt::Formatter<'_>,
    bytes: &[u8; 32],
) -> core::fmt::Result {
    for b in &bytes[..4] {
        write!(f, "{b:02x}")?;
    }
    write!(f, "…")
}
