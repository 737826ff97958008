//! External token-transfer primitive.

use crate::domain::{Account, TokenAddress};
use crate::error::Result;

/// The fungible-token ledger the vault settles against.
///
/// The vault never moves tokens itself; it asks this collaborator. The
/// trait is deliberately minimal: a balance oracle plus a transfer. The
/// vault derives externally supplied deposits by comparing
/// `balance_of(token, vault)` against its cached reserve, so
/// implementations must report balances that reflect every completed
/// transfer, including ones made behind the vault's back.
pub trait TokenLedger {
    /// Returns `holder`'s balance of `token` in raw precision.
    fn balance_of(&self, token: TokenAddress, holder: Account) -> u128;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`VaultError::InsufficientTokenBalance`](crate::error::VaultError::InsufficientTokenBalance)
    /// if `from` holds less than `amount`.
    fn transfer(
        &mut self,
        token: TokenAddress,
        from: Account,
        to: Account,
        amount: u128,
    ) -> Result<()>;
}
