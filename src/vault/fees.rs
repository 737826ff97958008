//! Protocol fee accountant.

use tracing::trace;

use super::Vault;
use crate::domain::{Account, PoolId, Rounding, TokenAddress};
use crate::error::Result;
use crate::events::VaultEvent;
use crate::pool::PoolSnapshot;

impl Vault {
    /// Skims the protocol's cut of a collected swap fee into the
    /// persistent accrual for the fee token, and returns the raw amount
    /// skimmed so the engine can subtract it from pool balances.
    ///
    /// No-op when the fee amount is zero, the protocol percentage is
    /// zero, or the pool is in recovery mode. The cut always rounds
    /// down: protocol revenue is conservative relative to the pool.
    pub(crate) fn charge_protocol_fee(
        &mut self,
        pool: PoolId,
        snapshot: &PoolSnapshot,
        index: usize,
        fee_amount_scaled18: u128,
    ) -> Result<u128> {
        if fee_amount_scaled18 == 0
            || self.protocol_swap_fee().is_zero()
            || snapshot.config().recovery_mode
        {
            return Ok(0);
        }
        let cut_scaled18 = self
            .protocol_swap_fee()
            .apply(fee_amount_scaled18, Rounding::Down)?;
        let cut_raw = snapshot.to_raw(index, cut_scaled18, Rounding::Down)?;
        if cut_raw == 0 {
            return Ok(0);
        }
        let token = snapshot.token_address(index);
        self.accrue_protocol_fee(token, cut_raw)?;
        trace!(%pool, %token, cut_raw, "protocol fee charged");
        self.record_event(VaultEvent::ProtocolFeeCharged {
            pool,
            token,
            amount_raw: cut_raw,
        });
        Ok(cut_raw)
    }

    /// Returns the accrued protocol fees for `token`.
    #[must_use]
    pub fn protocol_fees_of(&self, token: TokenAddress) -> u128 {
        self.protocol_fees.get(&token).copied().unwrap_or(0)
    }

    /// Withdraws the entire accrual for `token` to `to`, returning the
    /// amount withdrawn.
    ///
    /// Accrued fees are vault holdings excluded from every pool's
    /// balances, so the withdrawal bypasses the delta ledger and moves
    /// tokens directly.
    ///
    /// # Errors
    ///
    /// Fails if the vault's reserve or the token ledger cannot cover the
    /// transfer.
    pub fn collect_protocol_fees(&mut self, token: TokenAddress, to: Account) -> Result<u128> {
        let amount = self.protocol_fees_of(token);
        if amount == 0 {
            return Ok(0);
        }
        self.deltas_mut().sub_reserve(token, amount)?;
        self.protocol_fees.insert(token, 0);
        let vault_account = self.account();
        self.tokens
            .borrow_mut()
            .transfer(token, vault_account, to, amount)?;
        Ok(amount)
    }
}
