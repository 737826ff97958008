//! Per-token exchange-rate source.

/// Supplies the current exchange rate of one token, WAD-scaled.
///
/// A rate of `1e18` means the token trades at face value; a
/// yield-bearing wrapper whose underlying has appreciated 5% reports
/// `1.05e18`. Tokens registered without a provider are treated as having
/// a constant rate of one.
///
/// Rates are re-read on every snapshot build and refresh: a provider is
/// external code whose answer may change between any two calls, which is
/// exactly why engines re-derive live balances after hooks.
pub trait RateProvider {
    /// Returns the current rate, scaled by `1e18`.
    fn rate(&self) -> u128;
}
