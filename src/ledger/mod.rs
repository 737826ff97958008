//! Transient accounting: the delta ledger and the locker stack.
//!
//! Both structures live for exactly one top-level locked context. The
//! [`DeltaLedger`] records who owes what; the [`LockerStack`] records
//! how deep the nested re-entry into the vault currently is, and the
//! vault checks settlement only when the outermost frame closes.

mod deltas;
mod locker;

pub use deltas::DeltaLedger;
pub use locker::LockerStack;
