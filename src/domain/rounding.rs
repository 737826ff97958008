//! Explicit rounding direction for arithmetic operations.

/// Specifies the rounding direction for division and scaling operations.
///
/// Every conversion between raw and common precision, and every fee or
/// share computation, takes an explicit `Rounding` parameter. The
/// direction is always chosen so that rounding error favors the vault,
/// never the caller: amounts entering further math round down when they
/// represent value the vault will pay out, and up when they represent
/// value the vault will collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
