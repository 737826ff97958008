//! Pure arithmetic for the vault.
//!
//! Three layers, each building on the previous:
//!
//! - [`fixed_point`] — overflow-safe `mul_div` over `u128` with 256-bit
//!   intermediates and an explicit [`Rounding`](crate::domain::Rounding)
//!   direction.
//! - [`scaling`] — conversions between a token's native precision and
//!   the common 18-decimal, rate-adjusted precision.
//! - [`pool_math`] — share accounting for proportional, unbalanced, and
//!   single-token liquidity operations, parameterized by a callback into
//!   the pool's own invariant and balance functions.
//!
//! All functions here are pure: no vault state, no side effects, errors
//! instead of panics.

pub mod fixed_point;
pub mod pool_math;
pub mod scaling;

pub use fixed_point::{mul_div, WAD};
