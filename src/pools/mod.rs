//! Reference pricing backends.
//!
//! Two deliberately small [`PoolBackend`](crate::traits::PoolBackend)
//! implementations, usable as-is and as templates for real curves:
//!
//! - [`ConstantSumPool`] — 1:1 pricing, invariant is the balance sum.
//!   Exact arithmetic makes it the backend of choice for tests.
//! - [`ConstantProductPool`] — two-token `x · y = k` pricing with a
//!   geometric-mean invariant.

mod constant_product;
mod constant_sum;

pub use constant_product::ConstantProductPool;
pub use constant_sum::ConstantSumPool;
