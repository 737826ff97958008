//! # Basin
//!
//! The accounting core of a multi-asset exchange vault: a single ledger
//! that holds every pool's token balances, mediates all value-moving
//! operations — swap, add liquidity, remove liquidity, raw settlement —
//! and guarantees that no operation can ever let more value leave the
//! ledger than entered it, even when untrusted callbacks re-enter the
//! vault mid-operation.
//!
//! Pricing curves, hook logic, exchange rates, and the token-transfer
//! primitive are all pluggable collaborators behind traits; the vault
//! owns delta tracking, balance scaling, fee skimming, and settlement.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`vault`] | The [`Vault`](vault::Vault): locked contexts, settlement primitives, swap and liquidity engines |
//! | [`domain`] | Validated value types: identities, decimals, fees, rounding, request/result types |
//! | [`math`] | 256-bit-safe `mul_div`, precision scaling, pool-share math |
//! | [`ledger`] | The per-call delta ledger and the locker stack |
//! | [`pool`] | Pool configuration, capability flags, and the operation snapshot |
//! | [`traits`] | Collaborator seams: pricing backends, hooks, rate providers, token ledgers |
//! | [`pools`] | Reference pricing backends (constant-sum, constant-product) |
//! | [`bank`] | In-memory token ledger for standalone use |
//! | [`events`] | Events recorded by vault operations |
//! | [`error`] | The crate-wide error type |
//!
//! # Quick Start
//!
//! Register a pool, seed it, and swap — all value movement inside
//! locked contexts that must settle to zero:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use basin::bank::InMemoryTokenLedger;
//! use basin::domain::{Account, Decimals, PoolId, SwapKind, SwapParams, Token, TokenAddress};
//! use basin::math::WAD;
//! use basin::pool::{PoolConfig, PoolRegistration, TokenConfig};
//! use basin::pools::ConstantSumPool;
//! use basin::vault::Vault;
//!
//! // 1. A vault settling against an in-memory token ledger.
//! let bank = Rc::new(RefCell::new(InMemoryTokenLedger::new()));
//! let mut vault = Vault::new(Account::from_bytes([0xFF; 32]), bank.clone());
//!
//! // 2. Two 18-decimal tokens and a constant-sum pool over them.
//! let usdc = Token::new(TokenAddress::from_bytes([1u8; 32]), Decimals::MAX);
//! let dai = Token::new(TokenAddress::from_bytes([2u8; 32]), Decimals::MAX);
//! let pool = PoolId::from_bytes([7u8; 32]);
//! vault
//!     .register_pool(PoolRegistration {
//!         pool,
//!         tokens: vec![TokenConfig::standard(usdc), TokenConfig::standard(dai)],
//!         config: PoolConfig::default(),
//!         backend: Rc::new(ConstantSumPool::new()),
//!         hooks: None,
//!     })
//!     .expect("pool registered");
//!
//! // 3. A funded router allowed to pull tokens into the vault.
//! let router = Account::from_bytes([9u8; 32]);
//! vault.add_trusted_router(router);
//! for token in [usdc.address(), dai.address()] {
//!     bank.borrow_mut().mint(token, router, 2_000 * WAD).expect("minted");
//! }
//!
//! // 4. Seed the pool inside a locked context; deposits and debits net
//! //    to zero, so the context closes cleanly.
//! vault
//!     .lock(router, |vault| {
//!         vault.initialize(pool, router, &[1_000 * WAD, 1_000 * WAD])?;
//!         vault.take_from(usdc.address(), router, 1_000 * WAD)?;
//!         vault.take_from(dai.address(), router, 1_000 * WAD)?;
//!         Ok(())
//!     })
//!     .expect("pool seeded");
//!
//! // 5. Swap 100 USDC for DAI and settle both legs.
//! let outcome = vault
//!     .lock(router, |vault| {
//!         let outcome = vault.swap(SwapParams {
//!             pool,
//!             token_in: usdc.address(),
//!             token_out: dai.address(),
//!             kind: SwapKind::ExactIn,
//!             amount_given_raw: 100 * WAD,
//!             limit_raw: 0,
//!             user_data: Vec::new(),
//!         })?;
//!         vault.take_from(usdc.address(), router, outcome.amount_in_raw)?;
//!         vault.send_to(dai.address(), router, outcome.amount_out_raw)?;
//!         Ok(outcome)
//!     })
//!     .expect("swap settled");
//!
//! assert_eq!(outcome.amount_out_raw, 100 * WAD);
//! ```

pub mod bank;
pub mod domain;
pub mod error;
pub mod events;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod pools;
pub mod prelude;
pub mod traits;
pub mod vault;
