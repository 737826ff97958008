//! Integration tests exercising the full system through the public API:
//! locked contexts, swaps with fees and protocol skimming, all liquidity
//! kinds, re-entrant hooks, and the crate-wide numeric properties.

#![allow(clippy::panic)]

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use basin::bank::InMemoryTokenLedger;
use basin::domain::{
    Account, AddLiquidityKind, AddLiquidityParams, BasisPoints, Decimals, PoolId,
    RemoveLiquidityKind, RemoveLiquidityParams, Rounding, SwapKind, SwapParams, Token,
    TokenAddress,
};
use basin::error::VaultError;
use basin::events::VaultEvent;
use basin::math::{scaling, WAD};
use basin::pool::{HookFlags, PoolConfig, PoolRegistration, TokenConfig};
use basin::pools::{ConstantProductPool, ConstantSumPool};
use basin::traits::{
    BeforeSwapHookParams, CustomAddLiquidityParams, CustomLiquidityResult,
    CustomRemoveLiquidityParams, PoolBackend, PoolHooks, TokenLedger,
};
use basin::vault::Vault;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const POOL: PoolId = PoolId::from_bytes([0xAA; 32]);
const VAULT_ID: Account = Account::from_bytes([0xFF; 32]);
const ROUTER: Account = Account::from_bytes([0x01; 32]);

fn token_a() -> TokenAddress {
    TokenAddress::from_bytes([1u8; 32])
}

fn token_b() -> TokenAddress {
    TokenAddress::from_bytes([2u8; 32])
}

fn standard_tokens() -> Vec<TokenConfig> {
    vec![
        TokenConfig::standard(Token::new(token_a(), Decimals::MAX)),
        TokenConfig::standard(Token::new(token_b(), Decimals::MAX)),
    ]
}

/// Vault + bank with a registered 2-token pool seeded 1000/1000 and a
/// funded trusted router.
fn seeded_vault(
    backend: Rc<dyn PoolBackend>,
    config: PoolConfig,
    hooks: Option<Rc<dyn PoolHooks>>,
) -> (Vault, Rc<RefCell<InMemoryTokenLedger>>) {
    let bank = Rc::new(RefCell::new(InMemoryTokenLedger::new()));
    let mut vault = Vault::new(VAULT_ID, bank.clone());
    vault.add_trusted_router(ROUTER);

    let Ok(()) = vault.register_pool(PoolRegistration {
        pool: POOL,
        tokens: standard_tokens(),
        config,
        backend,
        hooks,
    }) else {
        panic!("registration failed");
    };

    for t in [token_a(), token_b()] {
        let Ok(()) = bank.borrow_mut().mint(t, ROUTER, 1_000_000 * WAD) else {
            panic!("mint failed");
        };
    }
    let result = vault.lock(ROUTER, |vault| {
        vault.initialize(POOL, ROUTER, &[1_000 * WAD, 1_000 * WAD])?;
        vault.take_from(token_a(), ROUTER, 1_000 * WAD)?;
        vault.take_from(token_b(), ROUTER, 1_000 * WAD)?;
        Ok(())
    });
    let Ok(_) = &result else {
        panic!("seeding failed: {result:?}");
    };
    (vault, bank)
}

/// Performs a swap and settles both legs through the router.
fn swap_and_settle(
    vault: &mut Vault,
    params: SwapParams,
) -> Result<basin::domain::SwapOutcome, VaultError> {
    vault.lock(ROUTER, |vault| {
        let outcome = vault.swap(params.clone())?;
        vault.take_from(params.token_in, ROUTER, outcome.amount_in_raw)?;
        vault.send_to(params.token_out, ROUTER, outcome.amount_out_raw)?;
        Ok(outcome)
    })
}

// ---------------------------------------------------------------------------
// Swap scenarios
// ---------------------------------------------------------------------------

#[test]
fn exact_in_no_fee_moves_balances_one_to_one() {
    let (mut vault, _bank) =
        seeded_vault(Rc::new(ConstantSumPool::new()), PoolConfig::default(), None);
    vault.drain_events();

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactIn,
            amount_given_raw: 100 * WAD,
            limit_raw: 0,
            user_data: Vec::new(),
        },
    );
    let Ok(outcome) = &result else {
        panic!("swap failed: {result:?}");
    };
    assert_eq!(outcome.amount_calculated_raw, 100 * WAD);
    assert_eq!(outcome.amount_in_raw, 100 * WAD);
    assert_eq!(outcome.amount_out_raw, 100 * WAD);

    let Ok(balances) = vault.pool_balances(POOL) else {
        panic!("expected Ok");
    };
    assert_eq!(balances, vec![1_100 * WAD, 900 * WAD]);

    let events = vault.drain_events();
    assert!(events.contains(&VaultEvent::Swap {
        pool: POOL,
        token_in: token_a(),
        token_out: token_b(),
        amount_in_raw: 100 * WAD,
        amount_out_raw: 100 * WAD,
        protocol_fee_raw: 0,
    }));
}

#[test]
fn exact_out_with_fee_charges_uplift_and_protocol_cut() {
    let config = PoolConfig {
        static_swap_fee: BasisPoints::new(100), // 1%
        ..PoolConfig::default()
    };
    let (mut vault, _bank) = seeded_vault(Rc::new(ConstantSumPool::new()), config, None);
    let Ok(()) = vault.set_protocol_swap_fee(BasisPoints::new(5_000)) else {
        panic!("expected Ok");
    };

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactOut,
            amount_given_raw: 100 * WAD,
            limit_raw: u128::MAX,
            user_data: Vec::new(),
        },
    );
    let Ok(outcome) = &result else {
        panic!("swap failed: {result:?}");
    };

    // required input is 100 / (1 - 0.01), rounded up
    let expected_in = 101_010_101_010_101_010_102u128;
    assert_eq!(outcome.amount_in_raw, expected_in);
    assert_eq!(outcome.amount_out_raw, 100 * WAD);

    // half of the ~1.0101 fee goes to the protocol, rounded down
    let expected_protocol_fee = 505_050_505_050_505_051u128;
    assert_eq!(vault.protocol_fees_of(token_b()), expected_protocol_fee);

    let Ok(balances) = vault.pool_balances(POOL) else {
        panic!("expected Ok");
    };
    assert_eq!(balances[0], 1_000 * WAD + expected_in);
    assert_eq!(balances[1], 900 * WAD - expected_protocol_fee);
}

#[test]
fn recovery_mode_skips_protocol_fee() {
    let config = PoolConfig {
        static_swap_fee: BasisPoints::new(100),
        recovery_mode: true,
        ..PoolConfig::default()
    };
    let (mut vault, _bank) = seeded_vault(Rc::new(ConstantSumPool::new()), config, None);
    let Ok(()) = vault.set_protocol_swap_fee(BasisPoints::new(5_000)) else {
        panic!("expected Ok");
    };

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactOut,
            amount_given_raw: 100 * WAD,
            limit_raw: u128::MAX,
            user_data: Vec::new(),
        },
    );
    let Ok(_) = &result else {
        panic!("swap failed: {result:?}");
    };
    assert_eq!(vault.protocol_fees_of(token_b()), 0);
}

#[test]
fn collected_protocol_fees_can_be_withdrawn() {
    let config = PoolConfig {
        static_swap_fee: BasisPoints::new(100),
        ..PoolConfig::default()
    };
    let (mut vault, bank) = seeded_vault(Rc::new(ConstantSumPool::new()), config, None);
    let Ok(()) = vault.set_protocol_swap_fee(BasisPoints::new(5_000)) else {
        panic!("expected Ok");
    };

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactOut,
            amount_given_raw: 100 * WAD,
            limit_raw: u128::MAX,
            user_data: Vec::new(),
        },
    );
    let Ok(_) = &result else {
        panic!("swap failed: {result:?}");
    };

    let accrued = vault.protocol_fees_of(token_b());
    assert!(accrued > 0);
    let treasury = Account::from_bytes([0x77; 32]);
    let Ok(withdrawn) = vault.collect_protocol_fees(token_b(), treasury) else {
        panic!("expected Ok");
    };
    assert_eq!(withdrawn, accrued);
    assert_eq!(vault.protocol_fees_of(token_b()), 0);
    assert_eq!(bank.borrow().balance_of(token_b(), treasury), accrued);
}

#[test]
fn six_decimal_token_scales_through_the_pipeline() {
    let bank = Rc::new(RefCell::new(InMemoryTokenLedger::new()));
    let mut vault = Vault::new(VAULT_ID, bank.clone());
    vault.add_trusted_router(ROUTER);

    let Ok(six) = Decimals::new(6) else {
        panic!("valid decimals");
    };
    let tokens = vec![
        TokenConfig::standard(Token::new(token_a(), six)),
        TokenConfig::standard(Token::new(token_b(), Decimals::MAX)),
    ];
    let Ok(()) = vault.register_pool(PoolRegistration {
        pool: POOL,
        tokens,
        config: PoolConfig::default(),
        backend: Rc::new(ConstantSumPool::new()),
        hooks: None,
    }) else {
        panic!("registration failed");
    };

    let micro = 1_000_000u128; // one unit of the 6-decimal token
    let Ok(()) = bank.borrow_mut().mint(token_a(), ROUTER, 10_000 * micro) else {
        panic!("mint failed");
    };
    let Ok(()) = bank.borrow_mut().mint(token_b(), ROUTER, 10_000 * WAD) else {
        panic!("mint failed");
    };
    let result = vault.lock(ROUTER, |vault| {
        vault.initialize(POOL, ROUTER, &[1_000 * micro, 1_000 * WAD])?;
        vault.take_from(token_a(), ROUTER, 1_000 * micro)?;
        vault.take_from(token_b(), ROUTER, 1_000 * WAD)?;
        Ok(())
    });
    let Ok(_) = &result else {
        panic!("seeding failed: {result:?}");
    };

    // 100 units of the 6-decimal token buy 100e18 of the 18-decimal one
    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactIn,
            amount_given_raw: 100 * micro,
            limit_raw: 0,
            user_data: Vec::new(),
        },
    );
    let Ok(outcome) = &result else {
        panic!("swap failed: {result:?}");
    };
    assert_eq!(outcome.amount_out_raw, 100 * WAD);
}

// ---------------------------------------------------------------------------
// Liquidity scenarios
// ---------------------------------------------------------------------------

#[test]
fn proportional_remove_of_entire_supply_returns_at_most_balances() {
    let (mut vault, _bank) =
        seeded_vault(Rc::new(ConstantSumPool::new()), PoolConfig::default(), None);
    let supply = vault.total_supply(POOL);
    let Ok(balances_before) = vault.pool_balances(POOL) else {
        panic!("expected Ok");
    };

    let result = vault.lock(ROUTER, |vault| {
        let outcome = vault.remove_liquidity(RemoveLiquidityParams {
            pool: POOL,
            from: ROUTER,
            min_amounts_out_raw: vec![0, 0],
            max_bpt_in: supply,
            kind: RemoveLiquidityKind::Proportional,
            user_data: Vec::new(),
        })?;
        vault.send_to(token_a(), ROUTER, outcome.amounts_out_raw[0])?;
        vault.send_to(token_b(), ROUTER, outcome.amounts_out_raw[1])?;
        Ok(outcome)
    });
    let Ok(outcome) = &result else {
        panic!("remove failed: {result:?}");
    };

    for (returned, held) in outcome.amounts_out_raw.iter().zip(&balances_before) {
        assert!(returned <= held, "returned {returned} exceeds balance {held}");
    }
    assert_eq!(vault.total_supply(POOL), 0);
}

#[test]
fn unbalanced_add_with_fee_mints_less_than_without() {
    let no_fee = {
        let (mut vault, _bank) = seeded_vault(
            Rc::new(ConstantProductPool::new()),
            PoolConfig::default(),
            None,
        );
        let result = vault.lock(ROUTER, |vault| {
            let outcome = vault.add_liquidity(AddLiquidityParams {
                pool: POOL,
                to: ROUTER,
                max_amounts_in_raw: vec![500 * WAD, 0],
                min_bpt_out: 0,
                kind: AddLiquidityKind::Unbalanced,
                user_data: Vec::new(),
            })?;
            vault.take_from(token_a(), ROUTER, outcome.amounts_in_raw[0])?;
            Ok(outcome.bpt_out)
        });
        let Ok(bpt) = &result else {
            panic!("add failed: {result:?}");
        };
        *bpt
    };

    let with_fee = {
        let config = PoolConfig {
            static_swap_fee: BasisPoints::new(300), // 3%
            ..PoolConfig::default()
        };
        let (mut vault, _bank) = seeded_vault(Rc::new(ConstantProductPool::new()), config, None);
        let result = vault.lock(ROUTER, |vault| {
            let outcome = vault.add_liquidity(AddLiquidityParams {
                pool: POOL,
                to: ROUTER,
                max_amounts_in_raw: vec![500 * WAD, 0],
                min_bpt_out: 0,
                kind: AddLiquidityKind::Unbalanced,
                user_data: Vec::new(),
            })?;
            vault.take_from(token_a(), ROUTER, outcome.amounts_in_raw[0])?;
            Ok(outcome.bpt_out)
        });
        let Ok(bpt) = &result else {
            panic!("add failed: {result:?}");
        };
        *bpt
    };

    assert!(with_fee < no_fee, "fee {with_fee} vs free {no_fee}");
}

#[test]
fn add_then_remove_round_trip_never_profits() {
    let (mut vault, _bank) = seeded_vault(
        Rc::new(ConstantProductPool::new()),
        PoolConfig::default(),
        None,
    );
    let result = vault.lock(ROUTER, |vault| {
        let added = vault.add_liquidity(AddLiquidityParams {
            pool: POOL,
            to: ROUTER,
            max_amounts_in_raw: vec![250 * WAD, 0],
            min_bpt_out: 0,
            kind: AddLiquidityKind::Unbalanced,
            user_data: Vec::new(),
        })?;
        vault.take_from(token_a(), ROUTER, added.amounts_in_raw[0])?;

        let removed = vault.remove_liquidity(RemoveLiquidityParams {
            pool: POOL,
            from: ROUTER,
            min_amounts_out_raw: vec![WAD / 1_000, 0],
            max_bpt_in: added.bpt_out,
            kind: RemoveLiquidityKind::SingleTokenExactIn,
            user_data: Vec::new(),
        })?;
        vault.send_to(token_a(), ROUTER, removed.amounts_out_raw[0])?;
        Ok((added, removed))
    });
    let Ok((added, removed)) = &result else {
        panic!("round trip failed: {result:?}");
    };
    assert!(
        removed.amounts_out_raw[0] <= added.amounts_in_raw[0],
        "withdrew {} after depositing {}",
        removed.amounts_out_raw[0],
        added.amounts_in_raw[0]
    );
}

/// Constant-sum pricing plus custom liquidity callbacks: deposits the
/// caller's exact maximums and withdraws the caller's exact minimums,
/// pricing shares one-to-one against the sum invariant.
struct CustomSumPool {
    inner: ConstantSumPool,
}

impl PoolBackend for CustomSumPool {
    fn on_swap(&self, request: &basin::domain::SwapComputeRequest<'_>) -> Result<u128, VaultError> {
        self.inner.on_swap(request)
    }

    fn compute_invariant(
        &self,
        balances_scaled18: &[u128],
        rounding: Rounding,
    ) -> Result<u128, VaultError> {
        self.inner.compute_invariant(balances_scaled18, rounding)
    }

    fn compute_balance(
        &self,
        balances_scaled18: &[u128],
        token_index: usize,
        invariant_ratio: u128,
    ) -> Result<u128, VaultError> {
        self.inner
            .compute_balance(balances_scaled18, token_index, invariant_ratio)
    }

    fn on_add_liquidity_custom(
        &self,
        params: &CustomAddLiquidityParams<'_>,
    ) -> Result<CustomLiquidityResult, VaultError> {
        let bpt: u128 = params.max_amounts_in_scaled18.iter().sum();
        Ok(CustomLiquidityResult {
            amounts_scaled18: params.max_amounts_in_scaled18.to_vec(),
            bpt,
            swap_fees_scaled18: vec![0; params.max_amounts_in_scaled18.len()],
            return_data: b"custom-add".to_vec(),
        })
    }

    fn on_remove_liquidity_custom(
        &self,
        params: &CustomRemoveLiquidityParams<'_>,
    ) -> Result<CustomLiquidityResult, VaultError> {
        let bpt: u128 = params.min_amounts_out_scaled18.iter().sum();
        Ok(CustomLiquidityResult {
            amounts_scaled18: params.min_amounts_out_scaled18.to_vec(),
            bpt,
            swap_fees_scaled18: vec![0; params.min_amounts_out_scaled18.len()],
            return_data: b"custom-remove".to_vec(),
        })
    }
}

#[test]
fn custom_liquidity_kinds_delegate_to_the_pool() {
    let config = PoolConfig {
        supports_add_liquidity_custom: true,
        supports_remove_liquidity_custom: true,
        ..PoolConfig::default()
    };
    let (mut vault, _bank) = seeded_vault(
        Rc::new(CustomSumPool {
            inner: ConstantSumPool::new(),
        }),
        config,
        None,
    );
    let Ok(pool_config) = vault.pool_config(POOL) else {
        panic!("expected Ok");
    };
    assert!(pool_config.supports_add_liquidity_custom);
    let supply_before = vault.total_supply(POOL);

    let result = vault.lock(ROUTER, |vault| {
        let added = vault.add_liquidity(AddLiquidityParams {
            pool: POOL,
            to: ROUTER,
            max_amounts_in_raw: vec![50 * WAD, 70 * WAD],
            min_bpt_out: 120 * WAD,
            kind: AddLiquidityKind::Custom,
            user_data: Vec::new(),
        })?;
        vault.take_from(token_a(), ROUTER, added.amounts_in_raw[0])?;
        vault.take_from(token_b(), ROUTER, added.amounts_in_raw[1])?;

        let removed = vault.remove_liquidity(RemoveLiquidityParams {
            pool: POOL,
            from: ROUTER,
            min_amounts_out_raw: vec![30 * WAD, 30 * WAD],
            max_bpt_in: 60 * WAD,
            kind: RemoveLiquidityKind::Custom,
            user_data: Vec::new(),
        })?;
        vault.send_to(token_a(), ROUTER, removed.amounts_out_raw[0])?;
        vault.send_to(token_b(), ROUTER, removed.amounts_out_raw[1])?;
        Ok((added, removed))
    });
    let Ok((added, removed)) = &result else {
        panic!("custom kinds failed: {result:?}");
    };

    assert_eq!(added.amounts_in_raw, vec![50 * WAD, 70 * WAD]);
    assert_eq!(added.bpt_out, 120 * WAD);
    assert_eq!(added.return_data, b"custom-add".to_vec());
    assert_eq!(removed.amounts_out_raw, vec![30 * WAD, 30 * WAD]);
    assert_eq!(removed.bpt_in, 60 * WAD);
    assert_eq!(removed.return_data, b"custom-remove".to_vec());
    assert_eq!(vault.total_supply(POOL), supply_before + 120 * WAD - 60 * WAD);

    let Ok(balances) = vault.pool_balances(POOL) else {
        panic!("expected Ok");
    };
    assert_eq!(balances, vec![1_020 * WAD, 1_040 * WAD]);
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Before the swap, deposits 200/200 into the pool through a re-entrant
/// add-liquidity; after the swap, records the balances it observes.
struct ReenteringHooks {
    observed: RefCell<Vec<Vec<u128>>>,
}

impl PoolHooks for ReenteringHooks {
    fn on_before_swap(&self, vault: &mut Vault, params: &BeforeSwapHookParams<'_>) -> bool {
        let result = vault.add_liquidity(AddLiquidityParams {
            pool: params.pool,
            to: ROUTER,
            max_amounts_in_raw: vec![200 * WAD, 200 * WAD],
            min_bpt_out: 0,
            kind: AddLiquidityKind::Unbalanced,
            user_data: Vec::new(),
        });
        let Ok(outcome) = &result else {
            return false;
        };
        vault
            .take_from(params.token_in, ROUTER, outcome.amounts_in_raw[0])
            .and_then(|()| vault.take_from(params.token_out, ROUTER, outcome.amounts_in_raw[1]))
            .is_ok()
    }

    fn on_after_swap(
        &self,
        vault: &mut Vault,
        params: &basin::traits::AfterSwapHookParams<'_>,
    ) -> bool {
        if let Ok(balances) = vault.pool_balances(params.pool) {
            self.observed.borrow_mut().push(balances);
        }
        true
    }
}

#[test]
fn before_hook_changes_are_visible_to_the_operation_and_after_hook() {
    let hooks = Rc::new(ReenteringHooks {
        observed: RefCell::new(Vec::new()),
    });
    let config = PoolConfig {
        hooks: HookFlags {
            before_swap: true,
            after_swap: true,
            ..HookFlags::default()
        },
        ..PoolConfig::default()
    };
    let (mut vault, _bank) =
        seeded_vault(Rc::new(ConstantSumPool::new()), config, Some(hooks.clone()));

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactIn,
            amount_given_raw: 100 * WAD,
            limit_raw: 0,
            user_data: Vec::new(),
        },
    );
    let Ok(_) = &result else {
        panic!("swap failed: {result:?}");
    };

    // the swap settled on top of the hook's deposit (1200/1200), not on
    // the original snapshot (1000/1000)
    let observed = hooks.observed.borrow();
    assert_eq!(*observed, vec![vec![1_300 * WAD, 1_100 * WAD]]);
}

/// Rejects every operation it is asked about.
struct RejectingHooks;

impl PoolHooks for RejectingHooks {
    fn on_before_swap(&self, _vault: &mut Vault, _params: &BeforeSwapHookParams<'_>) -> bool {
        false
    }
}

#[test]
fn failing_before_hook_aborts_and_rolls_back() {
    let config = PoolConfig {
        hooks: HookFlags {
            before_swap: true,
            ..HookFlags::default()
        },
        ..PoolConfig::default()
    };
    let (mut vault, _bank) = seeded_vault(
        Rc::new(ConstantSumPool::new()),
        config,
        Some(Rc::new(RejectingHooks)),
    );

    let result = swap_and_settle(
        &mut vault,
        SwapParams {
            pool: POOL,
            token_in: token_a(),
            token_out: token_b(),
            kind: SwapKind::ExactIn,
            amount_given_raw: 100 * WAD,
            limit_raw: 0,
            user_data: Vec::new(),
        },
    );
    assert_eq!(result, Err(VaultError::BeforeSwapHookFailed));
    let Ok(balances) = vault.pool_balances(POOL) else {
        panic!("expected Ok");
    };
    assert_eq!(balances, vec![1_000 * WAD, 1_000 * WAD]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// to_raw(to_scaled(x, down), down) <= x <= to_raw(to_scaled(x, up), up)
    #[test]
    fn scaling_round_trip_bounds(
        raw in 0u128..=u64::MAX as u128,
        decimals in 0u8..=18,
        rate_bump in 0u128..WAD,
    ) {
        let Ok(d) = Decimals::new(decimals) else {
            panic!("valid decimals");
        };
        let factor = d.scaling_factor();
        let rate = WAD + rate_bump; // rates in [1.0, 2.0)

        let down = scaling::to_scaled_18(raw, factor, rate, Rounding::Down)
            .and_then(|s| scaling::to_raw(s, factor, rate, Rounding::Down));
        let up = scaling::to_scaled_18(raw, factor, rate, Rounding::Up)
            .and_then(|s| scaling::to_raw(s, factor, rate, Rounding::Up));
        let Ok(down) = down else {
            panic!("down path failed");
        };
        let Ok(up) = up else {
            panic!("up path failed");
        };
        prop_assert!(down <= raw);
        prop_assert!(up >= raw);
    }

    /// Swapping exact-in and then buying the input back exact-out must
    /// cost at least everything the first swap paid out.
    #[test]
    fn swap_round_trip_never_creates_value(amount in 1u128..=100) {
        let (mut vault, _bank) = seeded_vault(
            Rc::new(ConstantProductPool::new()),
            PoolConfig::default(),
            None,
        );
        let x = amount * WAD;

        let result = vault.lock(ROUTER, |vault| {
            let first = vault.swap(SwapParams {
                pool: POOL,
                token_in: token_a(),
                token_out: token_b(),
                kind: SwapKind::ExactIn,
                amount_given_raw: x,
                limit_raw: 0,
                user_data: Vec::new(),
            })?;
            vault.take_from(token_a(), ROUTER, first.amount_in_raw)?;
            vault.send_to(token_b(), ROUTER, first.amount_out_raw)?;

            let second = vault.swap(SwapParams {
                pool: POOL,
                token_in: token_b(),
                token_out: token_a(),
                kind: SwapKind::ExactOut,
                amount_given_raw: x,
                limit_raw: u128::MAX,
                user_data: Vec::new(),
            })?;
            vault.take_from(token_b(), ROUTER, second.amount_in_raw)?;
            vault.send_to(token_a(), ROUTER, second.amount_out_raw)?;
            Ok((first, second))
        });
        let Ok((first, second)) = &result else {
            panic!("round trip failed: {result:?}");
        };
        prop_assert!(
            second.amount_in_raw >= first.amount_out_raw,
            "bought {} back for {} after receiving {}",
            x,
            second.amount_in_raw,
            first.amount_out_raw,
        );
    }

    /// A locked context closes successfully exactly when its debits and
    /// credits cancel out.
    #[test]
    fn zero_sum_settlement(pulled in 1u128..=1_000, returned in 1u128..=1_000) {
        // the vault can only pay out what this context pulled in
        let sent = returned.min(pulled);

        let bank = Rc::new(RefCell::new(InMemoryTokenLedger::new()));
        let mut vault = Vault::new(VAULT_ID, bank.clone());
        vault.add_trusted_router(ROUTER);
        let Ok(()) = bank.borrow_mut().mint(token_a(), ROUTER, 10_000) else {
            panic!("mint failed");
        };

        let result = vault.lock(ROUTER, |vault| {
            vault.take_from(token_a(), ROUTER, pulled)?;
            vault.send_to(token_a(), ROUTER, sent)?;
            Ok(())
        });
        if pulled == sent {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result,
                Err(VaultError::UnsettledBalance { nonzero: 1 })
            );
        }
    }
}
