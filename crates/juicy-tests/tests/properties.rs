//! Property tests for the Juicy ledger.
//!
//! Random sequences of clock advances, transfers and code deployments are
//! applied to a fresh ledger. After every step:
//! - cached totals equal the recomputed account sums
//! - total supply stays at or below the cap
//! - the multiplier never rises and never drops below 1.0x
//! - distributed rewards never fall
//! - contract-classified accounts have no pending accrual
//! - both sides of a committed transfer are fully realized
//! - failed transfers leave the ledger untouched

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use juicy_core::address::Address;
use juicy_core::amount::Amount;
use juicy_core::constants::{BPS_PRECISION, NetworkType, SECONDS_PER_YEAR};
use juicy_core::error::LedgerError;
use juicy_core::traits::AccountClassifier;
use juicy_core::types::AccountKind;
use juicy_ledger::LedgerConfig;
use juicy_tests::helpers::*;

const ACTORS: u8 = 6;

#[derive(Debug, Clone)]
enum Op {
    Advance(u64),
    /// Move `share_bps / 10_000` of the sender's realized balance. Shares
    /// above 10_000 may or may not be covered by pending accrual.
    Transfer { from: u8, to: u8, share_bps: u16 },
    ToggleCode(u8),
}

fn actor(index: u8) -> Address {
    if index == 0 { owner() } else { addr(0x10 + index) }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..2 * SECONDS_PER_YEAR).prop_map(Op::Advance),
        (0..ACTORS, 0..ACTORS, 0u16..=12_000)
            .prop_map(|(from, to, share_bps)| Op::Transfer { from, to, share_bps }),
        (1..ACTORS).prop_map(Op::ToggleCode),
    ]
}

/// Invariants that must hold between any two operations.
fn check_steady_state(h: &Harness, last_multiplier: u64, last_distributed: Amount) {
    assert_reconciled(&h.ledger);

    let m = h.ledger.current_multiplier();
    assert!(m >= BPS_PRECISION);
    assert!(m <= last_multiplier, "multiplier rose: {last_multiplier} -> {m}");
    assert!(h.ledger.distributed_rewards() >= last_distributed);

    for i in 0..ACTORS {
        let who = actor(i);
        if h.registry.classify(&who) == AccountKind::Contract {
            assert_eq!(
                h.ledger.pending_balance_of(&who).unwrap(),
                h.ledger.balance_of(&who)
            );
        }
    }
}

fn apply(h: &mut Harness, op: &Op) {
    match *op {
        Op::Advance(secs) => h.advance(secs),
        Op::ToggleCode(i) => {
            let who = actor(i);
            if !h.registry.destroy(&who) {
                h.registry.deploy(who);
            }
        }
        Op::Transfer { from, to, share_bps } => {
            let (from, to) = (actor(from), actor(to));
            let amount = h.ledger.balance_of(&from) * share_bps as Amount / 10_000;
            let before = h.ledger.snapshot();

            match h.transfer(from, to, amount) {
                Ok(_) => {
                    if amount > 0 && from != to {
                        for who in [from, to] {
                            assert_eq!(
                                h.ledger.pending_balance_of(&who).unwrap(),
                                h.ledger.balance_of(&who),
                                "{who} not realized after transfer"
                            );
                        }
                    }
                }
                Err(LedgerError::InsufficientRealizedBalance { .. }) => {
                    assert_eq!(h.ledger.snapshot(), before);
                }
                Err(e) => panic!("unexpected transfer error: {e}"),
            }
        }
    }
}

fn run(config: LedgerConfig, ops: &[Op]) {
    let mut h = Harness::new(config);
    let mut last_multiplier = h.ledger.current_multiplier();
    let mut last_distributed = h.ledger.distributed_rewards();

    for op in ops {
        apply(&mut h, op);
        check_steady_state(&h, last_multiplier, last_distributed);
        last_multiplier = h.ledger.current_multiplier();
        last_distributed = h.ledger.distributed_rewards();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn mainnet_sequences_hold_invariants(ops in prop::collection::vec(op(), 1..40)) {
        run(LedgerConfig::default(), &ops);
    }

    #[test]
    fn testnet_sequences_hold_invariants(ops in prop::collection::vec(op(), 1..40)) {
        run(LedgerConfig::for_network(NetworkType::Testnet), &ops);
    }

    #[test]
    fn small_pool_sequences_hold_invariants(ops in prop::collection::vec(op(), 1..40)) {
        let config = LedgerConfig {
            maximum_total_supply: LedgerConfig::default().initial_supply + 1_000,
            ..LedgerConfig::default()
        };
        run(config, &ops);
    }
}

#[test]
fn seeded_random_walk_many_accounts() {
    let mut rng = StdRng::seed_from_u64(0x4a55_4943);
    let ops: Vec<Op> = (0..2_000)
        .map(|_| match rng.gen_range(0..10) {
            0 => Op::Advance(rng.gen_range(0..SECONDS_PER_YEAR / 12)),
            1 => Op::ToggleCode(rng.gen_range(1..ACTORS)),
            _ => Op::Transfer {
                from: rng.gen_range(0..ACTORS),
                to: rng.gen_range(0..ACTORS),
                share_bps: rng.gen_range(0..=10_000),
            },
        })
        .collect();
    run(LedgerConfig::default(), &ops);
}
