//! Property tests for the balance ledger.
//!
//! Random sequences of expense requests, valid and invalid, must keep the
//! ledger anti-symmetric, conserve money, replay exactly and reject bad
//! requests without touching any balance.

use expense_ledger::{Amount, LedgerService, SplitRequest, Strategy as SplitStrategy};
use proptest::prelude::*;

const IDS: [&str; 4] = ["ann", "ben", "cat", "dan"];

#[derive(Debug, Clone)]
struct Request {
    strategy: SplitStrategy,
    total: f64,
    payer: usize,
    splits: Vec<(usize, f64)>,
}

fn service_with_people() -> LedgerService {
    let mut service = LedgerService::new();
    for id in IDS {
        service.register_participant(id, &id.to_uppercase());
    }
    service
}

/// Requests whose declared values are rescaled to the right sum when
/// `balanced` is set, and left random otherwise.
fn arb_request() -> impl Strategy<Value = Request> {
    (
        prop_oneof![
            Just(SplitStrategy::Equal),
            Just(SplitStrategy::Exact),
            Just(SplitStrategy::Percent)
        ],
        1.0f64..1000.0,
        0..IDS.len(),
        prop::collection::vec((0..IDS.len(), 0.0f64..100.0), 0..6),
        any::<bool>(),
    )
        .prop_map(|(strategy, total, payer, mut splits, balanced)| {
            let target = match strategy {
                SplitStrategy::Percent => 100.0,
                _ => total,
            };
            let sum: f64 = splits.iter().map(|(_, v)| v).sum();
            if balanced && sum > 0.0 {
                for (_, v) in splits.iter_mut() {
                    *v = *v * target / sum;
                }
            }
            Request {
                strategy,
                total,
                payer,
                splits,
            }
        })
}

fn split_requests(req: &Request) -> Vec<SplitRequest> {
    req.splits
        .iter()
        .map(|&(idx, value)| match req.strategy {
            SplitStrategy::Equal => SplitRequest::new(IDS[idx]),
            _ => SplitRequest::with_value(IDS[idx], value),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: whatever mix of valid and invalid requests is recorded, the
    /// ledger stays anti-symmetric, sums to zero and equals its replay.
    #[test]
    fn ledger_invariants_hold(requests in prop::collection::vec(arb_request(), 1..20)) {
        let mut service = service_with_people();

        for req in &requests {
            let before = service.ledger().clone();
            let history_len = service.expenses().len();
            let splits = split_requests(req);

            let outcome = service
                .record_expense(req.strategy, req.total, IDS[req.payer], &splits, "generated")
                .map(|e| e.splits().iter().map(|s| s.amount().value()).collect::<Vec<_>>());

            match outcome {
                Ok(amounts) => {
                    prop_assert_eq!(service.expenses().len(), history_len + 1);
                    if req.strategy == SplitStrategy::Equal {
                        let each = req.total / splits.len() as f64;
                        prop_assert!(amounts.iter().all(|&a| a == each));
                    }
                    let sum: f64 = amounts.iter().sum();
                    prop_assert!(Amount::new(sum).approx_eq(Amount::new(req.total)));
                }
                Err(_) => {
                    prop_assert_eq!(service.ledger(), &before);
                    prop_assert_eq!(service.expenses().len(), history_len);
                }
            }
        }

        for a in IDS {
            for b in IDS {
                if a != b {
                    let ab = service.ledger().balance(a, b).unwrap();
                    let ba = service.ledger().balance(b, a).unwrap();
                    prop_assert_eq!(ab, -ba);
                }
            }
        }

        let total: Amount = IDS
            .iter()
            .map(|id| service.ledger().net_position(id).unwrap())
            .sum();
        prop_assert!(total.is_zero());

        prop_assert_eq!(&service.replay().unwrap(), service.ledger());
    }

    /// Property: exact splits that miss the total by more than a cent are
    /// always rejected and leave the ledger unchanged.
    #[test]
    fn mismatched_exact_split_is_rejected(
        values in prop::collection::vec(0.0f64..500.0, 1..5),
        offset in 0.01f64..100.0,
        sign in any::<bool>(),
    ) {
        let mut service = service_with_people();
        service
            .record_expense(SplitStrategy::Equal, 40.0, "ann", &[SplitRequest::new("ben")], "seed")
            .unwrap();
        let before = service.ledger().clone();

        let sum: f64 = values.iter().sum();
        let total = if sign || sum - offset <= 0.0 { sum + offset } else { sum - offset };
        let splits: Vec<SplitRequest> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| SplitRequest::with_value(IDS[i % IDS.len()], v))
            .collect();

        prop_assert!(service
            .record_expense(SplitStrategy::Exact, total, "cat", &splits, "mismatch")
            .is_err());
        prop_assert_eq!(service.ledger(), &before);
        prop_assert_eq!(service.expenses().len(), 1);
    }
}
