//! Property-based tests for stock delta derivation.

use proptest::prelude::*;

use super::{MovementKind, stock_delta};

/// Type strings that are never exactly `IN` or `OUT`.
fn other_type() -> impl Strategy<Value = String> {
    "[A-Za-z_ ]{0,12}".prop_filter("must not be a stock-moving type", |s| {
        s != "IN" && s != "OUT"
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// IN adds exactly the quantity.
    #[test]
    fn prop_in_adds_quantity(start in -1_000_000i32..1_000_000, q in 0i32..100_000) {
        prop_assert_eq!(start + stock_delta("IN", q), start + q);
    }

    /// OUT subtracts exactly the quantity, even past zero.
    #[test]
    fn prop_out_subtracts_quantity(start in 0i32..1_000, q in 0i32..100_000) {
        let after = start + stock_delta("OUT", q);
        prop_assert_eq!(after, start - q);
    }

    /// Any other type leaves stock unchanged.
    #[test]
    fn prop_other_types_are_neutral(kind in other_type(), q in 0i32..100_000) {
        prop_assert_eq!(MovementKind::classify(&kind), MovementKind::Other);
        prop_assert_eq!(stock_delta(&kind, q), 0);
    }

    /// Applying deltas one by one equals applying their sum, in any order.
    #[test]
    fn prop_deltas_commute(moves in prop::collection::vec((prop::bool::ANY, 0i32..1_000), 0..50)) {
        let deltas: Vec<i32> = moves
            .iter()
            .map(|(is_in, q)| stock_delta(if *is_in { "IN" } else { "OUT" }, *q))
            .collect();
        let forward: i32 = deltas.iter().sum();
        let backward: i32 = deltas.iter().rev().fold(0, |acc, d| acc + d);
        prop_assert_eq!(forward, backward);
    }
}
