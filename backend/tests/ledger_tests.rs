//! Stock ledger tests
//!
//! Tests for the movement rules including:
//! - Balance is sum(IN) - sum(OUT) over the full history
//! - OUT movements never drive the balance below zero
//! - Zero-out brings any positive balance to exactly zero

use proptest::prelude::*;
use shared::ledger::{
    check_withdrawal, default_quick_out_note, zero_out_quantity, LedgerError, StockTotals,
};
use shared::{MovementDirection, StockStatus};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Product with minimum 5: +10, -3 (7, OK), -4 (3, ATTN), -5 rejected, -3 (0, OUT)
    #[test]
    fn test_movement_scenario() {
        let min_stock = 5;
        let mut totals = StockTotals::default();

        assert_eq!(totals.apply(MovementDirection::In, 10), Ok(10));
        assert_eq!(totals.apply(MovementDirection::Out, 3), Ok(7));
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Ok);

        assert_eq!(totals.apply(MovementDirection::Out, 4), Ok(3));
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Attn);

        let rejected = totals.apply(MovementDirection::Out, 5);
        assert_eq!(
            rejected,
            Err(LedgerError::InsufficientBalance {
                requested: 5,
                available: 3
            })
        );
        assert_eq!(totals.balance(), 3);

        assert_eq!(totals.apply(MovementDirection::Out, 3), Ok(0));
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Out);
        assert_eq!(totals, StockTotals::new(10, 10));
    }

    /// Initial stock 10 with minimum 5, then OUT 7, OUT 3, OUT 1
    #[test]
    fn test_initial_stock_drained() {
        let min_stock = 5;
        let mut totals = StockTotals::default();

        totals.apply(MovementDirection::In, 10).unwrap();
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Ok);

        totals.apply(MovementDirection::Out, 7).unwrap();
        assert_eq!(totals.balance(), 3);
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Attn);

        totals.apply(MovementDirection::Out, 3).unwrap();
        assert_eq!(StockStatus::classify(totals.balance(), min_stock), StockStatus::Out);

        assert!(matches!(
            totals.apply(MovementDirection::Out, 1),
            Err(LedgerError::InsufficientBalance { requested: 1, available: 0 })
        ));
        assert_eq!(totals.balance(), 0);
    }

    /// An OUT equal to the balance is allowed
    #[test]
    fn test_withdraw_exact_balance() {
        assert!(check_withdrawal(4, 4).is_ok());
        assert!(check_withdrawal(4, 5).is_err());
        assert!(check_withdrawal(0, 1).is_err());
    }

    /// Non-positive quantities are rejected in both directions
    #[test]
    fn test_invalid_quantity() {
        let totals = StockTotals::new(10, 0);
        assert_eq!(
            totals.check(MovementDirection::In, 0),
            Err(LedgerError::InvalidQuantity(0))
        );
        assert_eq!(
            totals.check(MovementDirection::Out, -2),
            Err(LedgerError::InvalidQuantity(-2))
        );
    }

    /// IN movements have no upper bound
    #[test]
    fn test_in_always_allowed() {
        let mut totals = StockTotals::default();
        assert_eq!(totals.apply(MovementDirection::In, i32::MAX), Ok(i64::from(i32::MAX)));
        assert_eq!(totals.apply(MovementDirection::In, 1), Ok(i64::from(i32::MAX) + 1));
    }

    #[test]
    fn test_zero_out_quantity() {
        assert_eq!(zero_out_quantity(0), Ok(None));
        assert_eq!(zero_out_quantity(-3), Ok(None));
        assert_eq!(zero_out_quantity(12), Ok(Some(12)));
    }

    /// Repeated INs can push a balance past what one OUT movement carries
    #[test]
    fn test_zero_out_above_movement_limit_is_refused() {
        let mut totals = StockTotals::default();
        totals.apply(MovementDirection::In, i32::MAX).unwrap();
        totals.apply(MovementDirection::In, 5).unwrap();

        assert_eq!(
            zero_out_quantity(totals.balance()),
            Err(LedgerError::ExceedsMovementLimit {
                balance: i64::from(i32::MAX) + 5
            })
        );
    }

    #[test]
    fn test_default_quick_out_note() {
        assert_eq!(default_quick_out_note(3), "Quick out - 3 un.");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn direction_strategy() -> impl Strategy<Value = MovementDirection> {
        prop_oneof![Just(MovementDirection::In), Just(MovementDirection::Out)]
    }

    fn movement_strategy() -> impl Strategy<Value = (MovementDirection, i32)> {
        (direction_strategy(), 1i32..=1_000)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Whatever sequence is attempted, the balance never goes negative
        /// and equals IN minus OUT of the accepted movements.
        #[test]
        fn prop_balance_never_negative(
            movements in prop::collection::vec(movement_strategy(), 0..50)
        ) {
            let mut totals = StockTotals::default();
            let mut accepted_in = 0i64;
            let mut accepted_out = 0i64;

            for (direction, quantity) in movements {
                if totals.apply(direction, quantity).is_ok() {
                    match direction {
                        MovementDirection::In => accepted_in += i64::from(quantity),
                        MovementDirection::Out => accepted_out += i64::from(quantity),
                    }
                }
                prop_assert!(totals.balance() >= 0);
            }

            prop_assert_eq!(totals.balance(), accepted_in - accepted_out);
        }

        /// A rejected movement leaves the totals untouched
        #[test]
        fn prop_rejection_has_no_effect(
            total_in in 0i64..10_000,
            quantity in 1i32..=20_000,
        ) {
            let mut totals = StockTotals::new(total_in, 0);
            let before = totals;
            if totals.apply(MovementDirection::Out, quantity).is_err() {
                prop_assert_eq!(totals, before);
                prop_assert!(i64::from(quantity) > total_in);
            }
        }

        /// OUT is accepted exactly when the quantity is covered
        #[test]
        fn prop_withdrawal_boundary(balance in 0i64..10_000, quantity in 1i32..=10_000) {
            let allowed = check_withdrawal(balance, quantity).is_ok();
            prop_assert_eq!(allowed, i64::from(quantity) <= balance);
        }

        /// Applying the zero-out quantity always lands on zero
        #[test]
        fn prop_zero_out_reaches_zero(total_in in 1i64..1_000_000, taken in 0i64..1_000_000) {
            let taken = taken.min(total_in);
            let mut totals = StockTotals::new(total_in, taken);
            match zero_out_quantity(totals.balance()) {
                Ok(Some(quantity)) => {
                    prop_assert_eq!(totals.apply(MovementDirection::Out, quantity), Ok(0));
                }
                Ok(None) => prop_assert_eq!(totals.balance(), 0),
                Err(err) => prop_assert!(false, "unexpected {}", err),
            }
        }

        /// Status follows the balance thresholds
        #[test]
        fn prop_status_classification(balance in 0i64..500, min_stock in 0i32..100) {
            let status = StockStatus::classify(balance, min_stock);
            let expected = if balance == 0 {
                StockStatus::Out
            } else if balance < i64::from(min_stock) {
                StockStatus::Attn
            } else {
                StockStatus::Ok
            };
            prop_assert_eq!(status, expected);
        }
    }
}
