//! Stock ledger rules
//!
//! The balance of a product is never stored. It is derived from the full
//! movement history as `sum(IN) - sum(OUT)`, and every OUT movement must be
//! covered by the balance that exists before it is recorded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MovementDirection;

/// Violations of the ledger rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Balance {balance} exceeds the largest single movement ({})", i32::MAX)]
    ExceedsMovementLimit { balance: i64 },
}

/// Aggregated IN and OUT quantities for one product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTotals {
    pub total_in: i64,
    pub total_out: i64,
}

impl StockTotals {
    pub fn new(total_in: i64, total_out: i64) -> Self {
        Self { total_in, total_out }
    }

    pub fn balance(&self) -> i64 {
        self.total_in - self.total_out
    }

    /// Check that a movement may be appended, without applying it
    pub fn check(&self, direction: MovementDirection, quantity: i32) -> Result<(), LedgerError> {
        validate_quantity(quantity)?;
        if direction == MovementDirection::Out {
            check_withdrawal(self.balance(), quantity)?;
        }
        Ok(())
    }

    /// Append a movement to the totals if the ledger rules allow it
    pub fn apply(&mut self, direction: MovementDirection, quantity: i32) -> Result<i64, LedgerError> {
        self.check(direction, quantity)?;
        match direction {
            MovementDirection::In => self.total_in += i64::from(quantity),
            MovementDirection::Out => self.total_out += i64::from(quantity),
        }
        Ok(self.balance())
    }
}

/// Quantities are strictly positive
pub fn validate_quantity(quantity: i32) -> Result<(), LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity(i64::from(quantity)));
    }
    Ok(())
}

/// An OUT of `quantity` is allowed only when it does not exceed `balance`
pub fn check_withdrawal(balance: i64, quantity: i32) -> Result<(), LedgerError> {
    let requested = i64::from(quantity);
    if requested > balance {
        return Err(LedgerError::InsufficientBalance {
            requested,
            available: balance,
        });
    }
    Ok(())
}

/// Quantity of the compensating OUT movement that brings `balance` to zero.
///
/// `Ok(None)` when there is nothing to remove. A balance larger than one
/// movement can carry is refused instead of being split.
pub fn zero_out_quantity(balance: i64) -> Result<Option<i32>, LedgerError> {
    if balance <= 0 {
        return Ok(None);
    }
    i32::try_from(balance)
        .map(Some)
        .map_err(|_| LedgerError::ExceedsMovementLimit { balance })
}

/// Note recorded on a quick out when the caller gives none
pub fn default_quick_out_note(quantity: i32) -> String {
    format!("Quick out - {} un.", quantity)
}
