//! Running-balance computation over one member's movements.

use rust_decimal::Decimal;

use crate::model::Transaction;

/// One display row: the movement, the amount it contributes to the current
/// period and the balance after applying it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub movement: Transaction,
    pub period_amount: Decimal,
    pub running_balance: Decimal,
}

/// Derived, read-only view over a member's merged movements. Recomputed
/// from scratch on every lookup and save; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceLedger {
    pub opening_balance: Decimal,
    pub rows: Vec<LedgerRow>,
    pub movements_total: Decimal,
    pub closing_balance: Decimal,
}

/// Compute the ledger for one member.
///
/// Rows are ordered most recent first, the order the operator reads them
/// in; the sort is stable so same-day movements keep their merged order.
/// The per-row running balance is a prefix sum over that display order,
/// while the closing balance is a plain total and therefore independent
/// of any ordering.
pub fn compute_ledger(opening_balance: Decimal, mut movements: Vec<Transaction>) -> BalanceLedger {
    movements.sort_by(|a, b| b.date.cmp(&a.date));

    let mut running_balance = opening_balance;
    let rows: Vec<LedgerRow> = movements
        .into_iter()
        .map(|movement| {
            let period_amount = movement.period_amount();
            running_balance += period_amount;
            LedgerRow {
                movement,
                period_amount,
                running_balance,
            }
        })
        .collect();

    let movements_total: Decimal = rows.iter().map(|row| row.period_amount).sum();

    BalanceLedger {
        opening_balance,
        closing_balance: opening_balance + movements_total,
        movements_total,
        rows,
    }
}
