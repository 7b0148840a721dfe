//! Merging remote and locally recorded movements without duplicates.

use crate::model::Transaction;

/// Two movements describe the same event iff they agree on this key. The
/// movement log has no stable row identifier, so `(dni, fecha,
/// monto_total, tipo)` is the strongest identity available; a locally
/// recorded row and its remote echo always collide on it.
fn same_event(a: &Transaction, b: &Transaction) -> bool {
    a.dni == b.dni
        && a.date == b.date
        && a.total_amount == b.total_amount
        && a.category == b.category
}

/// Merge the remote movement list with the locally recorded one.
///
/// Remote rows are kept as-is in their given order; a local movement is
/// appended only when nothing already merged describes the same event.
/// An empty remote list is an ordinary input, not an error: the result is
/// then the local list alone.
pub fn merge_movements(remote: Vec<Transaction>, local: &[Transaction]) -> Vec<Transaction> {
    let mut merged = remote;
    for movement in local {
        let already_known = merged.iter().any(|known| same_event(known, movement));
        if !already_known {
            merged.push(movement.clone());
        }
    }
    merged
}
