//! Session-scoped log of movements entered by the operator.

use crate::model::Transaction;

/// Append-only, in-memory movement list. The remote log is the durable
/// store; this one only backs the running session (plus whatever the
/// roster file seeded) so a recomputation right after a save already sees
/// the new row.
#[derive(Debug, Default, Clone)]
pub struct LedgerCache {
    movements: Vec<Transaction>,
}

impl LedgerCache {
    pub fn seeded(movements: Vec<Transaction>) -> Self {
        LedgerCache { movements }
    }

    pub fn append(&mut self, movement: Transaction) {
        self.movements.push(movement);
    }

    /// Movements recorded for one member, in entry order.
    pub fn for_member(&self, dni: u64) -> Vec<Transaction> {
        self.movements
            .iter()
            .filter(|movement| movement.dni == dni)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}
