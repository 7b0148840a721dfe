//! Operator session state.
//!
//! Everything the page used to keep in globals lives here: the preloaded
//! directory, the session movement log and the current selections. One
//! instance backs one operator.

use crate::cache::LedgerCache;
use crate::directory::{MemberDirectory, MemberQuery};
use crate::ledger::{compute_ledger, BalanceLedger};
use crate::model::{Category, Member, Transaction};
use crate::reconcile::merge_movements;
use crate::roster::Roster;

#[derive(Debug, Default, Clone)]
pub struct Session {
    directory: MemberDirectory,
    cache: LedgerCache,
    selected: Option<Member>,
    category: Option<Category>,
}

impl Session {
    pub fn new(roster: Roster) -> Self {
        Session {
            directory: MemberDirectory::new(roster.afiliados),
            cache: LedgerCache::seeded(roster.movimientos),
            selected: None,
            category: None,
        }
    }

    pub fn directory(&self) -> &MemberDirectory {
        &self.directory
    }

    pub fn cache(&self) -> &LedgerCache {
        &self.cache
    }

    pub fn find(&self, query: &MemberQuery) -> Option<&Member> {
        self.directory.find(query)
    }

    /// Look a member up and make it the current selection. A miss reports
    /// `None` and leaves the session untouched.
    pub fn select(&mut self, query: &MemberQuery) -> Option<Member> {
        let found = self.directory.find(query).cloned();
        if let Some(member) = &found {
            self.selected = Some(member.clone());
        }
        found
    }

    pub fn selected(&self) -> Option<&Member> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.category = None;
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Record a movement in the session log. The caller has already pushed
    /// it to the remote store; appending here is what guarantees that a
    /// recomputation right after the save observes the row even before the
    /// remote echoes it back.
    pub fn record(&mut self, movement: Transaction) {
        self.cache.append(movement);
    }

    /// Merge whatever the remote returned with the session log for one
    /// member and compute the ledger. An empty remote list, including the
    /// degraded fetch-failure case, yields a ledger over the session log
    /// alone.
    pub fn ledger_for(&self, member: &Member, remote: Vec<Transaction>) -> BalanceLedger {
        let local = self.cache.for_member(member.dni);
        let remote_count = remote.len();
        let merged = merge_movements(remote, &local);
        tracing::debug!(
            "afiliado {}: {} remote + {} local movements merged into {}",
            member.dni,
            remote_count,
            local.len(),
            merged.len()
        );
        compute_ledger(member.opening_balance, merged)
    }
}
