pub mod cache;
pub mod directory;
pub mod export;
pub mod ledger;
pub mod model;
pub mod reconcile;
pub mod roster;
pub mod session;

pub use cache::LedgerCache;
pub use directory::{MemberDirectory, MemberQuery};
pub use ledger::{BalanceLedger, LedgerRow};
pub use model::{Category, Member, Transaction};
pub use session::Session;

pub type Decimal = rust_decimal::Decimal;

pub use anyhow::Result;
