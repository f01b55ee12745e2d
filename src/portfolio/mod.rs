//! Portfolio module - holdings, transactions, ledger

pub mod holding;
pub mod ledger;
pub mod transaction;

pub use holding::Holding;
pub use ledger::Ledger;
pub use transaction::{TradeSide, Transaction, TransactionId};

use std::sync::{Arc, Mutex};

/// Ledger shared between the trading service, analytics engine, and
/// simulator. The single lock makes `record_transaction` atomic with
/// respect to snapshot reads while the simulator runs.
pub type SharedLedger = Arc<Mutex<Ledger>>;

/// Wrap a ledger for shared use
pub fn share(ledger: Ledger) -> SharedLedger {
    Arc::new(Mutex::new(ledger))
}
