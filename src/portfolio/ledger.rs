//! Ledger - holdings map plus ordered transaction log
//!
//! The ledger owns the symbol -> position mapping and the append-only
//! transaction log, and is the only code allowed to mutate positions.

use crate::error::{FolioError, Result};
use crate::portfolio::holding::Holding;
use crate::portfolio::transaction::{TradeSide, Transaction};
use crate::pricing::PriceSource;
use crate::types::{Cash, Symbol};
use hashbrown::HashMap;
use std::sync::Arc;

/// Owning aggregate of current holdings and historical transactions.
///
/// Invariants:
/// - every position's quantity equals the net of applied buys minus sells
///   for that symbol, and is never negative;
/// - a sell that would drive a position negative is rejected before
///   anything is appended or mutated;
/// - average cost moves only on buys.
pub struct Ledger {
    holdings: HashMap<Symbol, Holding>,
    transactions: Vec<Transaction>,
    price_source: Arc<dyn PriceSource>,
}

impl Ledger {
    /// Create an empty ledger marking to market against `price_source`
    pub fn new(price_source: Arc<dyn PriceSource>) -> Self {
        Self {
            holdings: HashMap::new(),
            transactions: Vec::new(),
            price_source,
        }
    }

    /// Apply a transaction to holdings and append it to the log.
    ///
    /// A sell is validated against the current position first; on failure
    /// nothing is appended and no position changes. A sell that passes
    /// gets the position's current average cost stamped as its cost basis
    /// before the quantity is reduced. Returns the transaction as
    /// recorded.
    pub fn record_transaction(&mut self, mut transaction: Transaction) -> Result<Transaction> {
        let symbol = transaction.asset.symbol.clone();

        match transaction.side {
            TradeSide::Buy => {
                let holding = self
                    .holdings
                    .entry(symbol)
                    .or_insert_with(|| Holding::new(transaction.asset.clone()));
                holding.add_units(transaction.quantity, transaction.price);
            }
            TradeSide::Sell => {
                let holding = self.holdings.get_mut(&symbol).ok_or_else(|| {
                    FolioError::InsufficientHoldings {
                        symbol: symbol.clone(),
                        requested: transaction.quantity,
                        held: 0,
                    }
                })?;
                transaction.cost_basis = Some(holding.average_cost);
                holding.remove_units(transaction.quantity)?;
            }
        }

        log::debug!("Recorded {}", transaction);
        let recorded = transaction.clone();
        self.transactions.push(transaction);
        Ok(recorded)
    }

    /// Snapshot of all holdings. Returns a copy; mutating it cannot reach
    /// the ledger's own state.
    pub fn holdings(&self) -> HashMap<Symbol, Holding> {
        self.holdings.clone()
    }

    /// Snapshot of the transaction log, in insertion (chronological) order
    pub fn transaction_log(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Get the position for a symbol
    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(&symbol.to_uppercase())
    }

    /// Total mark-to-market value across all holdings
    pub fn total_market_value(&self) -> Cash {
        self.holdings
            .values()
            .map(|h| h.market_value(self.price_source.current_price(&h.asset.symbol)))
            .sum()
    }

    /// Number of distinct assets ever transacted (zero-quantity positions
    /// stay in the map)
    pub fn asset_count(&self) -> usize {
        self.holdings.len()
    }

    /// Number of recorded transactions
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Price source this ledger marks to market against
    pub fn price_source(&self) -> &Arc<dyn PriceSource> {
        &self.price_source
    }
}
