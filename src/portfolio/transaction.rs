//! Transaction - immutable record of one executed trade

use crate::asset::Asset;
use crate::types::{Cash, Price, Quantity, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction ID
pub type TransactionId = Uuid;

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed trade. Created once, never mutated after the ledger
/// appends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub id: TransactionId,
    /// Asset traded
    pub asset: Asset,
    /// Units traded (always positive; direction comes from `side`)
    pub quantity: Quantity,
    /// Price per unit
    pub price: Price,
    /// Buy or sell
    pub side: TradeSide,
    /// Execution timestamp
    pub dt: Timestamp,
    /// Average cost per unit at the moment a sell executed.
    ///
    /// Stamped by the ledger so realized P&L stays historically accurate
    /// even if later buys move the position's average cost. `None` on buys.
    pub cost_basis: Option<Price>,
}

impl Transaction {
    /// Create a transaction timestamped now
    pub fn new(asset: Asset, quantity: Quantity, price: Price, side: TradeSide) -> Self {
        Self::with_timestamp(asset, quantity, price, side, Utc::now())
    }

    /// Create a transaction with an explicit timestamp
    pub fn with_timestamp(
        asset: Asset,
        quantity: Quantity,
        price: Price,
        side: TradeSide,
        dt: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset,
            quantity,
            price,
            side,
            dt,
            cost_basis: None,
        }
    }

    /// Total transaction value (quantity * price)
    pub fn value(&self) -> Cash {
        self.quantity as f64 * self.price
    }

    /// Check if this is a buy transaction
    pub fn is_buy(&self) -> bool {
        matches!(self.side, TradeSide::Buy)
    }

    /// Check if this is a sell transaction
    pub fn is_sell(&self) -> bool {
        matches!(self.side, TradeSide::Sell)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x {} @ ${:.2} (${:.2})",
            self.side,
            self.quantity,
            self.asset.symbol,
            self.price,
            self.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_creation() {
        let asset = Asset::equity("AAPL", "Apple Inc.");
        let txn = Transaction::new(asset, 100, 150.0, TradeSide::Buy);

        assert_eq!(txn.asset.symbol, "AAPL");
        assert_eq!(txn.quantity, 100);
        assert_eq!(txn.price, 150.0);
        assert!(txn.is_buy());
        assert!(!txn.is_sell());
        assert!(txn.cost_basis.is_none());
    }

    #[test]
    fn test_transaction_value() {
        let asset = Asset::equity("MSFT", "Microsoft Corporation");
        let txn = Transaction::new(asset, 100, 150.0, TradeSide::Buy);
        assert_eq!(txn.value(), 15000.0);
    }

    #[test]
    fn test_trade_side_display() {
        assert_eq!(TradeSide::Buy.to_string(), "BUY");
        assert_eq!(TradeSide::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_transaction_display() {
        let asset = Asset::crypto("BTC", "Bitcoin");
        let txn = Transaction::new(asset, 2, 45000.0, TradeSide::Sell);
        assert_eq!(txn.to_string(), "SELL 2 x BTC @ $45000.00 ($90000.00)");
    }
}
