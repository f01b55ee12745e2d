//! Trading service - validated buy/sell entry point
//!
//! Validates trade requests, constructs transaction records, and hands
//! them to the ledger. Also exposes a few convenience P&L queries over
//! the current holdings.

use crate::asset::Asset;
use crate::error::{FolioError, Result};
use crate::portfolio::{SharedLedger, TradeSide, Transaction};
use crate::types::{Cash, Percentage, Price, Quantity};

/// Entry point for executing trades against a shared ledger.
///
/// Quantity and price are validated here, before any transaction is
/// constructed, so a failed call leaves the ledger untouched. The
/// ledger performs its own oversell check as a second line of defense.
pub struct TradingService {
    ledger: SharedLedger,
}

impl TradingService {
    /// Create a trading service over a shared ledger
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }

    /// Buy `quantity` units of `asset` at `price` per unit.
    ///
    /// Fails with `InvalidQuantity` for a zero quantity and
    /// `InvalidPrice` for a non-positive price.
    pub fn buy(&self, asset: &Asset, quantity: Quantity, price: Price) -> Result<Transaction> {
        Self::validate(quantity, price)?;

        let transaction = Transaction::new(asset.clone(), quantity, price, TradeSide::Buy);
        let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
        let recorded = ledger.record_transaction(transaction)?;
        log::info!("{}", recorded);
        Ok(recorded)
    }

    /// Sell `quantity` units of `asset` at `price` per unit.
    ///
    /// In addition to the quantity/price validation this fails with
    /// `InsufficientHoldings` when the symbol is unknown or the position
    /// cannot cover the requested quantity, checked before the
    /// transaction is constructed.
    pub fn sell(&self, asset: &Asset, quantity: Quantity, price: Price) -> Result<Transaction> {
        Self::validate(quantity, price)?;

        let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
        let held = ledger
            .holding(&asset.symbol)
            .map(|h| h.quantity)
            .unwrap_or(0);
        if held < quantity {
            return Err(FolioError::InsufficientHoldings {
                symbol: asset.symbol.clone(),
                requested: quantity,
                held,
            });
        }

        let transaction = Transaction::new(asset.clone(), quantity, price, TradeSide::Sell);
        let recorded = ledger.record_transaction(transaction)?;
        log::info!("{}", recorded);
        Ok(recorded)
    }

    /// Total mark-to-market value of the portfolio
    pub fn total_value(&self) -> Cash {
        self.ledger
            .lock()
            .expect("ledger mutex poisoned")
            .total_market_value()
    }

    /// Unrealized P&L across all holdings: sum of
    /// `(current price - average cost) * quantity`
    pub fn unrealized_pnl(&self) -> Cash {
        let ledger = self.ledger.lock().expect("ledger mutex poisoned");
        let source = ledger.price_source().clone();
        ledger
            .holdings()
            .values()
            .map(|h| h.unrealized_pnl(source.current_price(&h.asset.symbol)))
            .sum()
    }

    /// Portfolio performance as a percentage of total cost; 0 when the
    /// portfolio has no cost basis
    pub fn performance_percent(&self) -> Percentage {
        let ledger = self.ledger.lock().expect("ledger mutex poisoned");
        let source = ledger.price_source().clone();

        let mut total_cost = 0.0;
        let mut total_market_value = 0.0;
        for holding in ledger.holdings().values() {
            total_cost += holding.cost_basis();
            total_market_value += holding.market_value(source.current_price(&holding.asset.symbol));
        }

        if total_cost == 0.0 {
            return 0.0;
        }
        (total_market_value - total_cost) / total_cost * 100.0
    }

    /// Shared ledger handle, for wiring analytics or the simulator
    pub fn ledger(&self) -> SharedLedger {
        self.ledger.clone()
    }

    fn validate(quantity: Quantity, price: Price) -> Result<()> {
        if quantity == 0 {
            return Err(FolioError::InvalidQuantity(quantity as i64));
        }
        if price <= 0.0 {
            return Err(FolioError::InvalidPrice(price));
        }
        Ok(())
    }
}
