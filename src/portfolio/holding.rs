//! Holding - one symbol's current position

use crate::asset::Asset;
use crate::error::{FolioError, Result};
use crate::types::{Cash, Price, Quantity};
use serde::{Deserialize, Serialize};

/// Current position in one asset: quantity held and weighted-average
/// acquisition cost per unit.
///
/// Both fields are mutated only through [`add_units`](Holding::add_units)
/// and [`remove_units`](Holding::remove_units), which the ledger drives
/// from the transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset identity
    pub asset: Asset,
    /// Units currently held, never negative
    pub quantity: Quantity,
    /// Weighted-average purchase cost per unit
    pub average_cost: Price,
}

impl Holding {
    /// Create an empty position for an asset
    pub fn new(asset: Asset) -> Self {
        Self {
            asset,
            quantity: 0,
            average_cost: 0.0,
        }
    }

    /// Apply a buy: recompute the weighted-average cost over the combined
    /// position.
    pub fn add_units(&mut self, quantity: Quantity, price: Price) {
        let new_quantity = self.quantity + quantity;
        self.average_cost = if new_quantity > 0 {
            (self.quantity as f64 * self.average_cost + quantity as f64 * price)
                / new_quantity as f64
        } else {
            0.0
        };
        self.quantity = new_quantity;
    }

    /// Apply a sell: reduce quantity only. Disposals realize P&L against
    /// the existing average cost rather than moving it, the standard
    /// moving-average cost-basis convention.
    pub fn remove_units(&mut self, quantity: Quantity) -> Result<()> {
        if quantity > self.quantity {
            return Err(FolioError::InsufficientHoldings {
                symbol: self.asset.symbol.clone(),
                requested: quantity,
                held: self.quantity,
            });
        }
        self.quantity -= quantity;
        Ok(())
    }

    /// Total acquisition cost of the position
    pub fn cost_basis(&self) -> Cash {
        self.quantity as f64 * self.average_cost
    }

    /// Market value at the given current price
    pub fn market_value(&self, current_price: Price) -> Cash {
        self.quantity as f64 * current_price
    }

    /// Unrealized P&L at the given current price
    pub fn unrealized_pnl(&self, current_price: Price) -> Cash {
        self.quantity as f64 * (current_price - self.average_cost)
    }
}
