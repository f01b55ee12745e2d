//! Portfolio analytics
//!
//! Derives portfolio-level metrics from the ledger's current holdings and
//! transaction history. Stateless: every query takes a fresh snapshot
//! under a single lock acquisition and re-derives from it; nothing is
//! cached between calls and the ledger is never mutated.
//!
//! All monetary and percentage outputs carry 4 decimal places, rounded
//! half-up, for reproducible comparisons.

use crate::portfolio::{Holding, SharedLedger, Transaction};
use crate::types::{round4, Cash, Percentage, Price, Symbol, Timestamp, RISK_FREE_RATE};
use chrono::Utc;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Flat per-asset volatility assumed in place of historical price data
const ASSUMED_ASSET_VOLATILITY: f64 = 0.15;

/// Immutable metrics snapshot. A fresh instance is built per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_value: Cash,
    pub total_cost: Cash,
    pub unrealized_pnl: Cash,
    pub realized_pnl: Cash,
    pub total_return_percentage: Percentage,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub asset_count: usize,
    pub transaction_count: usize,
    pub computed_at: Timestamp,
}

/// One asset's return relative to its average cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub symbol: Symbol,
    pub return_percentage: Percentage,
}

/// Point-in-time view of the ledger with each symbol quoted exactly once,
/// so every figure derived from it prices a symbol consistently.
struct Snapshot {
    /// Holdings sorted by symbol; iteration order is the documented
    /// deterministic tie-break for best/worst performer
    holdings: Vec<(Holding, Price)>,
    transactions: Vec<Transaction>,
}

/// Analytics engine over a shared ledger
pub struct AnalyticsEngine {
    ledger: SharedLedger,
}

impl AnalyticsEngine {
    /// Create an engine reading from a shared ledger
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }

    fn snapshot(&self) -> Snapshot {
        let ledger = self.ledger.lock().expect("ledger mutex poisoned");
        let source = ledger.price_source().clone();

        let mut holdings: Vec<(Holding, Price)> = ledger
            .holdings()
            .into_iter()
            .map(|(symbol, holding)| {
                let price = source.current_price(&symbol);
                (holding, price)
            })
            .collect();
        holdings.sort_by(|(a, _), (b, _)| a.asset.symbol.cmp(&b.asset.symbol));

        Snapshot {
            holdings,
            transactions: ledger.transaction_log(),
        }
    }

    /// Compute the full metrics snapshot
    pub fn metrics(&self) -> PortfolioMetrics {
        let snapshot = self.snapshot();
        let total_value = Self::total_value_of(&snapshot);
        let total_cost = Self::total_cost_of(&snapshot);
        let total_return_percentage = Self::return_percentage_of(total_value, total_cost);
        let volatility = Self::volatility_of(&snapshot, total_value);

        PortfolioMetrics {
            total_value,
            total_cost,
            unrealized_pnl: round4(total_value - total_cost),
            realized_pnl: Self::realized_pnl_of(&snapshot),
            total_return_percentage,
            volatility,
            sharpe_ratio: Self::sharpe_ratio_of(total_return_percentage, volatility),
            asset_count: snapshot.holdings.len(),
            transaction_count: snapshot.transactions.len(),
            computed_at: Utc::now(),
        }
    }

    /// Total mark-to-market value
    pub fn total_value(&self) -> Cash {
        Self::total_value_of(&self.snapshot())
    }

    /// Total cost basis: sum of quantity * average cost
    pub fn total_cost(&self) -> Cash {
        Self::total_cost_of(&self.snapshot())
    }

    /// Unrealized P&L: total value minus total cost
    pub fn unrealized_pnl(&self) -> Cash {
        let snapshot = self.snapshot();
        round4(Self::total_value_of(&snapshot) - Self::total_cost_of(&snapshot))
    }

    /// Realized P&L: sum over sell transactions of sale proceeds minus
    /// the cost basis stamped on the transaction at execution time.
    ///
    /// Because the basis is captured at sale, later buys that move a
    /// position's average cost do not retroactively change this figure.
    pub fn realized_pnl(&self) -> Cash {
        Self::realized_pnl_of(&self.snapshot())
    }

    /// Total return as a percentage of cost basis; 0 for a cost-free
    /// portfolio
    pub fn total_return_percentage(&self) -> Percentage {
        let snapshot = self.snapshot();
        Self::return_percentage_of(
            Self::total_value_of(&snapshot),
            Self::total_cost_of(&snapshot),
        )
    }

    /// Value-weighted portfolio volatility.
    ///
    /// Uses a flat 15% per-asset volatility in place of historical price
    /// data, weighted by each holding's share of total value.
    pub fn volatility(&self) -> f64 {
        let snapshot = self.snapshot();
        Self::volatility_of(&snapshot, Self::total_value_of(&snapshot))
    }

    /// Sharpe ratio: excess return over the risk-free rate divided by
    /// volatility; 0 when volatility is 0
    pub fn sharpe_ratio(&self) -> f64 {
        let snapshot = self.snapshot();
        let total_value = Self::total_value_of(&snapshot);
        let total_cost = Self::total_cost_of(&snapshot);
        Self::sharpe_ratio_of(
            Self::return_percentage_of(total_value, total_cost),
            Self::volatility_of(&snapshot, total_value),
        )
    }

    /// Each holding's market value as a percentage of total value.
    /// Empty when the portfolio has no value.
    pub fn asset_allocation(&self) -> HashMap<Symbol, Percentage> {
        let snapshot = self.snapshot();
        let total_value = Self::total_value_of(&snapshot);
        if total_value == 0.0 {
            return HashMap::new();
        }

        snapshot
            .holdings
            .iter()
            .map(|(holding, price)| {
                let weight = round4(holding.market_value(*price) / total_value);
                (holding.asset.symbol.clone(), weight * 100.0)
            })
            .collect()
    }

    /// Best performing held asset by return over average cost; `None`
    /// when nothing is held. Ties go to the lexicographically smallest
    /// symbol.
    pub fn best_performer(&self) -> Option<AssetPerformance> {
        self.extreme_performer(|candidate, best| candidate > best)
    }

    /// Worst performing held asset; same tie-break as
    /// [`best_performer`](AnalyticsEngine::best_performer)
    pub fn worst_performer(&self) -> Option<AssetPerformance> {
        self.extreme_performer(|candidate, worst| candidate < worst)
    }

    fn extreme_performer(&self, better: impl Fn(f64, f64) -> bool) -> Option<AssetPerformance> {
        let snapshot = self.snapshot();
        let mut extreme: Option<AssetPerformance> = None;

        // Holdings are symbol-sorted, so with a strict comparison the
        // first symbol wins ties.
        for (holding, price) in &snapshot.holdings {
            if holding.average_cost == 0.0 {
                continue;
            }
            let return_percentage =
                round4((price - holding.average_cost) / holding.average_cost) * 100.0;
            match &extreme {
                Some(current) if !better(return_percentage, current.return_percentage) => {}
                _ => {
                    extreme = Some(AssetPerformance {
                        symbol: holding.asset.symbol.clone(),
                        return_percentage,
                    });
                }
            }
        }
        extreme
    }

    fn total_value_of(snapshot: &Snapshot) -> Cash {
        round4(
            snapshot
                .holdings
                .iter()
                .map(|(holding, price)| holding.market_value(*price))
                .sum(),
        )
    }

    fn total_cost_of(snapshot: &Snapshot) -> Cash {
        round4(
            snapshot
                .holdings
                .iter()
                .map(|(holding, _)| holding.cost_basis())
                .sum(),
        )
    }

    fn realized_pnl_of(snapshot: &Snapshot) -> Cash {
        round4(
            snapshot
                .transactions
                .iter()
                .filter(|txn| txn.is_sell())
                .map(|txn| {
                    let basis = txn.cost_basis.unwrap_or(0.0) * txn.quantity as f64;
                    txn.value() - basis
                })
                .sum(),
        )
    }

    fn return_percentage_of(total_value: Cash, total_cost: Cash) -> Percentage {
        if total_cost == 0.0 {
            return 0.0;
        }
        round4((total_value - total_cost) / total_cost) * 100.0
    }

    fn volatility_of(snapshot: &Snapshot, total_value: Cash) -> f64 {
        if snapshot.holdings.is_empty() || total_value == 0.0 {
            return 0.0;
        }

        let weighted: f64 = snapshot
            .holdings
            .iter()
            .map(|(holding, price)| {
                let weight = round4(holding.market_value(*price) / total_value);
                weight * ASSUMED_ASSET_VOLATILITY
            })
            .sum();
        round4(weighted)
    }

    fn sharpe_ratio_of(total_return_percentage: Percentage, volatility: f64) -> f64 {
        if volatility == 0.0 {
            return 0.0;
        }
        let excess_return = total_return_percentage - RISK_FREE_RATE * 100.0;
        round4(excess_return / volatility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::portfolio::{share, Ledger};
    use crate::pricing::MockPriceFeed;
    use crate::trading::TradingService;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    /// Jitter-free fixture: engine, trading service, and feed
    fn fixture() -> (AnalyticsEngine, TradingService, Arc<MockPriceFeed>) {
        let feed = Arc::new(MockPriceFeed::with_seed(0).with_jitter(0.0));
        let ledger = share(Ledger::new(feed.clone()));
        (
            AnalyticsEngine::new(ledger.clone()),
            TradingService::new(ledger),
            feed,
        )
    }

    #[test]
    fn test_empty_portfolio_metrics_all_zero() {
        let (engine, _, _) = fixture();
        let metrics = engine.metrics();

        assert_eq!(metrics.total_value, 0.0);
        assert_eq!(metrics.total_cost, 0.0);
        assert_eq!(metrics.unrealized_pnl, 0.0);
        assert_eq!(metrics.realized_pnl, 0.0);
        assert_eq!(metrics.total_return_percentage, 0.0);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.asset_count, 0);
        assert_eq!(metrics.transaction_count, 0);
        assert!(engine.asset_allocation().is_empty());
        assert!(engine.best_performer().is_none());
        assert!(engine.worst_performer().is_none());
    }

    #[test]
    fn test_total_value_and_cost() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAA", 123.45);
        feed.set_base_price("BBB", 987.65);

        trading.buy(&Asset::equity("AAA", "A"), 5, 100.0).unwrap();
        trading.buy(&Asset::equity("BBB", "B"), 1, 1000.0).unwrap();

        let expected_value = 5.0 * 123.45 + 987.65;
        assert_relative_eq!(engine.total_value(), expected_value, epsilon = 1e-9);
        assert_relative_eq!(engine.total_cost(), 1500.0);
        assert_relative_eq!(engine.unrealized_pnl(), expected_value - 1500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_realized_pnl_uses_basis_at_sale() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 100.0);
        let asset = Asset::equity("AAPL", "Apple Inc.");

        trading.buy(&asset, 10, 100.0).unwrap();
        trading.sell(&asset, 5, 110.0).unwrap();
        assert_relative_eq!(engine.realized_pnl(), 50.0);

        // A later buy moves the average cost but not past realized P&L
        trading.buy(&asset, 10, 200.0).unwrap();
        assert_relative_eq!(engine.realized_pnl(), 50.0);
    }

    #[test]
    fn test_total_return_percentage() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 110.0);

        trading
            .buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0)
            .unwrap();

        assert_relative_eq!(engine.total_return_percentage(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_volatility_is_flat_weighted_constant() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 100.0);
        feed.set_base_price("BTC", 100.0);

        trading
            .buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0)
            .unwrap();
        trading.buy(&Asset::crypto("BTC", "Bitcoin"), 10, 100.0).unwrap();

        // Weights sum to 1, so the flat 15% comes straight through
        assert_relative_eq!(engine.volatility(), 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_sharpe_ratio() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 110.0);

        trading
            .buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0)
            .unwrap();

        // (10% - 2%) / 0.15
        assert_relative_eq!(engine.sharpe_ratio(), round4(8.0 / 0.15), epsilon = 1e-9);
    }

    #[test]
    fn test_allocation_splits_evenly() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAA", 100.0);
        feed.set_base_price("BBB", 50.0);

        // Equal market value: 10 x 100 and 20 x 50
        trading.buy(&Asset::equity("AAA", "A"), 10, 90.0).unwrap();
        trading.buy(&Asset::equity("BBB", "B"), 20, 45.0).unwrap();

        let allocation = engine.asset_allocation();
        assert_eq!(allocation.len(), 2);
        assert_relative_eq!(allocation["AAA"], 50.0, epsilon = 1e-6);
        assert_relative_eq!(allocation["BBB"], 50.0, epsilon = 1e-6);
        let total: f64 = allocation.values().sum();
        assert_relative_eq!(total, 100.0, epsilon = 0.01);
    }

    #[test]
    fn test_best_and_worst_performer() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("UPUP", 120.0);
        feed.set_base_price("DOWN", 80.0);

        trading.buy(&Asset::equity("UPUP", "Up"), 1, 100.0).unwrap();
        trading.buy(&Asset::equity("DOWN", "Down"), 1, 100.0).unwrap();

        let best = engine.best_performer().unwrap();
        assert_eq!(best.symbol, "UPUP");
        assert_relative_eq!(best.return_percentage, 20.0, epsilon = 1e-9);

        let worst = engine.worst_performer().unwrap();
        assert_eq!(worst.symbol, "DOWN");
        assert_relative_eq!(worst.return_percentage, -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_performer_tie_breaks_lexicographically() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("BBB", 110.0);
        feed.set_base_price("AAA", 110.0);

        trading.buy(&Asset::equity("BBB", "B"), 1, 100.0).unwrap();
        trading.buy(&Asset::equity("AAA", "A"), 1, 100.0).unwrap();

        assert_eq!(engine.best_performer().unwrap().symbol, "AAA");
        assert_eq!(engine.worst_performer().unwrap().symbol, "AAA");
    }

    #[test]
    fn test_metrics_serialize_to_json() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 110.0);
        trading
            .buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0)
            .unwrap();

        let json = serde_json::to_string(&engine.metrics()).unwrap();
        assert!(json.contains("\"total_value\":1100.0"));
        assert!(json.contains("\"asset_count\":1"));
    }

    #[test]
    fn test_metrics_snapshot_counts() {
        let (engine, trading, feed) = fixture();
        feed.set_base_price("AAPL", 100.0);
        let asset = Asset::equity("AAPL", "Apple Inc.");

        trading.buy(&asset, 10, 100.0).unwrap();
        trading.sell(&asset, 5, 110.0).unwrap();

        let metrics = engine.metrics();
        assert_eq!(metrics.asset_count, 1);
        assert_eq!(metrics.transaction_count, 2);
        assert!(metrics.computed_at <= Utc::now());
    }
}
