//! Human-readable analytics report

use crate::analytics::{AnalyticsEngine, AssetPerformance, PortfolioMetrics};
use crate::error::Result;
use crate::types::{Percentage, Symbol, TIMESTAMP_FORMAT};
use std::fmt;
use std::path::Path;

const SEPARATOR_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

/// Captured analytics rendered as a sectioned plain-text report
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    metrics: PortfolioMetrics,
    allocation: Vec<(Symbol, Percentage)>,
    best: Option<AssetPerformance>,
    worst: Option<AssetPerformance>,
}

impl AnalyticsReport {
    /// Capture a report from the engine's current state
    pub fn build(engine: &AnalyticsEngine) -> Self {
        let mut allocation: Vec<_> = engine.asset_allocation().into_iter().collect();
        // Largest weight first; symbol breaks ties
        allocation.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        Self {
            metrics: engine.metrics(),
            allocation,
            best: engine.best_performer(),
            worst: engine.worst_performer(),
        }
    }

    /// Metrics snapshot backing this report
    pub fn metrics(&self) -> &PortfolioMetrics {
        &self.metrics
    }

    /// Write the rendered report to a file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())?;
        log::info!("Analytics report written to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for AnalyticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Portfolio Analytics Report")?;
        writeln!(f, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(
            f,
            "Generated on: {}",
            self.metrics.computed_at.format(TIMESTAMP_FORMAT)
        )?;
        writeln!(f)?;

        writeln!(f, "PORTFOLIO SUMMARY")?;
        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
        writeln!(f, "Total Value: ${:.2}", self.metrics.total_value)?;
        writeln!(f, "Total Cost: ${:.2}", self.metrics.total_cost)?;
        writeln!(f, "Number of Assets: {}", self.metrics.asset_count)?;
        writeln!(f, "Number of Transactions: {}", self.metrics.transaction_count)?;
        writeln!(f)?;

        writeln!(f, "PERFORMANCE METRICS")?;
        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
        writeln!(f, "Unrealized P&L: ${:.2}", self.metrics.unrealized_pnl)?;
        writeln!(f, "Realized P&L: ${:.2}", self.metrics.realized_pnl)?;
        writeln!(f, "Total Return: {:.2}%", self.metrics.total_return_percentage)?;
        writeln!(f, "Volatility: {:.2}%", self.metrics.volatility * 100.0)?;
        writeln!(f, "Sharpe Ratio: {:.4}", self.metrics.sharpe_ratio)?;
        writeln!(f)?;

        writeln!(f, "ASSET ALLOCATION")?;
        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
        if self.allocation.is_empty() {
            writeln!(f, "No assets in portfolio")?;
        } else {
            for (symbol, percentage) in &self.allocation {
                writeln!(f, "{}: {:.2}%", symbol, percentage)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "TOP PERFORMERS")?;
        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
        match &self.best {
            Some(best) => writeln!(f, "Best: {} ({:.2}%)", best.symbol, best.return_percentage)?,
            None => writeln!(f, "Best: n/a")?,
        }
        match &self.worst {
            Some(worst) => writeln!(
                f,
                "Worst: {} ({:.2}%)",
                worst.symbol, worst.return_percentage
            )?,
            None => writeln!(f, "Worst: n/a")?,
        }
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::portfolio::{share, Ledger};
    use crate::pricing::MockPriceFeed;
    use crate::trading::TradingService;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn engine_with_positions() -> AnalyticsEngine {
        let feed = Arc::new(MockPriceFeed::with_seed(0).with_jitter(0.0));
        feed.set_base_price("AAPL", 110.0);
        feed.set_base_price("BTC", 40000.0);

        let ledger = share(Ledger::new(feed));
        let trading = TradingService::new(ledger.clone());
        trading
            .buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0)
            .unwrap();
        trading.buy(&Asset::crypto("BTC", "Bitcoin"), 1, 45000.0).unwrap();
        AnalyticsEngine::new(ledger)
    }

    #[test]
    fn test_report_sections() {
        let engine = engine_with_positions();
        let report = AnalyticsReport::build(&engine).to_string();

        assert!(report.starts_with("Portfolio Analytics Report"));
        assert!(report.contains("PORTFOLIO SUMMARY"));
        assert!(report.contains("PERFORMANCE METRICS"));
        assert!(report.contains("ASSET ALLOCATION"));
        assert!(report.contains("TOP PERFORMERS"));
        assert!(report.contains("Best: AAPL (10.00%)"));
        assert!(report.contains("Worst: BTC ("));
    }

    #[test]
    fn test_allocation_sorted_by_weight() {
        let engine = engine_with_positions();
        let report = AnalyticsReport::build(&engine).to_string();

        // BTC dominates the portfolio value, so it is listed first
        let btc_pos = report.find("BTC: ").unwrap();
        let aapl_pos = report.find("AAPL: ").unwrap();
        assert!(btc_pos < aapl_pos);
    }

    #[test]
    fn test_empty_portfolio_report() {
        let feed = Arc::new(MockPriceFeed::with_seed(0).with_jitter(0.0));
        let engine = AnalyticsEngine::new(share(Ledger::new(feed)));
        let report = AnalyticsReport::build(&engine).to_string();

        assert!(report.contains("No assets in portfolio"));
        assert!(report.contains("Best: n/a"));
        assert!(report.contains("Worst: n/a"));
    }

    #[test]
    fn test_write_to_file() {
        let engine = engine_with_positions();
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        AnalyticsReport::build(&engine).write_to(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Portfolio Analytics Report"));
    }
}
