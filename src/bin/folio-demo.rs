//! Demo harness: run the trade simulator against a fresh portfolio for a
//! few seconds, print a report, and export CSV files.
//!
//! Set `RUST_LOG=info` (or `debug`) to see individual trades.

use anyhow::Result;
use folio::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let feed = Arc::new(MockPriceFeed::new());
    let ledger = folio::portfolio::share(Ledger::new(feed));
    let trading = TradingService::new(ledger.clone());
    let analytics = AnalyticsEngine::new(ledger.clone());

    // A few hand-placed trades
    trading.buy(&Asset::equity("AAPL", "Apple Inc."), 10, 150.0)?;
    trading.buy(&Asset::crypto("BTC", "Bitcoin"), 1, 45000.0)?;
    trading.sell(&Asset::equity("AAPL", "Apple Inc."), 3, 155.0)?;

    // Then let the simulator churn for a bit
    let mut simulator = TradeSimulator::new(ledger.clone());
    simulator.start(Duration::from_millis(200));
    std::thread::sleep(Duration::from_secs(2));
    simulator.stop();

    let report = AnalyticsReport::build(&analytics);
    println!("{}", report);

    folio::export::export_all(
        &ledger,
        Path::new("portfolio.csv"),
        Path::new("transactions.csv"),
    )?;
    folio::export::export_summary(&analytics, Path::new("portfolio_summary.csv"))?;
    report.write_to(Path::new("analytics_report.txt"))?;

    println!(
        "Final portfolio value: ${:.2} across {} transactions",
        trading.total_value(),
        ledger.lock().expect("ledger mutex poisoned").transaction_count()
    );
    Ok(())
}
