//! # folio
//!
//! A toy portfolio tracker: assets, buy/sell transactions with
//! weighted-average cost accounting, mark-to-market valuation against a
//! mock price feed, derived analytics, and flat-file export.
//!
//! ## Example
//!
//! ```rust
//! use folio::prelude::*;
//! use std::sync::Arc;
//!
//! let feed = Arc::new(MockPriceFeed::with_seed(1).with_jitter(0.0));
//! let ledger = folio::portfolio::share(Ledger::new(feed));
//!
//! let trading = TradingService::new(ledger.clone());
//! trading.buy(&Asset::equity("AAPL", "Apple Inc."), 10, 100.0).unwrap();
//!
//! let analytics = AnalyticsEngine::new(ledger);
//! let metrics = analytics.metrics();
//! assert_eq!(metrics.asset_count, 1);
//! ```

pub mod analytics;
pub mod asset;
pub mod error;
pub mod export;
pub mod portfolio;
pub mod pricing;
pub mod report;
pub mod simulator;
pub mod trading;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::analytics::{AnalyticsEngine, AssetPerformance, PortfolioMetrics};
    pub use crate::asset::{Asset, AssetClass};
    pub use crate::error::{FolioError, Result};
    pub use crate::portfolio::{Holding, Ledger, SharedLedger, TradeSide, Transaction};
    pub use crate::pricing::{MockPriceFeed, PriceSource};
    pub use crate::report::AnalyticsReport;
    pub use crate::simulator::TradeSimulator;
    pub use crate::trading::TradingService;
    pub use crate::types::*;
}
