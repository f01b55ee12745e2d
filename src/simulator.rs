//! Random trade simulation for demos and testing
//!
//! Drives buy/sell transactions against a shared ledger, either from a
//! background timer thread or synchronously. Ticks are serialized by
//! construction: one loop thread executes one trade at a time.

use crate::asset::Asset;
use crate::portfolio::SharedLedger;
use crate::trading::TradingService;
use crate::types::Quantity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Jitter band applied on top of the feed quote when pricing a simulated
/// trade (+/- 10%)
const TRADE_PRICE_JITTER: f64 = 0.10;

/// Units per simulated trade: 1..=10
const MAX_TRADE_QUANTITY: Quantity = 10;

/// Background driver that executes pseudo-random trades on an interval.
pub struct TradeSimulator {
    ledger: SharedLedger,
    rng: Arc<Mutex<StdRng>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TradeSimulator {
    /// Create a simulator seeded from OS entropy
    pub fn new(ledger: SharedLedger) -> Self {
        Self::with_rng(ledger, StdRng::from_entropy())
    }

    /// Create a simulator with a fixed seed, for reproducible runs
    pub fn with_seed(ledger: SharedLedger, seed: u64) -> Self {
        Self::with_rng(ledger, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ledger: SharedLedger, rng: StdRng) -> Self {
        Self {
            ledger,
            rng: Arc::new(Mutex::new(rng)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Sample roster of assets the simulator trades
    pub fn sample_assets() -> Vec<Asset> {
        vec![
            Asset::equity("AAPL", "Apple Inc."),
            Asset::equity("GOOGL", "Alphabet Inc."),
            Asset::equity("MSFT", "Microsoft Corporation"),
            Asset::equity("TSLA", "Tesla Inc."),
            Asset::crypto("BTC", "Bitcoin"),
            Asset::crypto("ETH", "Ethereum"),
        ]
    }

    /// Start the background simulation loop. No-op when already running.
    pub fn start(&mut self, interval: Duration) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let ledger = self.ledger.clone();
        let rng = self.rng.clone();
        let running = self.running.clone();

        self.handle = Some(std::thread::spawn(move || {
            let trading = TradingService::new(ledger);
            let assets = Self::sample_assets();
            while running.load(Ordering::SeqCst) {
                Self::execute_random_trade(&trading, &assets, &rng);
                std::thread::sleep(interval);
            }
        }));
        log::info!("Trade simulation started, interval {:?}", interval);
    }

    /// Stop the simulation loop and wait for the current tick to finish.
    /// No-op when not running.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        log::info!("Trade simulation stopped");
    }

    /// Check if the simulation loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Execute `count` random trades synchronously
    pub fn execute_trades(&self, count: usize) {
        let trading = TradingService::new(self.ledger.clone());
        let assets = Self::sample_assets();
        for _ in 0..count {
            Self::execute_random_trade(&trading, &assets, &self.rng);
        }
        log::info!("Executed {} simulated trades", count);
    }

    fn execute_random_trade(
        trading: &TradingService,
        assets: &[Asset],
        rng: &Arc<Mutex<StdRng>>,
    ) {
        let (asset, quantity, price, want_sell) = {
            let mut rng = rng.lock().expect("simulator rng poisoned");
            let asset = assets[rng.gen_range(0..assets.len())].clone();
            let quantity = rng.gen_range(1..=MAX_TRADE_QUANTITY);

            let ledger = trading.ledger();
            let current = {
                let ledger = ledger.lock().expect("ledger mutex poisoned");
                ledger.price_source().current_price(&asset.symbol)
            };
            let price = current * (1.0 + (rng.gen::<f64>() - 0.5) * 2.0 * TRADE_PRICE_JITTER);
            (asset, quantity, price, rng.gen_bool(0.5))
        };

        let held = {
            let ledger = trading.ledger();
            let ledger = ledger.lock().expect("ledger mutex poisoned");
            ledger.holding(&asset.symbol).map(|h| h.quantity).unwrap_or(0)
        };

        // Sell only when the position covers it, otherwise buy instead
        let result = if want_sell && held >= quantity {
            trading.sell(&asset, quantity, price)
        } else {
            trading.buy(&asset, quantity, price)
        };

        match result {
            Ok(txn) => {
                let count = {
                    let ledger = trading.ledger();
                    let ledger = ledger.lock().expect("ledger mutex poisoned");
                    ledger.transaction_count()
                };
                if count % 5 == 0 {
                    log::info!(
                        "{} trades recorded, portfolio value ${:.2}",
                        count,
                        trading.total_value()
                    );
                }
                log::debug!("Simulated {}", txn);
            }
            Err(e) => log::warn!("Simulated trade failed: {}", e),
        }
    }
}

impl Drop for TradeSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}
