//! Mock price source
//!
//! Prices are synthesized from a configurable base price plus bounded,
//! uniformly drawn jitter. No real market data is fetched anywhere.

use crate::types::{Price, Symbol};
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Capability to quote a current price for a symbol
pub trait PriceSource: Send + Sync {
    /// Current price for `symbol`, always >= 0
    fn current_price(&self, symbol: &str) -> Price;
}

/// Default jitter band for market quotes (+/- 5%)
pub const DEFAULT_JITTER: f64 = 0.05;

/// Base price assumed for symbols nobody ever quoted or configured
const FALLBACK_BASE_PRICE: Price = 100.0;

struct FeedState {
    base_prices: HashMap<Symbol, Price>,
    rng: StdRng,
}

/// Pseudo-random price feed with a table of configurable base prices.
///
/// A quote is `base * (1 + jitter)` with jitter drawn uniformly from a
/// symmetric band. Symbols without a configured base get one synthesized
/// once (uniform in 50..250) and memoized, so repeated queries for an
/// unknown symbol stay centered on a stable base.
///
/// Interior mutability lets the feed be shared behind an `Arc` while
/// `current_price` takes `&self`.
pub struct MockPriceFeed {
    state: Mutex<FeedState>,
    jitter: f64,
}

impl MockPriceFeed {
    /// Create a feed seeded from OS entropy with the default jitter band
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a feed with a fixed RNG seed, for reproducible quotes
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            state: Mutex::new(FeedState {
                base_prices: Self::default_base_prices(),
                rng,
            }),
            jitter: DEFAULT_JITTER,
        }
    }

    /// Override the jitter band; `0.0` makes quotes fully deterministic
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Base prices for common assets
    fn default_base_prices() -> HashMap<Symbol, Price> {
        let mut prices = HashMap::new();
        for (symbol, price) in [
            ("AAPL", 150.0),
            ("GOOGL", 2800.0),
            ("MSFT", 300.0),
            ("TSLA", 800.0),
            ("AMZN", 3300.0),
            ("NVDA", 500.0),
            ("META", 350.0),
            ("NFLX", 600.0),
            ("BTC", 45000.0),
            ("ETH", 3000.0),
            ("ADA", 1.5),
            ("DOT", 20.0),
            ("LINK", 25.0),
            ("UNI", 30.0),
        ] {
            prices.insert(symbol.to_string(), price);
        }
        prices
    }

    /// Set the base price for a symbol, making its quotes deterministic
    /// modulo jitter. Useful for tests.
    pub fn set_base_price(&self, symbol: &str, base_price: Price) {
        let mut state = self.state.lock().expect("price feed mutex poisoned");
        state.base_prices.insert(symbol.to_uppercase(), base_price);
    }

    /// Base price for a symbol without jitter applied
    pub fn base_price(&self, symbol: &str) -> Price {
        let state = self.state.lock().expect("price feed mutex poisoned");
        state
            .base_prices
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(FALLBACK_BASE_PRICE)
    }

    /// All symbols with a known base price
    pub fn known_symbols(&self) -> Vec<Symbol> {
        let state = self.state.lock().expect("price feed mutex poisoned");
        state.base_prices.keys().cloned().collect()
    }

    /// Drop all configured base prices
    pub fn clear_prices(&self) {
        let mut state = self.state.lock().expect("price feed mutex poisoned");
        state.base_prices.clear();
    }
}

impl Default for MockPriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for MockPriceFeed {
    fn current_price(&self, symbol: &str) -> Price {
        let mut state = self.state.lock().expect("price feed mutex poisoned");
        let key = symbol.to_uppercase();

        let base = match state.base_prices.get(&key) {
            Some(&base) => base,
            None => {
                // Synthesize and memoize a base for unknown symbols
                let base = 50.0 + state.rng.gen::<f64>() * 200.0;
                state.base_prices.insert(key, base);
                base
            }
        };

        let variation = 1.0 + (state.rng.gen::<f64>() - 0.5) * 2.0 * self.jitter;
        base * variation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbol_quotes_within_band() {
        let feed = MockPriceFeed::with_seed(42);
        for _ in 0..100 {
            let price = feed.current_price("AAPL");
            assert!(price >= 150.0 * 0.95 && price <= 150.0 * 1.05);
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let feed = MockPriceFeed::with_seed(1).with_jitter(0.0);
        feed.set_base_price("XYZ", 123.45);
        assert_eq!(feed.current_price("XYZ"), 123.45);
        assert_eq!(feed.current_price("xyz"), 123.45);
    }

    #[test]
    fn test_unknown_symbol_base_is_memoized() {
        let feed = MockPriceFeed::with_seed(7).with_jitter(0.0);
        let first = feed.current_price("ZZZZ");
        assert!((50.0..=250.0).contains(&first));
        // Same base on every subsequent quote
        assert_eq!(feed.current_price("ZZZZ"), first);
        assert_eq!(feed.base_price("ZZZZ"), first);
    }

    #[test]
    fn test_base_price_fallback() {
        let feed = MockPriceFeed::with_seed(3);
        assert_eq!(feed.base_price("NEVERSEEN"), 100.0);
    }

    #[test]
    fn test_clear_prices() {
        let feed = MockPriceFeed::with_seed(3);
        assert!(!feed.known_symbols().is_empty());
        feed.clear_prices();
        assert!(feed.known_symbols().is_empty());
    }
}
