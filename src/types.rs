//! Core types and constants

use chrono::{DateTime, Utc};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for assets
pub type Symbol = String;

/// Price type (per-unit, single implicit currency)
pub type Price = f64;

/// Quantity of units held or traded (whole units only)
pub type Quantity = u32;

/// Money/cash type
pub type Cash = f64;

/// Percentage type (0.0 to 100.0)
pub type Percentage = f64;

/// Number of decimal places carried by monetary and percentage outputs
pub const DECIMAL_PLACES: u32 = 4;

/// Annual risk-free rate used for the Sharpe ratio
pub const RISK_FREE_RATE: f64 = 0.02;

/// Timestamp format used by exports and reports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Round to 4 decimal places, half-up.
///
/// Every monetary and percentage figure the analytics engine emits is
/// rounded this way so results are reproducible in test comparisons.
pub fn round4(value: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES as i32);
    (value * scale).round() / scale
}
