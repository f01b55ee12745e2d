//! Asset representations

use crate::types::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Common stock
    Equity,
    /// Cryptocurrency
    Crypto,
}

/// Asset identity: symbol, descriptive name, and class.
///
/// The mutable position (quantity, average cost) lives on
/// [`Holding`](crate::portfolio::Holding); an `Asset` is just the
/// immutable descriptor that transactions and holdings reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Trading symbol (upper-cased, unique key)
    pub symbol: Symbol,
    /// Descriptive name
    pub name: String,
    /// Class of asset
    pub class: AssetClass,
}

impl Asset {
    /// Create a new asset; the symbol is normalized to upper case
    pub fn new(symbol: impl Into<Symbol>, name: impl Into<String>, class: AssetClass) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            class,
        }
    }

    /// Create an equity asset
    pub fn equity(symbol: impl Into<Symbol>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, AssetClass::Equity)
    }

    /// Create a cryptocurrency asset
    pub fn crypto(symbol: impl Into<Symbol>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, AssetClass::Crypto)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.symbol, self.class)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Equity => write!(f, "Equity"),
            AssetClass::Crypto => write!(f, "Crypto"),
        }
    }
}
