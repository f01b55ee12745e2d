//! CSV export of holdings, transactions, and summary figures
//!
//! Export renders read-only snapshots; failures here never touch ledger
//! state.

use crate::analytics::AnalyticsEngine;
use crate::error::Result;
use crate::portfolio::SharedLedger;
use crate::types::TIMESTAMP_FORMAT;
use std::path::Path;

/// Export current holdings, sorted by symbol.
///
/// Columns: Symbol, Name, Quantity, Average Cost, Current Price,
/// Market Value.
pub fn export_holdings(ledger: &SharedLedger, path: &Path) -> Result<()> {
    let (mut holdings, source) = {
        let ledger = ledger.lock().expect("ledger mutex poisoned");
        (
            ledger.holdings().into_values().collect::<Vec<_>>(),
            ledger.price_source().clone(),
        )
    };
    holdings.sort_by(|a, b| a.asset.symbol.cmp(&b.asset.symbol));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Symbol",
        "Name",
        "Quantity",
        "Average Cost",
        "Current Price",
        "Market Value",
    ])?;

    for holding in holdings {
        let price = source.current_price(&holding.asset.symbol);
        writer.write_record([
            holding.asset.symbol.clone(),
            holding.asset.name.clone(),
            holding.quantity.to_string(),
            format!("{:.2}", holding.average_cost),
            format!("{:.2}", price),
            format!("{:.2}", holding.market_value(price)),
        ])?;
    }
    writer.flush()?;
    log::info!("Holdings exported to {}", path.display());
    Ok(())
}

/// Export the transaction log in chronological order.
///
/// Columns: Timestamp, Side, Symbol, Name, Quantity, Price, Total Value.
pub fn export_transactions(ledger: &SharedLedger, path: &Path) -> Result<()> {
    let transactions = {
        let ledger = ledger.lock().expect("ledger mutex poisoned");
        ledger.transaction_log()
    };

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Timestamp",
        "Side",
        "Symbol",
        "Name",
        "Quantity",
        "Price",
        "Total Value",
    ])?;

    for txn in transactions {
        writer.write_record([
            txn.dt.format(TIMESTAMP_FORMAT).to_string(),
            txn.side.to_string(),
            txn.asset.symbol.clone(),
            txn.asset.name.clone(),
            txn.quantity.to_string(),
            format!("{:.2}", txn.price),
            format!("{:.2}", txn.value()),
        ])?;
    }
    writer.flush()?;
    log::info!("Transactions exported to {}", path.display());
    Ok(())
}

/// Export summary metrics plus an allocation breakdown
pub fn export_summary(engine: &AnalyticsEngine, path: &Path) -> Result<()> {
    let metrics = engine.metrics();
    let allocation = engine.asset_allocation();

    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(["Metric", "Value"])?;
    let rows = [
        ("Total Value", format!("{:.2}", metrics.total_value)),
        ("Total Cost", format!("{:.2}", metrics.total_cost)),
        ("Unrealized P&L", format!("{:.2}", metrics.unrealized_pnl)),
        ("Realized P&L", format!("{:.2}", metrics.realized_pnl)),
        (
            "Total Return %",
            format!("{:.2}", metrics.total_return_percentage),
        ),
        ("Number of Assets", metrics.asset_count.to_string()),
        (
            "Number of Transactions",
            metrics.transaction_count.to_string(),
        ),
    ];
    for (metric, value) in rows {
        writer.write_record([metric.to_string(), value])?;
    }

    writer.write_record(["Asset Breakdown"])?;
    writer.write_record(["Symbol", "Percentage"])?;
    let mut entries: Vec<_> = allocation.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    for (symbol, percentage) in entries {
        writer.write_record([symbol, format!("{:.2}%", percentage)])?;
    }

    writer.flush()?;
    log::info!("Summary exported to {}", path.display());
    Ok(())
}

/// Export holdings and transactions to separate files
pub fn export_all(
    ledger: &SharedLedger,
    holdings_path: &Path,
    transactions_path: &Path,
) -> Result<()> {
    export_holdings(ledger, holdings_path)?;
    export_transactions(ledger, transactions_path)?;
    Ok(())
}
