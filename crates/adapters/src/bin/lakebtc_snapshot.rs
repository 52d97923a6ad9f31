//! Prints a market snapshot from LakeBTC
//!
//! Usage:
//!   cargo run --bin lakebtc_snapshot -- [SYMBOL]
//!
//! Balances are printed too when LAKEBTC_API_KEY and LAKEBTC_API_SECRET are set.

use adapters::lakebtc::LakeBtcSpotAdapter;
use adapters::traits::UnifiedRest;
use adapters::AdapterConfig;
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "BTC/USD".to_string());

    let config = AdapterConfig::from_env().context("Failed to load LakeBTC configuration")?;
    let authenticated = config.api_key.is_some() && config.api_secret.is_some();
    let adapter = LakeBtcSpotAdapter::new(config)?;

    let markets = adapter.load_markets(false).await?;
    info!("{} markets available: {}", markets.len(), markets.symbols().join(", "));

    let ticker = adapter.fetch_ticker(&symbol).await?;
    info!(
        "{} last={:?} bid={:?} ask={:?} high={:?} low={:?} volume={:?}",
        symbol, ticker.last, ticker.bid, ticker.ask, ticker.high, ticker.low, ticker.base_volume
    );

    let book = adapter.fetch_order_book(&symbol, None).await?;
    info!(
        "{} book: {} bids (best {:?}), {} asks (best {:?})",
        symbol,
        book.bids.len(),
        book.bids.first(),
        book.asks.len(),
        book.asks.first()
    );

    let trades = adapter.fetch_trades(&symbol, None, Some(10)).await?;
    for trade in &trades {
        info!(
            "trade {:?} at {:?}: {:?} @ {:?}",
            trade.id, trade.datetime, trade.amount, trade.price
        );
    }

    if authenticated {
        let balances = adapter.fetch_balance().await?;
        for (code, account) in &balances.accounts {
            info!("balance {}: total={:?}", code, account.total);
        }
    } else {
        warn!("No credentials configured, skipping balances");
    }

    Ok(())
}
