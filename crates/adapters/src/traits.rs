use crate::base::ExchangeDescriptor;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub type Price = f64;
pub type Quantity = f64;
pub type UnixMillis = u64;

// ============================================================================
// Markets
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MinMax {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MarketLimits {
    pub amount: MinMax,
    pub price: MinMax,
    pub cost: MinMax,
}

/// Decimal places for amounts and prices, when the venue publishes them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MarketPrecision {
    pub amount: Option<u32>,
    pub price: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Market {
    /// Venue-native market id, e.g. `btcusd`
    pub id: String,
    /// Normalized `BASE/QUOTE` symbol
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub base_id: String,
    pub quote_id: String,
    pub active: Option<bool>,
    pub precision: MarketPrecision,
    pub limits: MarketLimits,
    pub info: Value,
}

// ============================================================================
// Market Data
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct Ticker {
    pub symbol: Option<String>,
    pub timestamp: UnixMillis,
    pub datetime: Option<String>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub bid: Option<Price>,
    pub bid_volume: Option<Quantity>,
    pub ask: Option<Price>,
    pub ask_volume: Option<Quantity>,
    pub vwap: Option<Price>,
    pub open: Option<Price>,
    pub close: Option<Price>,
    pub last: Option<Price>,
    pub previous_close: Option<Price>,
    pub change: Option<f64>,
    pub percentage: Option<f64>,
    pub average: Option<Price>,
    pub base_volume: Option<Quantity>,
    pub quote_volume: Option<Quantity>,
    pub info: Value,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct OrderBook {
    pub symbol: Option<String>,
    /// Best bid first
    pub bids: Vec<(Price, Quantity)>,
    /// Best ask first
    pub asks: Vec<(Price, Quantity)>,
    pub timestamp: Option<UnixMillis>,
    pub datetime: Option<String>,
    pub nonce: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fee {
    pub cost: f64,
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Trade {
    pub id: Option<String>,
    pub timestamp: Option<UnixMillis>,
    pub datetime: Option<String>,
    pub symbol: Option<String>,
    pub order: Option<String>,
    pub order_type: Option<OrderType>,
    pub side: Option<Side>,
    pub taker_or_maker: Option<String>,
    pub price: Option<Price>,
    pub amount: Option<Quantity>,
    /// `price * amount` when both are known
    pub cost: Option<f64>,
    pub fee: Option<Fee>,
    pub info: Value,
}

// ============================================================================
// Balance & Account
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BalanceAccount {
    pub free: Option<f64>,
    pub used: Option<f64>,
    pub total: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Balances {
    pub info: Value,
    /// Keyed by normalized currency code
    pub accounts: HashMap<String, BalanceAccount>,
}

impl Balances {
    pub fn get(&self, code: &str) -> Option<&BalanceAccount> {
        self.accounts.get(code)
    }

    pub fn free(&self) -> HashMap<String, Option<f64>> {
        self.project(|account| account.free)
    }

    pub fn used(&self) -> HashMap<String, Option<f64>> {
        self.project(|account| account.used)
    }

    pub fn total(&self) -> HashMap<String, Option<f64>> {
        self.project(|account| account.total)
    }

    fn project(&self, field: impl Fn(&BalanceAccount) -> Option<f64>) -> HashMap<String, Option<f64>> {
        self.accounts
            .iter()
            .map(|(code, account)| (code.clone(), field(account)))
            .collect()
    }
}

// ============================================================================
// Orders & Trading
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// Acknowledgement of a placed order; venues that do not echo the order
/// back only provide the raw response and, at best, its id
#[derive(Clone, Debug, Serialize)]
pub struct OrderAck {
    pub id: Option<String>,
    pub info: Value,
}

/// Normalized REST surface every exchange adapter implements
#[async_trait::async_trait]
pub trait UnifiedRest: Send + Sync {
    /// Static metadata: capabilities, endpoints, fees, exception table
    fn describe(&self) -> &ExchangeDescriptor;

    // Market Data
    async fn fetch_markets(&self) -> Result<Vec<Market>>;
    async fn fetch_order_book(&self, symbol: &str, limit: Option<usize>) -> Result<OrderBook>;
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker>;
    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> Result<HashMap<String, Ticker>>;
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<UnixMillis>,
        limit: Option<usize>
    ) -> Result<Vec<Trade>>;

    // Account & Balance
    async fn fetch_balance(&self) -> Result<Balances>;

    // Order Management
    async fn create_order(
        &self,
        symbol: &str,
        ord_type: OrderType,
        side: Side,
        amount: Quantity,
        price: Option<Price>
    ) -> Result<OrderAck>;
    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> Result<Value>;
}
