//! LakeBTC Spot Market Adapter
//!
//! Implements [`UnifiedRest`] for LakeBTC on top of the shared base client.
//!
//! # Features
//!
//! - **Market Data**: markets, tickers (the API always returns all of them),
//!   order books and public trades
//! - **Account Operations**: balances (totals only)
//! - **Order Management**: limit order placement and cancellation
//!
//! Response shapes handled here:
//!
//! ```text
//! ticker       {"btcusd": {"high": "..", "low": "..", "bid": "..", "ask": "..", "last": "..", "volume": ".."}, ..}
//! bctrades     [{"tid": 1, "date": 1500000000, "price": "..", "amount": ".."}, ..]
//! bcorderbook  {"bids": [[price, amount], ..], "asks": [..]}
//! account info {"balance": {"BTC": "..", "USD": ".."}, ..}
//! ```

use crate::base::parse::{
    filter_by_since_limit, iso8601, milliseconds, parse_order_book, safe_currency_code, safe_float,
    safe_string, safe_timestamp, value_to_f64,
};
use crate::base::{BaseClient, ExchangeDescriptor, HttpTransport, MarketCache};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::lakebtc::account::{LakeBtcRestClient, RequestParams};
use crate::lakebtc::describe::{describe, Endpoint};
use crate::traits::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Length of every LakeBTC market id (`btcusd`)
const MARKET_ID_LEN: usize = 6;

// ============================================================================
// Parsers
// ============================================================================

/// Splits a six-character market id into base and quote
pub fn parse_market(id: &str, info: &Value) -> Option<Market> {
    if id.len() != MARKET_ID_LEN || !id.is_ascii() {
        return None;
    }

    let (base_id, quote_id) = id.split_at(3);
    let base = base_id.to_uppercase();
    let quote = quote_id.to_uppercase();

    Some(Market {
        id: id.to_string(),
        symbol: format!("{}/{}", base, quote),
        base,
        quote,
        base_id: base_id.to_string(),
        quote_id: quote_id.to_string(),
        active: None,
        precision: MarketPrecision::default(),
        limits: MarketLimits::default(),
        info: info.clone(),
    })
}

/// LakeBTC tickers carry no timestamp; `timestamp` is the local receive time
pub fn parse_ticker(ticker: &Value, market: Option<&Market>, timestamp: UnixMillis) -> Ticker {
    let last = safe_float(ticker, "last");

    Ticker {
        symbol: market.map(|m| m.symbol.clone()),
        timestamp,
        datetime: iso8601(timestamp),
        high: safe_float(ticker, "high"),
        low: safe_float(ticker, "low"),
        bid: safe_float(ticker, "bid"),
        bid_volume: None,
        ask: safe_float(ticker, "ask"),
        ask_volume: None,
        vwap: None,
        open: None,
        close: last,
        last,
        previous_close: None,
        change: None,
        percentage: None,
        average: None,
        base_volume: safe_float(ticker, "volume"),
        quote_volume: None,
        info: ticker.clone(),
    }
}

pub fn parse_trade(trade: &Value, market: Option<&Market>) -> Trade {
    let timestamp = safe_timestamp(trade, "date");
    let price = safe_float(trade, "price");
    let amount = safe_float(trade, "amount");
    let cost = match (price, amount) {
        (Some(price), Some(amount)) => Some(price * amount),
        _ => None,
    };

    Trade {
        id: safe_string(trade, "tid"),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        symbol: market.map(|m| m.symbol.clone()),
        order: None,
        order_type: None,
        side: None,
        taker_or_maker: None,
        price,
        amount,
        cost,
        fee: None,
        info: trade.clone(),
    }
}

/// Reads the nested `balance` map; only totals are available
pub fn parse_balance(response: &Value) -> Balances {
    let mut accounts = HashMap::new();

    if let Some(balances) = response.get("balance").and_then(Value::as_object) {
        for (currency_id, total) in balances {
            let account = BalanceAccount {
                free: None,
                used: None,
                total: value_to_f64(total),
            };
            accounts.insert(safe_currency_code(currency_id), account);
        }
    }

    Balances {
        info: response.clone(),
        accounts,
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Unified LakeBTC spot adapter
pub struct LakeBtcSpotAdapter {
    client: LakeBtcRestClient,
}

impl LakeBtcSpotAdapter {
    /// Creates an adapter talking to the live API
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let base = BaseClient::new(describe(), &config)?;
        Ok(Self::from_base(base))
    }

    /// Creates an adapter on a caller-supplied transport
    pub fn with_transport(config: AdapterConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let base = BaseClient::with_transport(describe(), &config, transport)?;
        Ok(Self::from_base(base))
    }

    fn from_base(base: BaseClient) -> Self {
        Self {
            client: LakeBtcRestClient::new(base),
        }
    }

    fn base(&self) -> &BaseClient {
        self.client.base()
    }

    /// Populates the market cache on first use; `reload` forces a refresh
    pub async fn load_markets(&self, reload: bool) -> Result<Arc<MarketCache>> {
        self.base()
            .load_markets_with(reload, || self.fetch_markets())
            .await
    }

    /// Raw access to any LakeBTC endpoint, signed when private
    pub async fn request(&self, endpoint: Endpoint, params: RequestParams) -> Result<Value> {
        self.client.request(endpoint, params).await
    }

    async fn fetch_all_tickers(&self) -> Result<serde_json::Map<String, Value>> {
        match self.client.public_get(Endpoint::Ticker, RequestParams::None).await? {
            Value::Object(tickers) => Ok(tickers),
            other => Err(AdapterError::BadResponse(format!(
                "lakebtc ticker response is not an object: {}",
                other
            ))),
        }
    }
}

#[async_trait::async_trait]
impl UnifiedRest for LakeBtcSpotAdapter {
    fn describe(&self) -> &ExchangeDescriptor {
        self.base().descriptor()
    }

    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let tickers = self.fetch_all_tickers().await?;

        let markets = tickers
            .iter()
            .filter_map(|(id, info)| {
                let market = parse_market(id, info);
                if market.is_none() {
                    warn!("Skipping LakeBTC market with unexpected id '{}'", id);
                }
                market
            })
            .collect();

        Ok(markets)
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<usize>) -> Result<OrderBook> {
        let markets = self.load_markets(false).await?;
        let market_id = markets.market_id(symbol)?;

        if let Some(limit) = limit {
            debug!("LakeBTC order book has no depth limit, ignoring limit={}", limit);
        }

        let response = self
            .client
            .public_get(Endpoint::OrderBook, RequestParams::query(&[("symbol", market_id.as_str())]))
            .await?;

        Ok(parse_order_book(&response, Some(symbol), None))
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let markets = self.load_markets(false).await?;
        let market = markets.market(symbol)?;
        let tickers = self.fetch_all_tickers().await?;

        let ticker = tickers.get(&market.id).ok_or_else(|| {
            AdapterError::BadResponse(format!("lakebtc ticker response has no entry for {}", market.id))
        })?;

        Ok(parse_ticker(ticker, Some(&*market), milliseconds()))
    }

    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> Result<HashMap<String, Ticker>> {
        let markets = self.load_markets(false).await?;
        let tickers = self.fetch_all_tickers().await?;
        let now = milliseconds();

        // an empty selection means every ticker
        let wanted = symbols.filter(|wanted| !wanted.is_empty());

        let mut result = HashMap::new();
        for (id, raw) in &tickers {
            let market = markets.by_id(id);
            let mut ticker = parse_ticker(raw, market.map(|m| &**m), now);
            let symbol = ticker.symbol.get_or_insert_with(|| id.clone()).clone();

            if wanted.map_or(true, |wanted| wanted.contains(&symbol.as_str())) {
                result.insert(symbol, ticker);
            }
        }

        Ok(result)
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<UnixMillis>,
        limit: Option<usize>
    ) -> Result<Vec<Trade>> {
        let markets = self.load_markets(false).await?;
        let market = markets.market(symbol)?;

        let response = self
            .client
            .public_get(Endpoint::Trades, RequestParams::query(&[("symbol", market.id.as_str())]))
            .await?;

        let raw = response.as_array().ok_or_else(|| {
            AdapterError::BadResponse(format!("lakebtc trades response is not a list: {}", response))
        })?;

        let trades: Vec<Trade> = raw.iter().map(|trade| parse_trade(trade, Some(&*market))).collect();
        Ok(filter_by_since_limit(trades, since, limit, |trade| trade.timestamp))
    }

    async fn fetch_balance(&self) -> Result<Balances> {
        self.base().check_required_credentials()?;
        self.load_markets(false).await?;

        let response = self.client.private_post(Endpoint::GetAccountInfo, None).await?;
        Ok(parse_balance(&response))
    }

    async fn create_order(
        &self,
        symbol: &str,
        ord_type: OrderType,
        side: Side,
        amount: Quantity,
        price: Option<Price>
    ) -> Result<OrderAck> {
        if ord_type == OrderType::Market {
            return Err(AdapterError::Exchange("lakebtc allows limit orders only".to_string()));
        }
        let price = price.ok_or_else(|| {
            AdapterError::InvalidOrder("lakebtc limit orders require a price".to_string())
        })?;
        self.base().check_required_credentials()?;

        let markets = self.load_markets(false).await?;
        let market = markets.market(symbol)?;

        let endpoint = Endpoint::for_side(side);
        let params = vec![json!(price), json!(amount), json!(market.id)];
        let response = self.client.private_post(endpoint, Some(params)).await?;

        let id = safe_string(&response, "id");
        info!(
            "LakeBTC {} order placed: {} {} @ {} (id: {:?})",
            endpoint.path(),
            amount,
            symbol,
            price,
            id
        );

        Ok(OrderAck { id, info: response })
    }

    async fn cancel_order(&self, id: &str, _symbol: Option<&str>) -> Result<Value> {
        self.base().check_required_credentials()?;
        self.load_markets(false).await?;

        let response = self
            .client
            .private_post(Endpoint::CancelOrders, Some(vec![json!(id)]))
            .await?;

        info!("LakeBTC cancel requested for order {}", id);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_splits_fixed_offsets() {
        for (id, symbol) in [("btcusd", "BTC/USD"), ("ethbtc", "ETH/BTC"), ("LTCCAD", "LTC/CAD")] {
            let market = parse_market(id, &Value::Null).unwrap();
            assert_eq!(market.symbol, symbol);
            assert_eq!(market.base_id, &id[..3]);
            assert_eq!(market.quote_id, &id[3..]);
            assert_eq!(market.base, id[..3].to_uppercase());
            assert_eq!(market.quote, id[3..].to_uppercase());
            assert!(market.active.is_none());
        }
    }

    #[test]
    fn test_parse_market_rejects_unexpected_ids() {
        assert!(parse_market("btcusdt", &Value::Null).is_none());
        assert!(parse_market("btc", &Value::Null).is_none());
        assert!(parse_market("btéus", &Value::Null).is_none());
    }

    #[test]
    fn test_parse_ticker_fields() {
        let raw = json!({"high":"100","low":"90","bid":"95","ask":"96","last":"95.5","volume":"10"});
        let market = parse_market("btcusd", &Value::Null).unwrap();
        let ticker = parse_ticker(&raw, Some(&market), 1_500_000_000_000);

        assert_eq!(ticker.symbol.as_deref(), Some("BTC/USD"));
        assert_eq!(ticker.high, Some(100.0));
        assert_eq!(ticker.low, Some(90.0));
        assert_eq!(ticker.bid, Some(95.0));
        assert_eq!(ticker.ask, Some(96.0));
        assert_eq!(ticker.last, Some(95.5));
        assert_eq!(ticker.close, Some(95.5));
        assert_eq!(ticker.base_volume, Some(10.0));
        assert!(ticker.bid_volume.is_none());
        assert!(ticker.ask_volume.is_none());
        assert!(ticker.open.is_none());
        assert!(ticker.vwap.is_none());
        assert_eq!(ticker.datetime.as_deref(), Some("2017-07-14T02:40:00.000Z"));
        assert_eq!(ticker.info, raw);
    }

    #[test]
    fn test_parse_trade_cost() {
        let trade = parse_trade(&json!({"tid": 7, "date": 1_500_000_000, "price": "100", "amount": "0.5"}), None);
        assert_eq!(trade.id.as_deref(), Some("7"));
        assert_eq!(trade.timestamp, Some(1_500_000_000_000));
        assert_eq!(trade.cost, Some(50.0));
        assert!(trade.side.is_none());
        assert!(trade.fee.is_none());
    }

    #[test]
    fn test_parse_trade_cost_requires_price_and_amount() {
        let no_amount = parse_trade(&json!({"tid": 1, "price": "100"}), None);
        assert!(no_amount.cost.is_none());
        assert!(no_amount.timestamp.is_none());
        assert!(no_amount.datetime.is_none());

        let no_price = parse_trade(&json!({"tid": 2, "amount": "1"}), None);
        assert!(no_price.cost.is_none());
    }

    #[test]
    fn test_parse_balance_totals_only() {
        let raw = json!({"balance": {"BTC": "1.5", "usd": 250, "xbt_unused": null}, "profile": {}});
        let balances = parse_balance(&raw);

        assert_eq!(balances.get("BTC").and_then(|a| a.total), Some(1.5));
        assert_eq!(balances.get("XBT_UNUSED").and_then(|a| a.total), None);
        assert_eq!(balances.get("USD").and_then(|a| a.total), Some(250.0));
        assert!(balances.accounts.values().all(|a| a.free.is_none() && a.used.is_none()));
        assert_eq!(balances.info, raw);
    }

    #[test]
    fn test_parse_balance_without_balance_key() {
        let balances = parse_balance(&json!({"profile": {}}));
        assert!(balances.accounts.is_empty());
    }
}
