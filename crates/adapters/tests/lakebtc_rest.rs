//! LakeBTC adapter against recorded API responses
//!
//! Every test runs on an in-memory transport, so nothing here touches the
//! network. Responses are queued in the order the adapter requests them: the
//! first call on a fresh adapter always loads markets from `ticker`.

mod support;

use adapters::base::HttpMethod;
use adapters::lakebtc::{Endpoint, RequestParams};
use adapters::traits::{OrderType, Side, UnifiedRest};
use adapters::AdapterError;
use serde_json::{json, Value};
use support::*;

fn body_json(body: Option<&String>) -> Value {
    serde_json::from_str(body.expect("request has a body")).expect("body is JSON")
}

#[tokio::test]
async fn test_fetch_markets_derives_symbols() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);

    let mut markets = adapter.fetch_markets().await.unwrap();
    markets.sort_by(|a, b| a.id.cmp(&b.id));

    let symbols: Vec<_> = markets.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC/USD", "ETH/BTC", "LTC/USD"]);

    let btc = &markets[0];
    assert_eq!(btc.base, "BTC");
    assert_eq!(btc.quote, "USD");
    assert_eq!(btc.base_id, "btc");
    assert_eq!(btc.quote_id, "usd");

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "https://api.lakebtc.com/api_v2/ticker");
}

#[tokio::test]
async fn test_fetch_ticker() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TICKER);

    let ticker = adapter.fetch_ticker("BTC/USD").await.unwrap();

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
    assert!(ticker.quote_volume.is_none());
    assert!(ticker.timestamp > 0);
    assert!(ticker.datetime.is_some());
}

#[tokio::test]
async fn test_fetch_ticker_null_fields_stay_absent() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TICKER);

    let ticker = adapter.fetch_ticker("LTC/USD").await.unwrap();
    assert!(ticker.high.is_none());
    assert!(ticker.low.is_none());
    assert_eq!(ticker.base_volume, Some(0.0));
}

#[tokio::test]
async fn test_fetch_ticker_missing_entry() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(r#"{"ethbtc": {"last": "0.07"}}"#);

    let err = adapter.fetch_ticker("BTC/USD").await.unwrap_err();
    assert!(matches!(err, AdapterError::BadResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_fetch_ticker_unknown_symbol() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);

    let err = adapter.fetch_ticker("DOGE/USD").await.unwrap_err();
    assert!(matches!(err, AdapterError::BadSymbol(_)), "got {:?}", err);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_fetch_tickers_all_and_filtered() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TICKER);

    let all = adapter.fetch_tickers(None).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all["ETH/BTC"].last, Some(0.0755));
    // unmapped ids are keyed by the raw id
    assert_eq!(all["usdtusd"].last, Some(1.0));

    let wanted = ["BTC/USD", "ETH/BTC"];
    let some = adapter.fetch_tickers(Some(&wanted[..])).await.unwrap();
    let mut keys: Vec<_> = some.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["BTC/USD", "ETH/BTC"]);
    assert_eq!(some["BTC/USD"].bid, Some(95.0));

    // one market load, then one ticker request per call
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_fetch_tickers_empty_selection_returns_all() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TICKER);

    let none: [&str; 0] = [];
    let tickers = adapter.fetch_tickers(Some(&none[..])).await.unwrap();
    assert_eq!(tickers.len(), 4);
    assert!(tickers.contains_key("BTC/USD"));
    assert!(tickers.contains_key("usdtusd"));
}

#[tokio::test]
async fn test_fetch_trades_since_and_limit() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TRADES);

    let trades = adapter
        .fetch_trades("BTC/USD", Some(1_500_000_200_000), Some(2))
        .await
        .unwrap();

    let ids: Vec<_> = trades.iter().map(|t| t.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["102", "103"]);

    let first = &trades[0];
    assert_eq!(first.symbol.as_deref(), Some("BTC/USD"));
    assert_eq!(first.timestamp, Some(1_500_000_200_000));
    assert_eq!(first.price, Some(2005.0));
    assert_eq!(first.amount, Some(1.5));
    assert_eq!(first.cost, Some(2005.0 * 1.5));
    assert!(first.side.is_none());

    assert_eq!(
        transport.last_request().url,
        "https://api.lakebtc.com/api_v2/bctrades?symbol=btcusd"
    );
}

#[tokio::test]
async fn test_fetch_trades_sorted_ascending() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TRADES);

    let trades = adapter.fetch_trades("BTC/USD", None, None).await.unwrap();
    assert_eq!(trades.len(), 4);
    assert!(trades.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_fetch_order_book_ignores_limit() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_ORDERBOOK);

    let book = adapter.fetch_order_book("BTC/USD", Some(1)).await.unwrap();

    assert_eq!(book.symbol.as_deref(), Some("BTC/USD"));
    assert_eq!(book.bids, vec![(2009.5, 2.0), (2008.0, 0.7), (2007.25, 0.1)]);
    assert_eq!(book.asks, vec![(2010.0, 1.2), (2011.0, 0.5), (2012.5, 0.3)]);
    assert!(book.timestamp.is_none());

    assert_eq!(
        transport.last_request().url,
        "https://api.lakebtc.com/api_v2/bcorderbook?symbol=btcusd"
    );
}

#[tokio::test]
async fn test_fetch_balance_totals() {
    let (adapter, transport) = adapter(private_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_ACCOUNT_INFO);

    let balances = adapter.fetch_balance().await.unwrap();

    let totals = balances.total();
    assert_eq!(totals.len(), 4);
    assert_eq!(totals["BTC"], Some(1.25));
    assert_eq!(totals["USD"], Some(5000.5));
    assert_eq!(totals["LTC"], Some(0.0));
    assert_eq!(totals["DASH"], Some(3.0));
    assert!(balances.free().values().all(Option::is_none));
    assert!(balances.used().values().all(Option::is_none));
    assert_eq!(balances.info["profile"]["uid"], "U1234");

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://api.lakebtc.com/api_v2");
    let body = body_json(request.body.as_ref());
    assert_eq!(body["method"], "getAccountInfo");
    assert_eq!(body["params"], "");
}

#[tokio::test]
async fn test_create_limit_order_posts_positional_params() {
    let (adapter, transport) = adapter(private_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(r#"{"id": 2045, "result": "order received"}"#);

    let ack = adapter
        .create_order("BTC/USD", OrderType::Limit, Side::Buy, 0.5, Some(2000.0))
        .await
        .unwrap();

    assert_eq!(ack.id.as_deref(), Some("2045"));
    assert_eq!(ack.info["result"], "order received");

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://api.lakebtc.com/api_v2");
    assert!(request.header("Authorization").unwrap().starts_with("Basic "));
    assert!(request.header("Json-Rpc-Tonce").is_some());
    assert_eq!(request.header("Content-Type"), Some("application/json"));

    let body = body_json(request.body.as_ref());
    assert_eq!(body["method"], "buyOrder");
    assert_eq!(body["params"], json!([2000.0, 0.5, "btcusd"]));
    assert!(body["id"].is_u64());
}

#[tokio::test]
async fn test_create_sell_order_uses_sell_endpoint() {
    let (adapter, transport) = adapter(private_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(r#"{"id": 7}"#);

    adapter
        .create_order("ETH/BTC", OrderType::Limit, Side::Sell, 2.0, Some(0.075))
        .await
        .unwrap();

    let body = body_json(transport.last_request().body.as_ref());
    assert_eq!(body["method"], "sellOrder");
    assert_eq!(body["params"], json!([0.075, 2.0, "ethbtc"]));
}

#[tokio::test]
async fn test_market_order_rejected_before_any_request() {
    let (adapter, transport) = adapter(private_config());

    let err = adapter
        .create_order("BTC/USD", OrderType::Market, Side::Buy, 1.0, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Exchange(_)), "got {:?}", err);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_limit_order_without_price_is_invalid() {
    let (adapter, transport) = adapter(private_config());

    let err = adapter
        .create_order("BTC/USD", OrderType::Limit, Side::Buy, 1.0, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::InvalidOrder(_)), "got {:?}", err);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_private_calls_require_credentials() {
    let (adapter, transport) = adapter(public_config());

    let err = adapter.fetch_balance().await.unwrap_err();
    assert!(matches!(err, AdapterError::Authentication(_)), "got {:?}", err);

    let err = adapter
        .create_order("BTC/USD", OrderType::Limit, Side::Buy, 1.0, Some(100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Authentication(_)), "got {:?}", err);

    let err = adapter.cancel_order("1", None).await.unwrap_err();
    assert!(matches!(err, AdapterError::Authentication(_)), "got {:?}", err);

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_empty_credentials_are_rejected_without_requests() {
    for (key, secret) in [("", ""), ("key", ""), ("", "secret")] {
        let (adapter, transport) = adapter(public_config().with_credentials(key, secret));

        let err = adapter.fetch_balance().await.unwrap_err();
        assert!(matches!(err, AdapterError::Authentication(_)), "got {:?}", err);

        let err = adapter
            .create_order("BTC/USD", OrderType::Limit, Side::Sell, 1.0, Some(100.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Authentication(_)), "got {:?}", err);

        assert_eq!(transport.request_count(), 0);
    }
}

#[tokio::test]
async fn test_order_errors_are_classified() {
    let cases = [
        (
            r#"{"error": "Failed to submit order: invalid symbol"}"#,
            "BadSymbol",
        ),
        (
            r#"{"error": "Failed to submit order: insufficient_balance"}"#,
            "InsufficientFunds",
        ),
        (
            r#"{"error": "Failed to submit order: La validation a échoué : Volume doit être supérieur ou égal à 1.0"}"#,
            "InvalidOrder",
        ),
        (r#"{"error": "Signature mismatch"}"#, "Authentication"),
        (r#"{"error": "something else"}"#, "Exchange"),
    ];

    for (body, expected) in cases {
        let (adapter, transport) = adapter(private_config());
        transport.push_ok(LAKEBTC_TICKER);
        transport.push_ok(body);

        let err = adapter
            .create_order("BTC/USD", OrderType::Limit, Side::Buy, 0.5, Some(2000.0))
            .await
            .unwrap_err();

        let matched = match (&err, expected) {
            (AdapterError::BadSymbol(_), "BadSymbol") => true,
            (AdapterError::InsufficientFunds(_), "InsufficientFunds") => true,
            (AdapterError::InvalidOrder(_), "InvalidOrder") => true,
            (AdapterError::Authentication(_), "Authentication") => true,
            (AdapterError::Exchange(msg), "Exchange") => msg.starts_with("lakebtc ") && msg.contains(body),
            _ => false,
        };
        assert!(matched, "body {} produced {:?}", body, err);
    }
}

#[tokio::test]
async fn test_http_status_fallback() {
    let (adapter, transport) = adapter(public_config());
    transport.push(429, "Too Many Requests");

    let err = adapter.fetch_markets().await.unwrap_err();
    assert!(matches!(err, AdapterError::RateLimitExceeded(_)), "got {:?}", err);

    transport.push(503, "<html>maintenance</html>");
    let err = adapter.fetch_markets().await.unwrap_err();
    assert!(matches!(err, AdapterError::ExchangeNotAvailable(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_cancel_order_returns_raw_response() {
    let (adapter, transport) = adapter(private_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(r#"{"result": true}"#);

    let response = adapter.cancel_order("2045", Some("BTC/USD")).await.unwrap();
    assert_eq!(response, json!({"result": true}));

    let body = body_json(transport.last_request().body.as_ref());
    assert_eq!(body["method"], "cancelOrders");
    assert_eq!(body["params"], json!(["2045"]));
}

#[tokio::test]
async fn test_markets_loaded_once() {
    let (adapter, transport) = adapter(public_config());
    transport.push_ok(LAKEBTC_TICKER);
    transport.push_ok(LAKEBTC_TRADES);
    transport.push_ok(LAKEBTC_ORDERBOOK);

    adapter.fetch_trades("BTC/USD", None, None).await.unwrap();
    adapter.fetch_order_book("BTC/USD", None).await.unwrap();

    let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.lakebtc.com/api_v2/ticker",
            "https://api.lakebtc.com/api_v2/bctrades?symbol=btcusd",
            "https://api.lakebtc.com/api_v2/bcorderbook?symbol=btcusd",
        ]
    );

    transport.push_ok(r#"{"btcusd": {"last": "1"}}"#);
    let reloaded = adapter.load_markets(true).await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_raw_request_to_unwrapped_endpoint() {
    let (adapter, transport) = adapter(private_config());
    transport.push_ok(r#"[{"id": 1, "status": "open"}]"#);

    let response = adapter
        .request(Endpoint::OpenOrders, RequestParams::None)
        .await
        .unwrap();
    assert_eq!(response[0]["status"], "open");

    let body = body_json(transport.last_request().body.as_ref());
    assert_eq!(body["method"], "openOrders");
}

#[tokio::test]
async fn test_base_url_override() {
    let (adapter, transport) = adapter(public_config().with_base_url("http://localhost:9000/"));
    transport.push_ok(LAKEBTC_TICKER);

    adapter.fetch_markets().await.unwrap();
    assert_eq!(transport.last_request().url, "http://localhost:9000/api_v2/ticker");
}
