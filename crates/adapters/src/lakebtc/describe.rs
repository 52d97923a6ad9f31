//! LakeBTC exchange descriptor
//!
//! Everything the generic client needs to know about LakeBTC as plain data:
//! endpoints, capabilities, fees and the broad-match error table.

use crate::base::{
    Access, Capabilities, EndpointSpec, ExchangeDescriptor, ExchangeUrls, FeeSchedule, HttpMethod,
};
use crate::error::ErrorKind;
use crate::traits::Side;
use rust_decimal::Decimal;

/// LakeBTC REST API root
pub const LAKEBTC_REST_URL: &str = "https://api.lakebtc.com";

/// Path segment between the API root and endpoint paths
pub const LAKEBTC_API_VERSION: &str = "api_v2";

/// Matched in order against the `error` field of responses
pub const LAKEBTC_BROAD_EXCEPTIONS: &[(&str, ErrorKind)] = &[
    ("Signature", ErrorKind::Authentication),
    ("invalid symbol", ErrorKind::BadSymbol),
    ("Volume doit", ErrorKind::InvalidOrder),
    ("insufficient_balance", ErrorKind::InsufficientFunds),
];

/// Every endpoint LakeBTC exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Public (GET, query string)
    OrderBook,
    Trades,
    Ticker,
    // Private (POST, signed JSON-RPC)
    BuyOrder,
    CancelOrders,
    GetAccountInfo,
    GetExternalAccounts,
    GetOrders,
    GetTrades,
    OpenOrders,
    SellOrder,
}

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::OrderBook,
        Endpoint::Trades,
        Endpoint::Ticker,
        Endpoint::BuyOrder,
        Endpoint::CancelOrders,
        Endpoint::GetAccountInfo,
        Endpoint::GetExternalAccounts,
        Endpoint::GetOrders,
        Endpoint::GetTrades,
        Endpoint::OpenOrders,
        Endpoint::SellOrder,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::OrderBook => "bcorderbook",
            Endpoint::Trades => "bctrades",
            Endpoint::Ticker => "ticker",
            Endpoint::BuyOrder => "buyOrder",
            Endpoint::CancelOrders => "cancelOrders",
            Endpoint::GetAccountInfo => "getAccountInfo",
            Endpoint::GetExternalAccounts => "getExternalAccounts",
            Endpoint::GetOrders => "getOrders",
            Endpoint::GetTrades => "getTrades",
            Endpoint::OpenOrders => "openOrders",
            Endpoint::SellOrder => "sellOrder",
        }
    }

    pub const fn access(self) -> Access {
        match self {
            Endpoint::OrderBook | Endpoint::Trades | Endpoint::Ticker => Access::Public,
            _ => Access::Private,
        }
    }

    pub const fn method(self) -> HttpMethod {
        match self.access() {
            Access::Public => HttpMethod::Get,
            Access::Private => HttpMethod::Post,
        }
    }

    pub const fn spec(self) -> EndpointSpec {
        EndpointSpec {
            path: self.path(),
            access: self.access(),
            method: self.method(),
        }
    }

    /// Order placement endpoint for a side
    pub const fn for_side(side: Side) -> Endpoint {
        match side {
            Side::Buy => Endpoint::BuyOrder,
            Side::Sell => Endpoint::SellOrder,
        }
    }
}

const LAKEBTC_API: &[EndpointSpec] = &[
    Endpoint::OrderBook.spec(),
    Endpoint::Trades.spec(),
    Endpoint::Ticker.spec(),
    Endpoint::BuyOrder.spec(),
    Endpoint::CancelOrders.spec(),
    Endpoint::GetAccountInfo.spec(),
    Endpoint::GetExternalAccounts.spec(),
    Endpoint::GetOrders.spec(),
    Endpoint::GetTrades.spec(),
    Endpoint::OpenOrders.spec(),
    Endpoint::SellOrder.spec(),
];

pub fn describe() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "lakebtc",
        name: "LakeBTC",
        countries: &["US"],
        version: LAKEBTC_API_VERSION,
        rate_limit_ms: 1000,
        has: Capabilities {
            cancel_order: true,
            cors: true,
            create_market_order: false,
            create_order: true,
            fetch_balance: true,
            fetch_markets: true,
            fetch_order_book: true,
            fetch_ticker: true,
            fetch_tickers: true,
            fetch_trades: true,
        },
        urls: ExchangeUrls {
            logo: "https://user-images.githubusercontent.com/1294454/28074120-72b7c38a-6660-11e7-92d9-d9027502281d.jpg",
            api: LAKEBTC_REST_URL,
            www: "https://www.lakebtc.com",
            doc: &["https://www.lakebtc.com/s/api_v2", "https://www.lakebtc.com/s/api"],
        },
        api: LAKEBTC_API,
        fees: FeeSchedule {
            maker: Decimal::new(15, 4),
            taker: Decimal::new(2, 3),
        },
        broad_exceptions: LAKEBTC_BROAD_EXCEPTIONS,
    }
}
