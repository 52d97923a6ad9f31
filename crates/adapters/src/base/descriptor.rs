//! Declarative per-exchange metadata
//!
//! Each adapter publishes one [`ExchangeDescriptor`]: identity, capability
//! flags, URLs, the endpoint routing table, the fee schedule and the ordered
//! broad-match exception table. The generic [`BaseClient`](super::BaseClient)
//! reads it to configure rate limiting, resolve endpoints and classify
//! exchange-reported errors, so adapters only contain what is truly
//! venue-specific.

use crate::base::transport::HttpMethod;
use crate::error::ErrorKind;
use rust_decimal::Decimal;

/// Which credentials an endpoint needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointSpec {
    pub path: &'static str,
    pub access: Access,
    pub method: HttpMethod,
}

/// Unified capability flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub cancel_order: bool,
    pub cors: bool,
    pub create_market_order: bool,
    pub create_order: bool,
    pub fetch_balance: bool,
    pub fetch_markets: bool,
    pub fetch_order_book: bool,
    pub fetch_ticker: bool,
    pub fetch_tickers: bool,
    pub fetch_trades: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeUrls {
    pub logo: &'static str,
    pub api: &'static str,
    pub www: &'static str,
    pub doc: &'static [&'static str],
}

/// Trading fees as fractions (0.002 = 0.2%)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub maker: Decimal,
    pub taker: Decimal,
}

/// Ordered substring → error kind table; first match wins
pub type BroadExceptions = &'static [(&'static str, ErrorKind)];

#[derive(Clone, Debug)]
pub struct ExchangeDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub countries: &'static [&'static str],
    pub version: &'static str,
    /// Minimum spacing between requests in milliseconds
    pub rate_limit_ms: u64,
    pub has: Capabilities,
    pub urls: ExchangeUrls,
    pub api: &'static [EndpointSpec],
    pub fees: FeeSchedule,
    pub broad_exceptions: BroadExceptions,
}

impl ExchangeDescriptor {
    pub fn endpoint(&self, path: &str) -> Option<&EndpointSpec> {
        self.api.iter().find(|spec| spec.path == path)
    }

    pub fn endpoints(&self, access: Access) -> impl Iterator<Item = &EndpointSpec> {
        self.api.iter().filter(move |spec| spec.access == access)
    }
}
