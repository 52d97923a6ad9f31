//! Exchange adapters
//!
//! Translates venue-specific REST APIs into one normalized trading surface
//! ([`traits::UnifiedRest`]): markets, tickers, order books, trades, balances,
//! order placement and cancellation.
//!
//! - [`base`] - Venue-agnostic client: dispatch, market cache, parsers
//! - [`lakebtc`] - LakeBTC spot adapter
//! - [`utils`] - Rate limiting

pub mod base;
pub mod config;
pub mod error;
pub mod lakebtc;
pub mod traits;
pub mod utils;

pub use config::AdapterConfig;
pub use error::{AdapterError, ErrorKind, Result};
