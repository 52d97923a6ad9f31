//! LakeBTC Exchange Adapter
//!
//! This module provides the adapter for the LakeBTC spot exchange.
//!
//! # Module Structure
//!
//! - [`describe`] - Declarative descriptor: endpoints, fees, error table
//! - [`account`] - JSON-RPC signing, request building, error classification
//! - [`spot`] - [`LakeBtcSpotAdapter`] implementing the unified REST surface
//!
//! # Example
//!
//! ```ignore
//! use adapters::config::AdapterConfig;
//! use adapters::lakebtc::LakeBtcSpotAdapter;
//! use adapters::traits::UnifiedRest;
//!
//! let adapter = LakeBtcSpotAdapter::new(AdapterConfig::from_env()?)?;
//!
//! let ticker = adapter.fetch_ticker("BTC/USD").await?;
//! let book = adapter.fetch_order_book("BTC/USD", None).await?;
//! ```

pub mod account;
pub mod describe;
pub mod spot;

pub use account::{LakeBtcAuth, LakeBtcErrors, LakeBtcRestClient, NonceGenerator, RequestParams};
pub use describe::{describe, Endpoint, LAKEBTC_API_VERSION, LAKEBTC_BROAD_EXCEPTIONS, LAKEBTC_REST_URL};
pub use spot::LakeBtcSpotAdapter;
