//! Shared exchange client
//!
//! Venue-agnostic plumbing every adapter builds on:
//!
//! - [`descriptor`] - Declarative exchange metadata (endpoints, fees, error table)
//! - [`client`] - HTTP dispatch, rate limiting, market cache, fallback errors
//! - [`transport`] - Pluggable HTTP execution
//! - [`parse`] - Numeric/timestamp coercion and generic parsers

pub mod client;
pub mod descriptor;
pub mod parse;
pub mod transport;

pub use client::{default_error_handler, BaseClient, Credentials, ErrorHandler, MarketCache};
pub use descriptor::{Access, Capabilities, EndpointSpec, ExchangeDescriptor, ExchangeUrls, FeeSchedule};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
