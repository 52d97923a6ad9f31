//! Generic exchange client
//!
//! [`BaseClient`] owns everything that is the same for every venue: the HTTP
//! transport, request pacing, the market cache, endpoint resolution against
//! the descriptor's routing table and error classification. Adapters hand it
//! fully built requests plus an [`ErrorHandler`] that extracts the venue's
//! error message; the message is matched against the descriptor's broad
//! exception table, and HTTP statuses are the fallback.

use crate::base::descriptor::{EndpointSpec, ExchangeDescriptor};
use crate::base::parse::throw_broadly_matched;
use crate::base::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::traits::Market;
use crate::utils::{RateLimiter, RateLimiterConfig};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// API key and secret; only constructed when both are present and non-empty
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Venue hook run on every JSON response before the status-based fallback
pub trait ErrorHandler: Send + Sync {
    /// Error message the venue embedded in `response`, if any
    fn error_message(&self, response: &Value) -> Option<String>;
}

// ============================================================================
// Market Cache
// ============================================================================

/// Immutable snapshot of loaded markets, indexed by symbol and by venue id
#[derive(Debug, Default)]
pub struct MarketCache {
    markets: HashMap<String, Arc<Market>>,
    markets_by_id: HashMap<String, Arc<Market>>,
    symbols: Vec<String>,
}

impl MarketCache {
    pub fn new(markets: Vec<Market>) -> Self {
        let mut cache = Self::default();
        for market in markets {
            let market = Arc::new(market);
            cache.markets_by_id.insert(market.id.clone(), Arc::clone(&market));
            cache.markets.insert(market.symbol.clone(), market);
        }
        cache.symbols = cache.markets.keys().cloned().collect();
        cache.symbols.sort();
        cache
    }

    /// Looks up a market by unified symbol
    pub fn market(&self, symbol: &str) -> Result<Arc<Market>> {
        self.markets
            .get(symbol)
            .cloned()
            .ok_or_else(|| AdapterError::BadSymbol(format!("unknown symbol {}", symbol)))
    }

    pub fn market_id(&self, symbol: &str) -> Result<String> {
        Ok(self.market(symbol)?.id.clone())
    }

    pub fn by_id(&self, id: &str) -> Option<&Arc<Market>> {
        self.markets_by_id.get(id)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

// ============================================================================
// Base Client
// ============================================================================

pub struct BaseClient {
    descriptor: ExchangeDescriptor,
    credentials: Option<Credentials>,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    rate_limiter: Option<RateLimiter>,
    markets: RwLock<Option<Arc<MarketCache>>>,
    market_loading_lock: Mutex<()>,
}

impl BaseClient {
    /// Builds a client sending requests over `reqwest`
    pub fn new(descriptor: ExchangeDescriptor, config: &AdapterConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout()));
        Self::with_transport(descriptor, config, transport)
    }

    pub fn with_transport(
        descriptor: ExchangeDescriptor,
        config: &AdapterConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        config.validate()?;

        let credentials = match (&config.api_key, &config.api_secret) {
            (Some(api_key), Some(api_secret)) if !api_key.is_empty() && !api_secret.is_empty() => {
                Some(Credentials {
                    api_key: api_key.clone(),
                    api_secret: api_secret.clone(),
                })
            }
            _ => None,
        };

        let rate_limiter = config
            .enable_rate_limit
            .then(|| RateLimiter::new(RateLimiterConfig::from_interval(descriptor.rate_limit_ms)));

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| descriptor.urls.api.to_string());

        info!(
            "Initialized {} client (authenticated: {}, rate limited: {})",
            descriptor.id,
            credentials.is_some(),
            rate_limiter.is_some()
        );

        Ok(Self {
            descriptor,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            rate_limiter,
            markets: RwLock::new(None),
            market_loading_lock: Mutex::new(()),
        })
    }

    pub fn descriptor(&self) -> &ExchangeDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    /// API root without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Routing entry for `path`; undeclared endpoints are rejected
    pub fn resolve(&self, path: &str) -> Result<&EndpointSpec> {
        self.descriptor.endpoint(path).ok_or_else(|| {
            AdapterError::Exchange(format!("{} does not declare endpoint {}", self.id(), path))
        })
    }

    /// Fails fast when the API key or secret is missing
    pub fn check_required_credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            AdapterError::Authentication(format!(
                "{} requires \"apiKey\" and \"secret\" credentials",
                self.id()
            ))
        })
    }

    /// Returns the cached markets, running `loader` once when the cache is
    /// empty or `reload` is set
    ///
    /// Concurrent first callers wait on the loading lock so only one of them
    /// hits the network.
    pub async fn load_markets_with<F, Fut>(&self, reload: bool, loader: F) -> Result<Arc<MarketCache>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Market>>>,
    {
        if !reload {
            if let Some(cache) = self.markets.read().await.as_ref() {
                return Ok(Arc::clone(cache));
            }
        }

        let _guard = self.market_loading_lock.lock().await;

        if !reload {
            if let Some(cache) = self.markets.read().await.as_ref() {
                return Ok(Arc::clone(cache));
            }
        }

        let markets = loader().await?;
        let cache = Arc::new(MarketCache::new(markets));
        info!("Loaded {} markets for {}", cache.len(), self.descriptor.id);

        *self.markets.write().await = Some(Arc::clone(&cache));
        Ok(cache)
    }

    /// Markets loaded so far, without triggering a load
    pub async fn cached_markets(&self) -> Option<Arc<MarketCache>> {
        self.markets.read().await.clone()
    }

    /// Sends `request` and returns its JSON body
    ///
    /// A venue error message found by `handler` is matched against the
    /// descriptor's broad exception table; unmatched messages become
    /// [`AdapterError::Exchange`] carrying the raw body. Responses without a
    /// venue error are classified by [`default_error_handler`].
    pub async fn dispatch(&self, request: HttpRequest, handler: &dyn ErrorHandler) -> Result<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        debug!("{} {} {}", self.id(), request.method.as_str(), request.url);

        let response = self.transport.execute(request).await?;
        let parsed = serde_json::from_str::<Value>(&response.body).ok();

        if let Some(message) = parsed.as_ref().and_then(|value| handler.error_message(value)) {
            let feedback = format!("{} {}", self.id(), response.body);
            throw_broadly_matched(self.descriptor.broad_exceptions, &message, &feedback)?;
            return Err(AdapterError::Exchange(feedback));
        }
        default_error_handler(self.id(), response.status, &response.body)?;

        parsed.ok_or_else(|| {
            AdapterError::BadResponse(format!("{} returned non-JSON body: {}", self.id(), response.body))
        })
    }
}

/// Classifies failed HTTP statuses the venue hook did not recognize
pub fn default_error_handler(exchange_id: &str, status: u16, body: &str) -> Result<()> {
    if (200..400).contains(&status) {
        return Ok(());
    }

    let message = format!("{} {} {}", exchange_id, status, body);
    Err(match status {
        401 | 403 | 511 => AdapterError::Authentication(message),
        418 | 429 => AdapterError::RateLimitExceeded(message),
        404 | 409 | 410 | 500..=503 | 520..=530 => AdapterError::ExchangeNotAvailable(message),
        504 => AdapterError::RequestTimeout(message),
        _ => AdapterError::Exchange(message),
    })
}
