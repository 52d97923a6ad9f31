use adapters::base::{HttpRequest, HttpResponse, HttpTransport};
use adapters::lakebtc::LakeBtcSpotAdapter;
use adapters::{AdapterConfig, AdapterError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const LAKEBTC_TICKER: &str = include_str!("../fixtures/lakebtc_ticker.json");
pub const LAKEBTC_TRADES: &str = include_str!("../fixtures/lakebtc_trades.json");
pub const LAKEBTC_ORDERBOOK: &str = include_str!("../fixtures/lakebtc_orderbook.json");
pub const LAKEBTC_ACCOUNT_INFO: &str = include_str!("../fixtures/lakebtc_account_info.json");

/// Replays queued responses in order and records every request it sees
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn push_ok(&self, body: &str) {
        self.push(200, body);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AdapterError::ExchangeNotAvailable(format!("no mock response queued for {}", url)))
    }
}

pub fn public_config() -> AdapterConfig {
    AdapterConfig::new().with_rate_limit(false)
}

pub fn private_config() -> AdapterConfig {
    public_config().with_credentials("key", "secret")
}

pub fn adapter(config: AdapterConfig) -> (LakeBtcSpotAdapter, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let adapter = LakeBtcSpotAdapter::with_transport(config, transport.clone()).expect("build adapter");
    (adapter, transport)
}
