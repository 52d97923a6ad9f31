//! LakeBTC Authentication and REST Client
//!
//! # Authentication
//!
//! Private endpoints speak JSON-RPC over HTTP, signed with HMAC-SHA1:
//! 1. Build the canonical string
//!    `tonce=..&accesskey=..&requestmethod=..&id=..&method=..&params=..`
//! 2. Sign it with the API secret (hex digest)
//! 3. Send `Authorization: Basic base64(key:signature)` together with the
//!    nonce in `Json-Rpc-Tonce`
//!
//! Public endpoints are plain GETs with a query string.
//!
//! # API Documentation
//!
//! - LakeBTC API v2: <https://www.lakebtc.com/s/api_v2>

use crate::base::parse::{microseconds, safe_string, seconds};
use crate::base::{Access, BaseClient, Credentials, ErrorHandler, HttpMethod, HttpRequest};
use crate::error::{AdapterError, Result};
use crate::lakebtc::describe::Endpoint;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request parameters, shaped by endpoint kind
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestParams {
    #[default]
    None,
    /// Public endpoints: URL query pairs
    Query(Vec<(String, String)>),
    /// Private endpoints: JSON-RPC positional params
    Positional(Vec<Value>),
}

impl RequestParams {
    pub fn query(pairs: &[(&str, &str)]) -> Self {
        RequestParams::Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// LakeBTC API credentials and signing
#[derive(Clone)]
pub struct LakeBtcAuth {
    pub api_key: String,
    pub api_secret: String,
}

impl LakeBtcAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(credentials.api_key.clone(), credentials.api_secret.clone())
    }

    /// Canonical string covered by the signature
    pub fn canonical_query(
        &self,
        nonce: u64,
        method: HttpMethod,
        request_id: u64,
        path: &str,
        params_csv: &str,
    ) -> String {
        [
            format!("tonce={}", nonce),
            format!("accesskey={}", self.api_key),
            format!("requestmethod={}", method.as_str().to_lowercase()),
            format!("id={}", request_id),
            format!("method={}", path),
            format!("params={}", params_csv),
        ]
        .join("&")
    }

    /// Hex-encoded HMAC-SHA1 of `query` keyed by the API secret
    pub fn sign(&self, query: &str) -> Result<String> {
        use hmac::{Hmac, Mac};
        use sha1::Sha1;

        let mut mac = Hmac::<Sha1>::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| AdapterError::Authentication(format!("HMAC initialization failed: {}", e)))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// `Basic base64(key:signature)`
    pub fn authorization(&self, signature: &str) -> String {
        use base64::engine::general_purpose;
        use base64::Engine;

        let auth = format!("{}:{}", self.api_key, signature);
        format!("Basic {}", general_purpose::STANDARD.encode(auth))
    }
}

/// Comma-joined positional params as they appear in the canonical string
pub fn params_csv(params: &[Value]) -> String {
    params
        .iter()
        .map(|param| match param {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Serialize)]
struct JsonRpcEnvelope<'a> {
    method: &'a str,
    params: Value,
    id: u64,
}

/// Microsecond tonce that never repeats or goes backwards within a process
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = microseconds();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

// ============================================================================
// Error Classification
// ============================================================================

/// Extracts the message from LakeBTC's `{"error": "..."}` payloads; the base
/// client matches it against the descriptor's exception table
///
/// Known messages:
/// - `Failed to submit order: invalid symbol`
/// - `Failed to submit order: La validation a échoué : Volume doit être supérieur ou égal à 1.0`
/// - `Failed to submit order: insufficient_balance`
pub struct LakeBtcErrors;

impl ErrorHandler for LakeBtcErrors {
    fn error_message(&self, response: &Value) -> Option<String> {
        safe_string(response, "error")
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Builds and dispatches LakeBTC requests through the shared base client
pub struct LakeBtcRestClient {
    base: BaseClient,
    nonce: NonceGenerator,
}

impl LakeBtcRestClient {
    pub fn new(base: BaseClient) -> Self {
        Self {
            base,
            nonce: NonceGenerator::new(),
        }
    }

    pub fn base(&self) -> &BaseClient {
        &self.base
    }

    /// API root including the version segment
    fn api_root(&self) -> String {
        format!("{}/{}", self.base.base_url(), self.base.descriptor().version)
    }

    /// Builds a public GET request
    pub fn public_request(&self, endpoint: Endpoint, params: &RequestParams) -> Result<HttpRequest> {
        let mut url = format!("{}/{}", self.api_root(), endpoint.path());

        match params {
            RequestParams::None => {}
            RequestParams::Query(pairs) if pairs.is_empty() => {}
            RequestParams::Query(pairs) => {
                let query = serde_urlencoded::to_string(pairs)
                    .map_err(|e| AdapterError::Exchange(format!("failed to encode query: {}", e)))?;
                url.push('?');
                url.push_str(&query);
            }
            RequestParams::Positional(_) => {
                return Err(AdapterError::Exchange(format!(
                    "{} takes query parameters, not positional ones",
                    endpoint.path()
                )));
            }
        }

        Ok(HttpRequest::get(url))
    }

    /// Builds a signed private request with explicit tonce and request id
    pub fn signed_request(
        &self,
        auth: &LakeBtcAuth,
        endpoint: Endpoint,
        params: &RequestParams,
        nonce: u64,
        request_id: u64,
    ) -> Result<HttpRequest> {
        let path = endpoint.path();
        let method = self.base.resolve(path)?.method;

        let (csv, params_value) = match params {
            RequestParams::Positional(list) => (params_csv(list), Value::Array(list.clone())),
            RequestParams::None => (String::new(), Value::String(String::new())),
            RequestParams::Query(_) => {
                return Err(AdapterError::Exchange(format!("{} takes positional parameters", path)));
            }
        };

        let body = serde_json::to_string(&JsonRpcEnvelope {
            method: path,
            params: params_value,
            id: request_id,
        })
        .map_err(|e| AdapterError::Exchange(format!("failed to encode request body: {}", e)))?;

        let query = auth.canonical_query(nonce, method, request_id, path, &csv);
        let signature = auth.sign(&query)?;

        Ok(HttpRequest {
            method,
            url: self.api_root(),
            headers: vec![
                ("Json-Rpc-Tonce".to_string(), nonce.to_string()),
                ("Authorization".to_string(), auth.authorization(&signature)),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    /// Builds the request for `endpoint`, signing it when the descriptor's
    /// routing table marks it private
    pub fn sign(&self, endpoint: Endpoint, params: &RequestParams) -> Result<HttpRequest> {
        match self.base.resolve(endpoint.path())?.access {
            Access::Public => self.public_request(endpoint, params),
            Access::Private => {
                let auth = LakeBtcAuth::from_credentials(self.base.check_required_credentials()?);
                self.signed_request(&auth, endpoint, params, self.nonce.next(), seconds())
            }
        }
    }

    /// Signs, sends and error-checks one request
    pub async fn request(&self, endpoint: Endpoint, params: RequestParams) -> Result<Value> {
        let request = self.sign(endpoint, &params)?;
        self.base.dispatch(request, &LakeBtcErrors).await
    }

    pub async fn public_get(&self, endpoint: Endpoint, params: RequestParams) -> Result<Value> {
        self.request(endpoint, params).await
    }

    pub async fn private_post(&self, endpoint: Endpoint, params: Option<Vec<Value>>) -> Result<Value> {
        let params = params.map(RequestParams::Positional).unwrap_or_default();
        self.request(endpoint, params).await
    }
}

// =============================================================================
// Tests
// =============================================================================
