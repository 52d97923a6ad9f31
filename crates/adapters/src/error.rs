//! Typed errors shared by the base client and every exchange adapter.
//!
//! Exchange-reported failures are classified into the unified taxonomy
//! (`Authentication`, `BadSymbol`, `InvalidOrder`, `InsufficientFunds`,
//! `Exchange`) so callers can react without parsing venue messages.
//! Transport failures come straight from the HTTP layer.

/// Result alias used across the adapters crate
pub type Result<T> = std::result::Result<T, AdapterError>;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("bad symbol: {0}")]
    BadSymbol(String),

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("exchange error: {0}")]
    Exchange(String),

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("exchange not available: {0}")]
    ExchangeNotAvailable(String),

    #[error("request timed out: {0}")]
    RequestTimeout(String),

    #[error("unexpected response: {0}")]
    BadResponse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AdapterError {
    /// Tag of this error, `None` for transport and configuration failures
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AdapterError::Authentication(_) => Some(ErrorKind::Authentication),
            AdapterError::BadSymbol(_) => Some(ErrorKind::BadSymbol),
            AdapterError::InvalidOrder(_) => Some(ErrorKind::InvalidOrder),
            AdapterError::InsufficientFunds(_) => Some(ErrorKind::InsufficientFunds),
            AdapterError::Exchange(_) => Some(ErrorKind::Exchange),
            AdapterError::RateLimitExceeded(_) => Some(ErrorKind::RateLimitExceeded),
            AdapterError::ExchangeNotAvailable(_) => Some(ErrorKind::ExchangeNotAvailable),
            AdapterError::RequestTimeout(_) => Some(ErrorKind::RequestTimeout),
            AdapterError::BadResponse(_)
            | AdapterError::Network(_)
            | AdapterError::Config(_) => None,
        }
    }
}

/// Copyable error tag used in declarative exception tables
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    BadSymbol,
    InvalidOrder,
    InsufficientFunds,
    Exchange,
    RateLimitExceeded,
    ExchangeNotAvailable,
    RequestTimeout,
}

impl ErrorKind {
    /// Builds the matching error carrying `message`
    pub fn into_error(self, message: impl Into<String>) -> AdapterError {
        let message = message.into();
        match self {
            ErrorKind::Authentication => AdapterError::Authentication(message),
            ErrorKind::BadSymbol => AdapterError::BadSymbol(message),
            ErrorKind::InvalidOrder => AdapterError::InvalidOrder(message),
            ErrorKind::InsufficientFunds => AdapterError::InsufficientFunds(message),
            ErrorKind::Exchange => AdapterError::Exchange(message),
            ErrorKind::RateLimitExceeded => AdapterError::RateLimitExceeded(message),
            ErrorKind::ExchangeNotAvailable => AdapterError::ExchangeNotAvailable(message),
            ErrorKind::RequestTimeout => AdapterError::RequestTimeout(message),
        }
    }
}
