//! Normalization helpers shared by all adapters
//!
//! Venue payloads mix numbers and numeric strings freely, so every accessor
//! here accepts both and yields `None` for anything else.

use crate::error::{ErrorKind, Result};
use crate::traits::{OrderBook, Price, Quantity, UnixMillis};
use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Currency ids that venues use for well-known codes
const COMMON_CURRENCIES: &[(&str, &str)] = &[
    ("XBT", "BTC"),
    ("BCC", "BCH"),
    ("DRK", "DASH"),
    ("BCHABC", "BCH"),
    ("BCHSV", "BSV"),
];

// ============================================================================
// Value accessors
// ============================================================================

pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn safe_float(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(value_to_f64)
}

pub fn safe_string(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a Unix-seconds field and converts it to milliseconds
pub fn safe_timestamp(obj: &Value, key: &str) -> Option<UnixMillis> {
    let seconds = safe_float(obj, key)?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some((seconds * 1000.0) as UnixMillis)
    } else {
        None
    }
}

// ============================================================================
// Time
// ============================================================================

fn since_epoch() -> std::time::Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|e| {
            tracing::error!("System time error: {}", e);
            std::time::Duration::ZERO
        })
}

pub fn milliseconds() -> UnixMillis {
    since_epoch().as_millis() as u64
}

pub fn microseconds() -> u64 {
    since_epoch().as_micros() as u64
}

pub fn seconds() -> u64 {
    since_epoch().as_secs()
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn iso8601(timestamp: UnixMillis) -> Option<String> {
    let millis = i64::try_from(timestamp).ok()?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ============================================================================
// Currencies
// ============================================================================

/// Maps a venue currency id to its unified code
pub fn safe_currency_code(currency_id: &str) -> String {
    let upper = currency_id.to_uppercase();
    COMMON_CURRENCIES
        .iter()
        .find(|(id, _)| *id == upper)
        .map(|(_, code)| code.to_string())
        .unwrap_or(upper)
}

// ============================================================================
// Order books & lists
// ============================================================================

fn parse_levels(raw: Option<&Value>, side: &str) -> Vec<(Price, Quantity)> {
    let Some(levels) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    levels
        .iter()
        .filter_map(|level| {
            let pair = level.as_array().filter(|pair| pair.len() >= 2);
            let parsed = pair.and_then(|pair| Some((value_to_f64(&pair[0])?, value_to_f64(&pair[1])?)));
            if parsed.is_none() {
                warn!("Skipping malformed {} level: {}", side, level);
            }
            parsed
        })
        .collect()
}

/// Generic `{bids: [[price, amount], ..], asks: [..]}` parser
///
/// Bids come back best (highest) first and asks best (lowest) first.
pub fn parse_order_book(raw: &Value, symbol: Option<&str>, timestamp: Option<UnixMillis>) -> OrderBook {
    let mut bids = parse_levels(raw.get("bids"), "bid");
    let mut asks = parse_levels(raw.get("asks"), "ask");

    bids.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    asks.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    OrderBook {
        symbol: symbol.map(str::to_string),
        bids,
        asks,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        nonce: None,
    }
}

/// Sorts ascending by timestamp, drops entries older than `since`, then keeps
/// the first `limit`
pub fn filter_by_since_limit<T>(
    mut items: Vec<T>,
    since: Option<UnixMillis>,
    limit: Option<usize>,
    timestamp: impl Fn(&T) -> Option<UnixMillis>,
) -> Vec<T> {
    items.sort_by_key(|item| timestamp(item));

    if let Some(since) = since {
        items.retain(|item| timestamp(item).is_some_and(|ts| ts >= since));
    }
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

// ============================================================================
// Errors
// ============================================================================

/// Raises the first error kind whose substring occurs in `message`
///
/// Returns `Ok(())` when nothing matches so the caller can fall through to
/// its own handling.
pub fn throw_broadly_matched(
    table: &[(&str, ErrorKind)],
    message: &str,
    feedback: &str,
) -> Result<()> {
    match table.iter().find(|(needle, _)| message.contains(needle)) {
        Some((_, kind)) => Err(kind.into_error(feedback)),
        None => Ok(()),
    }
}
