//! Soroban RPC client: polls `getEvents` and decodes FundMe events.
//!
//! Events are requested with `xdrFormat: "json"`, so topics and values come
//! back as JSON-encoded `ScVal`s (`{"symbol":"funded"}`, `{"i128":"500"}`,
//! `{"vec":[…]}`) instead of base64 XDR.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, FundMeEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// JSON-encoded topic list
    #[serde(rename = "topicJson", default)]
    pub topic: Vec<Value>,
    /// JSON-encoded event data
    #[serde(rename = "valueJson", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                let result = match read_page(body)? {
                    Page::Ready(result) => result,
                    Page::Retry(err) => {
                        warn!(
                            "RPC soft error (will retry in {backoff}s): {} {}",
                            err.code, err.message
                        );
                        tokio::time::sleep(Duration::from_secs(backoff)).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                        continue;
                    }
                };

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

/// Outcome of a well-formed `getEvents` response.
enum Page {
    Ready(EventsResult),
    /// A transient RPC error worth retrying after back-off.
    Retry(RpcError),
}

/// JSON-RPC codes for malformed requests and unknown methods.
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

fn read_page(body: RpcResponse) -> Result<Page> {
    if let Some(err) = body.error {
        if HARD_ERROR_CODES.contains(&err.code) {
            return Err(IndexerError::RpcRejected {
                code: err.code,
                message: err.message,
            });
        }
        return Ok(Page::Retry(err));
    }
    body.result.map(Page::Ready).ok_or(IndexerError::EmptyResponse)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`FundMeEvent`] structs.
///
/// Events from failed invocations are dropped: the contract rolled them back.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<FundMeEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<FundMeEvent> {
    // Extract leading topic symbol to determine event type.
    let kind = EventKind::from_topic(&extract_symbol(raw.topic.first()?)?);
    let Some(event_id) = raw.id.clone() else {
        warn!("Skipping {} event without an RPC id", kind.as_str());
        return None;
    };

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let actor = raw.topic.get(1).and_then(extract_address);
    let (amount, detail) = decode_data(&raw.value, kind);

    Some(FundMeEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Split the `(amount, detail)` data tuple shared by both FundMe events.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::Funded | EventKind::Withdrawn => {
            let items = match value.get("vec").and_then(Value::as_array) {
                Some(items) => items,
                None => return (None, None),
            };
            let amount = items.first().and_then(extract_integer);
            let detail = items.get(1).and_then(extract_integer);
            (amount, detail)
        }
        EventKind::Unknown => (None, None),
    }
}

/// Extract a Symbol from a JSON `ScVal`: `{"symbol":"funded"}` or a bare string.
fn extract_symbol(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => value.get("symbol").and_then(Value::as_str).map(String::from),
    }
}

/// Extract an Address strkey from a JSON `ScVal`.
fn extract_address(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => value.get("address").and_then(Value::as_str).map(String::from),
    }
}

/// Extract an integer `ScVal` as a decimal string.
///
/// Accepts `{"i128":"123"}`, `{"u32":3}`, and the `{"hi":…,"lo":…}` parts form.
fn extract_integer(value: &Value) -> Option<String> {
    let inner = ["i128", "u128", "i64", "u64", "i32", "u32"]
        .iter()
        .find_map(|key| value.get(*key))
        .unwrap_or(value);

    match inner {
        Value::String(s) => s.parse::<i128>().ok().map(|n| n.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(parts) => {
            let hi = parts.get("hi").and_then(Value::as_i64)?;
            let lo = parts.get("lo").and_then(Value::as_u64)?;
            Some((((hi as i128) << 64) | lo as i128).to_string())
        }
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
