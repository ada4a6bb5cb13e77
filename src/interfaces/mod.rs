use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{HarvestError, HarvestResult};

/// Reads a number that the API sometimes sends as a string.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Unix seconds, as a number or a numeric string. Anything else fails the
/// whole page.
fn timestamp_secs<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("timestamp {} is not whole seconds", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("invalid timestamp {:?}", s))),
        other => Err(D::Error::custom(format!("invalid timestamp {}", other))),
    }
}

/// One row of the token trade history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(deserialize_with = "timestamp_secs")]
    pub timestamp: i64,
    pub maker: String,
    #[serde(default)]
    pub event: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount_usd: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub realized_profit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unrealized_profit: f64,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub maker_token_tags: Vec<String>,
    #[serde(default)]
    pub maker_tags: Vec<String>,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.event.eq_ignore_ascii_case("buy")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub realized_profit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unrealized_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount_percentage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd_value: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct HistoryData {
    #[serde(default)]
    pub history: Vec<Trade>,
}

#[derive(Debug, Deserialize)]
pub struct ListData<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// Inclusive window of unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: i64,
    end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> HarvestResult<Self> {
        if start > end {
            return Err(HarvestError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }
}

/// Chain and token addressed by a token page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTarget {
    pub chain: String,
    pub token_id: String,
}

impl TokenTarget {
    pub fn new(chain: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            token_id: token_id.into(),
        }
    }

    /// Parses `https://host/<chain>/token/<prefix>_<token>?...`.
    pub fn from_page_url(page_url: &str) -> HarvestResult<Self> {
        let invalid = || HarvestError::InvalidTarget(page_url.to_string());
        let parsed = Url::parse(page_url).map_err(|_| invalid())?;
        if !parsed.path().contains("token") {
            return Err(invalid());
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if segments.len() < 3 {
            return Err(invalid());
        }

        let last = segments[segments.len() - 1];
        let token_id = last.rsplit('_').next().unwrap_or(last);
        let chain = segments[segments.len() - 3];
        if token_id.is_empty() || chain.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(chain, token_id))
    }
}

impl std::fmt::Display for TokenTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chain, self.token_id)
    }
}
