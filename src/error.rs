use thiserror::Error;

/// Failures surfaced by the harvesting pipeline.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("invalid time label {0:?}")]
    InvalidLabel(String),

    #[error("invalid month {0:?}")]
    InvalidMonth(String),

    #[error("no readable time label on the chart")]
    NoTimeLabelFound,

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("{0} is empty")]
    MissingInput(&'static str),

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("no {0} returned")]
    EmptyResult(&'static str),

    #[error("chunk {chunk}/{total} was rejected: {source}")]
    Submission {
        chunk: usize,
        total: usize,
        #[source]
        source: Box<HarvestError>,
    },

    #[error("ocr failed: {0}")]
    Ocr(String),

    #[error("unreadable image {path}: {reason}")]
    Image { path: String, reason: String },

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("{0} is already running")]
    Busy(&'static str),

    #[error("not a token page url: {0}")]
    InvalidTarget(String),
}

impl HarvestError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(url: &str, reason: impl ToString) -> Self {
        Self::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type HarvestResult<T> = Result<T, HarvestError>;
