use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::interfaces::TokenTarget;

pub const DEFAULT_MARKET_API_URL: &str = "https://gmgn.ai";
pub const DEFAULT_WALLET_STORE_URL: &str = "https://xbase.site/wls/add-wallet-redis-manual";

#[derive(Debug, Clone)]
pub struct Env {
    pub market_api_url: String,
    pub wallet_store_url: String,
    pub token_target: Option<TokenTarget>,
    pub chart_capture_dir: PathBuf,
    pub tesseract_bin: String,
    pub ocr_language: String,
    /// Hours the chart's display clock runs ahead of UTC.
    pub chart_tz_offset_hours: i64,
    pub quick_window_seconds: i64,
    pub page_limit: usize,
    pub submit_chunk_size: usize,
    pub request_timeout_ms: u64,
    pub network_retry_limit: u32,
    pub setup_timeout_ms: u64,
    pub setup_poll_interval_ms: u64,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            market_api_url: DEFAULT_MARKET_API_URL.to_string(),
            wallet_store_url: DEFAULT_WALLET_STORE_URL.to_string(),
            token_target: None,
            chart_capture_dir: PathBuf::from("chart_captures"),
            tesseract_bin: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            chart_tz_offset_hours: 7,
            quick_window_seconds: 180,
            page_limit: 100,
            submit_chunk_size: 999,
            request_timeout_ms: 10000,
            network_retry_limit: 3,
            setup_timeout_ms: 10000,
            setup_poll_interval_ms: 1000,
        }
    }
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .with_context(|| format!("Invalid {}", key))
}

fn validate_numeric_config() -> Result<()> {
    let tz_offset = parse_var::<i64>("CHART_TZ_OFFSET_HOURS", "7")?;
    if !(-12..=14).contains(&tz_offset) {
        anyhow::bail!("Invalid CHART_TZ_OFFSET_HOURS: must be between -12 and 14");
    }

    let quick_window = parse_var::<i64>("QUICK_WINDOW_SECONDS", "180")?;
    if quick_window <= 0 {
        anyhow::bail!("Invalid QUICK_WINDOW_SECONDS: must be positive");
    }

    let page_limit = parse_var::<usize>("PAGE_LIMIT", "100")?;
    if page_limit < 1 || page_limit > 100 {
        anyhow::bail!("Invalid PAGE_LIMIT: must be between 1 and 100");
    }

    let chunk_size = parse_var::<usize>("SUBMIT_CHUNK_SIZE", "999")?;
    if chunk_size < 1 || chunk_size > 999 {
        anyhow::bail!("Invalid SUBMIT_CHUNK_SIZE: must be between 1 and 999");
    }

    let request_timeout = parse_var::<u64>("REQUEST_TIMEOUT_MS", "10000")?;
    if request_timeout < 1000 {
        anyhow::bail!("Invalid REQUEST_TIMEOUT_MS: must be at least 1000ms");
    }

    let network_retry_limit = parse_var::<u32>("NETWORK_RETRY_LIMIT", "3")?;
    if network_retry_limit < 1 || network_retry_limit > 10 {
        anyhow::bail!("Invalid NETWORK_RETRY_LIMIT: must be between 1 and 10");
    }

    let setup_timeout = parse_var::<u64>("SETUP_TIMEOUT_MS", "10000")?;
    if setup_timeout < 1000 {
        anyhow::bail!("Invalid SETUP_TIMEOUT_MS: must be at least 1000ms");
    }

    let poll_interval = parse_var::<u64>("SETUP_POLL_INTERVAL_MS", "1000")?;
    if poll_interval == 0 {
        anyhow::bail!("Invalid SETUP_POLL_INTERVAL_MS: must be positive");
    }

    Ok(())
}

fn validate_urls() -> Result<()> {
    for key in ["MARKET_API_URL", "WALLET_STORE_URL"] {
        if let Ok(value) = env::var(key) {
            if !value.starts_with("http") {
                eprintln!("\n❌ Invalid {}\n", key);
                eprintln!("Current value: {}", value);
                eprintln!("Must start with: http:// or https://\n");
                anyhow::bail!("Invalid {}: must be a valid HTTP/HTTPS URL", key);
            }
        }
    }
    Ok(())
}

fn validate_ocr() -> Result<()> {
    if let Ok(language) = env::var("OCR_LANGUAGE") {
        if language.trim().is_empty() {
            anyhow::bail!("Invalid OCR_LANGUAGE: must not be empty");
        }
    }
    Ok(())
}

fn parse_token_target() -> Result<Option<TokenTarget>> {
    match env::var("TOKEN_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let target = TokenTarget::from_page_url(url.trim())
                .with_context(|| format!("Invalid TOKEN_URL: {}", url))?;
            Ok(Some(target))
        }
        _ => Ok(None),
    }
}

pub fn load_env() -> Result<Env> {
    dotenvy::dotenv().ok(); // Load .env file if it exists

    validate_numeric_config()?;
    validate_urls()?;
    validate_ocr()?;

    Ok(Env {
        market_api_url: env::var("MARKET_API_URL")
            .unwrap_or_else(|_| DEFAULT_MARKET_API_URL.to_string())
            .trim_end_matches('/')
            .to_string(),
        wallet_store_url: env::var("WALLET_STORE_URL")
            .unwrap_or_else(|_| DEFAULT_WALLET_STORE_URL.to_string()),
        token_target: parse_token_target()?,
        chart_capture_dir: PathBuf::from(
            env::var("CHART_CAPTURE_DIR").unwrap_or_else(|_| "chart_captures".to_string()),
        ),
        tesseract_bin: env::var("TESSERACT_BIN").unwrap_or_else(|_| "tesseract".to_string()),
        ocr_language: env::var("OCR_LANGUAGE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| "eng".to_string()),
        chart_tz_offset_hours: parse_var("CHART_TZ_OFFSET_HOURS", "7")?,
        quick_window_seconds: parse_var("QUICK_WINDOW_SECONDS", "180")?,
        page_limit: parse_var("PAGE_LIMIT", "100")?,
        submit_chunk_size: parse_var("SUBMIT_CHUNK_SIZE", "999")?,
        request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", "10000")?,
        network_retry_limit: parse_var("NETWORK_RETRY_LIMIT", "3")?,
        setup_timeout_ms: parse_var("SETUP_TIMEOUT_MS", "10000")?,
        setup_poll_interval_ms: parse_var("SETUP_POLL_INTERVAL_MS", "1000")?,
    })
}
