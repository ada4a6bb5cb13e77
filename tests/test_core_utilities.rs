//! Integration tests for targets, API payloads and the helper binaries

use std::process::Command;

use trade_wallet_harvester::config::Env;
use trade_wallet_harvester::interfaces::{ApiEnvelope, HistoryData, Holder, ListData, TokenTarget, Trader};
use trade_wallet_harvester::services::MarketDataClient;
use trade_wallet_harvester::utils::format::{format_trade_time, short_maker};
use trade_wallet_harvester::utils::HttpFetcher;
use trade_wallet_harvester::HarvestError;

#[test]
fn test_help_binary() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "help", "--quiet"])
        .output()
        .expect("Failed to execute help binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TRADE WALLET HARVESTER"));
}

#[test]
fn test_target_from_token_page() {
    let target = TokenTarget::from_page_url("https://gmgn.ai/sol/token/abc_Mint111?tab=trades").unwrap();
    assert_eq!(target, TokenTarget::new("sol", "Mint111"));
    assert_eq!(target.to_string(), "sol/Mint111");

    let plain = TokenTarget::from_page_url("https://gmgn.ai/base/token/0xAbC").unwrap();
    assert_eq!(plain, TokenTarget::new("base", "0xAbC"));
}

#[test]
fn test_target_rejects_other_pages() {
    for url in ["not a url", "https://gmgn.ai/sol/address/abc_Mint", "https://gmgn.ai/token"] {
        assert!(
            matches!(TokenTarget::from_page_url(url), Err(HarvestError::InvalidTarget(_))),
            "{} should be rejected",
            url
        );
    }
}

#[test]
fn test_trade_page_payload_with_string_numbers() {
    let body = r#"{
        "code": 0,
        "data": {
            "history": [
                {"timestamp": 1733297460, "maker": "Ab12", "event": "buy", "amount_usd": "12.5",
                 "realized_profit": 3, "tx_hash": "0xfeed", "maker_tags": ["smart_degen"]},
                {"timestamp": "1733297400", "maker": "Cd34", "event": "sell", "amount_usd": null}
            ]
        }
    }"#;
    let parsed: ApiEnvelope<HistoryData> = serde_json::from_str(body).unwrap();
    let history = parsed.data.history;

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].amount_usd, 12.5);
    assert_eq!(history[0].realized_profit, 3.0);
    assert!(history[0].is_buy());
    assert_eq!(history[1].timestamp, 1733297400);
    assert_eq!(history[1].amount_usd, 0.0);
    assert!(!history[1].is_buy());
    assert!(history[1].maker_tags.is_empty());
}

#[test]
fn test_trade_page_with_unreadable_timestamp_fails() {
    for timestamp in [r#""soon""#, "null", "1733297400.5", r#""""#] {
        let body = format!(
            r#"{{"data": {{"history": [
                {{"timestamp": 1733297460, "maker": "Ab12"}},
                {{"timestamp": {}, "maker": "Cd34"}}
            ]}}}}"#,
            timestamp
        );
        let parsed = serde_json::from_str::<ApiEnvelope<HistoryData>>(&body);
        assert!(parsed.is_err(), "timestamp {} should not decode", timestamp);
    }

    let missing = r#"{"data": {"history": [{"maker": "Cd34"}]}}"#;
    assert!(serde_json::from_str::<ApiEnvelope<HistoryData>>(missing).is_err());
}

#[test]
fn test_ranked_list_payloads() {
    let traders: ApiEnvelope<ListData<Trader>> =
        serde_json::from_str(r#"{"data": {"list": [{"address": "T1", "realized_profit": "1500.25"}]}}"#).unwrap();
    assert_eq!(traders.data.list[0].address, "T1");
    assert_eq!(traders.data.list[0].realized_profit, 1500.25);

    let holders: ApiEnvelope<ListData<Holder>> = serde_json::from_str(r#"{"data": {}}"#).unwrap();
    assert!(holders.data.list.is_empty());
}

#[test]
fn test_market_urls() {
    let client = MarketDataClient::new(HttpFetcher::new(&Env::default()).unwrap(), "https://api.test/");
    let sol = TokenTarget::new("sol", "Mint111");
    let eth = TokenTarget::new("eth", "0xToken");

    assert_eq!(
        client.trade_page_url(&sol, 100, 200, 500),
        "https://api.test/vas/api/v1/token_trades/sol/Mint111?limit=100&from=100&to=200&revert=false"
    );
    assert!(client
        .trade_page_url(&eth, 1, 2, 50)
        .starts_with("https://api.test/api/v1/token_trades/eth/0xToken?limit=50&"));
    assert!(client.top_traders_url(&sol).contains("orderby=realized_profit&direction=desc"));
    assert!(client.top_holders_url(&sol).contains("/token_holders/sol/Mint111?"));
    assert!(client.recent_trades_url(&sol).ends_with("revert=true"));
}

#[test]
fn test_default_configuration() {
    let env = Env::default();
    assert_eq!(env.chart_tz_offset_hours, 7);
    assert_eq!(env.quick_window_seconds, 180);
    assert_eq!(env.page_limit, 100);
    assert_eq!(env.submit_chunk_size, 999);
    assert!(env.token_target.is_none());
}

#[test]
fn test_trade_display_helpers() {
    assert_eq!(short_maker("AbCdEfGhIjKl"), "AbC...IjKl");
    assert_eq!(format_trade_time(1733297400, 7), "04/12, 14:30:00");
}
