use async_trait::async_trait;

use crate::config::Env;
use crate::error::HarvestResult;
use crate::interfaces::{ApiEnvelope, HistoryData, Holder, ListData, TokenTarget, Trade, Trader};
use crate::utils::HttpFetcher;

pub const MAX_PAGE_LIMIT: usize = 100;

/// Read side of the market API used by the harvester.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Up to `limit` trades with timestamps in `[from, to]`, newest first.
    async fn trade_page(&self, target: &TokenTarget, from: i64, to: i64, limit: usize) -> HarvestResult<Vec<Trade>>;

    async fn top_pnl_traders(&self, target: &TokenTarget) -> HarvestResult<Vec<Trader>>;

    async fn top_holders(&self, target: &TokenTarget) -> HarvestResult<Vec<Holder>>;

    /// Latest trades regardless of time window.
    async fn recent_trades(&self, target: &TokenTarget) -> HarvestResult<Vec<Trade>>;
}

#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: HttpFetcher,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(http: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env(env: &Env) -> HarvestResult<Self> {
        Ok(Self::new(HttpFetcher::new(env)?, env.market_api_url.clone()))
    }

    /// EVM chains are served from the public api, everything else from `vas`.
    fn trades_prefix(chain: &str) -> &'static str {
        match chain {
            "eth" | "base" => "/api/v1",
            _ => "/vas/api/v1",
        }
    }

    pub fn trade_page_url(&self, target: &TokenTarget, from: i64, to: i64, limit: usize) -> String {
        format!(
            "{}{}/token_trades/{}/{}?limit={}&from={}&to={}&revert=false",
            self.base_url,
            Self::trades_prefix(&target.chain),
            target.chain,
            target.token_id,
            limit.min(MAX_PAGE_LIMIT),
            from,
            to
        )
    }

    pub fn top_traders_url(&self, target: &TokenTarget) -> String {
        format!(
            "{}/vas/api/v1/token_traders/{}/{}?limit=100&orderby=realized_profit&direction=desc",
            self.base_url, target.chain, target.token_id
        )
    }

    pub fn top_holders_url(&self, target: &TokenTarget) -> String {
        format!(
            "{}/vas/api/v1/token_holders/{}/{}?limit=100&cost=20&orderby=amount_percentage&direction=desc",
            self.base_url, target.chain, target.token_id
        )
    }

    pub fn recent_trades_url(&self, target: &TokenTarget) -> String {
        format!(
            "{}{}/token_trades/{}/{}?os=web&limit=100&maker=&revert=true",
            self.base_url,
            Self::trades_prefix(&target.chain),
            target.chain,
            target.token_id
        )
    }
}

#[async_trait]
impl MarketData for MarketDataClient {
    async fn trade_page(&self, target: &TokenTarget, from: i64, to: i64, limit: usize) -> HarvestResult<Vec<Trade>> {
        let url = self.trade_page_url(target, from, to, limit);
        let body: ApiEnvelope<HistoryData> = self.http.fetch_json(&url).await?;
        Ok(body.data.history)
    }

    async fn top_pnl_traders(&self, target: &TokenTarget) -> HarvestResult<Vec<Trader>> {
        let body: ApiEnvelope<ListData<Trader>> = self.http.fetch_json(&self.top_traders_url(target)).await?;
        Ok(body.data.list)
    }

    async fn top_holders(&self, target: &TokenTarget) -> HarvestResult<Vec<Holder>> {
        let body: ApiEnvelope<ListData<Holder>> = self.http.fetch_json(&self.top_holders_url(target)).await?;
        Ok(body.data.list)
    }

    async fn recent_trades(&self, target: &TokenTarget) -> HarvestResult<Vec<Trade>> {
        let body: ApiEnvelope<HistoryData> = self.http.fetch_json(&self.recent_trades_url(target)).await?;
        Ok(body.data.history)
    }
}
