//! Common test utilities and mocks
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use trade_wallet_harvester::config::Env;
use trade_wallet_harvester::interfaces::{Holder, TokenTarget, Trade, Trader};
use trade_wallet_harvester::services::{
    ChartTimeReader, ImageRegion, ImageRegionProvider, MarketData, Session, TextRecognizer, WalletSink,
};
use trade_wallet_harvester::{HarvestError, HarvestResult};

pub fn trade(maker: &str, timestamp: i64) -> Trade {
    Trade {
        timestamp,
        maker: maker.to_string(),
        event: "buy".to_string(),
        amount_usd: 10.0,
        realized_profit: 0.0,
        unrealized_profit: 0.0,
        tx_hash: format!("tx-{}-{}", maker, timestamp),
        maker_token_tags: Vec::new(),
        maker_tags: Vec::new(),
    }
}

pub fn target() -> TokenTarget {
    TokenTarget::new("sol", "Mint111")
}

/// A region that is transparent except for one opaque pixel per entry of
/// `dots`.
pub fn region_with_dots(width: u32, height: u32, dots: &[(u32, u32)]) -> ImageRegion {
    let mut rgba = vec![0u8; (width * height * 4) as usize];
    for &(x, y) in dots {
        let i = ((y * width + x) * 4) as usize;
        rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
    }
    ImageRegion::new(width, height, rgba).unwrap()
}

pub fn blank_region() -> ImageRegion {
    region_with_dots(4, 4, &[])
}

/// One `trade_page` answer per call; once exhausted every call is empty.
#[derive(Default)]
pub struct ScriptedMarket {
    pages: Mutex<VecDeque<HarvestResult<Vec<Trade>>>>,
    /// Returned for every call instead of the script when set.
    forever: Option<Vec<Trade>>,
    pub calls: Mutex<Vec<(i64, i64)>>,
    pub traders: Vec<Trader>,
    pub holders: Vec<Holder>,
    pub recent: Vec<Trade>,
}

impl ScriptedMarket {
    pub fn with_pages(pages: Vec<HarvestResult<Vec<Trade>>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    pub fn repeating(page: Vec<Trade>) -> Self {
        Self {
            forever: Some(page),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(i64, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketData for ScriptedMarket {
    async fn trade_page(&self, _target: &TokenTarget, from: i64, to: i64, _limit: usize) -> HarvestResult<Vec<Trade>> {
        let call_count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((from, to));
            calls.len()
        };
        // guard against a paginator that never stops
        assert!(call_count < 1000, "paginator kept fetching");

        if let Some(page) = &self.forever {
            return Ok(page.clone());
        }
        self.pages.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn top_pnl_traders(&self, _target: &TokenTarget) -> HarvestResult<Vec<Trader>> {
        Ok(self.traders.clone())
    }

    async fn top_holders(&self, _target: &TokenTarget) -> HarvestResult<Vec<Holder>> {
        Ok(self.holders.clone())
    }

    async fn recent_trades(&self, _target: &TokenTarget) -> HarvestResult<Vec<Trade>> {
        Ok(self.recent.clone())
    }
}

/// Records each posted chunk; fails the chunk whose 1-based index is
/// `fail_on`.
#[derive(Default)]
pub struct RecordingSink {
    pub fail_on: Option<usize>,
    pub posted: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingSink {
    pub fn failing_on(chunk: usize) -> Self {
        Self {
            fail_on: Some(chunk),
            ..Default::default()
        }
    }

    pub fn posted(&self) -> Vec<(String, Vec<String>)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletSink for RecordingSink {
    async fn post_wallets(&self, chain: &str, wallets: &[String]) -> HarvestResult<String> {
        let mut posted = self.posted.lock().unwrap();
        if self.fail_on == Some(posted.len() + 1) {
            return Err(HarvestError::network("http://store.test", "HTTP error! status: 500"));
        }
        posted.push((chain.to_string(), wallets.to_vec()));
        Ok(wallets.len().to_string())
    }
}

pub struct FixedRegions(pub Vec<ImageRegion>);

#[async_trait]
impl ImageRegionProvider for FixedRegions {
    async fn regions(&self) -> HarvestResult<Vec<ImageRegion>> {
        Ok(self.0.clone())
    }
}

/// Answers OCR requests from a script, in order; records how many times it
/// was asked.
#[derive(Default)]
pub struct ScriptedRecognizer {
    answers: Mutex<VecDeque<HarvestResult<String>>>,
    pub seen: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedRecognizer {
    pub fn new(answers: Vec<HarvestResult<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<(u32, u32)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, image: &ImageRegion) -> HarvestResult<String> {
        self.seen.lock().unwrap().push((image.width, image.height));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// A reader that sees one visible region and reads `label` from it.
pub fn reader_reading(label: &str) -> ChartTimeReader {
    ChartTimeReader::new(
        Arc::new(FixedRegions(vec![region_with_dots(8, 4, &[(1, 1), (5, 2)])])),
        Arc::new(ScriptedRecognizer::new(vec![Ok(label.to_string())])),
    )
}

pub fn session_with(
    reader: ChartTimeReader,
    market: Arc<ScriptedMarket>,
    sink: Arc<RecordingSink>,
) -> Session {
    Session::new(Arc::new(Env::default()), target(), reader, market, sink)
}
