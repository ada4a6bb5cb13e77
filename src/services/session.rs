use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Env;
use crate::error::{HarvestError, HarvestResult};
use crate::interfaces::{TimeRange, TokenTarget, Trade};
use crate::services::captures::CaptureDirProvider;
use crate::services::chart_reader::ChartTimeReader;
use crate::services::market::{MarketData, MarketDataClient};
use crate::services::ocr::TesseractRecognizer;
use crate::services::paginator::collect_trades;
use crate::services::submission::{submit_wallets, SubmissionReport, WalletSink, WalletStoreClient};
use crate::services::wallets::unique_addresses;
use crate::utils::time_label::{clean_label, normalize, pad_label, Bound};
use crate::utils::{Logger, SingleFlight};

/// Result of collecting one time window.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub range: TimeRange,
    pub trades: Vec<Trade>,
    pub wallets: Vec<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    from_input: Option<String>,
    to_input: Option<String>,
    last_wallets: Vec<String>,
}

struct Flights {
    quick_filter: SingleFlight,
    filter_to_now: SingleFlight,
    capture_start: SingleFlight,
    capture_end: SingleFlight,
    custom_filter: SingleFlight,
    save_collected: SingleFlight,
    save_top_pnl: SingleFlight,
    save_top_holders: SingleFlight,
    save_recent: SingleFlight,
}

impl Flights {
    fn new() -> Self {
        Self {
            quick_filter: SingleFlight::new("quick filter"),
            filter_to_now: SingleFlight::new("filter to now"),
            capture_start: SingleFlight::new("start capture"),
            capture_end: SingleFlight::new("end capture"),
            custom_filter: SingleFlight::new("custom filter"),
            save_collected: SingleFlight::new("wallet save"),
            save_top_pnl: SingleFlight::new("top PNL save"),
            save_top_holders: SingleFlight::new("top holders save"),
            save_recent: SingleFlight::new("recent traders save"),
        }
    }
}

/// Everything one harvesting session works against: configuration, the
/// token on screen, the chart reader, the API clients and the typed window
/// bounds. Each operation rejects a second trigger while it is running.
pub struct Session {
    env: Arc<Env>,
    target: TokenTarget,
    reader: ChartTimeReader,
    market: Arc<dyn MarketData>,
    sink: Arc<dyn WalletSink>,
    state: Mutex<SessionState>,
    flights: Flights,
}

impl Session {
    pub fn new(
        env: Arc<Env>,
        target: TokenTarget,
        reader: ChartTimeReader,
        market: Arc<dyn MarketData>,
        sink: Arc<dyn WalletSink>,
    ) -> Self {
        Self {
            env,
            target,
            reader,
            market,
            sink,
            state: Mutex::new(SessionState::default()),
            flights: Flights::new(),
        }
    }

    /// Wires the capture directory, tesseract and the HTTP clients.
    pub fn from_env(env: Arc<Env>, target: TokenTarget) -> HarvestResult<Self> {
        let reader = ChartTimeReader::new(
            Arc::new(CaptureDirProvider::new(env.chart_capture_dir.clone())),
            Arc::new(TesseractRecognizer::from_env(&env)),
        );
        let market = Arc::new(MarketDataClient::from_env(&env)?);
        let sink = Arc::new(WalletStoreClient::from_env(&env)?);
        Ok(Self::new(env, target, reader, market, sink))
    }

    pub fn target(&self) -> &TokenTarget {
        &self.target
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    async fn chart_timestamp(&self) -> HarvestResult<i64> {
        let label = self.reader.read_label().await?;
        normalize(&label, self.env.chart_tz_offset_hours)
    }

    /// `f`: the quick window starting at the chart's selected time.
    pub async fn quick_filter(&self) -> HarvestResult<FilterOutcome> {
        let _flight = self.flights.quick_filter.try_begin()?;
        let start = self.chart_timestamp().await?;
        let range = TimeRange::new(start, start + self.env.quick_window_seconds)?;
        self.filter_window(range).await
    }

    /// `d`: from the chart's selected time until now.
    pub async fn filter_to_now(&self) -> HarvestResult<FilterOutcome> {
        let _flight = self.flights.filter_to_now.try_begin()?;
        let start = self.chart_timestamp().await?;
        let range = TimeRange::new(start, chrono::Utc::now().timestamp())?;
        self.filter_window(range).await
    }

    /// `s` / `e`: stores the chart's selected time, padded to cover the whole
    /// day or minute on that side, as a window bound.
    pub async fn capture_bound(&self, bound: Bound) -> HarvestResult<String> {
        let flight = match bound {
            Bound::Start => &self.flights.capture_start,
            Bound::End => &self.flights.capture_end,
        };
        let _flight = flight.try_begin()?;
        let label = pad_label(&self.reader.read_label().await?, bound);
        self.set_bound(bound, &label).await;
        Ok(label)
    }

    /// Typed bound, used as-is by `custom_filter`.
    pub async fn set_bound(&self, bound: Bound, text: &str) {
        let mut state = self.state.lock().await;
        let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
        match bound {
            Bound::Start => state.from_input = value,
            Bound::End => state.to_input = value,
        }
    }

    /// `from <label>` / `to <label>`: a hand-typed bound, cleaned and padded
    /// like a captured one so a bare day covers the whole day.
    pub async fn type_bound(&self, bound: Bound, text: &str) -> String {
        let label = pad_label(&clean_label(text), bound);
        self.set_bound(bound, &label).await;
        label
    }

    pub async fn bounds(&self) -> (Option<String>, Option<String>) {
        let state = self.state.lock().await;
        (state.from_input.clone(), state.to_input.clone())
    }

    /// `r`: the window between the stored bounds.
    pub async fn custom_filter(&self) -> HarvestResult<FilterOutcome> {
        let _flight = self.flights.custom_filter.try_begin()?;
        let (from, to) = self.bounds().await;
        let from = from.ok_or(HarvestError::MissingInput("from timestamp"))?;
        let start = normalize(&from, self.env.chart_tz_offset_hours)?;
        let to = to.ok_or(HarvestError::MissingInput("to timestamp"))?;
        let end = normalize(&to, self.env.chart_tz_offset_hours)?;
        self.filter_window(TimeRange::new(start, end)?).await
    }

    async fn filter_window(&self, range: TimeRange) -> HarvestResult<FilterOutcome> {
        Logger::window(&range, self.env.chart_tz_offset_hours);
        let trades = collect_trades(
            self.market.as_ref(),
            &self.target,
            range,
            self.env.page_limit,
            |page| Logger::progress(page.len()),
        )
        .await?;

        if trades.is_empty() {
            Logger::warning("❌ No items found");
        }
        let wallets = unique_addresses(&trades);
        self.state.lock().await.last_wallets = wallets.clone();

        Ok(FilterOutcome { range, trades, wallets })
    }

    pub async fn last_wallets(&self) -> Vec<String> {
        self.state.lock().await.last_wallets.clone()
    }

    async fn submit(&self, wallets: &[String]) -> HarvestResult<SubmissionReport> {
        Logger::info(&format!("⏳ Saving...{} wallets", wallets.len()));
        submit_wallets(self.sink.as_ref(), &self.target.chain, wallets, self.env.submit_chunk_size).await
    }

    /// `w`: submits the wallets of the last collected window.
    pub async fn save_collected(&self) -> HarvestResult<SubmissionReport> {
        let _flight = self.flights.save_collected.try_begin()?;
        let wallets = self.last_wallets().await;
        if wallets.is_empty() {
            return Err(HarvestError::EmptyResult("collected wallets"));
        }
        self.submit(&wallets).await
    }

    /// `p`
    pub async fn save_top_pnl(&self) -> HarvestResult<SubmissionReport> {
        let _flight = self.flights.save_top_pnl.try_begin()?;
        let traders = self.market.top_pnl_traders(&self.target).await?;
        let wallets = unique_addresses(&traders);
        if wallets.is_empty() {
            return Err(HarvestError::EmptyResult("top PNL traders"));
        }
        self.submit(&wallets).await
    }

    /// `h`
    pub async fn save_top_holders(&self) -> HarvestResult<SubmissionReport> {
        let _flight = self.flights.save_top_holders.try_begin()?;
        let holders = self.market.top_holders(&self.target).await?;
        let wallets = unique_addresses(&holders);
        if wallets.is_empty() {
            return Err(HarvestError::EmptyResult("top holders"));
        }
        self.submit(&wallets).await
    }

    /// `n`: makers of the latest trades.
    pub async fn save_recent(&self) -> HarvestResult<SubmissionReport> {
        let _flight = self.flights.save_recent.try_begin()?;
        let trades = self.market.recent_trades(&self.target).await?;
        let wallets = unique_addresses(&trades);
        if wallets.is_empty() {
            return Err(HarvestError::EmptyResult("recent trades"));
        }
        self.submit(&wallets).await
    }
}
