use async_trait::async_trait;

use crate::config::Env;
use crate::error::{HarvestError, HarvestResult};
use crate::utils::{HttpFetcher, Logger};

/// Largest batch the wallet store accepts in one request.
pub const MAX_CHUNK_SIZE: usize = 999;

/// Destination for harvested wallets. Returns the store's own count of
/// wallets saved, verbatim.
#[async_trait]
pub trait WalletSink: Send + Sync {
    async fn post_wallets(&self, chain: &str, wallets: &[String]) -> HarvestResult<String>;
}

#[derive(Debug, Clone)]
pub struct WalletStoreClient {
    http: HttpFetcher,
    url: String,
}

impl WalletStoreClient {
    pub fn new(http: HttpFetcher, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn from_env(env: &Env) -> HarvestResult<Self> {
        Ok(Self::new(HttpFetcher::new(env)?, env.wallet_store_url.clone()))
    }
}

/// The store names solana `sol`.
pub fn store_chain(chain: &str) -> &str {
    if chain == "solana" {
        "sol"
    } else {
        chain
    }
}

#[async_trait]
impl WalletSink for WalletStoreClient {
    async fn post_wallets(&self, chain: &str, wallets: &[String]) -> HarvestResult<String> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(wallets.len() + 1);
        form.push(("chain", store_chain(chain)));
        form.extend(wallets.iter().map(|w| ("items", w.as_str())));
        self.http.post_form(&self.url, &form).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReceipt {
    /// 1-based position of the chunk.
    pub index: usize,
    pub size: usize,
    pub server_count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub total_chunks: usize,
    pub sent: usize,
    pub receipts: Vec<ChunkReceipt>,
}

impl SubmissionReport {
    /// Sum of the store's counts, when every chunk answered with a number.
    pub fn reported_total(&self) -> Option<usize> {
        self.receipts
            .iter()
            .map(|r| r.server_count.trim().parse::<usize>().ok())
            .sum()
    }
}

/// Sends `wallets` in sequential chunks of at most `chunk_size`. The first
/// rejected chunk aborts the run; chunks sent before it stay stored.
pub async fn submit_wallets(
    sink: &dyn WalletSink,
    chain: &str,
    wallets: &[String],
    chunk_size: usize,
) -> HarvestResult<SubmissionReport> {
    let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
    let total_chunks = wallets.len().div_ceil(chunk_size);
    let mut report = SubmissionReport {
        total_chunks,
        ..Default::default()
    };

    for (i, chunk) in wallets.chunks(chunk_size).enumerate() {
        let index = i + 1;
        let server_count = sink
            .post_wallets(chain, chunk)
            .await
            .map_err(|e| HarvestError::Submission {
                chunk: index,
                total: total_chunks,
                source: Box::new(e),
            })?;
        Logger::success(&format!(
            "Chunk {}/{}: {} wallets saved (sent {})",
            index,
            total_chunks,
            server_count.trim(),
            chunk.len()
        ));
        report.sent += chunk.len();
        report.receipts.push(ChunkReceipt {
            index,
            size: chunk.len(),
            server_count,
        });
    }

    Ok(report)
}
