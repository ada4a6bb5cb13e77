use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Env;
use crate::error::{HarvestError, HarvestResult};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Shared HTTP client. GETs are retried with exponential backoff; form posts
/// are sent once since the wallet store is not idempotent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(env: &Env) -> HarvestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(env.request_timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HarvestError::network("client setup", e))?;
        Ok(Self {
            client,
            retries: env.network_retry_limit.max(1),
            retry_delay: Duration::from_secs(1),
        })
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> HarvestResult<T> {
        tracing::debug!(%url, "GET");
        for attempt in 1..=self.retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .text()
                            .await
                            .map_err(|e| HarvestError::network(url, e))?;
                        return serde_json::from_str(&body).map_err(|e| HarvestError::decode(url, e));
                    } else if attempt < self.retries {
                        let delay = self.retry_delay * (1 << (attempt - 1)); // Exponential backoff
                        tracing::warn!(%status, attempt, retries = self.retries, ?delay, "HTTP error, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    } else {
                        return Err(HarvestError::network(url, format!("HTTP error! status: {}", status)));
                    }
                }
                Err(e) => {
                    let is_network_error = e.is_timeout() || e.is_connect() || e.is_request();
                    if is_network_error && attempt < self.retries {
                        let delay = self.retry_delay * (1 << (attempt - 1)); // Exponential backoff
                        tracing::warn!(error = %e, attempt, retries = self.retries, ?delay, "network error, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(HarvestError::network(url, e));
                }
            }
        }

        Err(HarvestError::network(url, "no attempt was made"))
    }

    /// Posts a form body and returns the response text.
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> HarvestResult<String> {
        tracing::debug!(%url, fields = form.len(), "POST");
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| HarvestError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::network(url, format!("HTTP error! status: {}", status)));
        }
        response
            .text()
            .await
            .map(|text| text.trim().to_string())
            .map_err(|e| HarvestError::network(url, e))
    }
}
