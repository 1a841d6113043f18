//! Read-only client for the annotation backend.
//!
//! Two endpoints are consumed: the sentence list for a report and the IOC
//! enrichment lookup. The trait seam exists so the viewer can be driven by
//! an in-memory backend in tests.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ReportLensError, Result};
use crate::indicator::IocType;
use crate::schemas::{IocDetails, Sentence};

#[async_trait]
pub trait ReportApi: Send + Sync {
    /// `GET /api/sentences/?report-id={id}`
    async fn sentences(&self, report_id: i64) -> Result<Vec<Sentence>>;

    /// `GET /api/IOCDetails/?IOC_value={value}&IOC_type={type}`
    async fn ioc_details(&self, value: &str, ioc_type: IocType) -> Result<IocDetails>;
}

/// reqwest-backed implementation.
pub struct HttpReportApi {
    client: reqwest::Client,
    base_url: String,
    retries: u32,
    retry_delay_ms: u64,
}

impl HttpReportApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ReportLensError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            // Bounded on both sides; the backoff doubles per attempt, so
            // large values would overflow the shift before they ever helped.
            retries: config.retries.clamp(1, 10),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Sleep before the next attempt; no-op after the final one.
    async fn backoff(&self, attempt: u32) {
        if attempt + 1 >= self.retries {
            return;
        }
        let delay_ms = self.retry_delay_ms * (1u64 << attempt);
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
    }

    /// GET with bounded exponential backoff. A non-success status counts as
    /// a failed attempt like any transport error; the caller sees exactly
    /// one terminal failure.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_err: Option<ReportLensError> = None;
        for i in 0..self.retries {
            let send_res = self.client.get(&url).query(query).send().await;
            let response = match send_res {
                Ok(resp) => resp,
                Err(e) => {
                    last_err = Some(e.into());
                    self.backoff(i).await;
                    continue;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                last_err = Some(ReportLensError::Http {
                    message: format!("{} {}: {}", status, url, error_text),
                });
                self.backoff(i).await;
                continue;
            }

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    last_err = Some(ReportLensError::Decode {
                        message: format!("Failed to parse response from {}: {}", url, e),
                    });
                    self.backoff(i).await;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ReportLensError::Http {
            message: format!("request to {} failed", url),
        }))
    }
}

#[async_trait]
impl ReportApi for HttpReportApi {
    async fn sentences(&self, report_id: i64) -> Result<Vec<Sentence>> {
        debug!("Fetching sentences for report {}", report_id);
        let report_id = report_id.to_string();
        self.get_json("/api/sentences/", &[("report-id", report_id.as_str())])
            .await
    }

    async fn ioc_details(&self, value: &str, ioc_type: IocType) -> Result<IocDetails> {
        debug!("Fetching IOC details for {} ({})", value, ioc_type);
        self.get_json(
            "/api/IOCDetails/",
            &[("IOC_value", value), ("IOC_type", ioc_type.as_str())],
        )
        .await
    }
}
