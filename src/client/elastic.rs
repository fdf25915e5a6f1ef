// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! HTTP client for an Elasticsearch-compatible media index.
//!
//! ```text
//! POST {search_url}/_search   {query, sort, from, size} → {hits: {hits: [{_source}]}}
//! GET  {search_url}/_count                              → {count}
//! ```
//!
//! Each round-trip is wrapped in [`retry_if`]: connection failures and 5xx
//! responses are retried, 4xx responses and undecodable bodies are not.
//! Anything that is not a 2xx with a decodable body surfaces as a
//! [`TransportError`].

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;

use super::traits::{ResultPage, SearchClient, TransportError};
use crate::config::SessionConfig;
use crate::media::MediaDocument;
use crate::metrics;
use crate::resilience::retry::{retry_if, RetryConfig};
use crate::search::{ElasticTranslator, QueryRequest};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitList,
}

#[derive(Debug, Deserialize)]
struct HitList {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: MediaDocument,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

pub struct ElasticClient {
    http: reqwest::Client,
    search_url: String,
    retry: RetryConfig,
}

impl ElasticClient {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            search_url: config.search_url.trim_end_matches('/').to_string(),
            retry: config.retry(),
        })
    }

    /// `{search_url}/{endpoint}`
    pub fn endpoint(&self, endpoint: &str) -> String {
        format!("{}/{}", self.search_url, endpoint)
    }

    async fn post_search(&self, body: &serde_json::Value) -> Result<ResultPage, TransportError> {
        let response = self
            .http
            .post(self.endpoint("_search"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: SearchResponse = response.json().await?;
        Ok(ResultPage::new(parsed.hits.hits.into_iter().map(|hit| hit.source).collect()))
    }

    async fn get_count(&self) -> Result<u64, TransportError> {
        let response = self
            .http
            .get(self.endpoint("_count"))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: CountResponse = response.json().await?;
        Ok(parsed.count)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SearchClient for ElasticClient {
    async fn search(&self, request: &QueryRequest) -> Result<ResultPage, TransportError> {
        let body = ElasticTranslator::translate(request);
        debug!(from = request.from, size = request.size, clauses = request.clauses.len(), "POST _search");

        let start = Instant::now();
        let result = retry_if("search", &self.retry, TransportError::is_retryable, || self.post_search(&body)).await;
        metrics::record_transport_latency("search", start.elapsed());
        metrics::record_transport_request("search", if result.is_ok() { "success" } else { "error" });
        result
    }

    async fn count(&self) -> Result<u64, TransportError> {
        let result = retry_if("count", &self.retry, TransportError::is_retryable, || self.get_count()).await;
        metrics::record_transport_request("count", if result.is_ok() { "success" } else { "error" });
        result
    }
}
