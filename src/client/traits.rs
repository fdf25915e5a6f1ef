// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use thiserror::Error;

use crate::media::MediaDocument;
use crate::search::{QueryCompiler, QueryRequest};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to search backend failed: {0}")]
    Request(String),
    #[error("Search backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response from search backend: {0}")]
    Decode(String),
}

impl TransportError {
    /// Connection failures and 5xx responses may succeed on another attempt;
    /// 4xx responses and undecodable bodies will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Documents returned for one request, in backend order.
///
/// A page shorter than the requested size is the last one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub documents: Vec<MediaDocument>,
}

impl ResultPage {
    pub fn new(documents: Vec<MediaDocument>) -> Self {
        Self { documents }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// True when no further page can follow a request of `requested` documents
    pub fn is_last(&self, requested: usize) -> bool {
        self.documents.len() < requested
    }
}

impl IntoIterator for ResultPage {
    type Item = MediaDocument;
    type IntoIter = std::vec::IntoIter<MediaDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one compiled request.
    async fn search(&self, request: &QueryRequest) -> Result<ResultPage, TransportError>;

    /// Total number of documents in the catalog.
    async fn count(&self) -> Result<u64, TransportError>;

    /// Every document in the catalog, in one request sized by [`count`](Self::count).
    async fn fetch_all(&self) -> Result<Vec<MediaDocument>, TransportError> {
        let total = self.count().await?;
        if total == 0 {
            return Ok(Vec::new());
        }
        let size = usize::try_from(total).unwrap_or(usize::MAX);
        let request = QueryCompiler::new().compile_page("*", 0, size);
        Ok(self.search(&request).await?.documents)
    }
}
