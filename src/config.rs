// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the search session engine.
//!
//! # Example
//!
//! ```
//! use media_search::SessionConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SessionConfig::default();
//! assert_eq!(config.page_size, 100);
//! assert_eq!(config.debounce_ms, 350);
//!
//! // Full config
//! let config = SessionConfig {
//!     search_url: "http://127.0.0.1:9200/medias".into(),
//!     page_size: 48,
//!     debounce_ms: 200,
//!     ..Default::default()
//! };
//! assert_eq!(config.page_size, 48);
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::resilience::retry::RetryConfig;

/// Configuration for a search session.
///
/// All fields have sensible defaults. At minimum, you should configure
/// `search_url` to point at the media index of your search backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the media index (e.g., "http://127.0.0.1:9200/medias").
    /// `/_search` and `/_count` are appended by the client.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Base URL of the catalog management service (scan-dir, summary, ...)
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Documents requested per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet period before a typed term is published (default: 350 ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request timeout for the HTTP transport
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Transport-level retries for a failed search request (0 = no retry)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_search_url() -> String { "http://127.0.0.1:9200/medias".to_string() }
fn default_catalog_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_page_size() -> usize { 100 }
fn default_debounce_ms() -> u64 { 350 }
fn default_request_timeout_ms() -> u64 { 10_000 }
fn default_max_retries() -> usize { 3 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            catalog_url: default_catalog_url(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl SessionConfig {
    /// Page size, never zero.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Retry policy for the HTTP transport. `max_retries` counts attempts,
    /// so 0 and 1 both mean "try once".
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        if self.max_retries <= 1 {
            return RetryConfig::once();
        }
        RetryConfig {
            max_retries: Some(self.max_retries),
            ..RetryConfig::query()
        }
    }
}
