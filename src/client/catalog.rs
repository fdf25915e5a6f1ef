// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Client for the catalog management service.
//!
//! These endpoints belong to the setup/onboarding view that the session asks
//! for (`display-config`) when the catalog is empty. The session itself never
//! calls them.
//!
//! ```text
//! GET  scan-dir[<path>]             index a directory (whole library when no path)
//! GET  transcode-dir/<extension>    transcode every file with that extension
//! GET  all-files-path               every indexed path
//! GET  summary                      catalog statistics
//! GET  service-log                  service log text
//! GET  prerequistes                 external tool availability
//! GET  update-metadata<path>        current metadata for one file
//! POST update-metadata<path>        replace metadata for one file
//! ```

use serde_json::Value;
use tracing::debug;

use super::traits::TransportError;
use crate::config::SessionConfig;

pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.catalog_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{catalog_url}/{endpoint}{path}` with `path` percent-encoded
    /// segment by segment (slashes kept).
    pub fn url(&self, endpoint: &str, path: Option<&str>) -> String {
        match path {
            Some(path) if !path.is_empty() => {
                let encoded = path
                    .split('/')
                    .map(urlencoding::encode)
                    .collect::<Vec<_>>()
                    .join("/");
                let sep = if encoded.starts_with('/') { "" } else { "/" };
                format!("{}/{}{}{}", self.base_url, endpoint, sep, encoded)
            }
            _ => format!("{}/{}", self.base_url, endpoint),
        }
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, TransportError> {
        debug!(url = %url, "GET catalog endpoint");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }

    /// Index `path`, or the whole library when `None`
    pub async fn scan_dir(&self, path: Option<&str>) -> Result<(), TransportError> {
        self.get(self.url("scan-dir", path)).await.map(|_| ())
    }

    pub async fn transcode_dir(&self, extension: &str) -> Result<(), TransportError> {
        let extension = extension.trim_start_matches('.');
        self.get(self.url("transcode-dir", Some(extension))).await.map(|_| ())
    }

    pub async fn all_files_path(&self) -> Result<Vec<String>, TransportError> {
        Ok(self.get(self.url("all-files-path", None)).await?.json().await?)
    }

    pub async fn summary(&self) -> Result<Value, TransportError> {
        Ok(self.get(self.url("summary", None)).await?.json().await?)
    }

    pub async fn service_log(&self) -> Result<String, TransportError> {
        Ok(self.get(self.url("service-log", None)).await?.text().await?)
    }

    pub async fn prerequisites(&self) -> Result<Value, TransportError> {
        // The service spells the route this way
        Ok(self.get(self.url("prerequistes", None)).await?.json().await?)
    }

    pub async fn metadata(&self, path: &str) -> Result<Value, TransportError> {
        Ok(self.get(self.url("update-metadata", Some(path))).await?.json().await?)
    }

    pub async fn update_metadata(&self, path: &str, metadata: &Value) -> Result<(), TransportError> {
        let url = self.url("update-metadata", Some(path));
        debug!(url = %url, "POST catalog metadata");
        let response = self.http.post(url).json(metadata).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }
}
