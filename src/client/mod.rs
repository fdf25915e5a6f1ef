// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search backend transports.
//!
//! - [`ElasticClient`]: HTTP/JSON against an Elasticsearch-compatible index
//! - [`MemoryClient`]: in-process evaluation over a document list
//! - [`CatalogClient`]: catalog management endpoints (scan, transcode, summary)

pub mod catalog;
pub mod elastic;
pub mod memory;
pub mod traits;

pub use catalog::CatalogClient;
pub use elastic::ElasticClient;
pub use memory::MemoryClient;
pub use traits::{ResultPage, SearchClient, TransportError};
