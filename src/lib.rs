// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Media Search
//!
//! Search session engine for a media catalog: one free-text box, an
//! infinitely scrolling result stream, and back/forward navigation.
//!
//! ## Architecture
//!
//! Components never call each other directly; they meet on an [`EventBus`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SearchInput                           │
//! │  • Debounces keystrokes (350 ms)                           │
//! │  • :config / :genres / :casts open views                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ navigate-search
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       HistoryStack                          │
//! │  • Records navigations (replays excluded)                  │
//! │  • Mirrors them onto the platform back/forward stack       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SearchSession                          │
//! │  • QueryCompiler: term → clauses + sort + window           │
//! │  • One fetch in flight, pages in offset order              │
//! │  • Stale pages dropped by generation                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ SearchClient
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Search backend (_search)                    │
//! │  • ElasticClient over HTTP, MemoryClient in-process        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use media_search::{CatalogBrowser, Event, SearchContext, SessionConfig, Topic};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SessionConfig {
//!         search_url: "http://127.0.0.1:9200/medias".into(),
//!         ..Default::default()
//!     };
//!
//!     let context = SearchContext::from_config(config).expect("valid config");
//!     let mut browser = CatalogBrowser::new(context);
//!
//!     browser.bus().register(Topic::MediaFound, |event| {
//!         if let Event::MediaFound(found) = event {
//!             println!("{:?}", found.media.title());
//!         }
//!         Ok(())
//!     });
//!
//!     browser.start().expect("inside a runtime");
//!     browser.input().on_input(":latest").expect("inside a runtime");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`search`]: query compiler and Elasticsearch translator
//! - [`client`]: search transports and the catalog management client
//! - [`session`]: paginated fetching for the current term
//! - [`history`]: navigation log and platform stack
//! - [`events`]: typed events and the bus
//! - [`input`]: keystroke debouncing
//! - [`browser`]: wires everything together
//! - [`resilience`]: transport retry

pub mod browser;
pub mod client;
pub mod config;
pub mod events;
pub mod history;
pub mod input;
pub mod media;
pub mod metrics;
pub mod resilience;
pub mod search;
pub mod session;

pub use browser::{BrowserError, BrowserState, CatalogBrowser, SearchContext};
pub use client::{CatalogClient, ElasticClient, MemoryClient, ResultPage, SearchClient, TransportError};
pub use config::SessionConfig;
pub use events::{Event, EventBus, FireReport, HandlerError, HandlerResult, MediaFound, NavigateSearch, Topic, ViewRequest};
pub use history::{HistoryEntry, HistoryError, HistoryStack, InMemoryNavigation, NavigationPlatform, NavigationState};
pub use input::{InputError, SearchInput};
pub use media::MediaDocument;
pub use metrics::LatencyTimer;
pub use resilience::retry::RetryConfig;
pub use search::{QueryCompiler, QueryRequest};
pub use session::{FetchOutcome, FetchTicket, MediaFacets, SearchSession, SessionError, SessionState};
