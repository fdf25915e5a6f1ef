// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search session: one term, paged through on demand.
//!
//! # Fetch cycle
//!
//! ```text
//! navigate-search ──► start_term ──► media-search ──► begin_fetch ─┐
//!                                                                  │ ticket
//! sentinel-visible ─────────────────────────────────► begin_fetch ─┤
//!                                                                  ▼
//!                                  complete_fetch: client.search(from=offset, size=page_size)
//!                                                                  │
//!                           generation still current? ── no ──► drop (stale)
//!                                                                  │ yes
//!                         media-found × len, offset += page_size, exhausted = len < page_size
//! ```
//!
//! `begin_fetch` is synchronous: the in-flight check and set happen under one
//! lock, so any number of sentinel signals fired back to back yield a single
//! request. The lock is never held across the transport call or a bus fire.

mod facets;
mod types;

pub use facets::MediaFacets;
pub use types::{FetchOutcome, FetchTicket, SessionError, SessionState};

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::client::{ResultPage, SearchClient};
use crate::config::SessionConfig;
use crate::events::{Event, EventBus, MediaFound, Topic, ViewRequest};
use crate::metrics::{self, LatencyTimer};
use crate::search::{is_browse_all, QueryCompiler};

pub struct SearchSession {
    config: SessionConfig,
    client: Arc<dyn SearchClient>,
    bus: Arc<EventBus>,
    compiler: QueryCompiler,
    state: Mutex<SessionState>,
    facets: MediaFacets,
    attached: AtomicBool,
}

impl SearchSession {
    pub fn new(config: SessionConfig, client: Arc<dyn SearchClient>, bus: Arc<EventBus>) -> Self {
        let page_size = config.effective_page_size();
        Self {
            config,
            client,
            bus,
            compiler: QueryCompiler::new(),
            state: Mutex::new(SessionState::new("", 0, page_size)),
            facets: MediaFacets::new(),
            attached: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snapshot of the current pagination state
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn term(&self) -> String {
        self.state.lock().term.clone()
    }

    pub fn facets(&self) -> &MediaFacets {
        &self.facets
    }

    /// Switch to `term` and fetch its first page.
    pub async fn set_term(&self, term: &str) -> FetchOutcome {
        match self.start_term(term) {
            Some(ticket) => self.complete_fetch(ticket).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Synchronous half of [`set_term`](Self::set_term): resets the state to a
    /// new generation, publishes `media-search` and claims the first fetch.
    pub fn start_term(&self, term: &str) -> Option<FetchTicket> {
        self.start_navigation(term, false)
    }

    /// [`start_term`](Self::start_term) for a term arriving by navigation.
    ///
    /// A replayed navigation marks the view requests it triggers as replays,
    /// so history does not record them a second time.
    pub fn start_navigation(&self, term: &str, is_replay: bool) -> Option<FetchTicket> {
        let generation = {
            let mut state = self.state.lock();
            let generation = state.generation + 1;
            *state = SessionState {
                is_replay,
                ..SessionState::new(term, generation, self.config.effective_page_size())
            };
            generation
        };
        info!(term = %term, generation, is_replay, "Search term changed");
        metrics::record_term_change();

        self.bus.fire(Event::MediaSearch(term.to_string()));
        self.begin_fetch()
    }

    /// Fetch the page after the last one published, unless a fetch is already
    /// outstanding or the term is exhausted.
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        match self.begin_fetch() {
            Some(ticket) => self.complete_fetch(ticket).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Claim the in-flight slot and compile the request for the next page.
    ///
    /// Returns `None` when a fetch is already outstanding or no page remains.
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        let mut state = self.state.lock();
        if !state.can_fetch() {
            debug!(
                term = %state.term,
                in_flight = state.in_flight,
                exhausted = state.exhausted,
                "Fetch skipped"
            );
            metrics::record_fetch(FetchOutcome::Skipped.as_str());
            return None;
        }
        state.in_flight = true;

        let request = self.compiler.compile_page(&state.term, state.offset, state.page_size);
        Some(FetchTicket {
            generation: state.generation,
            term: state.term.clone(),
            request,
            is_replay: state.is_replay,
        })
    }

    /// Run the request a ticket was issued for and publish its page.
    pub async fn complete_fetch(&self, ticket: FetchTicket) -> FetchOutcome {
        let _timer = LatencyTimer::new();
        debug!(
            term = %ticket.term,
            from = ticket.request.from,
            size = ticket.request.size,
            "Fetching page"
        );

        let (page, failed) = match self.client.search(&ticket.request).await {
            Ok(page) => (page, false),
            Err(e) => {
                debug!(term = %ticket.term, error = %e, "Search request failed, treating as empty page");
                (ResultPage::empty(), true)
            }
        };

        let outcome = self.publish(&ticket, page, failed);
        metrics::record_fetch(outcome.as_str());
        outcome
    }

    fn publish(&self, ticket: &FetchTicket, page: ResultPage, failed: bool) -> FetchOutcome {
        let len = page.len();
        let (exhausted, show_config) = {
            let mut state = self.state.lock();
            if state.generation != ticket.generation {
                debug!(
                    term = %ticket.term,
                    current = %state.term,
                    documents = len,
                    "Dropping results for superseded term"
                );
                metrics::record_stale_drop();
                return FetchOutcome::Stale;
            }
            if len > 0 {
                state.offset += state.page_size;
                state.total_fetched += len;
            }
            state.exhausted = page.is_last(state.page_size);
            // in_flight stays set until every document is out, so a sentinel
            // fired by a media-found handler cannot interleave the next page
            let show_config =
                ticket.is_first_page() && state.total_fetched == 0 && is_browse_all(&state.term);
            (state.exhausted, show_config)
        };

        metrics::record_page_size(len);
        let mut published = 0;
        for media in page {
            if !self.is_current(ticket.generation) {
                debug!(term = %ticket.term, published, "Term changed while publishing");
                break;
            }
            self.facets.observe(&media);
            self.bus.fire(Event::MediaFound(MediaFound {
                term: ticket.term.clone(),
                media,
            }));
            published += 1;
        }

        {
            let mut state = self.state.lock();
            if state.generation == ticket.generation {
                state.in_flight = false;
            }
        }

        if show_config {
            info!(term = %ticket.term, "Catalog is empty, requesting configuration view");
            metrics::record_empty_catalog();
            self.bus.fire(Event::DisplayConfig(ViewRequest {
                is_replay: ticket.is_replay,
            }));
        }

        if failed {
            FetchOutcome::Failed
        } else {
            FetchOutcome::Page { documents: published, exhausted }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Subscribe to `navigate-search` (new term) and `sentinel-visible`
    /// (next page) on the session's bus.
    ///
    /// Fetches started by those events are spawned on the runtime that is
    /// current at the time of this call. Handlers hold a weak reference, so
    /// dropping the last `Arc` to the session silences them.
    pub fn attach(self: &Arc<Self>) -> Result<(), SessionError> {
        let handle = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        if self.attached.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyAttached);
        }

        let weak = Arc::downgrade(self);
        let runtime = handle.clone();
        self.bus.register(Topic::NavigateSearch, move |event| {
            let (Event::NavigateSearch(nav), Some(session)) = (event, weak.upgrade()) else {
                return Ok(());
            };
            if let Some(ticket) = session.start_navigation(&nav.term, nav.is_replay) {
                runtime.spawn(async move {
                    session.complete_fetch(ticket).await;
                });
            }
            Ok(())
        });

        let weak = Arc::downgrade(self);
        self.bus.register(Topic::SentinelVisible, move |_| {
            let Some(session) = weak.upgrade() else {
                return Ok(());
            };
            if let Some(ticket) = session.begin_fetch() {
                handle.spawn(async move {
                    session.complete_fetch(ticket).await;
                });
            }
            Ok(())
        });

        debug!("Search session attached to event bus");
        Ok(())
    }
}
