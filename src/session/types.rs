// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the search session.

use thiserror::Error;

use crate::search::QueryRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session must be attached from within a tokio runtime")]
    NoRuntime,
    #[error("Session is already attached to its event bus")]
    AlreadyAttached,
}

/// Pagination state for the current term.
///
/// Replaced wholesale by every new term; a fetch only ever mutates the state
/// of the generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Raw term as typed
    pub term: String,
    /// Bumped by every new term; identifies which term a response belongs to
    pub generation: u64,
    /// Offset of the next page to request
    pub offset: usize,
    pub page_size: usize,
    /// Documents published for this term so far
    pub total_fetched: usize,
    /// A request for this term is outstanding
    pub in_flight: bool,
    /// A short or empty page arrived; no further pages exist
    pub exhausted: bool,
    /// The term was restored from history rather than newly navigated to
    pub is_replay: bool,
}

impl SessionState {
    pub(crate) fn new(term: impl Into<String>, generation: u64, page_size: usize) -> Self {
        Self {
            term: term.into(),
            generation,
            offset: 0,
            page_size: page_size.max(1),
            total_fetched: 0,
            in_flight: false,
            exhausted: false,
            is_replay: false,
        }
    }

    /// True once a fetch may be started
    #[must_use]
    pub fn can_fetch(&self) -> bool {
        !self.in_flight && !self.exhausted
    }
}

/// Permission to run exactly one page request, handed out by
/// [`SearchSession::begin_fetch`](super::SearchSession::begin_fetch).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub term: String,
    pub request: QueryRequest,
    /// Events published for this page are marked as replays
    pub is_replay: bool,
}

impl FetchTicket {
    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.request.from == 0
    }
}

/// Result of one page fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing requested: a fetch was already in flight or the term is exhausted
    Skipped,
    /// A page for the current term was published
    Page {
        documents: usize,
        exhausted: bool,
    },
    /// The transport failed; treated as an empty, final page
    Failed,
    /// The term changed while the request was outstanding; results dropped
    Stale,
}

impl FetchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Page { documents: 0, .. } => "empty",
            Self::Page { .. } => "page",
            Self::Failed => "failed",
            Self::Stale => "stale",
        }
    }

    /// Documents published by this cycle
    #[must_use]
    pub fn published(&self) -> usize {
        match self {
            Self::Page { documents, .. } => *documents,
            _ => 0,
        }
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page { documents, exhausted } => {
                write!(f, "Page(documents={}, exhausted={})", documents, exhausted)
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}
