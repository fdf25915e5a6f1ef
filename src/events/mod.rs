// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Typed events and the bus that carries them.
//!
//! Every component talks to the others by firing an [`Event`] on the shared
//! [`EventBus`]. The event's [`Topic`] decides which handlers see it.
//!
//! # Wire form
//!
//! Events serialize adjacently tagged, which is also the form stored as
//! platform navigation state:
//!
//! ```text
//! {"event": "navigate-search", "data": {"term": "casts=\"Tom Hanks\"", "initiator": "media.cast", "is_replay": true}}
//! {"event": "display-config",  "data": {"is_replay": true}}
//! {"event": "sentinel-visible"}
//! ```

mod bus;

pub use bus::{EventBus, FireReport, Handler, HandlerError, HandlerResult};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media::MediaDocument;

/// Bus topic. One per [`Event`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    NavigateSearch,
    MediaSearch,
    MediaFound,
    SentinelVisible,
    DisplayConfig,
    DisplayGenre,
    DisplayCast,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::NavigateSearch,
        Topic::MediaSearch,
        Topic::MediaFound,
        Topic::SentinelVisible,
        Topic::DisplayConfig,
        Topic::DisplayGenre,
        Topic::DisplayCast,
    ];

    /// Topics recorded in navigation history
    pub const NAVIGATION: [Topic; 4] = [
        Topic::NavigateSearch,
        Topic::DisplayConfig,
        Topic::DisplayGenre,
        Topic::DisplayCast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::NavigateSearch => "navigate-search",
            Topic::MediaSearch => "media-search",
            Topic::MediaFound => "media-found",
            Topic::SentinelVisible => "sentinel-visible",
            Topic::DisplayConfig => "display-config",
            Topic::DisplayGenre => "display-genre",
            Topic::DisplayCast => "display-cast",
        }
    }

    pub fn is_navigation(&self) -> bool {
        Self::NAVIGATION.contains(self)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to search for a term, from the input box or a click on a genre/cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigateSearch {
    pub term: String,
    /// Component that issued the navigation (e.g. "search.input")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<String>,
    #[serde(default)]
    pub is_replay: bool,
}

impl NavigateSearch {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            initiator: None,
            is_replay: false,
        }
    }

    pub fn with_initiator(mut self, initiator: impl Into<String>) -> Self {
        self.initiator = Some(initiator.into());
        self
    }
}

/// One document of the result stream for `term`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFound {
    pub term: String,
    pub media: MediaDocument,
}

/// Request to switch to a non-search view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    pub is_replay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum Event {
    NavigateSearch(NavigateSearch),
    /// A new term entered the session; carries the raw term
    MediaSearch(String),
    MediaFound(MediaFound),
    /// The end of the result list scrolled into view
    SentinelVisible,
    DisplayConfig(ViewRequest),
    DisplayGenre(ViewRequest),
    DisplayCast(ViewRequest),
}

impl Event {
    /// Navigation to `term` with no initiator.
    pub fn navigate(term: impl Into<String>) -> Self {
        Event::NavigateSearch(NavigateSearch::new(term))
    }

    /// Navigation issued by a click on a cast member, searching that cast.
    pub fn navigate_cast(name: &str) -> Self {
        Event::NavigateSearch(
            NavigateSearch::new(format!("casts=\"{}\"", quote_safe(name)))
                .with_initiator("media.cast"),
        )
    }

    /// Navigation issued by a click on a genre, searching that genre.
    pub fn navigate_genre(name: &str) -> Self {
        Event::NavigateSearch(
            NavigateSearch::new(format!("genres=\"{}\"", quote_safe(name)))
                .with_initiator("media.genre"),
        )
    }

    pub fn topic(&self) -> Topic {
        match self {
            Event::NavigateSearch(_) => Topic::NavigateSearch,
            Event::MediaSearch(_) => Topic::MediaSearch,
            Event::MediaFound(_) => Topic::MediaFound,
            Event::SentinelVisible => Topic::SentinelVisible,
            Event::DisplayConfig(_) => Topic::DisplayConfig,
            Event::DisplayGenre(_) => Topic::DisplayGenre,
            Event::DisplayCast(_) => Topic::DisplayCast,
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.topic().is_navigation()
    }

    /// True for events re-fired from navigation history. Non-navigation
    /// events are never replays.
    pub fn is_replay(&self) -> bool {
        match self {
            Event::NavigateSearch(nav) => nav.is_replay,
            Event::DisplayConfig(view) | Event::DisplayGenre(view) | Event::DisplayCast(view) => {
                view.is_replay
            }
            _ => false,
        }
    }

    /// The same event with its replay flag set.
    #[must_use]
    pub fn into_replay(self) -> Self {
        match self {
            Event::NavigateSearch(nav) => Event::NavigateSearch(NavigateSearch { is_replay: true, ..nav }),
            Event::DisplayConfig(_) => Event::DisplayConfig(ViewRequest { is_replay: true }),
            Event::DisplayGenre(_) => Event::DisplayGenre(ViewRequest { is_replay: true }),
            Event::DisplayCast(_) => Event::DisplayCast(ViewRequest { is_replay: true }),
            other => other,
        }
    }
}

/// Double quotes would close the directive value early.
fn quote_safe(name: &str) -> String {
    name.replace('"', "'")
}
