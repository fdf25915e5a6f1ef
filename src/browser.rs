// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Catalog browser: wires input, history and session onto one bus.
//!
//! # Example
//!
//! ```rust,no_run
//! use media_search::{CatalogBrowser, SearchContext, SessionConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = SearchContext::from_config(SessionConfig::default())?;
//! let mut browser = CatalogBrowser::new(context);
//! browser.start()?;
//!
//! browser.navigate(r#"casts="Tom Hanks" >year"#);
//! browser.sentinel_visible();
//! browser.back()?;
//!
//! browser.shutdown();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

use crate::client::{ElasticClient, SearchClient, TransportError};
use crate::config::SessionConfig;
use crate::events::{Event, EventBus, FireReport};
use crate::history::{HistoryError, HistoryStack, InMemoryNavigation, NavigationPlatform};
use crate::input::SearchInput;
use crate::session::{SearchSession, SessionError};

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("Browser cannot start from state {0}")]
    InvalidState(BrowserState),
}

/// Everything the browser needs from its host.
pub struct SearchContext {
    pub config: SessionConfig,
    pub bus: Arc<EventBus>,
    pub client: Arc<dyn SearchClient>,
    pub navigation: Arc<dyn NavigationPlatform>,
}

impl SearchContext {
    pub fn new(
        config: SessionConfig,
        client: Arc<dyn SearchClient>,
        navigation: Arc<dyn NavigationPlatform>,
    ) -> Self {
        Self {
            config,
            bus: Arc::new(EventBus::new()),
            client,
            navigation,
        }
    }

    /// HTTP client against `config.search_url` with in-memory navigation.
    pub fn from_config(config: SessionConfig) -> Result<Self, TransportError> {
        let client = Arc::new(ElasticClient::new(&config)?);
        Ok(Self::new(config, client, Arc::new(InMemoryNavigation::new())))
    }
}

/// Browser lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    /// Built, nothing subscribed yet
    Created,
    /// History and session are listening on the bus
    Running,
    /// Shut down; pending input dropped
    Stopped,
}

impl std::fmt::Display for BrowserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

pub struct CatalogBrowser {
    bus: Arc<EventBus>,
    session: Arc<SearchSession>,
    history: Arc<HistoryStack>,
    input: SearchInput,
    state: BrowserState,
}

impl CatalogBrowser {
    pub fn new(context: SearchContext) -> Self {
        let SearchContext { config, bus, client, navigation } = context;
        let input = SearchInput::new(Arc::clone(&bus), config.debounce());
        let history = Arc::new(HistoryStack::new(Arc::clone(&bus), navigation));
        let session = Arc::new(SearchSession::new(config, client, Arc::clone(&bus)));
        Self {
            bus,
            session,
            history,
            input,
            state: BrowserState::Created,
        }
    }

    /// Subscribe history, then session, to the bus. History goes first so a
    /// navigation is recorded before it is searched.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), BrowserError> {
        if self.state != BrowserState::Created {
            return Err(BrowserError::InvalidState(self.state));
        }
        // Fail before anything is subscribed
        Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        self.history.attach()?;
        self.session.attach()?;
        self.state = BrowserState::Running;
        info!("Catalog browser started");
        Ok(())
    }

    pub fn state(&self) -> BrowserState {
        self.state
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn session(&self) -> &Arc<SearchSession> {
        &self.session
    }

    pub fn history(&self) -> &Arc<HistoryStack> {
        &self.history
    }

    /// Search for `term` right away, as a click on a link would.
    pub fn navigate(&self, term: &str) -> FireReport {
        self.bus.fire(Event::navigate(term))
    }

    /// The end of the result list became visible.
    pub fn sentinel_visible(&self) -> FireReport {
        self.bus.fire(Event::SentinelVisible)
    }

    pub fn back(&self) -> Result<Option<FireReport>, HistoryError> {
        self.history.back()
    }

    pub fn forward(&self) -> Result<Option<FireReport>, HistoryError> {
        self.history.forward()
    }

    pub fn shutdown(&mut self) {
        if self.state == BrowserState::Stopped {
            return;
        }
        self.input.cancel();
        self.state = BrowserState::Stopped;
        info!("Catalog browser stopped");
    }
}
