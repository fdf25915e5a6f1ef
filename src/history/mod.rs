// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Navigation history.
//!
//! Every navigation event seen on the bus is recorded once, flagged as a
//! replay, and mirrored onto the platform stack. Moving back or forward
//! re-fires the recorded event; since it carries the replay flag, recording
//! skips it and the log does not grow.

mod navigation;

pub use navigation::{InMemoryNavigation, NavigationPlatform, NavigationState};

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::events::{Event, EventBus, FireReport, HandlerError, Topic};
use crate::metrics;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Navigation state is not a recorded event: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Event on topic {0} is not a navigation")]
    NotNavigation(Topic),
    #[error("History is already attached to its event bus")]
    AlreadyAttached,
}

/// One recorded navigation. `event` always carries the replay flag.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub topic: Topic,
    pub event: Event,
}

pub struct HistoryStack {
    bus: Arc<EventBus>,
    platform: Arc<dyn NavigationPlatform>,
    entries: Mutex<Vec<HistoryEntry>>,
    attached: AtomicBool,
}

impl HistoryStack {
    pub fn new(bus: Arc<EventBus>, platform: Arc<dyn NavigationPlatform>) -> Self {
        Self {
            bus,
            platform,
            entries: Mutex::new(Vec::new()),
            attached: AtomicBool::new(false),
        }
    }

    /// Record a navigation event.
    ///
    /// Returns `Ok(false)` when nothing was recorded: the event is a replay,
    /// not a navigation, or equal to the platform entry under the cursor.
    pub fn push(&self, event: &Event) -> Result<bool, HistoryError> {
        if !event.is_navigation() || event.is_replay() {
            return Ok(false);
        }

        let replay = event.clone().into_replay();
        let state = NavigationState(serde_json::to_value(&replay)?);

        let mut entries = self.entries.lock();
        // Compare with the cursor, not the log tail: after `back` they differ
        if self.platform.current().as_ref() == Some(&state) {
            debug!(topic = %replay.topic(), "Skipping repeated navigation");
            return Ok(false);
        }
        entries.push(HistoryEntry {
            topic: replay.topic(),
            event: replay,
        });
        self.platform.push_state(state);
        metrics::set_history_depth(entries.len());
        Ok(true)
    }

    /// Decode a platform state and fire it as a replay.
    pub fn replay(&self, state: &NavigationState) -> Result<FireReport, HistoryError> {
        let event: Event = serde_json::from_value(state.value().clone())?;
        if !event.is_navigation() {
            return Err(HistoryError::NotNavigation(event.topic()));
        }
        let event = event.into_replay();
        debug!(topic = %event.topic(), "Replaying navigation");
        Ok(self.bus.fire(event))
    }

    /// Step back and replay the entry landed on.
    ///
    /// `Ok(None)` when there is nowhere to go or the landing entry was reached.
    pub fn back(&self) -> Result<Option<FireReport>, HistoryError> {
        if !self.platform.back() {
            return Ok(None);
        }
        metrics::record_history_replay("back");
        self.replay_current()
    }

    /// Step forward and replay the entry landed on.
    pub fn forward(&self) -> Result<Option<FireReport>, HistoryError> {
        if !self.platform.forward() {
            return Ok(None);
        }
        metrics::record_history_replay("forward");
        self.replay_current()
    }

    fn replay_current(&self) -> Result<Option<FireReport>, HistoryError> {
        match self.platform.current() {
            Some(state) => self.replay(&state).map(Some),
            None => Ok(None),
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Record every navigation topic fired on the bus.
    pub fn attach(self: &Arc<Self>) -> Result<(), HistoryError> {
        if self.attached.swap(true, Ordering::SeqCst) {
            return Err(HistoryError::AlreadyAttached);
        }
        for topic in Topic::NAVIGATION {
            let weak = Arc::downgrade(self);
            self.bus.register(topic, move |event| {
                let Some(history) = weak.upgrade() else {
                    return Ok(());
                };
                history.push(event).map(|_| ()).map_err(|e| {
                    warn!(topic = %event.topic(), error = %e, "Failed to record navigation");
                    HandlerError::Rejected(e.to_string())
                })
            });
        }
        Ok(())
    }
}
