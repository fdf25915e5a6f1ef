// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search box input: debounces keystrokes into navigation events.
//!
//! Each keystroke restarts the quiet-period timer; only the value present
//! when the timer expires is published. A few reserved words open views
//! instead of searching:
//!
//! ```text
//! :config   → display-config
//! :genres   → display-genre
//! :casts    → display-cast
//! other     → navigate-search { term, initiator: "search.input" }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::{Event, EventBus, NavigateSearch, ViewRequest};
use crate::metrics;

/// Initiator attached to navigations typed into the search box
pub const INPUT_INITIATOR: &str = "search.input";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input debouncing requires a tokio runtime")]
    NoRuntime,
}

/// The event a settled input value publishes.
pub fn route(value: &str) -> Event {
    match value.trim() {
        ":config" => Event::DisplayConfig(ViewRequest::default()),
        ":genres" => Event::DisplayGenre(ViewRequest::default()),
        ":casts" => Event::DisplayCast(ViewRequest::default()),
        term => Event::NavigateSearch(NavigateSearch::new(term).with_initiator(INPUT_INITIATOR)),
    }
}

struct Pending {
    id: u64,
    value: String,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    next_id: u64,
    pending: Option<Pending>,
}

impl Slot {
    /// Take the pending value if it is still the one identified by `id`
    fn take_if(&mut self, id: u64) -> Option<Pending> {
        match &self.pending {
            Some(p) if p.id == id => self.pending.take(),
            _ => None,
        }
    }
}

pub struct SearchInput {
    bus: Arc<EventBus>,
    debounce: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl SearchInput {
    pub fn new(bus: Arc<EventBus>, debounce: Duration) -> Self {
        Self {
            bus,
            debounce,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Record a keystroke. Replaces any value still waiting to be published.
    pub fn on_input(&self, value: impl Into<String>) -> Result<(), InputError> {
        let handle = Handle::try_current().map_err(|_| InputError::NoRuntime)?;
        let value = value.into();

        let mut slot = self.slot.lock();
        if let Some(previous) = slot.pending.take() {
            previous.timer.abort();
        }
        slot.next_id += 1;
        let id = slot.next_id;

        let bus = Arc::clone(&self.bus);
        let shared = Arc::clone(&self.slot);
        let debounce = self.debounce;
        let timer = handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            let settled = shared.lock().take_if(id);
            if let Some(pending) = settled {
                publish(&bus, &pending.value);
            }
        });

        slot.pending = Some(Pending { id, value, timer });
        Ok(())
    }

    /// Publish the waiting value now. Returns false when nothing was waiting.
    pub fn flush(&self) -> bool {
        let pending = self.slot.lock().pending.take();
        match pending {
            Some(pending) => {
                pending.timer.abort();
                publish(&self.bus, &pending.value);
                true
            }
            None => false,
        }
    }

    /// Drop the waiting value without publishing it.
    pub fn cancel(&self) {
        if let Some(pending) = self.slot.lock().pending.take() {
            debug!(value = %pending.value, "Discarding pending input");
            pending.timer.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl Drop for SearchInput {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn publish(bus: &EventBus, value: &str) {
    let event = route(value);
    debug!(topic = %event.topic(), value = %value, "Publishing settled input");
    metrics::record_input_published(event.topic().as_str());
    bus.fire(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;

    fn recording_bus() -> (Arc<EventBus>, Arc<Mutex<Vec<Event>>>) {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        for topic in Topic::ALL {
            let sink = seen.clone();
            bus.register(topic, move |event| {
                sink.lock().push(event.clone());
                Ok(())
            });
        }
        (bus, seen)
    }

    fn nav(term: &str) -> Event {
        Event::NavigateSearch(NavigateSearch::new(term).with_initiator(INPUT_INITIATOR))
    }

    #[test]
    fn test_route() {
        assert_eq!(route(" :config "), Event::DisplayConfig(ViewRequest::default()));
        assert_eq!(route(":genres"), Event::DisplayGenre(ViewRequest::default()));
        assert_eq!(route(":casts"), Event::DisplayCast(ViewRequest::default()));
        assert_eq!(route("  tom hanks "), nav("tom hanks"));
        assert_eq!(route(":latest"), nav(":latest"));
        assert_eq!(route(""), nav(""));
    }

    #[test]
    fn test_on_input_requires_runtime() {
        let (bus, _seen) = recording_bus();
        let input = SearchInput::new(bus, Duration::from_millis(350));
        assert_eq!(input.on_input("x"), Err(InputError::NoRuntime));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_settled_value_is_published() {
        let (bus, seen) = recording_bus();
        let input = SearchInput::new(bus, Duration::from_millis(350));

        input.on_input("h").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.on_input("he").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.on_input("heat").unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(seen.lock().is_empty());
        assert!(input.has_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock(), vec![nav("heat")]);
        assert!(!input.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_publishes_once() {
        let (bus, seen) = recording_bus();
        let input = SearchInput::new(bus, Duration::from_millis(350));

        input.on_input(":config").unwrap();
        assert!(input.flush());
        assert!(!input.flush());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*seen.lock(), vec![Event::DisplayConfig(ViewRequest::default())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_value() {
        let (bus, seen) = recording_bus();
        let input = SearchInput::new(bus, Duration::from_millis(350));

        input.on_input("big").unwrap();
        input.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(seen.lock().is_empty());
        assert!(!input.has_pending());
    }
}
