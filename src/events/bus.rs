// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Synchronous publish/subscribe bus.
//!
//! Handlers run on the firing thread, in registration order. `fire` works on
//! a snapshot of the topic's handler list, so a handler may register new
//! handlers (or fire further events) without deadlocking; new registrations
//! only see later fires.

use dashmap::DashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{trace, warn};

use super::{Event, Topic};
use crate::metrics;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Handler rejected event: {0}")]
    Rejected(String),
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

pub type HandlerResult = Result<(), HandlerError>;

pub type Handler = Arc<dyn Fn(&Event) -> HandlerResult + Send + Sync>;

/// What happened during one [`EventBus::fire`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FireReport {
    /// Handlers that returned `Ok`
    pub delivered: usize,
    /// Handlers that returned an error or panicked
    pub failed: Vec<HandlerError>,
}

impl FireReport {
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Default)]
pub struct EventBus {
    handlers: DashMap<Topic, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for `topic`. Handlers are never removed.
    pub fn register<F>(&self, topic: Topic, handler: F)
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.entry(topic).or_default().push(Arc::new(handler));
        trace!(topic = %topic, "Registered event handler");
    }

    pub fn handler_count(&self, topic: Topic) -> usize {
        self.handlers.get(&topic).map(|h| h.len()).unwrap_or(0)
    }

    /// Deliver `event` to every handler registered for its topic.
    pub fn fire(&self, event: Event) -> FireReport {
        let topic = event.topic();
        // Clone the list and release the shard lock before invoking anything
        let snapshot: Vec<Handler> = match self.handlers.get(&topic) {
            Some(handlers) => handlers.value().clone(),
            None => Vec::new(),
        };

        metrics::record_event(topic.as_str(), snapshot.len());
        trace!(topic = %topic, handlers = snapshot.len(), "Firing event");

        let mut report = FireReport::default();
        for handler in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(&event)))
                .unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload.as_ref()))));

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Event handler failed");
                    metrics::record_handler_failure(topic.as_str());
                    report.failed.push(e);
                }
            }
        }
        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ViewRequest;
    use parking_lot::Mutex;

    fn recorder(bus: &EventBus, topic: Topic, log: &Arc<Mutex<Vec<String>>>, name: &'static str) {
        let log = Arc::clone(log);
        bus.register(topic, move |_| {
            log.lock().push(name.to_string());
            Ok(())
        });
    }

    #[test]
    fn test_fire_without_handlers() {
        let bus = EventBus::new();
        let report = bus.fire(Event::SentinelVisible);
        assert_eq!(report, FireReport::default());
        assert_eq!(report.invoked(), 0);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&bus, Topic::SentinelVisible, &log, "first");
        recorder(&bus, Topic::SentinelVisible, &log, "second");
        recorder(&bus, Topic::SentinelVisible, &log, "third");

        let report = bus.fire(Event::SentinelVisible);
        assert_eq!(report.delivered, 3);
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_topics_are_isolated() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&bus, Topic::DisplayGenre, &log, "genre");
        recorder(&bus, Topic::DisplayCast, &log, "cast");

        bus.fire(Event::DisplayCast(ViewRequest::default()));
        assert_eq!(*log.lock(), vec!["cast"]);
        assert_eq!(bus.handler_count(Topic::DisplayGenre), 1);
        assert_eq!(bus.handler_count(Topic::MediaFound), 0);
    }

    #[test]
    fn test_handler_registered_during_fire_sees_next_fire_only() {
        let bus = Arc::new(EventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_bus = Arc::downgrade(&bus);
        let inner_log = Arc::clone(&log);
        bus.register(Topic::SentinelVisible, move |_| {
            inner_log.lock().push("outer".to_string());
            if let Some(bus) = inner_bus.upgrade() {
                let late_log = Arc::clone(&inner_log);
                bus.register(Topic::SentinelVisible, move |_| {
                    late_log.lock().push("late".to_string());
                    Ok(())
                });
            }
            Ok(())
        });

        assert_eq!(bus.fire(Event::SentinelVisible).invoked(), 1);
        assert_eq!(*log.lock(), vec!["outer"]);

        bus.fire(Event::SentinelVisible);
        assert_eq!(*log.lock(), vec!["outer", "outer", "late"]);
    }

    #[test]
    fn test_failures_do_not_stop_other_handlers() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        recorder(&bus, Topic::MediaSearch, &log, "before");
        bus.register(Topic::MediaSearch, |_| Err(HandlerError::Rejected("nope".into())));
        bus.register(Topic::MediaSearch, |_| panic!("handler blew up"));
        recorder(&bus, Topic::MediaSearch, &log, "after");

        let report = bus.fire(Event::MediaSearch("x".into()));
        assert_eq!(report.delivered, 2);
        assert_eq!(
            report.failed,
            vec![
                HandlerError::Rejected("nope".into()),
                HandlerError::Panicked("handler blew up".into()),
            ]
        );
        assert!(!report.is_clean());
        assert_eq!(*log.lock(), vec!["before", "after"]);
    }

    #[test]
    fn test_handler_can_fire_nested_event() {
        let bus = Arc::new(EventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&bus, Topic::MediaSearch, &log, "media-search");

        let weak = Arc::downgrade(&bus);
        bus.register(Topic::NavigateSearch, move |event| {
            if let (Some(bus), Event::NavigateSearch(nav)) = (weak.upgrade(), event) {
                bus.fire(Event::MediaSearch(nav.term.clone()));
            }
            Ok(())
        });

        bus.fire(Event::navigate("heat"));
        assert_eq!(*log.lock(), vec!["media-search"]);
    }
}
