// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the search session engine.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter.
//!
//! # Metric Naming Convention
//! - `media_search_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: search, count
//! - `outcome`: page, empty, failed, stale, skipped
//! - `topic`: event bus topic name

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record the outcome of one page fetch cycle
pub fn record_fetch(outcome: &str) {
    counter!(
        "media_search_fetches_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a fetch cycle latency (transport round-trip included)
pub fn record_fetch_latency(duration: Duration) {
    histogram!("media_search_fetch_seconds").record(duration.as_secs_f64());
}

/// Record number of documents in a delivered page
pub fn record_page_size(count: usize) {
    histogram!("media_search_page_documents").record(count as f64);
}

/// Record a page dropped because its term was superseded
pub fn record_stale_drop() {
    counter!("media_search_stale_pages_total").increment(1);
}

/// Record a new term entering the session
pub fn record_term_change() {
    counter!("media_search_terms_total").increment(1);
}

/// Record the empty-catalog fallback firing
pub fn record_empty_catalog() {
    counter!("media_search_empty_catalog_total").increment(1);
}

/// Record a transport request
pub fn record_transport_request(operation: &str, status: &str) {
    counter!(
        "media_search_transport_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record transport latency (all retry attempts)
pub fn record_transport_latency(operation: &str, duration: Duration) {
    histogram!(
        "media_search_transport_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record an event fired on the bus
pub fn record_event(topic: &str, handlers: usize) {
    counter!(
        "media_search_events_total",
        "topic" => topic.to_string()
    )
    .increment(1);
    histogram!(
        "media_search_event_handlers",
        "topic" => topic.to_string()
    )
    .record(handlers as f64);
}

/// Record a handler that failed or panicked
pub fn record_handler_failure(topic: &str) {
    counter!(
        "media_search_handler_failures_total",
        "topic" => topic.to_string()
    )
    .increment(1);
}

/// Set the navigation history depth
pub fn set_history_depth(depth: usize) {
    gauge!("media_search_history_entries").set(depth as f64);
}

/// Record a history replay (back/forward navigation)
pub fn record_history_replay(direction: &str) {
    counter!(
        "media_search_history_replays_total",
        "direction" => direction.to_string()
    )
    .increment(1);
}

/// Record a debounced input being published
pub fn record_input_published(route: &str) {
    counter!(
        "media_search_inputs_published_total",
        "route" => route.to_string()
    )
    .increment(1);
}

/// Timer that records fetch latency on drop
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_fetch_latency(self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests verify the API doesn't panic without an installed recorder.

    #[test]
    fn test_fetch_metrics() {
        record_fetch("page");
        record_fetch("empty");
        record_fetch("stale");
        record_page_size(100);
        record_stale_drop();
        record_term_change();
        record_empty_catalog();
    }

    #[test]
    fn test_transport_metrics() {
        record_transport_request("search", "success");
        record_transport_request("count", "error");
        record_transport_latency("search", Duration::from_millis(12));
    }

    #[test]
    fn test_bus_and_history_metrics() {
        record_event("navigate-search", 2);
        record_handler_failure("media-found");
        set_history_depth(3);
        record_history_replay("back");
        record_input_published("navigate-search");
    }

    #[test]
    fn test_latency_timer() {
        {
            let _timer = LatencyTimer::new();
            std::thread::sleep(Duration::from_micros(10));
        }
        // Timer recorded on drop
    }
}
