// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic media-search session example.
//!
//! Demonstrates:
//! 1. Building a browser over an in-memory catalog
//! 2. Typing a term (debounced) and scrolling through pages
//! 3. Clicking a cast member, then navigating back
//! 4. Displaying collected facets and metrics
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_session
//! ```

use media_search::{
    CatalogBrowser, Event, InMemoryNavigation, MediaDocument, MemoryClient, SearchContext,
    SessionConfig, Topic,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           media-search: Basic Session Example                 ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Catalog and browser
    // ─────────────────────────────────────────────────────────────────────────
    let client = Arc::new(MemoryClient::with_documents(catalog()));
    let config = SessionConfig {
        page_size: 4,
        debounce_ms: 200,
        ..Default::default()
    };
    let context = SearchContext::new(config, client.clone(), Arc::new(InMemoryNavigation::new()));
    let mut browser = CatalogBrowser::new(context);

    let cards = Arc::new(AtomicUsize::new(0));
    let counter = cards.clone();
    browser.bus().register(Topic::MediaFound, move |event| {
        if let Event::MediaFound(found) = event {
            counter.fetch_add(1, Ordering::SeqCst);
            println!(
                "   🎬 {:<28} {:?}",
                found.media.title().unwrap_or("(untitled)"),
                found.media.year()
            );
        }
        Ok(())
    });
    browser.bus().register(Topic::MediaSearch, |event| {
        if let Event::MediaSearch(term) = event {
            println!("\n🔎 Searching {:?}", term);
        }
        Ok(())
    });

    browser.start()?;
    println!("📦 Browser {} with {} documents", browser.state(), client.len());

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Type, then scroll
    // ─────────────────────────────────────────────────────────────────────────
    for partial in ["d", "dr", "dra", "drama >year"] {
        browser.input().on_input(partial)?;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    while !browser.session().state().exhausted {
        browser.sentinel_visible();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!("   ({} cards so far)", cards.load(Ordering::SeqCst));

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Click a cast member, then go back
    // ─────────────────────────────────────────────────────────────────────────
    browser.bus().fire(Event::navigate_cast("Tom Hanks"));
    tokio::time::sleep(Duration::from_millis(20)).await;

    browser.back()?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!("\n↩️  Back to {:?}", browser.session().term());

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Facets, history and metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🏷️  Genres: {}", browser.session().facets().genres().join(", "));
    println!("🎭 Casts:  {}", browser.session().facets().casts().join(", "));
    println!("\n📜 History:");
    for entry in browser.history().entries() {
        println!("   {} {:?}", entry.topic, entry.event);
    }

    browser.shutdown();

    println!("\n📊 Metrics:");
    dump_metrics(&snapshotter);
    Ok(())
}

fn catalog() -> Vec<MediaDocument> {
    vec![
        json!({ "title": "Big", "year": 1988, "genres": ["Comedy", "Drama"], "casts": ["Tom Hanks"], "file_path": "/movies/Big.mkv" }),
        json!({ "title": "Heat", "year": 1995, "genres": ["Crime", "Drama"], "casts": ["Al Pacino", "Robert De Niro"], "file_path": "/movies/Heat.mp4" }),
        json!({ "title": "Cast Away", "year": 2000, "genres": ["Drama"], "casts": ["Tom Hanks"], "file_path": "/movies/Cast Away.mkv" }),
        json!({ "title": "The Insider", "year": 1999, "genres": ["Drama"], "casts": ["Al Pacino"], "file_path": "/movies/The Insider.avi" }),
        json!({ "title": "Philadelphia", "year": 1993, "genres": ["Drama"], "casts": ["Tom Hanks"], "file_path": "/movies/Philadelphia.mkv" }),
        json!({ "title": "Ronin", "year": 1998, "genres": ["Action"], "casts": ["Robert De Niro"], "file_path": "/movies/Ronin.mkv" }),
        json!({ "title": "Apollo 13", "year": 1995, "genres": ["Drama", "History"], "casts": ["Tom Hanks"], "file_path": "/movies/Apollo 13.mkv" }),
    ]
    .into_iter()
    .map(MediaDocument::new)
    .collect()
}

/// Dump all captured metrics
fn dump_metrics(snapshotter: &Snapshotter) {
    let snapshot = snapshotter.snapshot();

    let mut counters: Vec<_> = vec![];
    let mut gauges: Vec<_> = vec![];
    let mut histograms: Vec<_> = vec![];

    for (composite_key, _, _, value) in snapshot.into_vec() {
        let (_, key) = composite_key.into_parts();
        let name = key.name();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };

        match value {
            DebugValue::Counter(v) => counters.push((name.to_string(), label_str, v)),
            DebugValue::Gauge(v) => gauges.push((name.to_string(), label_str, v.into_inner())),
            DebugValue::Histogram(samples) => {
                let count = samples.len();
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                histograms.push((name.to_string(), label_str, count, sum));
            }
        }
    }

    counters.sort_by(|a, b| a.0.cmp(&b.0));
    gauges.sort_by(|a, b| a.0.cmp(&b.0));
    histograms.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, labels, value) in &counters {
        println!("   counter   {}{} = {}", name, labels, value);
    }
    for (name, labels, value) in &gauges {
        println!("   gauge     {}{} = {:.2}", name, labels, value);
    }
    for (name, labels, count, sum) in &histograms {
        println!("   histogram {}{} count={} sum={:.4}", name, labels, count, sum);
    }
    if counters.is_empty() && gauges.is_empty() && histograms.is_empty() {
        println!("   (no metrics recorded)");
    }
}
