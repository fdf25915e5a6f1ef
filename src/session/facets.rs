// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use parking_lot::Mutex;
use std::collections::BTreeSet;

use crate::media::MediaDocument;

/// Distinct genres and cast members seen in published results.
///
/// Accumulates across terms; the genre and cast browsers are built from it.
#[derive(Debug, Default)]
pub struct MediaFacets {
    genres: Mutex<BTreeSet<String>>,
    casts: Mutex<BTreeSet<String>>,
}

impl MediaFacets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, document: &MediaDocument) {
        let genres = document.genres();
        if !genres.is_empty() {
            let mut set = self.genres.lock();
            set.extend(genres.into_iter().map(str::to_string));
        }
        let casts = document.casts();
        if !casts.is_empty() {
            let mut set = self.casts.lock();
            set.extend(casts.into_iter().map(str::to_string));
        }
    }

    /// Sorted, de-duplicated
    pub fn genres(&self) -> Vec<String> {
        self.genres.lock().iter().cloned().collect()
    }

    /// Sorted, de-duplicated
    pub fn casts(&self) -> Vec<String> {
        self.casts.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.genres.lock().clear();
        self.casts.lock().clear();
    }
}
