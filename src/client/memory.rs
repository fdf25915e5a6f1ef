// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! In-memory search backend.
//!
//! Evaluates compiled requests against a document list held in memory, with
//! case-insensitive substring matching standing in for the backend analyzer.
//! `Random` sort keeps catalog order so results stay reproducible.
//! Every request is recorded for inspection.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::cmp::Ordering;

use super::traits::{ResultPage, SearchClient, TransportError};
use crate::media::MediaDocument;
use crate::search::{Clause, QueryRequest, SortDirective, SortOrder};

pub struct MemoryClient {
    documents: RwLock<Vec<MediaDocument>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl MemoryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    #[must_use]
    pub fn with_documents(documents: Vec<MediaDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, document: MediaDocument) {
        self.documents.write().push(document);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    pub fn clear(&self) {
        self.documents.write().clear();
    }

    /// Requests received so far, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    fn evaluate(&self, request: &QueryRequest) -> Vec<MediaDocument> {
        let documents = self.documents.read();
        let mut scored: Vec<(f64, &MediaDocument)> = documents
            .iter()
            .filter_map(|doc| {
                if request.clauses.is_empty() {
                    return Some((0.0, doc));
                }
                let score: f64 = request.clauses.iter().map(|c| clause_score(doc, c)).sum();
                (score > 0.0).then_some((score, doc))
            })
            .collect();

        scored.sort_by(|a, b| compare(a, b, &request.sort));

        scored
            .into_iter()
            .skip(request.from)
            .take(request.size)
            .map(|(_, doc)| doc.clone())
            .collect()
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for MemoryClient {
    async fn search(&self, request: &QueryRequest) -> Result<ResultPage, TransportError> {
        self.requests.lock().push(request.clone());
        Ok(ResultPage::new(self.evaluate(request)))
    }

    async fn count(&self) -> Result<u64, TransportError> {
        Ok(self.len() as u64)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// String renderings of a field: the value itself, or each element of a list.
fn field_texts(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Array(items)) => items.iter().flat_map(|v| field_texts(Some(v))).collect(),
        _ => Vec::new(),
    }
}

fn all_texts(doc: &MediaDocument) -> Vec<String> {
    match doc.source() {
        Value::Object(map) => map.values().flat_map(|v| field_texts(Some(v))).collect(),
        _ => Vec::new(),
    }
}

fn clause_score(doc: &MediaDocument, clause: &Clause) -> f64 {
    let source = doc.source();
    match clause {
        Clause::FieldPhrase { field, value, boost } => {
            let hit = field_texts(source.get(field)).iter().any(|t| contains_ci(t, value));
            if hit { *boost } else { 0.0 }
        }
        Clause::PathGlob { pattern, fields, boost } => {
            let suffix = pattern.trim_start_matches('*').to_lowercase();
            let hit = fields.iter().any(|f| {
                field_texts(source.get(f))
                    .iter()
                    .any(|t| t.to_lowercase().ends_with(&suffix))
            });
            if hit { *boost } else { 0.0 }
        }
        Clause::Phrase { text, boost } => {
            if all_texts(doc).iter().any(|t| contains_ci(t, text)) { *boost } else { 0.0 }
        }
        Clause::FreeText { text, fields } => fields
            .iter()
            .filter(|f| {
                let texts = field_texts(source.get(&f.name));
                text.split_whitespace()
                    .any(|token| texts.iter().any(|t| contains_ci(t, token)))
            })
            .map(|f| f.weight)
            .sum(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn compare(a: &(f64, &MediaDocument), b: &(f64, &MediaDocument), sort: &[SortDirective]) -> Ordering {
    for directive in sort {
        let ordering = match directive {
            SortDirective::Field { field, order } => {
                let (x, y) = (a.1.source().get(field), b.1.source().get(field));
                match (x.is_some(), y.is_some(), order) {
                    // Missing values sort last in either direction
                    (true, true, SortOrder::Desc) => compare_values(y, x),
                    _ => compare_values(x, y),
                }
            }
            SortDirective::Relevance => b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal),
            SortDirective::Random => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
