// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query AST - the compiled form of a search term.
//!
//! A [`QueryRequest`] is what the [`QueryCompiler`](super::QueryCompiler)
//! produces and what a [`SearchClient`](crate::client::SearchClient) consumes.
//! Clauses combine with OR semantics: any clause may match, and per-clause
//! boosts decide the ranking.
//!
//! # Example
//!
//! ```rust
//! use media_search::search::{Clause, QueryRequest, SortDirective, SortOrder};
//!
//! let request = QueryRequest::match_all()
//!     .clause(Clause::field_phrase("casts", "Tom Hanks"))
//!     .sort_by(SortDirective::field("year", SortOrder::Desc))
//!     .window(0, 50);
//!
//! assert_eq!(request.clauses.len(), 1);
//! assert_eq!(request.size, 50);
//! ```

use serde::{Deserialize, Serialize};

/// Boost for `field="value"` filters.
pub const FIELD_BOOST: f64 = 2.0;
/// Boost for `"quoted phrase"` clauses.
pub const PHRASE_BOOST: f64 = 1.5;

/// Compiled search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Top-level clauses (OR semantics). Empty matches everything.
    pub clauses: Vec<Clause>,
    /// Sort directives, in priority order
    pub sort: Vec<SortDirective>,
    /// Zero-based offset of the first document
    pub from: usize,
    /// Page length
    pub size: usize,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self::match_all()
    }
}

impl QueryRequest {
    /// Match every document, no explicit sort, empty window.
    pub fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
            sort: Vec::new(),
            from: 0,
            size: 0,
        }
    }

    /// Append a clause
    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Append a sort directive
    pub fn sort_by(mut self, sort: SortDirective) -> Self {
        self.sort.push(sort);
        self
    }

    /// Set the pagination window
    pub fn window(mut self, from: usize, size: usize) -> Self {
        self.from = from;
        self.size = size;
        self
    }

    /// True when no clause restricts the result set
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Push a sort directive unless an equal one is already present.
    pub(crate) fn push_sort_once(&mut self, sort: SortDirective) {
        if !self.sort.contains(&sort) {
            self.sort.push(sort);
        }
    }
}

/// One typed predicate contributed to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    /// Phrase match scoped to one field: `casts="Tom Hanks"`
    FieldPhrase {
        field: String,
        value: String,
        boost: f64,
    },
    /// Filename glob over path fields: `ext="mkv"` → `*.mkv`
    PathGlob {
        pattern: String,
        fields: Vec<String>,
        boost: f64,
    },
    /// Phrase match across all fields: `"night of the"`
    Phrase { text: String, boost: f64 },
    /// Weighted multi-field free text
    FreeText {
        text: String,
        fields: Vec<WeightedField>,
    },
}

impl Clause {
    /// Field phrase with the default field boost
    pub fn field_phrase(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldPhrase {
            field: field.into(),
            value: value.into(),
            boost: FIELD_BOOST,
        }
    }

    /// Glob `*.extension` over the given path fields
    pub fn extension(extension: &str, fields: &[&str]) -> Self {
        Self::PathGlob {
            pattern: format!("*.{}", extension.trim_start_matches('.')),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            boost: FIELD_BOOST,
        }
    }

    /// Unscoped phrase with the default phrase boost
    pub fn phrase(text: impl Into<String>) -> Self {
        Self::Phrase {
            text: text.into(),
            boost: PHRASE_BOOST,
        }
    }

    /// Free text over weighted fields
    pub fn free_text(text: impl Into<String>, fields: &[(&str, f64)]) -> Self {
        Self::FreeText {
            text: text.into(),
            fields: fields
                .iter()
                .map(|(name, weight)| WeightedField::new(*name, *weight))
                .collect(),
        }
    }
}

/// Field name with a relevance weight (`title^1.8`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedField {
    pub name: String,
    pub weight: f64,
}

impl WeightedField {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum SortDirective {
    /// Sort on a document attribute
    Field { field: String, order: SortOrder },
    /// Backend relevance score, best first
    Relevance,
    /// Randomized order (fallback when nothing else applies)
    Random,
}

impl SortDirective {
    pub fn field(field: impl Into<String>, order: SortOrder) -> Self {
        Self::Field {
            field: field.into(),
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_has_no_clauses() {
        let request = QueryRequest::match_all();
        assert!(request.is_match_all());
        assert!(request.sort.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let request = QueryRequest::match_all()
            .clause(Clause::field_phrase("genres", "Drama"))
            .clause(Clause::phrase("the road"))
            .sort_by(SortDirective::Relevance)
            .window(200, 100);

        assert_eq!(request.clauses.len(), 2);
        assert_eq!(request.sort, vec![SortDirective::Relevance]);
        assert_eq!((request.from, request.size), (200, 100));
    }

    #[test]
    fn test_extension_clause_strips_leading_dot() {
        let clause = Clause::extension(".mkv", &["file_path"]);
        match clause {
            Clause::PathGlob { pattern, fields, .. } => {
                assert_eq!(pattern, "*.mkv");
                assert_eq!(fields, vec!["file_path".to_string()]);
            }
            _ => panic!("Expected PathGlob clause"),
        }
    }

    #[test]
    fn test_push_sort_once() {
        let mut request = QueryRequest::match_all();
        request.push_sort_once(SortDirective::Relevance);
        request.push_sort_once(SortDirective::Relevance);
        assert_eq!(request.sort.len(), 1);
    }

    #[test]
    fn test_clause_boost_ordering() {
        // Scoped filters outrank unscoped phrases
        assert!(FIELD_BOOST > PHRASE_BOOST);
    }

    #[test]
    fn test_request_serde_shape() {
        let request = QueryRequest::match_all()
            .sort_by(SortDirective::field("file_size", SortOrder::Asc));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sort"][0]["by"], "field");
        assert_eq!(json["sort"][0]["order"], "asc");
    }
}
