// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Query Infrastructure
//!
//! Turns the single free-text search box into backend requests.
//!
//! # Architecture
//!
//! ```text
//! raw term ──→ QueryCompiler ──→ QueryRequest (AST)
//!                                    │
//!                                    └─→ ElasticTranslator → _search JSON body
//! ```
//!
//! # Query Language
//!
//! ```text
//! drama                       - free text (title, path, genres, casts, summary)
//! "the long goodbye"          - phrase anywhere
//! casts="Tom Hanks"           - phrase in one field
//! type="audio"                - file type
//! ext="mkv"                   - file extension
//! >year  <size  >added        - sort desc / asc
//! :latest                     - newest first
//! ```
//!
//! ```rust
//! use media_search::search::{ElasticTranslator, QueryCompiler};
//!
//! let request = QueryCompiler::new().compile_page(r#":latest genres="Drama""#, 0, 100);
//! let body = ElasticTranslator::translate(&request);
//! assert_eq!(body["sort"][0]["modification_time"]["order"], "desc");
//! ```

mod compiler;
mod elastic_translator;
mod query;

pub use compiler::{is_browse_all, QueryCompiler, FREE_TEXT_FIELDS, PATH_FIELDS, RECENCY_FIELD};
pub use elastic_translator::ElasticTranslator;
pub use query::{
    Clause, QueryRequest, SortDirective, SortOrder, WeightedField, FIELD_BOOST, PHRASE_BOOST,
};
