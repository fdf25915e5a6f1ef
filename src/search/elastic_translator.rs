// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Elasticsearch Translator
//!
//! Translates a [`QueryRequest`] into an Elasticsearch `_search` request body.
//!
//! # Query DSL Generated
//!
//! ```text
//! (no clauses)          → {"match_all": {}}
//! clauses               → {"bool": {"should": [...], "minimum_should_match": 1}}
//! FieldPhrase           → {"match_phrase": {field: {"query": v, "boost": b}}}
//! PathGlob              → {"query_string": {"query": "*.mkv", "fields": [...], "analyze_wildcard": true}}
//! Phrase                → {"multi_match": {"query": t, "type": "phrase", "lenient": true}}
//! FreeText              → {"multi_match": {"query": t, "fields": ["title^1.8", ...], "lenient": true}}
//! Field sort            → {field: {"order": "desc"}}
//! Relevance sort        → {"_score": {"order": "desc"}}
//! Random sort           → {"_script": {"script": "Math.random()", "type": "number", "order": "asc"}}
//! ```

use serde_json::{json, Map, Value};

use super::query::{Clause, QueryRequest, SortDirective, WeightedField};

/// Elasticsearch request body translator
pub struct ElasticTranslator;

impl ElasticTranslator {
    /// Translate a request into a complete `_search` body
    pub fn translate(request: &QueryRequest) -> Value {
        json!({
            "query": Self::translate_query(request),
            "sort": request.sort.iter().map(Self::translate_sort).collect::<Vec<_>>(),
            "from": request.from,
            "size": request.size,
        })
    }

    /// Translate only the `query` part (also used for `_count`)
    pub fn translate_query(request: &QueryRequest) -> Value {
        match request.clauses.as_slice() {
            [] => json!({ "match_all": {} }),
            clauses => json!({
                "bool": {
                    "should": clauses.iter().map(Self::translate_clause).collect::<Vec<_>>(),
                    "minimum_should_match": 1,
                }
            }),
        }
    }

    fn translate_clause(clause: &Clause) -> Value {
        match clause {
            Clause::FieldPhrase { field, value, boost } => {
                let mut inner = Map::new();
                inner.insert(field.clone(), json!({ "query": value, "boost": boost }));
                json!({ "match_phrase": inner })
            }
            Clause::PathGlob { pattern, fields, boost } => json!({
                "query_string": {
                    "query": Self::escape_glob(pattern),
                    "fields": fields,
                    "analyze_wildcard": true,
                    "boost": boost,
                }
            }),
            Clause::Phrase { text, boost } => json!({
                "multi_match": {
                    "query": text,
                    "type": "phrase",
                    "lenient": true,
                    "boost": boost,
                }
            }),
            Clause::FreeText { text, fields } => json!({
                "multi_match": {
                    "query": text,
                    "fields": fields.iter().map(Self::weighted_field).collect::<Vec<_>>(),
                    "lenient": true,
                }
            }),
        }
    }

    fn translate_sort(sort: &SortDirective) -> Value {
        match sort {
            SortDirective::Field { field, order } => {
                let mut inner = Map::new();
                inner.insert(field.clone(), json!({ "order": order.as_str() }));
                Value::Object(inner)
            }
            SortDirective::Relevance => json!({ "_score": { "order": "desc" } }),
            SortDirective::Random => json!({
                "_script": {
                    "script": "Math.random()",
                    "type": "number",
                    "order": "asc",
                }
            }),
        }
    }

    fn weighted_field(field: &WeightedField) -> String {
        format!("{}^{}", field.name, field.weight)
    }

    /// Escape query_string syntax in a glob, keeping `*` and `?` as wildcards.
    fn escape_glob(pattern: &str) -> String {
        let mut escaped = String::with_capacity(pattern.len());
        for c in pattern.chars() {
            match c {
                '+' | '-' | '=' | '&' | '|' | '>' | '<' | '!' | '(' | ')' | '{' | '}' | '[' | ']'
                | '^' | '"' | '~' | ':' | '\\' | '/' | ' ' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{QueryCompiler, SortOrder};

    #[test]
    fn test_empty_request_is_match_all_random() {
        let request = QueryCompiler::new().compile_page("", 0, 100);
        let body = ElasticTranslator::translate(&request);

        assert_eq!(body["query"], json!({ "match_all": {} }));
        assert_eq!(body["sort"][0]["_script"]["script"], "Math.random()");
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 100);
    }

    #[test]
    fn test_field_phrase() {
        let request = QueryRequest::match_all().clause(Clause::field_phrase("casts", "Tom Hanks"));
        let query = ElasticTranslator::translate_query(&request);

        assert_eq!(query["bool"]["minimum_should_match"], 1);
        assert_eq!(
            query["bool"]["should"][0],
            json!({ "match_phrase": { "casts": { "query": "Tom Hanks", "boost": 2.0 } } })
        );
    }

    #[test]
    fn test_free_text_weights() {
        let request = QueryCompiler::new().compile("drama");
        let query = ElasticTranslator::translate_query(&request);
        let fields = &query["bool"]["should"][0]["multi_match"]["fields"];

        assert_eq!(fields[0], "title^1.8");
        assert_eq!(fields[1], "file_path^1.5");
        assert_eq!(fields[4], "summary^0.7");
    }

    #[test]
    fn test_phrase_is_unscoped() {
        let request = QueryRequest::match_all().clause(Clause::phrase("road trip"));
        let query = ElasticTranslator::translate_query(&request);
        let multi_match = &query["bool"]["should"][0]["multi_match"];

        assert_eq!(multi_match["type"], "phrase");
        assert!(multi_match.get("fields").is_none());
    }

    #[test]
    fn test_path_glob() {
        let request = QueryCompiler::new().compile(r#"ext="mkv""#);
        let query = ElasticTranslator::translate_query(&request);
        let query_string = &query["bool"]["should"][0]["query_string"];

        assert_eq!(query_string["query"], "*.mkv");
        assert_eq!(query_string["fields"], json!(["file_path"]));
        assert_eq!(query_string["analyze_wildcard"], true);
    }

    #[test]
    fn test_glob_escaping() {
        assert_eq!(ElasticTranslator::escape_glob("*.tar:gz"), "*.tar\\:gz");
        assert_eq!(ElasticTranslator::escape_glob("*.m?v"), "*.m?v");
    }

    #[test]
    fn test_sort_translation() {
        let request = QueryRequest::match_all()
            .sort_by(SortDirective::field("modification_time", SortOrder::Desc))
            .sort_by(SortDirective::Relevance);
        let body = ElasticTranslator::translate(&request);

        assert_eq!(
            body["sort"],
            json!([
                { "modification_time": { "order": "desc" } },
                { "_score": { "order": "desc" } },
            ])
        );
    }

    #[test]
    fn test_combined_clauses_use_should() {
        let request = QueryCompiler::new().compile(r#">year casts="Tom Hanks" "big" drama"#);
        let query = ElasticTranslator::translate_query(&request);
        let should = query["bool"]["should"].as_array().unwrap();

        assert_eq!(should.len(), 3);
        assert!(query["bool"].get("must").is_none());
    }
}
