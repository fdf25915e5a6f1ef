// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Compiler - free text with directives → [`QueryRequest`]
//!
//! # Directive Grammar
//!
//! Each class is applied once to whatever text the previous classes left
//! behind, in this order:
//!
//! ```text
//! :latest | :last           - leading keyword, newest first
//! >field  <field            - sort desc / asc (size, add, added, date aliased)
//! field="value"             - phrase match scoped to a field (type, ext aliased)
//! "some phrase"             - phrase match across all fields
//! anything else             - weighted free text (title > path > genres/casts > summary)
//! ```
//!
//! When no class produced a sort directive, the order is randomized so that
//! repeated untargeted searches surface different documents.
//!
//! The compiler is total: there is no input it rejects. Text that only looks
//! like a directive (`year=1999`, an unbalanced quote) stays in the free text.
//!
//! # Example
//!
//! ```rust
//! use media_search::search::{QueryCompiler, SortDirective, SortOrder};
//!
//! let request = QueryCompiler::new().compile(r#">year casts="Tom Hanks" drama"#);
//! assert_eq!(request.clauses.len(), 2);
//! assert_eq!(request.sort[0], SortDirective::field("year", SortOrder::Desc));
//! ```

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::query::{Clause, QueryRequest, SortDirective, SortOrder};

/// Fields searched by residual free text, with their weights.
pub const FREE_TEXT_FIELDS: &[(&str, f64)] = &[
    ("title", 1.8),
    ("file_path", 1.5),
    ("genres", 1.0),
    ("casts", 1.0),
    ("summary", 0.7),
];

/// Fields an `ext="..."` glob is matched against.
pub const PATH_FIELDS: &[&str] = &["file_path"];

/// Recency attribute used by `:latest` and the `date` sort alias.
pub const RECENCY_FIELD: &str = "modification_time";

const LATEST_KEYWORDS: &[&str] = &[":latest", ":last"];
const WILDCARD_TERMS: &[&str] = &["*", "*:*"];

fn latest_re() -> &'static Regex {
    static LATEST_RE: OnceLock<Regex> = OnceLock::new();
    LATEST_RE.get_or_init(|| Regex::new(r"^\s*:(?:latest|last)\b").expect("valid latest regex"))
}

fn sort_re() -> &'static Regex {
    static SORT_RE: OnceLock<Regex> = OnceLock::new();
    SORT_RE.get_or_init(|| Regex::new(r"([<>])(\w+)").expect("valid sort regex"))
}

fn field_re() -> &'static Regex {
    static FIELD_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_RE.get_or_init(|| Regex::new(r#"(\w+)="([^"]+)""#).expect("valid field regex"))
}

fn phrase_re() -> &'static Regex {
    static PHRASE_RE: OnceLock<Regex> = OnceLock::new();
    PHRASE_RE.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("valid phrase regex"))
}

/// True for terms that mean "show me the whole catalog".
///
/// An empty result for one of these means the catalog itself is empty.
pub fn is_browse_all(term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || WILDCARD_TERMS.contains(&term) || LATEST_KEYWORDS.contains(&term)
}

/// Compiles raw search terms into [`QueryRequest`]s.
///
/// Stateless; one instance can be shared by any number of sessions.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler;

impl QueryCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile with an empty window. Use [`compile_page`](Self::compile_page)
    /// for a fetchable request.
    pub fn compile(&self, term: &str) -> QueryRequest {
        self.compile_page(term, 0, 0)
    }

    /// Compile `term` and set the pagination window.
    pub fn compile_page(&self, term: &str, from: usize, size: usize) -> QueryRequest {
        let mut request = QueryRequest::match_all().window(from, size);
        let mut text = term.to_string();

        // 1. Meta-sort keyword
        if let Some(found) = latest_re().find(&text) {
            request.push_sort_once(SortDirective::field(RECENCY_FIELD, SortOrder::Desc));
            text = text[found.end()..].to_string();
        }

        // 2. Explicit sort directives
        let (sorts, rest) = extract(sort_re(), &text, |caps| {
            let order = if &caps[1] == ">" { SortOrder::Desc } else { SortOrder::Asc };
            SortDirective::field(sort_field_alias(&caps[2]), order)
        });
        text = rest;
        request.sort.extend(sorts);

        // 3. Scoped field filters
        let (filters, rest) = extract(field_re(), &text, |caps| field_clause(&caps[1], &caps[2]));
        text = rest;
        if !filters.is_empty() {
            request.clauses.extend(filters);
            request.push_sort_once(SortDirective::Relevance);
        }

        // 4. Quoted phrases
        let (phrases, rest) = extract(phrase_re(), &text, |caps| Clause::phrase(&caps[1]));
        text = rest;
        if !phrases.is_empty() {
            request.clauses.extend(phrases);
            request.push_sort_once(SortDirective::Relevance);
        }

        // 5. Residual free text
        let residual = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !residual.is_empty() && !WILDCARD_TERMS.contains(&residual.as_str()) {
            request.clauses.push(Clause::free_text(residual, FREE_TEXT_FIELDS));
            request.push_sort_once(SortDirective::Relevance);
        }

        // 6. Fallback
        if request.sort.is_empty() {
            request.sort.push(SortDirective::Random);
        }

        request
    }
}

/// Apply `re` once over `text`, returning one item per match and the text
/// with every match replaced by a single space.
fn extract<T>(re: &Regex, text: &str, mut build: impl FnMut(&Captures<'_>) -> T) -> (Vec<T>, String) {
    let mut found = Vec::new();
    let mut rest = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        rest.push_str(&text[last..whole.start()]);
        rest.push(' ');
        last = whole.end();
        found.push(build(&caps));
    }
    rest.push_str(&text[last..]);

    (found, rest)
}

fn sort_field_alias(field: &str) -> String {
    match field.to_ascii_lowercase().as_str() {
        "size" => "file_size".to_string(),
        "add" | "added" | "date" => RECENCY_FIELD.to_string(),
        _ => field.to_string(),
    }
}

fn field_clause(field: &str, value: &str) -> Clause {
    match field.to_ascii_lowercase().as_str() {
        "ext" | "extension" => Clause::extension(value.trim(), PATH_FIELDS),
        "type" => Clause::field_phrase("file_type", value),
        _ => Clause::field_phrase(field, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{FIELD_BOOST, PHRASE_BOOST};

    fn compile(term: &str) -> QueryRequest {
        QueryCompiler::new().compile(term)
    }

    fn free_text_of(request: &QueryRequest) -> Option<&str> {
        request.clauses.iter().find_map(|c| match c {
            Clause::FreeText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[test]
    fn test_empty_input_matches_all_randomly() {
        for term in ["", "   ", "\t\n"] {
            let request = compile(term);
            assert!(request.clauses.is_empty(), "term {:?}", term);
            assert_eq!(request.sort, vec![SortDirective::Random]);
        }
    }

    #[test]
    fn test_wildcard_matches_all() {
        for term in ["*", " *:* "] {
            let request = compile(term);
            assert!(request.is_match_all());
            assert_eq!(request.sort, vec![SortDirective::Random]);
        }
    }

    #[test]
    fn test_latest_keyword() {
        let request = compile(":latest");
        assert!(request.clauses.is_empty());
        assert_eq!(
            request.sort,
            vec![SortDirective::field("modification_time", SortOrder::Desc)]
        );

        let request = compile(":last");
        assert_eq!(
            request.sort,
            vec![SortDirective::field("modification_time", SortOrder::Desc)]
        );
    }

    #[test]
    fn test_latest_keyword_with_text() {
        let request = compile(":latest  star wars");
        assert_eq!(free_text_of(&request), Some("star wars"));
        assert_eq!(
            request.sort,
            vec![
                SortDirective::field("modification_time", SortOrder::Desc),
                SortDirective::Relevance,
            ]
        );
    }

    #[test]
    fn test_latest_must_lead() {
        let request = compile("star :latest");
        assert_eq!(free_text_of(&request), Some("star :latest"));
        assert_eq!(request.sort, vec![SortDirective::Relevance]);
    }

    #[test]
    fn test_latest_lookalike_is_text() {
        let request = compile(":lastly");
        assert_eq!(free_text_of(&request), Some(":lastly"));
    }

    #[test]
    fn test_directive_stripping() {
        let request = compile(r#">year casts="Tom Hanks" drama"#);

        assert_eq!(
            request.sort,
            vec![SortDirective::field("year", SortOrder::Desc), SortDirective::Relevance]
        );
        assert_eq!(
            request.clauses,
            vec![
                Clause::FieldPhrase {
                    field: "casts".to_string(),
                    value: "Tom Hanks".to_string(),
                    boost: FIELD_BOOST,
                },
                Clause::free_text("drama", FREE_TEXT_FIELDS),
            ]
        );
    }

    #[test]
    fn test_sort_directives_and_aliases() {
        let request = compile(">size <added >rating <date");
        assert!(request.clauses.is_empty());
        assert_eq!(
            request.sort,
            vec![
                SortDirective::field("file_size", SortOrder::Desc),
                SortDirective::field("modification_time", SortOrder::Asc),
                SortDirective::field("rating", SortOrder::Desc),
                SortDirective::field("modification_time", SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn test_sort_only_term_has_no_random_sort() {
        let request = compile(">add");
        assert!(!request.sort.contains(&SortDirective::Random));
    }

    #[test]
    fn test_type_alias() {
        let request = compile(r#"type="audio""#);
        assert_eq!(request.clauses, vec![Clause::field_phrase("file_type", "audio")]);
        assert_eq!(request.sort, vec![SortDirective::Relevance]);
    }

    #[test]
    fn test_extension_becomes_path_glob() {
        for term in [r#"ext="mkv""#, r#"extension="mkv""#] {
            let request = compile(term);
            assert_eq!(request.clauses, vec![Clause::extension("mkv", PATH_FIELDS)]);
        }
    }

    #[test]
    fn test_multiple_field_filters() {
        let request = compile(r#"genres="Drama" casts="Meryl Streep""#);
        assert_eq!(request.clauses.len(), 2);
        // Relevance added once, not per clause
        assert_eq!(request.sort, vec![SortDirective::Relevance]);
    }

    #[test]
    fn test_quoted_phrase() {
        let request = compile(r#""the long goodbye" noir"#);
        assert_eq!(
            request.clauses,
            vec![
                Clause::Phrase { text: "the long goodbye".to_string(), boost: PHRASE_BOOST },
                Clause::free_text("noir", FREE_TEXT_FIELDS),
            ]
        );
        assert_eq!(request.sort, vec![SortDirective::Relevance]);
    }

    #[test]
    fn test_field_filter_consumed_before_phrase() {
        let request = compile(r#"title="Alien" "director's cut""#);
        assert_eq!(
            request.clauses,
            vec![
                Clause::field_phrase("title", "Alien"),
                Clause::phrase("director's cut"),
            ]
        );
    }

    #[test]
    fn test_directive_only_term_has_no_free_text() {
        let request = compile(r#":latest >size casts="Tom Hanks""#);
        assert_eq!(free_text_of(&request), None);
        assert_eq!(request.clauses.len(), 1);
    }

    #[test]
    fn test_malformed_directives_fall_through() {
        // Unbalanced quote and empty value are plain text
        let request = compile(r#"casts="Tom Hanks"#);
        assert_eq!(free_text_of(&request), Some(r#"casts="Tom Hanks"#));

        let request = compile(r#"casts="""#);
        assert_eq!(free_text_of(&request), Some(r#"casts="""#));

        // Bare comparison characters are text too
        let request = compile("> <");
        assert_eq!(free_text_of(&request), Some("> <"));
    }

    #[test]
    fn test_whitespace_collapsed_in_residual() {
        let request = compile("  blade    runner  >year ");
        assert_eq!(free_text_of(&request), Some("blade runner"));
    }

    #[test]
    fn test_compile_page_sets_window() {
        let request = QueryCompiler::new().compile_page("drama", 300, 100);
        assert_eq!((request.from, request.size), (300, 100));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let compiler = QueryCompiler::new();
        for term in ["", ":latest", r#">year casts="Tom Hanks" drama"#, r#"ext="mp3" "live""#] {
            assert_eq!(compiler.compile(term), compiler.compile(term));
        }
    }

    #[test]
    fn test_is_browse_all() {
        for term in ["", "  ", "*", "*:*", ":latest", " :last "] {
            assert!(is_browse_all(term), "term {:?}", term);
        }
        for term in ["drama", ":latest drama", ">year"] {
            assert!(!is_browse_all(term), "term {:?}", term);
        }
    }
}
