// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Media document returned by the search backend.
//!
//! The session treats documents as opaque: they are published to the
//! rendering layer exactly as the backend returned them. The accessors below
//! only read the well-known catalog attributes (what the indexer writes for
//! videos, audio, images and PDFs) and return `None`/empty when absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One catalog record (the `_source` of a search hit).
///
/// # Example
///
/// ```
/// use media_search::MediaDocument;
/// use serde_json::json;
///
/// let doc = MediaDocument::new(json!({
///     "title": "Cast Away",
///     "year": 2000,
///     "casts": ["Tom Hanks", "Helen Hunt"],
///     "file_path": "/movies/Cast Away (2000).mkv",
/// }));
///
/// assert_eq!(doc.title(), Some("Cast Away"));
/// assert_eq!(doc.casts(), vec!["Tom Hanks", "Helen Hunt"]);
/// assert_eq!(doc.extension(), Some("mkv"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaDocument(Value);

impl MediaDocument {
    pub fn new(source: Value) -> Self {
        Self(source)
    }

    /// Raw JSON as returned by the backend
    pub fn source(&self) -> &Value {
        &self.0
    }

    pub fn into_source(self) -> Value {
        self.0
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn list_field(&self, name: &str) -> Vec<&str> {
        self.0
            .get(name)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary")
    }

    pub fn file_path(&self) -> Option<&str> {
        self.str_field("file_path")
    }

    /// `video`, `audio`, `image`, `pdf`, ...
    pub fn file_type(&self) -> Option<&str> {
        self.str_field("file_type")
    }

    pub fn year(&self) -> Option<u64> {
        self.0.get("year").and_then(Value::as_u64)
    }

    pub fn rating(&self) -> Option<f64> {
        self.0.get("rating").and_then(Value::as_f64)
    }

    /// Epoch seconds
    pub fn modification_time(&self) -> Option<u64> {
        self.0.get("modification_time").and_then(Value::as_u64)
    }

    /// Seconds
    pub fn duration(&self) -> Option<u64> {
        self.0.get("duration").and_then(Value::as_u64)
    }

    /// Bytes
    pub fn file_size(&self) -> Option<u64> {
        self.0.get("file_size").and_then(Value::as_u64)
    }

    pub fn genres(&self) -> Vec<&str> {
        self.list_field("genres")
    }

    pub fn casts(&self) -> Vec<&str> {
        self.list_field("casts")
    }

    /// Extension of `file_path`, without the dot
    pub fn extension(&self) -> Option<&str> {
        let path = self.file_path()?;
        let name = path.rsplit(|c: char| c == '/' || c == '\\').next()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl From<Value> for MediaDocument {
    fn from(source: Value) -> Self {
        Self(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let doc = MediaDocument::new(json!({
            "title": "Heat",
            "summary": "A group of professional bank robbers...",
            "year": 1995,
            "rating": 8.3,
            "genres": ["Crime", "", "Drama"],
            "file_type": "video",
            "modification_time": 1700000000u64,
            "duration": 10200,
            "file_size": 4_000_000_000u64,
        }));

        assert_eq!(doc.title(), Some("Heat"));
        assert_eq!(doc.year(), Some(1995));
        assert_eq!(doc.rating(), Some(8.3));
        assert_eq!(doc.genres(), vec!["Crime", "Drama"]);
        assert_eq!(doc.file_type(), Some("video"));
        assert_eq!(doc.modification_time(), Some(1_700_000_000));
        assert_eq!(doc.duration(), Some(10200));
        assert_eq!(doc.file_size(), Some(4_000_000_000));
    }

    #[test]
    fn test_missing_fields() {
        let doc = MediaDocument::new(json!({ "casts": "not a list" }));
        assert_eq!(doc.title(), None);
        assert!(doc.casts().is_empty());
        assert_eq!(doc.extension(), None);
    }

    #[test]
    fn test_extension() {
        let ext = |path: &str| {
            MediaDocument::new(json!({ "file_path": path }))
                .extension()
                .map(str::to_string)
        };
        assert_eq!(ext("/music/album/01 - intro.flac"), Some("flac".to_string()));
        assert_eq!(ext("C:\\videos\\clip.MP4"), Some("MP4".to_string()));
        assert_eq!(ext("/home/user/.hidden"), None);
        assert_eq!(ext("/home/user/README"), None);
    }

    #[test]
    fn test_transparent_serde() {
        let source = json!({ "title": "Up" });
        let doc: MediaDocument = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), source);
    }
}
