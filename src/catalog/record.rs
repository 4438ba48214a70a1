//! Normalization of catalog response records.
//!
//! The catalog answers with two record shapes: search results (`docs`) and
//! subject listings (`works`). Both are folded into a single [`BookRecord`]
//! here; nothing above this module sees the raw shape.

use serde::Deserialize;

/// Cover shown when a record has no cover identifier.
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/260x380?text=No+Image";

/// Canonical book record stored in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_image_id: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub detail_key: Option<String>,
    pub subtitle: Option<String>,
    pub first_sentence: Option<String>,
}

impl BookRecord {
    /// Large cover image URL, or the placeholder.
    pub fn cover_url(&self) -> String {
        cover_url(self.cover_image_id.as_deref())
    }

    /// Comma-joined authors, "Unknown" when there are none.
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Public catalog page for this record, when it has a key.
    pub fn page_url(&self, base: &str) -> Option<String> {
        self.detail_key
            .as_ref()
            .map(|key| format!("{}{}", base.trim_end_matches('/'), key))
    }
}

/// Cover URL for an optional numeric cover identifier.
///
/// Non-numeric identifiers are treated as missing.
pub fn cover_url(cover_id: Option<&str>) -> String {
    match cover_id {
        Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
            format!("https://covers.openlibrary.org/b/id/{}-L.jpg", id)
        }
        _ => PLACEHOLDER_COVER_URL.to_string(),
    }
}

// ============================================================================
// Raw shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: Option<String>,
}

/// Union of the fields both catalog shapes may carry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRecord {
    key: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    authors: Option<Vec<RawAuthor>>,
    author_name: Option<Vec<String>>,
    cover_id: Option<serde_json::Value>,
    cover_i: Option<serde_json::Value>,
    subject: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    first_sentence: Option<serde_json::Value>,
}

/// Either shape of page response; the unused array is simply absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPage {
    docs: Option<Vec<serde_json::Value>>,
    works: Option<Vec<serde_json::Value>>,
}

impl RawPage {
    /// Records from the named array (`docs` or `works`).
    ///
    /// Missing array → empty page. Individual records that fail to decode
    /// are skipped and counted.
    pub(crate) fn into_records(self, field: &str) -> (Vec<BookRecord>, usize) {
        let raw = match field {
            "works" => self.works,
            _ => self.docs,
        }
        .unwrap_or_default();

        let mut skipped = 0;
        let records = raw
            .into_iter()
            .filter_map(|value| {
                let normalized = serde_json::from_value::<RawRecord>(value)
                    .ok()
                    .and_then(normalize);
                if normalized.is_none() {
                    skipped += 1;
                }
                normalized
            })
            .collect();
        (records, skipped)
    }
}

fn cover_as_string(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64().filter(|id| *id > 0).map(|id| id.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// `first_sentence` is a list in search docs and sometimes `{value}` elsewhere.
fn sentence_as_string(value: Option<serde_json::Value>) -> Option<String> {
    let text = match value? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::Object(map) => map.get("value")?.as_str()?.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Fold a raw record into a [`BookRecord`]. Returns `None` without a title.
pub(crate) fn normalize(raw: RawRecord) -> Option<BookRecord> {
    let title = raw.title.filter(|t| !t.trim().is_empty())?;

    let authors: Vec<String> = match (raw.authors, raw.author_name) {
        (Some(list), _) if !list.is_empty() => list.into_iter().filter_map(|a| a.name).collect(),
        (_, Some(names)) => names,
        _ => Vec::new(),
    };

    let cover_image_id = cover_as_string(raw.cover_id).or_else(|| cover_as_string(raw.cover_i));
    let detail_key = raw.key.filter(|k| !k.is_empty());

    // Keyless records still need a stable identity for dedup.
    let id = detail_key.clone().unwrap_or_else(|| {
        format!(
            "{}|{}|{}",
            title,
            authors.first().map(String::as_str).unwrap_or_default(),
            cover_image_id.as_deref().unwrap_or_default()
        )
    });

    Some(BookRecord {
        id,
        title,
        authors,
        cover_image_id,
        subjects: raw.subject.filter(|s| !s.is_empty()),
        first_publish_year: raw.first_publish_year,
        detail_key,
        subtitle: raw.subtitle.filter(|s| !s.is_empty()),
        first_sentence: sentence_as_string(raw.first_sentence),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Option<BookRecord> {
        normalize(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn both_author_shapes_normalize_alike() {
        let from_doc = record(json!({"title": "T", "author_name": ["A", "B"]})).unwrap();
        let from_work = record(json!({
            "title": "T",
            "authors": [{"name": "A"}, {"name": "B"}]
        }))
        .unwrap();
        assert_eq!(from_doc.authors, vec!["A", "B"]);
        assert_eq!(from_doc.authors, from_work.authors);
    }

    #[test]
    fn cover_id_and_cover_i_both_accepted() {
        let work = record(json!({"title": "T", "cover_id": 12345})).unwrap();
        let doc = record(json!({"title": "T", "cover_i": 678})).unwrap();
        assert_eq!(work.cover_url(), "https://covers.openlibrary.org/b/id/12345-L.jpg");
        assert_eq!(doc.cover_url(), "https://covers.openlibrary.org/b/id/678-L.jpg");
    }

    #[test]
    fn missing_cover_uses_placeholder() {
        let rec = record(json!({"title": "T"})).unwrap();
        assert_eq!(rec.cover_url(), PLACEHOLDER_COVER_URL);
        assert_eq!(cover_url(Some("abc")), PLACEHOLDER_COVER_URL);
    }

    #[test]
    fn key_becomes_id_and_detail_key() {
        let rec = record(json!({"key": "/works/OL1W", "title": "Dune"})).unwrap();
        assert_eq!(rec.id, "/works/OL1W");
        assert_eq!(rec.detail_key.as_deref(), Some("/works/OL1W"));
        assert_eq!(
            rec.page_url("https://openlibrary.org").as_deref(),
            Some("https://openlibrary.org/works/OL1W")
        );
    }

    #[test]
    fn keyless_record_gets_synthesized_id() {
        let a = record(json!({"title": "Dune", "author_name": ["Frank Herbert"], "cover_i": 9})).unwrap();
        let b = record(json!({"title": "Dune", "author_name": ["Frank Herbert"], "cover_i": 9})).unwrap();
        assert_eq!(a.id, "Dune|Frank Herbert|9");
        assert_eq!(a.id, b.id);
        assert!(a.detail_key.is_none());
    }

    #[test]
    fn record_without_title_is_dropped() {
        assert!(record(json!({"key": "/works/OL2W"})).is_none());
        assert!(record(json!({"title": "  "})).is_none());
    }

    #[test]
    fn first_sentence_list_is_joined() {
        let rec = record(json!({"title": "T", "first_sentence": ["One.", "Two."]})).unwrap();
        assert_eq!(rec.first_sentence.as_deref(), Some("One. Two."));
    }

    #[test]
    fn author_line_defaults_to_unknown() {
        let rec = record(json!({"title": "T"})).unwrap();
        assert_eq!(rec.author_line(), "Unknown");
    }

    #[test]
    fn page_reads_named_array_and_counts_skips() {
        let page: RawPage = serde_json::from_value(json!({
            "works": [{"title": "A", "key": "/works/1"}, {"key": "/works/2"}, 42],
            "docs": [{"title": "ignored"}]
        }))
        .unwrap();
        let (records, skipped) = page.into_records("works");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(skipped, 2);
    }

    #[test]
    fn page_without_array_is_empty() {
        let page: RawPage = serde_json::from_value(json!({"numFound": 0})).unwrap();
        let (records, skipped) = page.into_records("docs");
        assert!(records.is_empty());
        assert_eq!(skipped, 0);
    }
}
