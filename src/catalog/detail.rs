//! Detail enrichment for a single record.
//!
//! Independent of feed pagination. Callers treat failure as "no extra data".

use super::record::BookRecord;
use crate::util::truncate_chars;
use serde::Deserialize;

/// Descriptions longer than this are cut and suffixed with "...".
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Extra fields from the record's own catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDetail {
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub first_publish_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDescription {
    Text(String),
    Typed { value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDetail {
    description: Option<RawDescription>,
    subjects: Option<Vec<String>>,
    first_publish_date: Option<String>,
}

impl BookDetail {
    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawDetail = serde_json::from_slice(bytes)?;
        Ok(Self {
            description: raw.description.map(|d| match d {
                RawDescription::Text(s) => s,
                RawDescription::Typed { value } => value,
            }),
            subjects: raw.subjects.unwrap_or_default(),
            first_publish_date: raw.first_publish_date,
        })
    }
}

/// What the detail overlay shows: record fields merged with optional detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub authors: String,
    pub subjects: String,
    pub first_published: String,
    pub description: String,
    pub cover_url: String,
}

impl DetailView {
    pub fn merge(record: &BookRecord, detail: Option<&BookDetail>) -> Self {
        let description = detail
            .and_then(|d| d.description.clone())
            .filter(|d| !d.trim().is_empty())
            .or_else(|| record.first_sentence.clone())
            .or_else(|| record.subtitle.clone())
            .unwrap_or_else(|| "No description available.".to_string());

        let subjects = match detail {
            Some(d) if !d.subjects.is_empty() => d.subjects.join(", "),
            _ => record
                .subjects
                .as_ref()
                .map(|s| s.join(", "))
                .unwrap_or_else(|| "Unknown".to_string()),
        };

        let first_published = record
            .first_publish_year
            .map(|y| y.to_string())
            .or_else(|| detail.and_then(|d| d.first_publish_date.clone()))
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            title: record.title.clone(),
            authors: record.author_line(),
            subjects,
            first_published,
            description: truncate_chars(&description, MAX_DESCRIPTION_CHARS).into_owned(),
            cover_url: record.cover_url(),
        }
    }
}
