//! Query resolution: filter state + page offset → remote request descriptor.
//!
//! Everything here is pure. The endpoint precedence is fixed: a non-empty
//! search term always selects title search, otherwise a non-`all` category
//! selects subject browse, otherwise the default browse query is used.

use std::fmt;
use std::str::FromStr;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Records per page for every endpoint, so offsets advance uniformly.
pub const PAGE_SIZE: usize = 40;

/// Characters left unescaped in a query component, as in `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// ============================================================================
// Category
// ============================================================================

/// The fixed set of browsable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Fiction,
    History,
    Science,
    Fantasy,
}

/// All categories in tab order.
pub const CATEGORIES: [Category; 5] = [
    Category::All,
    Category::Fiction,
    Category::History,
    Category::Science,
    Category::Fantasy,
];

impl Category {
    /// Path segment used by the subjects endpoint (and config/CLI values).
    pub fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fiction => "fiction",
            Self::History => "history",
            Self::Science => "science",
            Self::Fantasy => "fantasy",
        }
    }

    /// Capitalized tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Fiction => "Fiction",
            Self::History => "History",
            Self::Science => "Science",
            Self::Fantasy => "Fantasy",
        }
    }

    /// Position in [`CATEGORIES`].
    pub fn index(self) -> usize {
        CATEGORIES.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Self {
        CATEGORIES[(self.index() + 1) % CATEGORIES.len()]
    }

    /// Previous tab, wrapping around.
    pub fn prev(self) -> Self {
        CATEGORIES[(self.index() + CATEGORIES.len() - 1) % CATEGORIES.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown category '{0}' (expected one of: all, fiction, history, science, fantasy)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CATEGORIES
            .iter()
            .copied()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Filter Signature
// ============================================================================

/// Identifies one browsing context: a category plus a free-text title term.
///
/// Equality is structural: the term is kept exactly as typed, so `"emma"`
/// and `"emma "` are different signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterSignature {
    category: Category,
    search_term: String,
}

impl FilterSignature {
    pub fn new(category: Category, search_term: impl AsRef<str>) -> Self {
        Self {
            category,
            search_term: search_term.as_ref().to_string(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }
}

// ============================================================================
// Page Request
// ============================================================================

/// Which remote endpoint serves a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SearchByTitle,
    SearchBySubjectCategory,
    DefaultBrowse,
}

/// Fully resolved descriptor for one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: Endpoint,
    pub search_term: Option<String>,
    pub category: Option<Category>,
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Relative URL for this request, with the search term percent-encoded
    /// (space as `%20`).
    pub fn path_and_query(&self) -> String {
        match self.endpoint {
            Endpoint::SearchByTitle => {
                let term = self.search_term.as_deref().unwrap_or_default();
                let encoded = utf8_percent_encode(term, COMPONENT).to_string();
                format!(
                    "/search.json?title={}&limit={}&offset={}",
                    encoded, self.limit, self.offset
                )
            }
            Endpoint::SearchBySubjectCategory => {
                let category = self.category.unwrap_or_default();
                format!(
                    "/subjects/{}.json?limit={}&offset={}",
                    category.slug(),
                    self.limit,
                    self.offset
                )
            }
            Endpoint::DefaultBrowse => format!(
                "/search.json?q=book&limit={}&offset={}",
                self.limit, self.offset
            ),
        }
    }

    /// Absolute URL against the catalog base (e.g. `https://openlibrary.org`).
    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}{}",
            base.trim_end_matches('/'),
            self.path_and_query()
        ))
    }

    /// Name of the response array holding this endpoint's records.
    pub fn records_field(&self) -> &'static str {
        match self.endpoint {
            Endpoint::SearchBySubjectCategory => "works",
            Endpoint::SearchByTitle | Endpoint::DefaultBrowse => "docs",
        }
    }
}

/// Resolve the request for `signature` at `offset`.
pub fn resolve(signature: &FilterSignature, offset: usize) -> PageRequest {
    if !signature.search_term().is_empty() {
        PageRequest {
            endpoint: Endpoint::SearchByTitle,
            search_term: Some(signature.search_term().to_string()),
            category: None,
            offset,
            limit: PAGE_SIZE,
        }
    } else if signature.category() != Category::All {
        PageRequest {
            endpoint: Endpoint::SearchBySubjectCategory,
            search_term: None,
            category: Some(signature.category()),
            offset,
            limit: PAGE_SIZE,
        }
    } else {
        PageRequest {
            endpoint: Endpoint::DefaultBrowse,
            search_term: None,
            category: None,
            offset,
            limit: PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn search_term_dominates_category() {
        let req = resolve(&FilterSignature::new(Category::Fantasy, "dune"), 0);
        assert_eq!(req.endpoint, Endpoint::SearchByTitle);
        assert_eq!(req.search_term.as_deref(), Some("dune"));
        assert_eq!(req.category, None);
    }

    #[test]
    fn category_without_term_browses_subject() {
        let req = resolve(&FilterSignature::new(Category::Science, ""), 80);
        assert_eq!(req.endpoint, Endpoint::SearchBySubjectCategory);
        assert_eq!(req.path_and_query(), "/subjects/science.json?limit=40&offset=80");
        assert_eq!(req.records_field(), "works");
    }

    #[test]
    fn all_without_term_is_default_browse() {
        let req = resolve(&FilterSignature::default(), 40);
        assert_eq!(req.endpoint, Endpoint::DefaultBrowse);
        assert_eq!(req.path_and_query(), "/search.json?q=book&limit=40&offset=40");
        assert_eq!(req.records_field(), "docs");
    }

    #[test]
    fn whitespace_term_still_searches_title() {
        let sig = FilterSignature::new(Category::Fantasy, "  ");
        assert_ne!(sig, FilterSignature::new(Category::Fantasy, ""));
        let req = resolve(&sig, 0);
        assert_eq!(req.endpoint, Endpoint::SearchByTitle);
        assert_eq!(req.search_term.as_deref(), Some("  "));
        assert_eq!(req.path_and_query(), "/search.json?title=%20%20&limit=40&offset=0");
    }

    #[test]
    fn trailing_space_is_a_different_signature() {
        assert_ne!(
            FilterSignature::new(Category::All, "emma"),
            FilterSignature::new(Category::All, "emma ")
        );
    }

    #[test]
    fn search_term_is_url_encoded() {
        let req = resolve(&FilterSignature::new(Category::All, "war & peace?"), 0);
        assert_eq!(
            req.path_and_query(),
            "/search.json?title=war%20%26%20peace%3F&limit=40&offset=0"
        );
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        let req = resolve(&FilterSignature::new(Category::Fiction, ""), 0);
        let url = req.url("https://openlibrary.org/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://openlibrary.org/subjects/fiction.json?limit=40&offset=0"
        );
    }

    #[test]
    fn category_parse_and_cycle() {
        assert_eq!("Fantasy".parse::<Category>().unwrap(), Category::Fantasy);
        assert!("poetry".parse::<Category>().is_err());
        assert_eq!(Category::Fantasy.next(), Category::All);
        assert_eq!(Category::All.prev(), Category::Fantasy);
        assert_eq!(Category::History.index(), 2);
    }

    fn any_category() -> impl Strategy<Value = Category> {
        (0..CATEGORIES.len()).prop_map(|i| CATEGORIES[i])
    }

    proptest! {
        #[test]
        fn page_size_is_uniform(cat in any_category(), term in ".{0,12}", offset in 0usize..10_000) {
            let req = resolve(&FilterSignature::new(cat, &term), offset);
            prop_assert_eq!(req.limit, PAGE_SIZE);
            prop_assert_eq!(req.offset, offset);
        }

        #[test]
        fn non_empty_term_always_searches_title(cat in any_category(), term in "[a-z]{1,10}") {
            let req = resolve(&FilterSignature::new(cat, &term), 0);
            prop_assert_eq!(req.endpoint, Endpoint::SearchByTitle);
        }
    }
}
