//! Small helpers shared by the views and the headless printer.
//!
//! - **Highlighting**: case-insensitive literal match ranges and `<mark>` output
//! - **Text**: width-aware truncation and sanitizing of catalog-supplied text
//! - **URLs**: validation before handing a link to the system browser

mod highlight;
mod text;
mod url_validator;

pub use highlight::{highlight, highlight_ranges};
pub use text::{display_width, single_line, strip_control_chars, truncate_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search term accepted from the search bar.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
