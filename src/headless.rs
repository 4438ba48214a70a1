//! Print pages of the feed to a writer without a terminal UI.

use crate::catalog::{BookRecord, CatalogClient};
use crate::feed::{Applied, FeedController, FilterSignature};
use crate::util::{highlight, single_line};
use anyhow::{bail, Result};
use std::io::Write;

/// Fetch up to `pages` pages for `signature` and write one line per book.
///
/// Stops early when the catalog runs out. Matches of the search term are
/// wrapped in `<mark>` tags. Returns the number of books written.
pub async fn print_pages<W: Write>(
    client: &CatalogClient,
    signature: FilterSignature,
    pages: usize,
    out: &mut W,
) -> Result<usize> {
    let mut feed = FeedController::new();
    let term = signature.search_term().to_string();
    let mut ticket = feed.set_filter(signature);
    let mut written = 0;

    for page in 0..pages {
        let Some(current) = ticket.take() else {
            break;
        };

        let result = client.fetch_page(&current.request).await;
        match feed.apply(&current, result) {
            Applied::Appended { added, .. } => {
                let start = feed.items().len() - added;
                for book in &feed.items()[start..] {
                    writeln!(out, "{}", format_line(book, &term))?;
                }
                written += added;
            }
            Applied::Exhausted => {
                tracing::debug!(page, "Catalog exhausted");
                break;
            }
            Applied::Failed(advisory) => bail!("{}", advisory.message),
            Applied::Discarded => break,
        }

        if page + 1 < pages {
            ticket = feed.load_next_page();
        }
    }

    out.flush()?;
    Ok(written)
}

fn format_line(book: &BookRecord, term: &str) -> String {
    let title = highlight(&single_line(&book.title), term);
    match book.first_publish_year {
        Some(year) => format!("{}\t{}\t{}", title, single_line(&book.author_line()), year),
        None => format!("{}\t{}", title, single_line(&book.author_line())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_line_marks_term() {
        let book = BookRecord {
            id: "/works/OL1W".into(),
            title: "Emma\n".into(),
            authors: vec!["Jane Austen".into()],
            cover_image_id: None,
            subjects: None,
            first_publish_year: Some(1815),
            detail_key: None,
            subtitle: None,
            first_sentence: None,
        };
        assert_eq!(format_line(&book, "em"), "<mark>Em</mark>ma\tJane Austen\t1815");
    }
}
