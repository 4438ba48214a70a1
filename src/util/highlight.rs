use std::ops::Range;

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte ranges of every non-overlapping, case-insensitive occurrence of
/// `term` in `text`, scanning left to right.
///
/// The term is matched literally; characters that would be special in a
/// pattern language mean nothing here.
pub fn highlight_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = term.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= chars.len() {
        let hit = chars[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(&(_, c), &n)| same_letter(c, n));
        if hit {
            let start = chars[i].0;
            let end = chars
                .get(i + needle.len())
                .map_or(text.len(), |&(idx, _)| idx);
            ranges.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

/// Wrap each match of `term` in `<mark>`/`</mark>`.
///
/// ```
/// use shelf::util::highlight;
///
/// assert_eq!(highlight("The Hobbit", "hob"), "The <mark>Hob</mark>bit");
/// assert_eq!(highlight("Dune", ""), "Dune");
/// ```
pub fn highlight(text: &str, term: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in highlight_ranges(text, term) {
        out.push_str(&text[last..range.start]);
        out.push_str("<mark>");
        out.push_str(&text[range.clone()]);
        out.push_str("</mark>");
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_marks_case_insensitively() {
        assert_eq!(highlight("The Hobbit", "hob"), "The <mark>Hob</mark>bit");
        assert_eq!(highlight("The Great Gatsby", "great"), "The <mark>Great</mark> Gatsby");
        assert_eq!(highlight("DUNE dune Dune", "dune"), "<mark>DUNE</mark> <mark>dune</mark> <mark>Dune</mark>");
    }

    #[test]
    fn test_empty_term_is_identity() {
        assert_eq!(highlight("Dune", ""), "Dune");
        assert!(highlight_ranges("Dune", "").is_empty());
    }

    #[test]
    fn test_no_match() {
        assert_eq!(highlight("Emma", "dune"), "Emma");
    }

    #[test]
    fn test_matches_do_not_overlap() {
        assert_eq!(highlight("aaaa", "aa"), "<mark>aa</mark><mark>aa</mark>");
        assert_eq!(highlight_ranges("aaa", "aa"), vec![0..2]);
    }

    #[test]
    fn test_pattern_characters_are_literal() {
        assert_eq!(highlight("C++ (2nd ed.)", "c++"), "<mark>C++</mark> (2nd ed.)");
        assert_eq!(highlight("a.b axb", "a.b"), "<mark>a.b</mark> axb");
        assert_eq!(highlight("price $5", "$5"), "price <mark>$5</mark>");
    }

    #[test]
    fn test_multibyte_ranges() {
        let text = "Café Élan";
        let ranges = highlight_ranges(text, "élan");
        assert_eq!(ranges.len(), 1);
        assert_eq!(&text[ranges[0].clone()], "Élan");
        assert_eq!(highlight("Café", "CAFÉ"), "<mark>Café</mark>");
    }

    proptest! {
        #[test]
        fn prop_removing_marks_restores_text(text in "[a-zA-Z ]{0,40}", term in "[a-zA-Z]{0,4}") {
            let marked = highlight(&text, &term);
            let stripped = marked.replace("<mark>", "").replace("</mark>", "");
            prop_assert_eq!(stripped, text);
        }

        #[test]
        fn prop_ranges_match_term(text in "[a-cA-C ]{0,40}", term in "[a-c]{1,3}") {
            let mut last_end = 0;
            for range in highlight_ranges(&text, &term) {
                prop_assert!(range.start >= last_end);
                prop_assert_eq!(text[range.clone()].to_lowercase(), term.to_lowercase());
                last_end = range.end;
            }
        }
    }
}
