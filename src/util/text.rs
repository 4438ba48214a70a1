use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Terminal columns occupied by `s`.
///
/// ```
/// use shelf::util::display_width;
///
/// assert_eq!(display_width("Dune"), 4);
/// assert_eq!(display_width("三体"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Byte index at which `s` must be cut to fit in `columns`.
fn cut_index(s: &str, columns: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > columns {
            return idx;
        }
        used += w;
    }
    s.len()
}

/// Fit `s` into `max_width` columns, ending with "..." when cut.
///
/// Widths of 3 or less have no room for the ellipsis and get a plain cut.
///
/// ```
/// use shelf::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("The Left Hand of Darkness", 12), "The Left ...");
/// assert_eq!(truncate_to_width("Emma", 10), "Emma");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS.len() {
        return Cow::Borrowed(&s[..cut_index(s, max_width)]);
    }
    let cut = cut_index(s, max_width - ELLIPSIS.len());
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Cap `s` at `max_chars` characters, appending "..." when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some((idx, _)) => Cow::Owned(format!("{}{}", s[..idx].trim_end(), ELLIPSIS)),
    }
}

/// Drop terminal control characters and escape sequences from remote text.
///
/// Tab, newline and carriage return survive. CSI sequences are skipped up to
/// their final byte; OSC sequences up to BEL or ST.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_control = |c: char| c == '\x7f' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'));
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

/// Single-line form of remote text for list rows: controls stripped and
/// whitespace runs collapsed to one space.
pub fn single_line(s: &str) -> String {
    strip_control_chars(s)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
        assert_eq!(truncate_to_width("你好", 3), "你");
        assert_eq!(truncate_to_width("你好", 1), "");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 2), "Te");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert!(matches!(truncate_to_width("Hi", 3), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ab cdef", 3), "ab...");
        assert_eq!(truncate_chars("éèêë", 2), "éè...");
    }

    #[test]
    fn test_strip_clean_is_borrowed() {
        let input = "line1\nline2\ttabbed";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb\x00c\x7fd"), "abcd");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  The\n\tHobbit \x07 "), "The Hobbit");
    }
}
