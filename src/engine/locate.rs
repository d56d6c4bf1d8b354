//! Finding entry blocks and header lines inside a document.

use std::ops::Range;

use super::dialect::Dialect;

/// Returns the byte offset of the first occurrence of `line` that occupies a
/// whole line of `text`.
///
/// A match must start at the beginning of the text or right after a newline,
/// and end at a newline or the end of the text. Trailing spaces, tabs and a
/// carriage return before that end are allowed, so CRLF documents still
/// match. `### Summary` never matches `### Summary of the week`.
pub(crate) fn find_line(text: &str, line: &str) -> Option<usize> {
    if line.is_empty() {
        return None;
    }
    text.match_indices(line).map(|(idx, _)| idx).find(|&idx| {
        let starts_line = idx == 0 || text.as_bytes()[idx - 1] == b'\n';
        let end = idx + line.len();
        let rest = text[end..].trim_start_matches(&[' ', '\t', '\r'][..]);
        let ends_line = rest.is_empty() || rest.starts_with('\n');
        starts_line && ends_line
    })
}

/// Locates the entry block opened by `date_header`.
///
/// The block runs from the header to just before the next top-level header,
/// or to the end of the document. The first matching header wins.
pub fn locate_entry(dialect: Dialect, text: &str, date_header: &str) -> Option<Range<usize>> {
    let start = find_line(text, date_header)?;
    let body_start = start + date_header.len();
    let end = text[body_start..]
        .find(&dialect.top_level_pattern())
        .map(|rel| body_start + rel)
        .unwrap_or(text.len());
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "* 2024-04-30 Tue\n** Raw Input\nyesterday\n\n* 2024-05-01 Wed\n** Raw Input\ntoday\n\n* 2024-05-02 Thu\n** Raw Input\ntomorrow\n";

    #[test]
    fn test_locate_middle_entry() {
        let range = locate_entry(Dialect::Outline, DOC, "* 2024-05-01 Wed").unwrap();
        assert_eq!(&DOC[range], "* 2024-05-01 Wed\n** Raw Input\ntoday\n");
    }

    #[test]
    fn test_locate_last_entry_runs_to_end() {
        let range = locate_entry(Dialect::Outline, DOC, "* 2024-05-02 Thu").unwrap();
        assert_eq!(range.end, DOC.len());
        assert!(DOC[range].ends_with("tomorrow\n"));
    }

    #[test]
    fn test_locate_missing() {
        assert!(locate_entry(Dialect::Outline, DOC, "* 2024-06-01 Sat").is_none());
        assert!(locate_entry(Dialect::Outline, "", "* 2024-06-01 Sat").is_none());
    }

    #[test]
    fn test_header_inside_body_line_is_ignored() {
        let doc = "## 2024-05-01 Wed\n\n### Raw Input\n\nsee ## 2024-05-02 Thu later\n\n";
        assert!(locate_entry(Dialect::Markdown, doc, "## 2024-05-02 Thu").is_none());
    }

    #[test]
    fn test_header_with_suffix_is_not_a_match() {
        // Entries written with a time stamp belong to a different header line.
        let doc = "* 2024-05-01 Wed 09:30\n** Things\n- a\n";
        assert!(locate_entry(Dialect::Outline, doc, "* 2024-05-01 Wed").is_none());
    }

    #[test]
    fn test_markdown_sections_do_not_end_block() {
        let doc = "## 2024-05-01 Wed\n\n### A\n\nx\n\n### B\n\ny\n\n";
        let range = locate_entry(Dialect::Markdown, doc, "## 2024-05-01 Wed").unwrap();
        assert_eq!(range, 0..doc.len());
    }

    #[test]
    fn test_find_line() {
        assert_eq!(find_line("a\nbc\nb", "b"), Some(5));
        assert_eq!(find_line("b", "b"), Some(0));
        assert_eq!(find_line("ab", "b"), None);
        assert_eq!(find_line("anything", ""), None);
    }

    #[test]
    fn test_find_line_crlf_and_trailing_space() {
        assert_eq!(find_line("x\r\n** Raw Input\r\nbody", "** Raw Input"), Some(3));
        assert_eq!(find_line("* 2024-05-01 Wed \n", "* 2024-05-01 Wed"), Some(0));
        assert_eq!(find_line("* 2024-05-01 Wed\t\r", "* 2024-05-01 Wed"), Some(0));
        assert_eq!(find_line("** Raw Input\rtail\n", "** Raw Input"), None);
    }

    #[test]
    fn test_locate_crlf_entry() {
        let doc = "* 2024-04-30 Tue\r\n** Raw Input\r\nold\r\n\r\n* 2024-05-01 Wed\r\n** Raw Input\r\nnew\r\n";
        let range = locate_entry(Dialect::Outline, doc, "* 2024-04-30 Tue").unwrap();
        assert_eq!(&doc[range], "* 2024-04-30 Tue\r\n** Raw Input\r\nold\r\n\r");
    }
}
