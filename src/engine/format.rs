//! Rendering of a single section.

use super::dialect::Dialect;
use super::value::FieldValue;

/// Renders one section: header line, body lines, and the dialect's padding.
///
/// Body lines that would read as headers are escaped.
pub fn format_section(dialect: Dialect, title: &str, value: &FieldValue) -> String {
    let mut out = String::new();
    out.push_str(&dialect.section_header(title));
    out.push('\n');
    if dialect.pads_blocks() {
        out.push('\n');
    }

    for line in value.lines() {
        out.push_str(&dialect.escape_body(&line));
        out.push('\n');
    }

    if dialect.pads_blocks() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_scalar() {
        let out = format_section(
            Dialect::Outline,
            "General Emotional Checkin",
            &FieldValue::from("calm"),
        );
        assert_eq!(out, "** General Emotional Checkin\ncalm\n");
    }

    #[test]
    fn test_outline_list() {
        let out = format_section(
            Dialect::Outline,
            "Things that made me happy",
            &FieldValue::from(vec!["sun", "tea"]),
        );
        assert_eq!(out, "** Things that made me happy\n- sun\n- tea\n");
    }

    #[test]
    fn test_markdown_padding() {
        let out = format_section(Dialect::Markdown, "Raw Input", &FieldValue::from("hi"));
        assert_eq!(out, "### Raw Input\n\nhi\n\n");
    }

    #[test]
    fn test_empty_list_renders_header_only() {
        let out = format_section(Dialect::Outline, "Focus", &FieldValue::List(Vec::new()));
        assert_eq!(out, "** Focus\n");
    }

    #[test]
    fn test_header_like_body_is_escaped() {
        let out = format_section(
            Dialect::Markdown,
            "Raw Input",
            &FieldValue::from("line one\n## 2020-01-01 Wed"),
        );
        assert_eq!(out, "### Raw Input\n\nline one\n\\## 2020-01-01 Wed\n\n");
    }
}
