//! Producing the next version of a document for one save.

use chrono::NaiveDate;

use super::dialect::Dialect;
use super::format::format_section;
use super::locate::locate_entry;
use super::splice::append_to_section;
use super::value::FieldValue;

/// Title of the section that carries the unprocessed input text.
pub const RAW_INPUT_TITLE: &str = "Raw Input";

/// Content for one save, already resolved against a category.
#[derive(Debug, Clone)]
pub struct EntryUpdate<'a> {
    /// `(section title, value)` pairs in the category's field order.
    pub sections: Vec<(String, &'a FieldValue)>,
    /// Original input text, always written last.
    pub raw_input: &'a str,
}

/// How a save changed the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new dated entry was appended.
    Created,
    /// Content was merged into the existing entry for the day.
    Merged,
}

/// Returns the full document text after applying `update` for `date`.
pub fn merge_document(
    dialect: Dialect,
    existing: &str,
    date: NaiveDate,
    update: &EntryUpdate<'_>,
) -> (String, MergeOutcome) {
    let date_header = dialect.date_header(date);

    match locate_entry(dialect, existing, &date_header) {
        Some(range) => {
            let mut block = existing[range.clone()].to_string();
            for (title, value) in &update.sections {
                let header = dialect.section_header(title);
                for line in value.lines() {
                    block = append_to_section(dialect, &block, &header, &dialect.escape_body(&line));
                }
            }
            block = append_to_section(
                dialect,
                &block,
                &dialect.section_header(RAW_INPUT_TITLE),
                &dialect.escape_body(update.raw_input),
            );

            let mut out = String::with_capacity(existing.len() + block.len());
            out.push_str(&existing[..range.start]);
            out.push_str(&block);
            out.push_str(&existing[range.end..]);
            (out, MergeOutcome::Merged)
        }
        None => {
            let mut out = String::with_capacity(existing.len() + 256);
            out.push_str(existing);
            if !existing.is_empty() && !existing.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&date_header);
            out.push('\n');
            out.push_str(&format_entry(dialect, update));
            (out, MergeOutcome::Created)
        }
    }
}

/// Renders the sections of a brand-new entry, raw input last, followed by a
/// blank separator line.
pub fn format_entry(dialect: Dialect, update: &EntryUpdate<'_>) -> String {
    let mut out = String::new();
    for (title, value) in &update.sections {
        out.push_str(&format_section(dialect, title, value));
    }
    out.push_str(&format_section(
        dialect,
        RAW_INPUT_TITLE,
        &FieldValue::Scalar(update.raw_input.to_string()),
    ));
    out.push('\n');
    out
}
