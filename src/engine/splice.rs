//! Inserting a line into a named section of an entry block.

use super::dialect::Dialect;
use super::locate::find_line;

/// Adds `line` to the section headed by `section_header` inside `block`.
///
/// When the section exists the line becomes its new last line, placed just
/// before the next section header. Otherwise the section is created at the
/// end of the block. Existing text is never moved or removed.
pub fn append_to_section(dialect: Dialect, block: &str, section_header: &str, line: &str) -> String {
    let Some(idx) = find_line(block, section_header) else {
        let mut out = String::with_capacity(block.len() + section_header.len() + line.len() + 4);
        out.push_str(block);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(section_header);
        out.push_str(if dialect.pads_blocks() { "\n\n" } else { "\n" });
        out.push_str(line);
        out.push('\n');
        return out;
    };

    let body_start = idx + section_header.len();
    match block[body_start..].find(&dialect.section_pattern()) {
        Some(rel) => {
            let insert_at = body_start + rel;
            let mut out = String::with_capacity(block.len() + line.len() + 1);
            out.push_str(&block[..insert_at]);
            out.push('\n');
            out.push_str(line);
            out.push_str(&block[insert_at..]);
            out
        }
        None => {
            let mut out = String::with_capacity(block.len() + line.len() + 2);
            out.push_str(block);
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(line);
            out.push('\n');
            out
        }
    }
}
