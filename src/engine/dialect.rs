use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Header conventions of a journal document.
///
/// `Outline` is Org markup (`*` entries, `**` sections), `Markdown` uses
/// `##` entries and `###` sections with blank-line padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(rename = "org", alias = "outline")]
    Outline,
    #[default]
    Markdown,
}

impl Dialect {
    /// Marker that opens a dated entry.
    pub fn top_marker(&self) -> &'static str {
        match self {
            Dialect::Outline => "*",
            Dialect::Markdown => "##",
        }
    }

    /// Marker that opens a section inside an entry.
    pub fn section_marker(&self) -> &'static str {
        match self {
            Dialect::Outline => "**",
            Dialect::Markdown => "###",
        }
    }

    /// Pattern marking the start of the next entry: newline, marker, space.
    pub fn top_level_pattern(&self) -> String {
        format!("\n{} ", self.top_marker())
    }

    /// Pattern marking the start of the next section: newline, marker, space.
    pub fn section_pattern(&self) -> String {
        format!("\n{} ", self.section_marker())
    }

    /// Full header line for a section title, without the trailing newline.
    pub fn section_header(&self, title: &str) -> String {
        format!("{} {}", self.section_marker(), title)
    }

    /// Date header line for a day, e.g. `* 2024-05-01 Wed`.
    pub fn date_header(&self, date: NaiveDate) -> String {
        format!("{} {}", self.top_marker(), date.format("%Y-%m-%d %a"))
    }

    /// Whether headers and bodies are followed by a blank line.
    pub fn pads_blocks(&self) -> bool {
        matches!(self, Dialect::Markdown)
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Dialect::Outline => "org",
            Dialect::Markdown => "md",
        }
    }

    /// Escapes a body line that would otherwise read as a header.
    ///
    /// Org headings must start at column 0, so a leading space neutralises
    /// them. Markdown takes a backslash in front of the `#` run.
    pub fn escape_body_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let marker = match self {
            Dialect::Outline => '*',
            Dialect::Markdown => '#',
        };
        let rest = line.trim_start_matches(marker);
        let is_header_like = rest.len() < line.len() && (rest.is_empty() || rest.starts_with(' '));
        if !is_header_like {
            return Cow::Borrowed(line);
        }
        match self {
            Dialect::Outline => Cow::Owned(format!(" {}", line)),
            Dialect::Markdown => Cow::Owned(format!("\\{}", line)),
        }
    }

    /// Escapes every line of a possibly multi-line body.
    pub fn escape_body(&self, body: &str) -> String {
        body.split('\n')
            .map(|line| self.escape_body_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Outline => write!(f, "org"),
            Dialect::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "org" | "outline" => Ok(Dialect::Outline),
            "markdown" | "md" => Ok(Dialect::Markdown),
            _ => Err(format!(
                "Invalid journal format '{}'. Valid options: org, markdown",
                s
            )),
        }
    }
}
