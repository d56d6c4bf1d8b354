//! Append-only merge engine for dated journal documents.
//!
//! A document is a flat sequence of dated entries, each holding named
//! sections:
//!
//! ```text
//! * 2024-05-01 Wed
//! ** General Emotional Checkin
//! calm
//! ** Raw Input
//! today was fine
//! ```
//!
//! The engine never builds a tree. It finds entries and sections by
//! whole-line header search and splices new lines into the text, so bytes
//! outside the insertion points are preserved exactly.

pub mod dialect;
pub mod format;
pub mod locate;
pub mod merge;
pub mod splice;
pub mod value;

pub use dialect::Dialect;
pub use format::format_section;
pub use locate::locate_entry;
pub use merge::{format_entry, merge_document, EntryUpdate, MergeOutcome, RAW_INPUT_TITLE};
pub use splice::append_to_section;
pub use value::{field_values_from_json, FieldValue, FieldValues};
