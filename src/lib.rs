//! journalkeeper
//!
//! Turns free-text reflections into structured, dated entries in a plain
//! Org or Markdown document, one document per category. Saves on the same
//! day merge into that day's entry instead of starting a new one.

pub mod category;
pub mod config;
pub mod engine;
pub mod journal;
pub mod server;
pub mod store;
pub mod summarizer;
pub mod sync;

pub use category::{Category, CategoryError, CategoryRegistry};
pub use config::{Config, ConfigError};
pub use engine::{Dialect, FieldValue, FieldValues, MergeOutcome};
pub use journal::{Journal, JournalError, ProcessOutcome, SaveReport};
pub use store::{DocumentStore, StoreError};
pub use summarizer::{GeminiSummarizer, SummarizeError, Summarizer};
pub use sync::{DocumentSync, GitSync, SyncError};
