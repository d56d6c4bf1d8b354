//! Saving into category documents.
//!
//! `Journal` ties the merge engine to storage and the external
//! collaborators. Saves to one category are serialized by a per-category
//! lock, so two concurrent saves can't both read the old text and overwrite
//! each other's insertions. Saves to different categories run in parallel.

use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::category::{Category, CategoryRegistry};
use crate::config::{Config, ConfigError};
use crate::engine::{merge_document, Dialect, FieldValues, MergeOutcome};
use crate::store::{DocumentStore, StoreError};
use crate::summarizer::{build_prompt, parse_field_mapping, GeminiSummarizer, SummarizeError, Summarizer};
use crate::sync::{DocumentSync, GitSync};

/// Errors that abandon a save or read.
#[derive(Debug)]
pub enum JournalError {
    /// Reading or writing the document failed.
    Store(StoreError),
    /// The summarizer failed or returned an unusable payload.
    Summarize(SummarizeError),
}

impl std::fmt::Display for JournalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalError::Store(e) => write!(f, "Storage error: {}", e),
            JournalError::Summarize(e) => write!(f, "Summarizer error: {}", e),
        }
    }
}

impl std::error::Error for JournalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JournalError::Store(e) => Some(e),
            JournalError::Summarize(e) => Some(e),
        }
    }
}

impl From<StoreError> for JournalError {
    fn from(e: StoreError) -> Self {
        JournalError::Store(e)
    }
}

impl From<SummarizeError> for JournalError {
    fn from(e: SummarizeError) -> Self {
        JournalError::Summarize(e)
    }
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// Category actually written, after fallback.
    pub category: String,
    /// Document path.
    pub path: PathBuf,
    /// Whether a new entry was created or merged into.
    pub outcome: MergeOutcome,
}

/// Result of processing free text.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// Summarized and saved.
    Saved(SaveReport),
    /// No summarizer is configured, nothing was written.
    Skipped,
}

/// Category documents plus the collaborators around them.
pub struct Journal {
    registry: CategoryRegistry,
    store: DocumentStore,
    dialect: Dialect,
    summarizer: Option<Arc<dyn Summarizer>>,
    sync: Option<Arc<dyn DocumentSync>>,
    /// Per-category save locks, keyed by category id.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Journal {
    /// Creates a journal without a summarizer or sync.
    pub fn new(registry: CategoryRegistry, store: DocumentStore, dialect: Dialect) -> Self {
        Self {
            registry,
            store,
            dialect,
            summarizer: None,
            sync: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_sync(mut self, sync: Arc<dyn DocumentSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Opens the configured documents without a summarizer or sync.
    ///
    /// Nothing is cloned, pulled or created, so this suits read-only use.
    pub fn open(config: &Config) -> Result<Self, ConfigError> {
        let registry = config.registry()?;
        let store = DocumentStore::new(config.storage_root(), config.format);
        Ok(Journal::new(registry, store, config.format))
    }

    /// Builds a journal from configuration.
    ///
    /// When git sync is configured the working copy is cloned or pulled and
    /// an empty document is created for every category that lacks one.
    /// Git failures are logged; the journal still works locally.
    pub async fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut journal = Journal::open(config)?;

        match config.gemini_api_key() {
            Some(key) => match GeminiSummarizer::new(key.to_string(), config.gemini.model.clone()) {
                Ok(summarizer) => journal = journal.with_summarizer(Arc::new(summarizer)),
                Err(e) => tracing::error!("Failed to create summarizer: {}", e),
            },
            None => {
                tracing::warn!("GEMINI_API_TOKEN not set. AI summarization is disabled.")
            }
        }

        match config.git.remote() {
            Some(remote) => {
                let git = GitSync::new(config.git.repo_dir.clone(), remote);
                if let Err(e) = git.init().await {
                    tracing::error!("Error initializing git repo: {}", e);
                }
                for category in journal.registry.categories() {
                    match journal.store.ensure_exists(category) {
                        Ok(true) => {
                            tracing::info!("Created {}", journal.store.file_name(category))
                        }
                        Ok(false) => {}
                        Err(e) => tracing::error!("{}", e),
                    }
                }
                journal = journal.with_sync(Arc::new(git));
            }
            None => tracing::warn!("GIT_USERNAME or GIT_REPO_NAME not set. Git sync is disabled."),
        }

        Ok(journal)
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Returns the full current text of a category's document.
    pub async fn read(&self, category: &str) -> Result<String, JournalError> {
        let category = self.registry.resolve(category);
        Ok(self.store.read(category)?)
    }

    /// Saves fields and raw input under today's date.
    pub async fn save(
        &self,
        category: &str,
        fields: &FieldValues,
        raw_input: &str,
    ) -> Result<SaveReport, JournalError> {
        self.save_on(Local::now().date_naive(), category, fields, raw_input)
            .await
    }

    /// Saves fields and raw input under `date`.
    ///
    /// Opens a new dated entry, or merges into the existing one for that day.
    /// The sync collaborator is notified after the write; its failures are
    /// logged and never undo the write.
    pub async fn save_on(
        &self,
        date: NaiveDate,
        category: &str,
        fields: &FieldValues,
        raw_input: &str,
    ) -> Result<SaveReport, JournalError> {
        let category = self.registry.resolve(category);

        let (path, outcome) = {
            let lock = self.category_lock(category).await;
            let _guard = lock.lock().await;
            self.merge_and_write(category, date, fields, raw_input)?
        };

        tracing::info!(
            "Saved {} entry for {} ({:?})",
            category.id,
            date,
            outcome
        );

        if let Some(sync) = &self.sync {
            if let Err(e) = sync.sync(&path).await {
                tracing::error!("Error syncing {}: {}", path.display(), e);
            }
        }

        Ok(SaveReport {
            category: category.id.clone(),
            path,
            outcome,
        })
    }

    /// Summarizes free text into the category's fields and saves it.
    pub async fn process(&self, category: &str, content: &str) -> Result<ProcessOutcome, JournalError> {
        let Some(summarizer) = &self.summarizer else {
            tracing::warn!("Skipping AI processing: no summarizer configured");
            return Ok(ProcessOutcome::Skipped);
        };

        let resolved = self.registry.resolve(category);
        let prompt = build_prompt(&self.registry, resolved, content);

        let payload = summarizer.complete(&prompt).await?;
        tracing::debug!("Summarizer returned:\n{}", payload);

        let fields = match parse_field_mapping(&payload) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!("Error parsing summarizer response: {}\nRaw response: {}", e, payload);
                return Err(e.into());
            }
        };

        let report = self.save(&resolved.id, &fields, content).await?;
        Ok(ProcessOutcome::Saved(report))
    }

    fn merge_and_write(
        &self,
        category: &Category,
        date: NaiveDate,
        fields: &FieldValues,
        raw_input: &str,
    ) -> Result<(PathBuf, MergeOutcome), StoreError> {
        let existing = self.store.read(category)?;
        let update = self.registry.entry_update(category, fields, raw_input);
        let (text, outcome) = merge_document(self.dialect, &existing, date, &update);
        let path = self.store.write(category, &text)?;
        Ok((path, outcome))
    }

    async fn category_lock(&self, category: &Category) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(category.id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
