//! Document file storage.
//!
//! Each category is one flat text file under the storage root:
//! ```text
//! <ROOT>/
//!   journal.md
//!   notes.md
//! ```
//!
//! The root is either the data directory or the git working copy. Writes
//! replace the whole file through a temp file and a rename, so a failed write
//! leaves the previous content in place.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::engine::Dialect;

/// Errors that can occur during document storage operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// The file exists but is not valid UTF-8.
    InvalidUtf8(PathBuf),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::InvalidUtf8(path) => {
                write!(f, "Document {} is not valid UTF-8", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(_, e) => Some(e),
            StoreError::InvalidUtf8(_) => None,
        }
    }
}

/// Reads and writes category documents under a root directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    dialect: Dialect,
}

impl DocumentStore {
    /// Creates a store rooted at `root`, naming files for `dialect`.
    pub fn new(root: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            root: root.into(),
            dialect,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name of a category's document, e.g. `journal.org`.
    pub fn file_name(&self, category: &Category) -> String {
        format!("{}.{}", category.file, self.dialect.file_extension())
    }

    /// Full path of a category's document.
    pub fn path(&self, category: &Category) -> PathBuf {
        self.root.join(self.file_name(category))
    }

    /// Reads a category's document.
    ///
    /// Returns an empty string if the document doesn't exist yet.
    pub fn read(&self, category: &Category) -> Result<String, StoreError> {
        let path = self.path(category);

        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| StoreError::InvalidUtf8(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StoreError::IoError(path, e)),
        }
    }

    /// Replaces a category's document with `text`.
    ///
    /// Creates the root directory if it doesn't exist.
    pub fn write(&self, category: &Category, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.path(category);

        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::IoError(self.root.clone(), e))?;

        let temp_path = path.with_extension(format!("{}.tmp", self.dialect.file_extension()));

        let mut file = File::create(&temp_path)
            .map_err(|e| StoreError::IoError(temp_path.clone(), e))?;

        file.write_all(text.as_bytes())
            .map_err(|e| StoreError::IoError(temp_path.clone(), e))?;

        file.sync_all()
            .map_err(|e| StoreError::IoError(temp_path.clone(), e))?;

        fs::rename(&temp_path, &path).map_err(|e| StoreError::IoError(path.clone(), e))?;

        Ok(path)
    }

    /// Creates an empty document for the category if none exists.
    ///
    /// Returns true if a file was created.
    pub fn ensure_exists(&self, category: &Category) -> Result<bool, StoreError> {
        let path = self.path(category);
        if path.exists() {
            return Ok(false);
        }
        self.write(category, "")?;
        Ok(true)
    }
}
