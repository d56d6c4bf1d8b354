use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::category::{builtin_categories, Category, CategoryError, CategoryRegistry};
use crate::engine::Dialect;
use crate::sync::GitRemote;

/// Gemini summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; summarization is skipped without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Git sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// GitHub user owning the repository
    pub username: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Access token used for clone, pull and push
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Working copy directory
    pub repo_dir: PathBuf,
    /// Branch to push to
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            username: None,
            repo: None,
            token: None,
            repo_dir: PathBuf::from("journal_storage"),
            branch: "main".to_string(),
        }
    }
}

impl GitConfig {
    /// Remote settings, if both user and repository are configured.
    pub fn remote(&self) -> Option<GitRemote> {
        match (&self.username, &self.repo) {
            (Some(username), Some(repo)) if !username.is_empty() && !repo.is_empty() => {
                Some(GitRemote {
                    username: username.clone(),
                    repo: repo.clone(),
                    token: self.token.clone().filter(|t| !t.is_empty()),
                    branch: self.branch.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the server listens on
    pub port: u16,
    /// Directory holding documents when git sync is off
    pub data_dir: PathBuf,
    /// Document dialect
    pub format: Dialect,
    /// Category used for unknown or missing category ids
    pub default_category: String,
    /// Summarizer settings
    pub gemini: GeminiConfig,
    /// Git sync settings
    pub git: GitConfig,
    /// Categories by id
    pub categories: BTreeMap<String, Category>,
    /// Extra section titles by field id
    pub field_titles: HashMap<String, String>,
    /// Config file the values were loaded from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("."),
            format: Dialect::Markdown,
            default_category: "journal".to_string(),
            gemini: GeminiConfig::default(),
            git: GitConfig::default(),
            categories: builtin_categories(),
            field_titles: HashMap::new(),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path
            .or_else(|| std::env::var("JOURNAL_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
            config.config_file = Some(path);
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("JOURNAL_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JOURNAL_PORT", port))?;
        }
        if let Ok(data_dir) = std::env::var("JOURNAL_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(format) = std::env::var("JOURNAL_FORMAT") {
            self.format = format
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JOURNAL_FORMAT", format))?;
        }
        if let Ok(key) = std::env::var("GEMINI_API_TOKEN") {
            self.gemini.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Ok(username) = std::env::var("GIT_USERNAME") {
            self.git.username = Some(username);
        }
        if let Ok(repo) = std::env::var("GIT_REPO_NAME") {
            self.git.repo = Some(repo);
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            self.git.token = Some(token);
        }
        Ok(())
    }

    /// Default config file path: ~/.config/journalkeeper/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("journalkeeper")
            .join("config.yaml")
    }

    /// Summarizer API key, if one is set and non-empty.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Directory documents are stored in: the git working copy when git
    /// sync is configured, the data directory otherwise.
    pub fn storage_root(&self) -> PathBuf {
        if self.git.remote().is_some() {
            self.git.repo_dir.clone()
        } else {
            self.data_dir.clone()
        }
    }

    /// Builds the category registry described by this config.
    pub fn registry(&self) -> Result<CategoryRegistry, ConfigError> {
        CategoryRegistry::new(
            self.categories.clone(),
            self.field_titles.clone(),
            &self.default_category,
        )
        .map_err(ConfigError::CategoryError)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
    CategoryError(CategoryError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
            ConfigError::CategoryError(e) => write!(f, "Invalid categories: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.format, Dialect::Markdown);
        assert_eq!(config.default_category, "journal");
        assert!(config.categories.contains_key("journal"));
        assert!(config.categories.contains_key("notes"));
        assert!(config.git.remote().is_none());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.default_category, "journal");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /srv/journal").unwrap();
        writeln!(file, "format: org").unwrap();
        writeln!(file, "default_category: dreams").unwrap();
        writeln!(file, "categories:").unwrap();
        writeln!(file, "  dreams:").unwrap();
        writeln!(file, "    title: Dreams").unwrap();
        writeln!(file, "    file: dreams").unwrap();
        writeln!(file, "    fields: [setting, people]").unwrap();
        writeln!(file, "field_titles:").unwrap();
        writeln!(file, "  setting: Where it happened").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/journal"));
        assert_eq!(config.format, Dialect::Outline);
        assert_eq!(config.config_file, Some(config_path));

        let registry = config.registry().unwrap();
        assert_eq!(registry.categories().len(), 1);
        assert_eq!(registry.resolve("anything").id, "dreams");
        assert_eq!(registry.field_title("setting"), "Where it happened");
    }

    #[test]
    fn test_git_remote_requires_user_and_repo() {
        let mut git = GitConfig::default();
        assert!(git.remote().is_none());

        git.username = Some("alice".to_string());
        assert!(git.remote().is_none());

        git.repo = Some("diary".to_string());
        git.token = Some(String::new());
        let remote = git.remote().unwrap();
        assert_eq!(remote.repo, "diary");
        assert!(remote.token.is_none());
    }

    #[test]
    fn test_storage_root_follows_git() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/data");
        assert_eq!(config.storage_root(), PathBuf::from("/data"));

        config.git.username = Some("alice".to_string());
        config.git.repo = Some("diary".to_string());
        assert_eq!(config.storage_root(), PathBuf::from("journal_storage"));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut config = Config::default();
        config.gemini.api_key = Some("secret-key".to_string());
        config.git.token = Some("secret-token".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
