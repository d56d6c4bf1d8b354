//! Entry categories and the field title table.
//!
//! Each category names one document file and the ordered fields its entries
//! carry. Categories are fixed once the process has loaded its config.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::engine::{EntryUpdate, FieldValues};

/// Configuration of one kind of document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier used by callers, e.g. `journal`.
    #[serde(skip_deserializing)]
    pub id: String,
    /// Display title.
    pub title: String,
    /// File basename, without extension.
    pub file: String,
    /// Field ids in rendering order.
    pub fields: Vec<String>,
    /// Instruction handed to the summarizer for this category.
    #[serde(default)]
    pub prompt: String,
}

/// Errors raised while building a registry.
#[derive(Debug)]
pub enum CategoryError {
    /// No categories were configured.
    Empty,
    /// The default category is not among the configured ones.
    UnknownDefault(String),
    /// A category file name that would escape the storage directory.
    InvalidFile(String),
}

impl std::fmt::Display for CategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryError::Empty => write!(f, "No categories configured"),
            CategoryError::UnknownDefault(id) => {
                write!(f, "Default category '{}' is not configured", id)
            }
            CategoryError::InvalidFile(file) => write!(f, "Invalid category file name: {}", file),
        }
    }
}

impl std::error::Error for CategoryError {}

/// Every category known to the process, plus field titles.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    field_titles: HashMap<String, String>,
    default_category: String,
}

impl CategoryRegistry {
    /// Builds a registry from configured categories.
    ///
    /// `field_titles` only adds to the built-in title table. Built-in titles
    /// name headers in existing documents, so a configured title for the same
    /// id is ignored.
    pub fn new(
        categories: BTreeMap<String, Category>,
        field_titles: HashMap<String, String>,
        default_category: &str,
    ) -> Result<Self, CategoryError> {
        if categories.is_empty() {
            return Err(CategoryError::Empty);
        }
        if !categories.contains_key(default_category) {
            return Err(CategoryError::UnknownDefault(default_category.to_string()));
        }

        let mut list = Vec::with_capacity(categories.len());
        for (id, mut category) in categories {
            validate_file_name(&category.file)?;
            category.id = id;
            list.push(category);
        }

        let mut titles = builtin_field_titles();
        for (field, title) in field_titles {
            if titles.contains_key(&field) {
                tracing::warn!("Ignoring title for built-in field '{}'", field);
                continue;
            }
            titles.insert(field, title);
        }

        Ok(Self {
            categories: list,
            field_titles: titles,
            default_category: default_category.to_string(),
        })
    }

    /// Registry with the built-in `journal` and `notes` categories.
    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories().into_values().collect(),
            field_titles: builtin_field_titles(),
            default_category: "journal".to_string(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn default_category(&self) -> &Category {
        // Presence is checked in `new`.
        self.get(&self.default_category)
            .unwrap_or(&self.categories[0])
    }

    /// Looks up a category, falling back to the default for unknown ids.
    pub fn resolve(&self, id: &str) -> &Category {
        match self.get(id) {
            Some(category) => category,
            None => {
                let fallback = self.default_category();
                tracing::warn!(
                    "Unknown category '{}', using '{}' instead",
                    id,
                    fallback.id
                );
                fallback
            }
        }
    }

    /// Section title for a field id. Unknown ids are their own title.
    pub fn field_title<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_titles
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }

    /// Orders the supplied values by the category's field list.
    ///
    /// Fields that the category does not declare are dropped.
    pub fn entry_update<'a>(
        &self,
        category: &Category,
        fields: &'a FieldValues,
        raw_input: &'a str,
    ) -> EntryUpdate<'a> {
        let sections = category
            .fields
            .iter()
            .filter_map(|field| {
                fields
                    .get(field)
                    .map(|value| (self.field_title(field).to_string(), value))
            })
            .collect();

        EntryUpdate {
            sections,
            raw_input,
        }
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_file_name(file: &str) -> Result<(), CategoryError> {
    if file.is_empty()
        || file.contains('/')
        || file.contains('\\')
        || file.contains("..")
        || file.starts_with('.')
    {
        return Err(CategoryError::InvalidFile(file.to_string()));
    }
    Ok(())
}

/// Built-in categories, keyed by id.
pub fn builtin_categories() -> BTreeMap<String, Category> {
    let journal = Category {
        id: "journal".to_string(),
        title: "Journal".to_string(),
        file: "journal".to_string(),
        fields: vec![
            "emotional_checkin".to_string(),
            "happy_things".to_string(),
            "stressful_things".to_string(),
            "focus_items".to_string(),
        ],
        prompt: "Analyze the following journal entry. \"emotional_checkin\" is a general \
                 assessment of the emotional state. \"happy_things\" lists things that made \
                 the author happy, \"stressful_things\" lists things that were stressful and \
                 \"focus_items\" lists things the author wants to focus on next time."
            .to_string(),
    };
    let notes = Category {
        id: "notes".to_string(),
        title: "Notes".to_string(),
        file: "notes".to_string(),
        fields: vec![
            "summary".to_string(),
            "key_points".to_string(),
            "action_items".to_string(),
        ],
        prompt: "Summarize the following note. \"summary\" is a one or two sentence summary. \
                 \"key_points\" lists the important points and \"action_items\" lists concrete \
                 follow-ups, if any."
            .to_string(),
    };

    [journal, notes]
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect()
}

/// Built-in section titles for the built-in fields.
pub fn builtin_field_titles() -> HashMap<String, String> {
    [
        ("emotional_checkin", "General Emotional Checkin"),
        ("happy_things", "Things that made me happy"),
        ("stressful_things", "Things that were stressful"),
        ("focus_items", "Things I want to focus on doing for next time"),
        ("summary", "Summary"),
        ("key_points", "Key Points"),
        ("action_items", "Action Items"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldValue;

    #[test]
    fn test_builtin_registry() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.categories().len(), 2);
        assert_eq!(registry.default_category().id, "journal");
        assert_eq!(registry.get("notes").unwrap().file, "notes");
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.resolve("dreams").id, "journal");
        assert_eq!(registry.resolve("notes").id, "notes");
    }

    #[test]
    fn test_field_title_fallback() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.field_title("happy_things"), "Things that made me happy");
        assert_eq!(registry.field_title("mystery"), "mystery");
    }

    #[test]
    fn test_entry_update_follows_category_order() {
        let registry = CategoryRegistry::builtin();
        let category = registry.resolve("journal");

        let mut fields = FieldValues::new();
        fields.insert("focus_items".to_string(), FieldValue::from(vec!["sleep"]));
        fields.insert("emotional_checkin".to_string(), FieldValue::from("calm"));
        fields.insert("undeclared".to_string(), FieldValue::from("dropped"));

        let update = registry.entry_update(category, &fields, "raw");
        let titles: Vec<&str> = update.sections.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "General Emotional Checkin",
                "Things I want to focus on doing for next time"
            ]
        );
        assert_eq!(update.raw_input, "raw");
    }

    #[test]
    fn test_new_rejects_unknown_default() {
        let result = CategoryRegistry::new(builtin_categories(), HashMap::new(), "dreams");
        assert!(matches!(result, Err(CategoryError::UnknownDefault(_))));
    }

    #[test]
    fn test_new_rejects_path_like_file() {
        let mut categories = builtin_categories();
        if let Some(c) = categories.get_mut("notes") {
            c.file = "../escape".to_string();
        }
        let result = CategoryRegistry::new(categories, HashMap::new(), "journal");
        assert!(matches!(result, Err(CategoryError::InvalidFile(_))));
    }

    #[test]
    fn test_new_extends_field_titles() {
        let mut titles = HashMap::new();
        titles.insert("summary".to_string(), "TL;DR".to_string());
        titles.insert("gratitude".to_string(), "Gratitude".to_string());

        let registry = CategoryRegistry::new(builtin_categories(), titles, "journal").unwrap();
        assert_eq!(registry.field_title("summary"), "Summary");
        assert_eq!(registry.field_title("gratitude"), "Gratitude");
        assert_eq!(registry.field_title("key_points"), "Key Points");
    }

    #[test]
    fn test_category_from_yaml() {
        let yaml = "title: Dreams\nfile: dreams\nfields: [setting, people]\n";
        let category: Category = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(category.fields, vec!["setting", "people"]);
        assert!(category.prompt.is_empty());
    }
}
