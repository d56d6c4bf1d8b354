//! Entry commands: submit, save directly, show, list categories.

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use std::io::{self, Read};

use journalkeeper::summarizer::parse_field_mapping;
use journalkeeper::{Journal, MergeOutcome, ProcessOutcome, SaveReport};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reads `-` as stdin, anything else as literal text.
fn read_text(text: &str) -> Result<String, Box<dyn std::error::Error>> {
    if text == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim_end().to_string())
    } else {
        Ok(text.to_string())
    }
}

fn print_report(report: &SaveReport) {
    let action = match report.outcome {
        MergeOutcome::Created => "Created new entry in",
        MergeOutcome::Merged => "Merged into today's entry in",
    };
    println!("{} {}", action, report.path.display());
}

/// Summarize free text with the AI backend and save it
#[derive(Args)]
pub struct AddCommand {
    /// Entry text, or `-` to read from stdin
    pub text: String,

    /// Category (entry type)
    #[arg(long = "type", short = 't')]
    pub entry_type: Option<String>,
}

impl AddCommand {
    pub async fn run(&self, journal: &Journal) -> Result<(), Box<dyn std::error::Error>> {
        let content = read_text(&self.text)?;
        if content.trim().is_empty() {
            return Err("Entry text is empty".into());
        }
        let category = self
            .entry_type
            .clone()
            .unwrap_or_else(|| journal.registry().default_category().id.clone());

        match journal.process(&category, &content).await? {
            ProcessOutcome::Saved(report) => print_report(&report),
            ProcessOutcome::Skipped => {
                return Err("No summarizer configured. Set GEMINI_API_TOKEN or use `save`.".into())
            }
        }
        Ok(())
    }
}

/// Save a field mapping directly, without the AI backend
#[derive(Args)]
pub struct SaveCommand {
    /// Raw input text, or `-` to read from stdin
    pub raw: String,

    /// Fields as a JSON object, e.g. '{"happy_things": ["sun"]}'
    #[arg(long, default_value = "{}")]
    pub fields: String,

    /// Category (entry type)
    #[arg(long = "type", short = 't')]
    pub entry_type: Option<String>,

    /// Date of the entry (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl SaveCommand {
    pub async fn run(&self, journal: &Journal) -> Result<(), Box<dyn std::error::Error>> {
        let raw = read_text(&self.raw)?;
        let fields = parse_field_mapping(&self.fields)?;
        let category = self
            .entry_type
            .clone()
            .unwrap_or_else(|| journal.registry().default_category().id.clone());
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        let report = journal.save_on(date, &category, &fields, &raw).await?;
        print_report(&report);
        Ok(())
    }
}

/// Print a category's document
#[derive(Args)]
pub struct ShowCommand {
    /// Category (entry type)
    #[arg(long = "type", short = 't')]
    pub entry_type: Option<String>,
}

impl ShowCommand {
    pub async fn run(&self, journal: &Journal) -> Result<(), Box<dyn std::error::Error>> {
        let category = self
            .entry_type
            .clone()
            .unwrap_or_else(|| journal.registry().default_category().id.clone());
        print!("{}", journal.read(&category).await?);
        Ok(())
    }
}

/// List configured categories
#[derive(Args)]
pub struct CategoriesCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CategoriesCommand {
    pub fn run(&self, journal: &Journal) -> Result<(), Box<dyn std::error::Error>> {
        let registry = journal.registry();
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(registry.categories())?);
            }
            OutputFormat::Text => {
                let default_id = &registry.default_category().id;
                for category in registry.categories() {
                    let marker = if &category.id == default_id { " (default)" } else { "" };
                    println!(
                        "{}{}: {} -> {}",
                        category.id,
                        marker,
                        category.title,
                        journal.store().file_name(category)
                    );
                    for field in &category.fields {
                        println!("  - {}: {}", field, registry.field_title(field));
                    }
                }
            }
        }
        Ok(())
    }
}
