use clap::{Args, Subcommand};

use super::entry::OutputFormat;
use journalkeeper::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("format: {}", config.format);
                        println!("data_dir: {}", config.data_dir.display());
                        println!("storage: {}", config.storage_root().display());
                        println!("default_category: {}", config.default_category);
                        println!();

                        println!(
                            "summarizer: {}",
                            if config.gemini_api_key().is_some() {
                                format!("gemini ({})", config.gemini.model)
                            } else {
                                "disabled".to_string()
                            }
                        );
                        match config.git.remote() {
                            Some(remote) => println!(
                                "git sync: {} -> {} ({})",
                                config.git.repo_dir.display(),
                                remote.display_url(),
                                remote.branch
                            ),
                            None => println!("git sync: disabled"),
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
