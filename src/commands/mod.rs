mod config_cmd;
mod entry;

pub use config_cmd::ConfigCommand;
pub use entry::{AddCommand, CategoriesCommand, SaveCommand, ShowCommand};
