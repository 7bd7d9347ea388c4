use clap::{Args, Parser, Subcommand};
use configuration::{Config, LogFormat};
use std::path::PathBuf;

/// A console tool for recording student grades and viewing class analytics.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to an optional `config.toml` in the working directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Connect to this database URL instead of the configured candidates
    /// (e.g. "mysql://root@127.0.0.1:3306/grades_dashboard" or "sqlite://grades.db").
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Log filter, e.g. "debug" or "database=debug".
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Open the interactive menu (the default).
    Menu,
    /// Print every student record.
    List,
    /// Find students by name or by section.
    Search(SearchArgs),
    /// Print the grade analytics dashboard.
    Analytics,
}

#[derive(Args, Debug, Clone, PartialEq)]
#[group(required = true, multiple = false)]
pub struct SearchArgs {
    /// Case-insensitive part of a name.
    #[arg(long)]
    pub name: Option<String>,

    /// Exact section, ignoring case.
    #[arg(long)]
    pub section: Option<String>,
}

impl Cli {
    /// Applies the command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(url) = &self.database_url {
            config = config.with_database_url(url);
        }
        if let Some(level) = &self.log_level {
            config = config.with_log_level(level);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config
    }

    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Menu)
    }
}
