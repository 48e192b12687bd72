//! sheetmarks CLI
//!
//! Command-line interface for sheetmarks - bookmarks kept in a spreadsheet.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sheetmarks_core::{
    BookmarkService, Config, RowStore, ServiceError, SheetsWorksheet, StoreError,
};

mod commands;
mod metadata;
mod output;
mod prompt;

use commands::bookmark::AddArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "sheetmarks")]
#[command(about = "sheetmarks - Personal bookmarks kept in a spreadsheet")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new bookmark
    Add {
        /// URL to save (must include the scheme, e.g. https://)
        url: String,
        /// Bookmark title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Category (see `sheetmarks categories`)
        #[arg(short, long, default_value = "Offensive Security")]
        category: String,
        /// Tags to add (repeat or comma-separate)
        #[arg(short, long, value_delimiter = ',')]
        tag: Vec<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Use the page's title when --title is not given
        #[arg(long)]
        fetch_title: bool,
    },
    /// List bookmarks, newest first
    #[command(alias = "ls")]
    List,
    /// Search bookmarks in every field
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },
    /// Delete a bookmark by index
    #[command(alias = "rm")]
    Delete {
        /// Index shown by `list`, `search` or `duplicates`
        index: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Open a bookmark in the browser
    Open {
        /// Index shown by `list`
        index: usize,
    },
    /// Show bookmarks that share a URL
    #[command(alias = "dupes")]
    Duplicates,
    /// Show bookmark counts
    Status,
    /// List the accepted categories
    Categories,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (spreadsheet_id, worksheet, access_token, api_url, timeout_secs, log_file)
        key: String,
        /// Configuration value ("none" clears optional keys)
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(ref e) = result {
        if let Some(hint) = recovery_suggestion(e) {
            if !output.is_quiet() {
                eprintln!("hint: {}", hint);
            }
        }
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Commands that don't need the spreadsheet
    let command = match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, config_path, output);
        }
        Commands::Categories => return commands::bookmark::categories(output),
        other => other,
    };

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let sheet = SheetsWorksheet::from_config(&config)?;
    debug!("Using worksheet '{}'", sheet.worksheet_name());
    let mut service = BookmarkService::new(RowStore::new(sheet));

    match command {
        Commands::Add {
            url,
            title,
            category,
            tag,
            notes,
            fetch_title,
        } => commands::bookmark::add(
            &mut service,
            AddArgs {
                url,
                title,
                category,
                tags: tag,
                notes,
                fetch_title,
            },
            output,
        ),
        Commands::List => commands::bookmark::list(&service, output),
        Commands::Search { query } => commands::bookmark::search(&service, query, output),
        Commands::Delete { index, yes } => {
            commands::bookmark::delete(&mut service, index, yes, output)
        }
        Commands::Open { index } => commands::bookmark::open(&service, index, output),
        Commands::Duplicates => commands::bookmark::duplicates(&service, output),
        Commands::Status => commands::status::show(&service, output),
        Commands::Config { .. } | Commands::Categories => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Recovery hint for store and service errors anywhere in the chain
fn recovery_suggestion(error: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = error.downcast_ref::<ServiceError>() {
        return e.recovery_suggestion();
    }
    error
        .downcast_ref::<StoreError>()
        .and_then(StoreError::recovery_suggestion)
}

/// Initialize logging
///
/// Only initializes if SHEETMARKS_LOG environment variable is set.
/// Logs to config.log_file when set, stderr otherwise.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SHEETMARKS_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "sheetmarks_core={},sheetmarks_cli={}",
        log_level, log_level
    ));

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();

            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(vec!["sheetmarks"]).is_err());
    }

    #[test]
    fn test_add_with_tags() {
        let cli = Cli::try_parse_from(vec![
            "sheetmarks",
            "add",
            "https://sliver.sh",
            "--title",
            "Sliver",
            "--tag",
            "c2,redteam",
            "-t",
            "golang",
        ])
        .unwrap();

        match cli.command {
            Commands::Add {
                url,
                title,
                category,
                tag,
                ..
            } => {
                assert_eq!(url, "https://sliver.sh");
                assert_eq!(title, Some("Sliver".to_string()));
                assert_eq!(category, "Offensive Security");
                assert_eq!(tag, vec!["c2", "redteam", "golang"]);
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_add_has_no_editor_flag() {
        assert!(Cli::try_parse_from(vec!["sheetmarks", "add", "https://a.com", "--edit"]).is_err());

        let cli =
            Cli::try_parse_from(vec!["sheetmarks", "add", "https://a.com", "-n", "read later"])
                .unwrap();
        match cli.command {
            Commands::Add { notes, .. } => assert_eq!(notes, Some("read later".to_string())),
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_delete_rejects_negative_index() {
        assert!(Cli::try_parse_from(vec!["sheetmarks", "delete", "-1"]).is_err());

        let cli = Cli::try_parse_from(vec!["sheetmarks", "rm", "3", "--yes"]).unwrap();
        match cli.command {
            Commands::Delete { index, yes } => {
                assert_eq!(index, 3);
                assert!(yes);
            }
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(vec![
            "sheetmarks",
            "dupes",
            "--json",
            "--config",
            "/tmp/sheetmarks.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sheetmarks.toml")));
        assert!(matches!(cli.command, Commands::Duplicates));
    }

    #[test]
    fn test_recovery_suggestion_through_context() {
        let err = anyhow::Error::from(ServiceError::Store(StoreError::PermissionDenied {
            status: 403,
            details: "denied".to_string(),
        }))
        .context("Could not load bookmarks");
        assert!(recovery_suggestion(&err).unwrap().contains("Editor"));

        let err = anyhow::Error::from(StoreError::SpreadsheetNotConfigured);
        assert!(recovery_suggestion(&err).unwrap().contains("spreadsheet_id"));

        assert!(recovery_suggestion(&anyhow::anyhow!("plain")).is_none());
    }
}
