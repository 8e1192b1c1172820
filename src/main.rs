//! Resift CLI
//!
//! Command-line interface for the Resift results page.
//! Runs the interactive page or inspects the stored recent searches.

use clap::{Parser, Subcommand};
use console::style;
use resift::logging::{self, LogLevel};
use resift::{AppConfig, RecentSearches, ResiftError, StorageArea};
use std::path::PathBuf;

/// Resift - search results page with persistent recent searches
#[derive(Parser)]
#[command(name = "resift")]
#[command(author = "Resift Contributors")]
#[command(version)]
#[command(about = "Search results page with persistent recent searches", long_about = None)]
struct Cli {
    /// JSON file backing the durable store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Storage key of the recent searches list
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Config file (default: <config dir>/resift/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep recent searches in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Minimum log level (debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive results page (default)
    Tui,

    /// Show the recent searches, most recent first
    List {
        /// Print the stored list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remember a query as the most recent search
    Add {
        /// Query to remember (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,
    },

    /// Forget a query
    Remove {
        /// Query to forget (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,
    },

    /// List the keys present in the store
    Keys,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| {
        logging::init(&config.log_path(), config.log_level());
        logging::separator(&format!("Resift {}", resift::VERSION));

        match cli.command.unwrap_or(Commands::Tui) {
            Commands::Tui => resift::tui::run(config),
            Commands::List { json } => cmd_list(&config, json),
            Commands::Add { query } => cmd_add(&config, &query),
            Commands::Remove { query } => cmd_remove(&config, &query),
            Commands::Keys => cmd_keys(&config),
        }
    });

    logging::flush();

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Config file first, then command-line overrides
fn load_config(cli: &Cli) -> resift::Result<AppConfig> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(ref store) = cli.store {
        config.storage_path = store.clone();
    }
    if let Some(ref key) = cli.key {
        config.storage_key = key.clone();
    }
    if cli.ephemeral {
        config.ephemeral = true;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.to_string();
    }
    config.validate()?;
    Ok(config)
}

fn store_label(config: &AppConfig) -> String {
    if config.ephemeral {
        "memory".to_string()
    } else {
        config.storage_path.display().to_string()
    }
}

/// List command implementation
fn cmd_list(config: &AppConfig, json: bool) -> resift::Result<()> {
    let store = RecentSearches::new(config.open_storage());
    let items = store.get(&config.storage_key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!(
        "{} Recent searches under '{}' in {}",
        style("→").cyan().bold(),
        style(&config.storage_key).yellow(),
        style(store_label(config)).dim()
    );
    println!();

    if items.is_empty() {
        println!("  {}", style("(none)").dim());
        return Ok(());
    }

    for (i, item) in items.iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(item).cyan()
        );
    }

    Ok(())
}

/// Add command implementation
fn cmd_add(config: &AppConfig, query: &str) -> resift::Result<()> {
    if query.is_empty() {
        return Err(ResiftError::InvalidQuery(
            "an empty query is never remembered".to_string(),
        ));
    }

    let store = RecentSearches::new(config.open_storage());
    store.upsert(&config.storage_key, query)?;
    let len = store.get(&config.storage_key)?.len();

    println!(
        "{} Remembered '{}' ({} recent searches)",
        style("✓").green().bold(),
        style(query).yellow(),
        style(len).cyan()
    );
    Ok(())
}

/// Remove command implementation
fn cmd_remove(config: &AppConfig, query: &str) -> resift::Result<()> {
    let store = RecentSearches::new(config.open_storage());
    let before = store.get(&config.storage_key)?.len();
    store.remove(&config.storage_key, query)?;
    let after = store.get(&config.storage_key)?.len();

    if before == after {
        println!(
            "{} '{}' was not a recent search",
            style("•").dim(),
            style(query).yellow()
        );
    } else {
        println!(
            "{} Forgot '{}' ({} recent searches)",
            style("✓").green().bold(),
            style(query).yellow(),
            style(after).cyan()
        );
    }
    Ok(())
}

/// Keys command implementation
fn cmd_keys(config: &AppConfig) -> resift::Result<()> {
    let storage = config.open_storage();
    let store = RecentSearches::new(storage.clone());
    let mut keys = storage.keys()?;
    keys.sort();

    println!(
        "{} Keys in {}",
        style("→").cyan().bold(),
        style(store_label(config)).dim()
    );
    println!();

    if keys.is_empty() {
        println!("  {}", style("(empty)").dim());
        return Ok(());
    }

    for key in keys {
        let count = store.get(&key)?.len();
        println!(
            "  {} {} {}",
            style("•").green(),
            style(&key).cyan(),
            style(format!("({} entries)", count)).dim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_config() -> AppConfig {
        AppConfig {
            ephemeral: true,
            storage_key: "R".into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn add_rejects_empty_query() {
        let err = cmd_add(&ephemeral_config(), "").unwrap_err();
        assert!(matches!(err, ResiftError::InvalidQuery(_)));
        assert_eq!(err.to_string(), "Invalid query: an empty query is never remembered");
    }

    #[test]
    fn add_and_remove_accept_queries() {
        let config = ephemeral_config();
        cmd_add(&config, "shoes").unwrap();
        cmd_remove(&config, "shoes").unwrap();
    }
}
