use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parallax_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "parallax")]
#[command(author, version, about = "A terminal photo carousel with parallax and blur effects")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (overrides [unsplash] query)
    #[arg(short = 'q', long, global = true)]
    query: Option<String>,

    /// Number of photos to fetch (overrides [unsplash] page_size)
    #[arg(short = 'n', long = "per-page", global = true)]
    per_page: Option<u32>,

    /// Unsplash access key (overrides config and UNSPLASH_ACCESS_KEY)
    #[arg(long = "access-key", global = true)]
    access_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the carousel (default)
    Run,
    /// Fetch one page of photos and print them
    Search {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration (access key masked)
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Command-line flags take precedence over the environment and the file
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(query) = &self.query {
            config.unsplash.query = query.clone();
        }
        if let Some(per_page) = self.per_page {
            config.unsplash.page_size = per_page;
        }
        if let Some(key) = &self.access_key {
            config.apply_access_key(key.clone());
        }
    }
}

/// Logs go to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(config: &AppConfig, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if tui {
        std::fs::create_dir_all(config.data_dir())?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;
    cli.apply_overrides(&mut config);

    let tui = matches!(cli.command, None | Some(Commands::Run));
    init_logging(&config, tui)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(Arc::new(config)).await,
        Some(Commands::Search { json }) => commands::search::run(&config, json).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "parallax",
            "--query",
            "black cat",
            "--per-page",
            "12",
            "--access-key",
            " abc ",
            "search",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.unsplash.query, "black cat");
        assert_eq!(config.unsplash.page_size, 12);
        assert_eq!(config.unsplash.access_key.as_deref(), Some("abc"));
        assert!(matches!(cli.command, Some(Commands::Search { json: false })));
    }

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::parse_from(["parallax"]);
        assert!(cli.command.is_none());
        assert!(cli.query.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["parallax", "search", "--json", "-q", "dogs"]);
        assert_eq!(cli.query.as_deref(), Some("dogs"));
        assert!(matches!(cli.command, Some(Commands::Search { json: true })));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
