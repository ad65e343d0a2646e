//! starr CLI - command-line interface for the *arr API clients.

mod commands;
mod config;
mod shutdown;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::Term;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::commands::output::OutputFormat;

#[derive(Parser)]
#[command(name = "starr")]
#[command(version)]
#[command(about = "Query Sonarr, Radarr, Lidarr and Readarr from the command line")]
#[command(
    long_about = "starr talks to the REST APIs of the *arr media managers. It lists custom \
formats, quality profiles, calendars and history, and can mark history items as failed."
)]
#[command(after_long_help = r#"EXAMPLES
    Show the last 100 Sonarr history events:
        $ starr sonarr history --records 100

    Show the whole Readarr history as JSON:
        $ starr readarr history --records 0 --output json

    Episodes airing this week, including unmonitored ones:
        $ starr sonarr calendar --start 2024-03-04 --end 2024-03-10 --unmonitored

    Generate shell completions:
        $ starr completions bash > ~/.local/share/bash-completion/completions/starr

CONFIGURATION
    starr reads configuration from:
      1. ~/.config/starr/config.toml (or $XDG_CONFIG_HOME/starr/config.toml)
      2. ./starr.toml
      3. Environment variables (STARR_* prefix, e.g., STARR_SONARR_URL)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    STARR_<APP>_URL            Base URL, e.g. STARR_RADARR_URL=http://localhost:7878
    STARR_<APP>_API_KEY        API key from Settings > General
    STARR_<APP>_TIMEOUT_SECS   Request timeout (default: 30)
    STARR_<APP>_MAX_RETRIES    Retries for transient failures (default: 0)
    STARR_HISTORY_PER_PAGE     History page size (default: 500)

    <APP> is one of SONARR, RADARR, LIDARR, READARR.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sonarr (TV) operations
    Sonarr {
        #[command(subcommand)]
        action: SonarrAction,
    },
    /// Radarr (movies) operations
    Radarr {
        #[command(subcommand)]
        action: RadarrAction,
    },
    /// Lidarr (music) operations
    Lidarr {
        #[command(subcommand)]
        action: LidarrAction,
    },
    /// Readarr (books) operations
    Readarr {
        #[command(subcommand)]
        action: ReadarrAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options for history listings.
#[derive(Debug, Clone, clap::Args)]
struct HistoryOptions {
    /// Number of records to fetch (0 fetches everything)
    #[arg(short = 'r', long, default_value_t = 50)]
    records: usize,

    /// Records per request (default from config or 500)
    #[arg(short = 'p', long)]
    per_page: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum SonarrAction {
    /// List custom formats
    CustomFormats,
    /// Show episode naming settings
    Naming,
    /// List calendar entries
    Calendar {
        /// First day to include (YYYY-MM-DD, UTC)
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD, UTC)
        #[arg(short, long)]
        end: Option<NaiveDate>,

        /// Include unmonitored episodes
        #[arg(short, long)]
        unmonitored: bool,
    },
    /// Show grab/import/failure history
    History {
        #[command(flatten)]
        opts: HistoryOptions,
    },
}

#[derive(Subcommand)]
enum RadarrAction {
    /// Show system status
    Status,
    /// List custom formats
    CustomFormats,
}

#[derive(Subcommand)]
enum LidarrAction {
    /// List quality profiles
    QualityProfiles,
}

#[derive(Subcommand)]
enum ReadarrAction {
    /// Show grab/import/failure history
    History {
        #[command(flatten)]
        opts: HistoryOptions,
    },
    /// Mark a history item as failed
    Fail {
        /// History record ID
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Ctrl+C cancels in-flight requests
    let cancel = CancellationToken::new();
    shutdown::setup_shutdown_handler(cancel.clone());

    // Initialize tracing for non-TTY mode (structured logging)
    // Only initialize if not connected to a TTY
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("starr=info,starr_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        commands::meta::handle_completions(*shell)?;
        return Ok(());
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let result = match cli.command {
        Commands::Sonarr { action } => {
            commands::sonarr::handle_sonarr(action, &config, &cancel).await
        }
        Commands::Radarr { action } => {
            commands::radarr::handle_radarr(action, &config, &cancel).await
        }
        Commands::Lidarr { action } => {
            commands::lidarr::handle_lidarr(action, &config, &cancel).await
        }
        Commands::Readarr { action } => {
            commands::readarr::handle_readarr(action, &config, &cancel).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<starr::StarrError>()
            && err.is_cancelled()
        {
            eprintln!("Cancelled.");
            std::process::exit(130);
        }
        return Err(e);
    }

    Ok(())
}
