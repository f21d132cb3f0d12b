use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

use config::FetchArgs;

#[derive(Parser)]
#[command(name = "tospotify")]
#[command(about = "Scrape a playlist page into a tab-separated song list")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// TOML config file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the playlist page, save it and its cookies, and extract the songs
    Fetch(FetchArgs),

    /// Extract songs from a previously saved page without fetching
    Extract {
        /// Saved page (defaults to the configured raw output path)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Song list to write (defaults to the configured songs output path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.utc);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &LogLevel, utc: bool) {
    // Suppress noisy HTML-parsing crates at debug/trace
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut scrape_config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => {
            args.apply(&mut scrape_config);
            tracing::info!(url = %scrape_config.target_url, "Scraping playlist");
            let summary = tospotify_acquire::run(&scrape_config)
                .await
                .with_context(|| format!("Scrape of {} failed", scrape_config.target_url))?;
            if summary.songs == 0 {
                tracing::warn!(status = %summary.status, "No songs found on the page");
            }
        }
        Commands::Extract { input, output } => {
            let input = input.unwrap_or(scrape_config.raw_output_path);
            let output = output.unwrap_or(scrape_config.songs_output_path);
            tracing::info!(input = %input.display(), output = %output.display(), "Extracting saved page");
            let songs = tospotify_parse::extract_saved_page(&input, &output)?;
            if songs == 0 {
                tracing::warn!(input = %input.display(), "No songs found in the saved page");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_flags_parse() {
        let cli = Cli::try_parse_from([
            "tospotify",
            "--log-level",
            "debug",
            "fetch",
            "--url",
            "https://example.com/p",
            "--insecure",
            "--resume-session",
            "--timeout",
            "5",
        ])
        .unwrap();

        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        let mut config = tospotify_model::ScrapeConfig::default();
        args.apply(&mut config);
        assert_eq!(config.target_url, "https://example.com/p");
        assert!(config.accept_invalid_certs);
        assert!(config.resume_session);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_extract_defaults_to_config_paths() {
        let cli = Cli::try_parse_from(["tospotify", "extract"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { input: None, output: None }));
    }
}
