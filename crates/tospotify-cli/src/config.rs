use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tospotify_model::ScrapeConfig;

/// Per-run overrides for the scrape configuration.
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Playlist page to fetch
    #[arg(short, long)]
    pub url: Option<String>,

    /// Where to save the raw response body
    #[arg(long)]
    pub raw_output: Option<PathBuf>,

    /// Where to write the tab-separated song list
    #[arg(short = 'O', long)]
    pub songs_output: Option<PathBuf>,

    /// YAML file the session cookies are saved to (and resumed from)
    #[arg(long)]
    pub cookie_file: Option<PathBuf>,

    /// Accept invalid or self-signed TLS certificates (insecure)
    #[arg(long)]
    pub insecure: bool,

    /// Load the saved cookies into the jar before fetching
    #[arg(long)]
    pub resume_session: bool,

    /// Overall request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Public suffix list file to use instead of the bundled copy
    #[arg(long)]
    pub public_suffix_list: Option<PathBuf>,
}

impl FetchArgs {
    /// Layer these flags over `config`. Boolean flags can only switch a
    /// setting on.
    pub fn apply(self, config: &mut ScrapeConfig) {
        if let Some(url) = self.url {
            config.target_url = url;
        }
        if let Some(path) = self.raw_output {
            config.raw_output_path = path;
        }
        if let Some(path) = self.songs_output {
            config.songs_output_path = path;
        }
        if let Some(path) = self.cookie_file {
            config.cookie_file_path = path;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if let Some(path) = self.public_suffix_list {
            config.public_suffix_list = Some(path);
        }
        config.accept_invalid_certs |= self.insecure;
        config.resume_session |= self.resume_session;
    }
}

/// Built-in defaults, overlaid by the TOML file when one is given.
pub fn load(path: Option<&Path>) -> Result<ScrapeConfig> {
    let Some(path) = path else {
        return Ok(ScrapeConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ScrapeConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
