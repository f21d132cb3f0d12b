pub mod client;
pub mod cookies;
pub mod error;
pub mod fetch;

pub use client::{build_client, build_client_with_store, ScrapeClient};
pub use error::{Error, Result};
pub use fetch::{fetch_playlist, FetchSummary};

use tospotify_model::ScrapeConfig;

/// One complete scrape: build the client, then [`run_with_client`].
pub async fn run(config: &ScrapeConfig) -> Result<FetchSummary> {
    let client = build_client(config)?;
    run_with_client(&client, config).await
}

/// Seed the jar from the saved session when `resume_session` is set, then
/// fetch and extract the playlist.
pub async fn run_with_client(client: &ScrapeClient, config: &ScrapeConfig) -> Result<FetchSummary> {
    if config.resume_session {
        cookies::seed_cookies(client, &config.target_url, &config.cookie_file_path)?;
    }

    let summary = fetch_playlist(client, config).await?;
    tracing::info!(
        status = %summary.status,
        url = %summary.final_url,
        bytes = summary.body_bytes,
        cookies = summary.cookies_saved,
        songs = summary.songs,
        path = %config.songs_output_path.display(),
        "Scrape complete"
    );
    Ok(summary)
}
