use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TARGET_URL: &str = "https://gaana.com/playlist/amreshwarsingh-ybddw-my2010ssongs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;

/// Everything one scrape run needs to know.
///
/// Every field has a default, so a TOML file only has to name what it
/// changes:
///
/// ```toml
/// target_url = "https://gaana.com/playlist/some-playlist"
/// songs_output_path = "out/songs.txt"
/// resume_session = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Playlist page to fetch.
    pub target_url: String,
    /// Where the raw (possibly truncated) response body is written.
    pub raw_output_path: PathBuf,
    /// Where the tab-separated song list is written.
    pub songs_output_path: PathBuf,
    /// YAML cookie document, overwritten after every fetch.
    pub cookie_file_path: PathBuf,
    /// Skip TLS certificate verification. Leaves the connection open to
    /// interception; only for hosts with broken or self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Seed the jar from `cookie_file_path` before fetching.
    pub resume_session: bool,
    /// Overall request timeout.
    pub timeout_secs: u64,
    /// Bodies longer than this are truncated, not rejected.
    pub max_body_bytes: usize,
    /// Public suffix list used to scope cookie domains, in place of the
    /// copy compiled into the binary.
    pub public_suffix_list: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            raw_output_path: PathBuf::from("./response.html"),
            songs_output_path: PathBuf::from("./songs.txt"),
            cookie_file_path: PathBuf::from("./savecookie.yml"),
            accept_invalid_certs: false,
            resume_session: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            public_suffix_list: None,
        }
    }
}
