use std::path::PathBuf;
use thiserror::Error;
use tospotify_parse::ExtractError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cookie document {} is malformed: {source}", path.display())]
    CookieFormat {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cookie jar: {0}")]
    CookieJar(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
