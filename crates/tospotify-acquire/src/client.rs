use crate::error::Result;
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tospotify_model::ScrapeConfig;

const USER_AGENT: &str = concat!("tospotify/", env!("CARGO_PKG_VERSION"));

/// Snapshot of https://publicsuffix.org/list/public_suffix_list.dat.
const BUNDLED_PUBLIC_SUFFIX_LIST: &str = include_str!("../data/public_suffix_list.dat");

/// HTTP client plus the cookie jar it reads from and writes to.
///
/// `jar` is `None` when the jar could not be built; requests still work,
/// they just carry no session.
pub struct ScrapeClient {
    http: reqwest::Client,
    jar: Option<Arc<CookieStoreMutex>>,
}

impl ScrapeClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn jar(&self) -> Option<&Arc<CookieStoreMutex>> {
        self.jar.as_ref()
    }
}

/// Build the client for a scrape run.
///
/// Cookie domains are checked against the bundled public suffix list, or
/// the file named in the config. If an override can't be loaded the client
/// is returned without a cookie jar.
pub fn build_client(config: &ScrapeConfig) -> Result<ScrapeClient> {
    let store = create_cookie_store(config.public_suffix_list.as_deref());
    build_client_with_store(config, store)
}

/// Build the client around an already constructed cookie store.
pub fn build_client_with_store(
    config: &ScrapeConfig,
    store: Option<CookieStore>,
) -> Result<ScrapeClient> {
    let jar = store.map(|s| Arc::new(CookieStoreMutex::new(s)));

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for this run");
    }

    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs);
    if let Some(jar) = &jar {
        builder = builder.cookie_provider(Arc::clone(jar));
    }
    let http = builder.build()?;

    tracing::info!(
        timeout_secs = config.timeout_secs,
        cookies = jar.is_some(),
        insecure = config.accept_invalid_certs,
        "HTTP client created"
    );
    Ok(ScrapeClient { http, jar })
}

fn create_cookie_store(public_suffix_list: Option<&Path>) -> Option<CookieStore> {
    let list = match public_suffix_list {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| parse_public_suffix_list(&text)),
        None => parse_public_suffix_list(BUNDLED_PUBLIC_SUFFIX_LIST),
    };

    match list {
        Ok(list) => Some(CookieStore::new(Some(list))),
        Err(e) => {
            let source = public_suffix_list
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "bundled".to_string());
            tracing::warn!(
                public_suffix_list = %source,
                "failed to create cookie jar ({e}); continuing without one"
            );
            None
        }
    }
}

fn parse_public_suffix_list(text: &str) -> std::result::Result<publicsuffix::List, String> {
    text.parse::<publicsuffix::List>().map_err(|e| format!("{e:?}"))
}
