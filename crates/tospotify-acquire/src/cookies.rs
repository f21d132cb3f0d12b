//! Persist the session cookie jar to a YAML document and seed it back.

use crate::client::ScrapeClient;
use crate::error::{Error, Result};
use cookie::SameSite;
use cookie_store::{CookieDomain, CookieExpiration, CookieStore, RawCookie};
use reqwest_cookie_store::CookieStoreMutex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::MutexGuard;
use time::OffsetDateTime;
use tospotify_model::{CookieDocument, CookieRecord, SameSitePolicy};
use url::Url;

/// Write every cookie the jar holds for `final_url` to `path`.
///
/// Returns the number of cookies written. Nothing is written when there is
/// no final URL or the client has no jar.
pub fn save_cookies(client: &ScrapeClient, final_url: Option<&Url>, path: &Path) -> Result<usize> {
    let Some(url) = final_url else {
        tracing::debug!("No final URL on response, not saving cookies");
        return Ok(0);
    };
    let Some(jar) = client.jar() else {
        tracing::debug!("Client has no cookie jar, not saving cookies");
        return Ok(0);
    };

    let document = {
        let store = lock(jar)?;
        snapshot(&store, url)
    };
    write_document(path, &document)?;
    tracing::info!(path = %path.display(), cookies = document.len(), url = %url, "Saved cookies");
    Ok(document.len())
}

/// Replace the jar's cookies for `target` with those stored at `path`.
///
/// A missing file is the first-run case and leaves the jar untouched.
/// Returns the number of cookies installed.
pub fn seed_cookies(client: &ScrapeClient, target: &str, path: &Path) -> Result<usize> {
    let Some(jar) = client.jar() else {
        return Ok(0);
    };
    let url = Url::parse(target).map_err(|source| Error::InvalidUrl {
        url: target.to_string(),
        source,
    })?;

    let Some(document) = read_document(path)? else {
        tracing::info!(path = %path.display(), "No saved cookies, starting a fresh session");
        return Ok(0);
    };

    let installed = {
        let mut store = lock(jar)?;
        replace_for_url(&mut store, &url, &document)
    };
    tracing::info!(path = %path.display(), cookies = installed, url = %url, "Seeded cookies");
    Ok(installed)
}

/// Cookie records for everything in `store` that would be sent to `url`.
pub fn snapshot(store: &CookieStore, url: &Url) -> CookieDocument {
    let cookies = store
        .matches(url)
        .into_iter()
        .map(|c| {
            let domain = match &c.domain {
                CookieDomain::HostOnly(d) | CookieDomain::Suffix(d) => d.clone(),
                CookieDomain::NotPresent | CookieDomain::Empty => {
                    url.host_str().unwrap_or_default().to_string()
                }
            };
            let expiry = match &c.expires {
                CookieExpiration::AtUtc(at) => at.unix_timestamp(),
                CookieExpiration::SessionEnd => 0,
            };
            CookieRecord {
                name: c.name().to_string(),
                value: c.value().to_string(),
                domain,
                path: String::from(&c.path),
                expiry,
                secure: c.secure().unwrap_or(false),
                http_only: c.http_only().unwrap_or(false),
                same_site: same_site_policy(c.same_site()),
            }
        })
        .collect();

    CookieDocument { cookies }
}

/// Drop the cookies `store` holds for `url`, then install `document`'s.
///
/// Cookies the store refuses (foreign domain, already expired) are logged
/// and skipped. Returns the number installed.
pub fn replace_for_url(store: &mut CookieStore, url: &Url, document: &CookieDocument) -> usize {
    let stale: Vec<(String, String, String)> = store
        .matches(url)
        .into_iter()
        .map(|c| (String::from(&c.domain), String::from(&c.path), c.name().to_string()))
        .collect();
    for (domain, path, name) in &stale {
        store.remove(domain, path, name);
    }

    let mut installed = 0;
    for record in &document.cookies {
        let raw = to_raw_cookie(record);
        match store.insert_raw(&raw, url) {
            Ok(_) => installed += 1,
            Err(e) => tracing::warn!(name = %record.name, domain = %record.domain, "Skipping saved cookie: {e}"),
        }
    }
    installed
}

/// Read a cookie document. `Ok(None)` when the file does not exist.
pub fn read_document(path: &Path) -> Result<Option<CookieDocument>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|source| Error::CookieFormat {
            path: path.to_path_buf(),
            source,
        })
}

pub fn write_document(path: &Path, document: &CookieDocument) -> Result<()> {
    let yaml = serde_yaml::to_string(document).map_err(|source| Error::CookieFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, yaml).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn lock(jar: &CookieStoreMutex) -> Result<MutexGuard<'_, CookieStore>> {
    jar.lock()
        .map_err(|_| Error::CookieJar("cookie jar lock poisoned".into()))
}

fn to_raw_cookie(record: &CookieRecord) -> RawCookie<'static> {
    let mut builder = RawCookie::build((record.name.clone(), record.value.clone()))
        .secure(record.secure)
        .http_only(record.http_only);
    if !record.domain.is_empty() {
        builder = builder.domain(record.domain.clone());
    }
    if !record.path.is_empty() {
        builder = builder.path(record.path.clone());
    }
    if let Some(secs) = record.expires_at() {
        match OffsetDateTime::from_unix_timestamp(secs) {
            Ok(at) => builder = builder.expires(at),
            Err(e) => tracing::warn!(name = %record.name, expiry = secs, "Ignoring expiry: {e}"),
        }
    }
    if let Some(same_site) = same_site_attribute(record.same_site) {
        builder = builder.same_site(same_site);
    }
    builder.build()
}

fn same_site_policy(same_site: Option<SameSite>) -> SameSitePolicy {
    match same_site {
        Some(SameSite::Lax) => SameSitePolicy::Lax,
        Some(SameSite::Strict) => SameSitePolicy::Strict,
        Some(SameSite::None) => SameSitePolicy::None,
        None => SameSitePolicy::Default,
    }
}

fn same_site_attribute(policy: SameSitePolicy) -> Option<SameSite> {
    match policy {
        SameSitePolicy::Default => None,
        SameSitePolicy::Lax => Some(SameSite::Lax),
        SameSitePolicy::Strict => Some(SameSite::Strict),
        SameSitePolicy::None => Some(SameSite::None),
    }
}
