use crate::client::ScrapeClient;
use crate::cookies;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tospotify_model::ScrapeConfig;
use url::Url;

/// What one fetch produced.
#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub status: StatusCode,
    pub final_url: Url,
    pub body_bytes: usize,
    pub truncated: bool,
    pub cookies_saved: usize,
    pub songs: usize,
}

/// GET the playlist page once, save the raw body and the session cookies,
/// then extract the song list.
///
/// The body is capped at `max_body_bytes`; anything past that is dropped.
/// The response status is logged but not checked, so an error page still
/// yields a raw file and a (likely header-only) song list.
pub async fn fetch_playlist(client: &ScrapeClient, config: &ScrapeConfig) -> Result<FetchSummary> {
    let url = Url::parse(&config.target_url).map_err(|source| Error::InvalidUrl {
        url: config.target_url.clone(),
        source,
    })?;

    tracing::info!(url = %url, "Fetching playlist page");
    let response = client.http().get(url).send().await?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    tracing::info!(status = %status, content_type = %content_type, "Received response");

    let final_url = response.url().clone();
    let (body, truncated) = read_body_limited(response, config.max_body_bytes).await?;
    if truncated {
        tracing::debug!(limit = config.max_body_bytes, "Response body truncated");
    }

    write_raw(&config.raw_output_path, &body)?;
    tracing::info!(path = %config.raw_output_path.display(), bytes = body.len(), "Saved raw response");

    let cookies_saved = cookies::save_cookies(client, Some(&final_url), &config.cookie_file_path)?;

    let html = String::from_utf8_lossy(&body);
    let songs = tospotify_parse::extract_songs(&html)?;
    let written = tospotify_parse::write_songs(&config.songs_output_path, &songs)?;

    Ok(FetchSummary {
        status,
        final_url,
        body_bytes: body.len(),
        truncated,
        cookies_saved,
        songs: written,
    })
}

/// Read at most `limit` bytes of the body. The flag is set when more was
/// available.
async fn read_body_limited(mut response: Response, limit: usize) -> Result<(Vec<u8>, bool)> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }
    Ok((body, false))
}

fn write_raw(path: &Path, body: &[u8]) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(body).map_err(io_err)?;
    file.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::build_client_with_store;
    use cookie_store::CookieStore;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAYLIST: &str = r#"
        <html><body>
        <div class="mainContainer"><section class="song-list">
            <ul class="_row list_data"><li>
                <div class="_tra"><a>Track One</a></div>
                <div class="_art"><a>Artist A</a><a>Artist B</a></div>
            </li></ul>
            <ul class="_row list_data"><li>
                <div class="_art"><a>Nobody</a></div>
            </li></ul>
        </section></div>
        </body></html>
    "#;

    fn config_in(dir: &TempDir, target: String) -> ScrapeConfig {
        let p = |name: &str| -> PathBuf { dir.path().join(name) };
        ScrapeConfig {
            target_url: target,
            raw_output_path: p("response.html"),
            songs_output_path: p("songs.txt"),
            cookie_file_path: p("savecookie.yml"),
            ..ScrapeConfig::default()
        }
    }

    fn client(config: &ScrapeConfig) -> ScrapeClient {
        build_client_with_store(config, Some(CookieStore::default())).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_writes_all_outputs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/playlist/x"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc; Path=/")
                    .set_body_raw(PLAYLIST, "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, format!("{}/playlist/x", server.uri()));
        let summary = fetch_playlist(&client(&config), &config).await.unwrap();

        assert_eq!(summary.status, StatusCode::OK);
        assert_eq!(summary.songs, 1);
        assert!(!summary.truncated);
        assert_eq!(fs::read_to_string(&config.raw_output_path).unwrap(), PLAYLIST);
        assert_eq!(
            fs::read_to_string(&config.songs_output_path).unwrap(),
            "Song\tArtist(s)\nTrack One\tArtist A, Artist B\n"
        );

        assert_eq!(summary.cookies_saved, 1);
        let doc = cookies::read_document(&config.cookie_file_path).unwrap().unwrap();
        assert_eq!(doc.cookies[0].name, "session");
        assert_eq!(doc.cookies[0].value, "abc");
    }

    #[tokio::test]
    async fn test_cookies_saved_for_redirect_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("{}/final", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/final"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "s=1; Path=/final")
                    .set_body_raw(PLAYLIST, "text/html"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, format!("{}/start", server.uri()));
        let summary = fetch_playlist(&client(&config), &config).await.unwrap();

        assert_eq!(summary.final_url.path(), "/final");
        assert_eq!(summary.songs, 1);
        assert_eq!(summary.cookies_saved, 1);

        let doc = cookies::read_document(&config.cookie_file_path).unwrap().unwrap();
        assert_eq!(doc.cookies[0].name, "s");
        assert_eq!(doc.cookies[0].path, "/final");
        let text = fs::read_to_string(&config.cookie_file_path).unwrap();
        assert!(text.contains("path: /final"));
    }

    #[tokio::test]
    async fn test_large_body_truncated() {
        let server = MockServer::start().await;
        let limit = 1 << 20;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![b'a'; limit + 10], "text/html"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, server.uri());
        let summary = fetch_playlist(&client(&config), &config).await.unwrap();

        assert!(summary.truncated);
        assert_eq!(summary.body_bytes, limit);
        assert_eq!(fs::metadata(&config.raw_output_path).unwrap().len(), limit as u64);
        assert_eq!(fs::read_to_string(&config.songs_output_path).unwrap(), "Song\tArtist(s)\n");
    }

    #[tokio::test]
    async fn test_body_at_limit_not_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![b'a'; 64], "text/html"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = ScrapeConfig {
            max_body_bytes: 64,
            ..config_in(&dir, server.uri())
        };
        let summary = fetch_playlist(&client(&config), &config).await.unwrap();

        assert!(!summary.truncated);
        assert_eq!(summary.body_bytes, 64);
    }

    #[tokio::test]
    async fn test_error_status_still_saved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_raw("busy", "text/plain"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, server.uri());
        let summary = fetch_playlist(&client(&config), &config).await.unwrap();

        assert_eq!(summary.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(summary.songs, 0);
        assert_eq!(fs::read_to_string(&config.raw_output_path).unwrap(), "busy");
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "http://127.0.0.1:1/playlist".into());

        let err = fetch_playlist(&client(&config), &config).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!config.raw_output_path.exists());
    }

    #[tokio::test]
    async fn test_unwritable_raw_path_is_io_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PLAYLIST, "text/html"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = ScrapeConfig {
            raw_output_path: dir.path().join("missing").join("response.html"),
            ..config_in(&dir, server.uri())
        };

        let err = fetch_playlist(&client(&config), &config).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_target_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "gaana playlist".into());

        let err = fetch_playlist(&client(&config), &config).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
