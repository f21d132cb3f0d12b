use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tospotify_model::{SongList, SongRow};

pub mod normalize;

use normalize::clean_text;

/// Playlist rows. The page also carries recommendation and chart lists, so
/// the match is anchored on the main playlist section.
pub const ROW_SELECTOR: &str = "div.mainContainer section.song-list ul._row.list_data";
pub const TITLE_SELECTOR: &str = "div._tra a";
pub const ARTIST_SELECTOR: &str = "div._art a";
/// Badges rendered inside the title link.
pub const TITLE_NOISE_SELECTOR: &str = "span.new_premium, span.eicon";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

struct Selectors {
    row: Selector,
    title: Selector,
    artist: Selector,
    title_noise: Selector,
}

impl Selectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            row: compile(ROW_SELECTOR)?,
            title: compile(TITLE_SELECTOR)?,
            artist: compile(ARTIST_SELECTOR)?,
            title_noise: compile(TITLE_NOISE_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extract the playlist rows from a page.
///
/// Rows without a title link, or whose title is empty once badges and
/// whitespace are stripped, are skipped. Rows without artists are kept with
/// an empty artist list.
pub fn extract_songs(html: &str) -> Result<SongList> {
    let selectors = Selectors::compile()?;
    let document = Html::parse_document(html);

    let mut rows = Vec::new();
    for row in document.select(&selectors.row) {
        let Some(link) = row.select(&selectors.title).next() else {
            tracing::trace!("Row without title link, skipping");
            continue;
        };

        let mut raw_title = String::new();
        collect_text_excluding(*link, &selectors.title_noise, &mut raw_title);
        let title = clean_text(&raw_title);
        if title.is_empty() {
            tracing::trace!("Row with empty title, skipping");
            continue;
        }

        let artists: Vec<String> = row
            .select(&selectors.artist)
            .map(|a| clean_text(&a.text().collect::<String>()))
            .filter(|name| !name.is_empty())
            .collect();

        rows.push(SongRow { title, artists });
    }

    tracing::debug!(rows = rows.len(), "Extracted playlist rows");
    Ok(SongList { rows })
}

/// Collect all text under a node, leaving out any element matching
/// `excluded` together with its whole subtree.
fn collect_text_excluding(node: NodeRef<'_, Node>, excluded: &Selector, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text.deref()),
            Node::Element(_) => {
                if ElementRef::wrap(child).is_some_and(|el| excluded.matches(&el)) {
                    continue;
                }
                collect_text_excluding(child, excluded, out);
            }
            _ => {}
        }
    }
}

/// Write the header and one line per row to `path`, replacing any existing
/// file. Returns the number of rows written.
pub fn write_songs(path: &Path, songs: &SongList) -> Result<usize> {
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    for line in songs.lines() {
        writeln!(writer, "{line}").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    tracing::info!(path = %path.display(), songs = songs.len(), "Wrote song list");
    Ok(songs.len())
}

/// Re-run extraction over a previously saved page.
pub fn extract_saved_page(input: &Path, output: &Path) -> Result<usize> {
    let bytes = fs::read(input).map_err(|source| ExtractError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    // A saved body may have been truncated mid-character.
    let html = String::from_utf8_lossy(&bytes);
    let songs = extract_songs(&html)?;
    write_songs(output, &songs)
}
