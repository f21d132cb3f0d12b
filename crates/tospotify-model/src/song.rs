use serde::{Deserialize, Serialize};
use std::fmt;

/// Header line of the songs file.
pub const SONGS_HEADER: &str = "Song\tArtist(s)";

/// One playlist entry: a cleaned title and its credited artists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRow {
    pub title: String,
    pub artists: Vec<String>,
}

impl SongRow {
    /// Artist names joined with `", "`. Empty when the row credits no one.
    pub fn artist_field(&self) -> String {
        self.artists.join(", ")
    }
}

/// `title<TAB>artists`, without a line terminator.
impl fmt::Display for SongRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.title, self.artist_field())
    }
}

/// The extracted playlist, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongList {
    pub rows: Vec<SongRow>,
}

impl SongList {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output lines: the header first, then one line per row.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(SONGS_HEADER.to_string()).chain(self.rows.iter().map(|r| r.to_string()))
    }
}
