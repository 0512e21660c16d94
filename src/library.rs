//! Projection of an iTunes-style library XML into playlists and items.
//!
//! The export is an Apple property list: a `Tracks` dict keyed by track id and
//! an ordered `Playlists` array referencing tracks by id. Projection is
//! lenient about missing keys (a library without playlists is just empty)
//! while malformed XML surfaces as an error.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::plist::{self, PlistError, Value};

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error(transparent)]
    Plist(#[from] PlistError),
    #[error("library XML root is not a dict")]
    NotADict,
}

/// Read-only view of the library: header versions plus playlists in
/// document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Library {
    pub major_version: Option<i64>,
    pub minor_version: Option<i64>,
    pub application_version: Option<String>,
    pub playlists: Vec<Playlist>,
}

/// Named ordered collection of items. Names are not unique.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Playlist {
    pub name: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub title: String,
    pub kind: Option<String>,
    pub location: Option<Url>,
}

/// Parse a library XML document.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Library, LibraryError> {
    let root = plist::parse(reader)?;
    if root.as_dict().is_none() {
        return Err(LibraryError::NotADict);
    }

    let mut tracks = HashMap::new();
    if let Some(entries) = root.get("Tracks").and_then(Value::as_dict) {
        for (id, track) in entries {
            let Ok(id) = id.parse::<i64>() else {
                continue;
            };
            tracks.insert(id, track_item(track));
        }
    }

    let mut playlists = Vec::new();
    if let Some(list) = root.get("Playlists").and_then(Value::as_array) {
        for entry in list {
            let Some(name) = entry.get("Name").and_then(Value::as_str) else {
                continue;
            };
            let mut items = Vec::new();
            if let Some(refs) = entry.get("Playlist Items").and_then(Value::as_array) {
                for reference in refs {
                    let item = reference
                        .get("Track ID")
                        .and_then(Value::as_integer)
                        .and_then(|id| tracks.get(&id));
                    // references to tracks the export does not carry are dropped
                    if let Some(item) = item {
                        items.push(item.clone());
                    }
                }
            }
            playlists.push(Playlist {
                name: name.to_owned(),
                items,
            });
        }
    }

    Ok(Library {
        major_version: root.get("Major Version").and_then(Value::as_integer),
        minor_version: root.get("Minor Version").and_then(Value::as_integer),
        application_version: root
            .get("Application Version")
            .and_then(Value::as_str)
            .map(str::to_owned),
        playlists,
    })
}

fn track_item(track: &Value) -> Item {
    Item {
        title: track
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        kind: track
            .get("Kind")
            .and_then(Value::as_str)
            .map(str::to_owned),
        location: track
            .get("Location")
            .and_then(Value::as_str)
            .and_then(|loc| Url::parse(loc).ok()),
    }
}

/// Percent-decoded path of a location URL.
pub fn decoded_path(url: &Url) -> String {
    percent_decode_str(url.path())
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-decoded path components of a location URL.
pub fn decoded_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| {
            segments
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

const LIBRARY_XML_CANDIDATES: &[&str] = &[
    "iTunes/iTunes Music Library.xml",
    "iTunes/Library.xml",
    "Library.xml",
];

/// First existing library XML at a conventional location under the user's
/// music folder.
pub fn default_library_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    let music = dirs
        .audio_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.home_dir().join("Music"));
    LIBRARY_XML_CANDIDATES
        .iter()
        .map(|candidate| music.join(candidate))
        .find(|path| path.is_file())
}
