use std::path::PathBuf;

use clap::Parser;

/// List playlists and item paths from an iTunes library XML export.
#[derive(Parser, Clone, Debug)]
pub struct Config {
    /// Library XML file, `-` for stdin. Defaults to the export at the
    /// standard location under the music folder.
    #[arg(short = 'f', long = "library", value_name = "FILE")]
    pub library: Option<LibrarySource>,

    /// Remove base path from item path output.
    #[arg(short = 'r', value_name = "BASE PATH")]
    pub base_path: Option<String>,

    /// Prefix for item path output.
    #[arg(short = 'p', value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Escape shell special characters with a backslash.
    #[arg(short = 'e')]
    pub escape: bool,

    /// Normalize item paths to Unicode NFC.
    #[arg(short = 'n')]
    pub nfc: bool,

    /// Quote item paths with double quotes.
    #[arg(long = "qd")]
    pub quote_double: bool,

    /// Quote item paths with single quotes.
    #[arg(long = "qs")]
    pub quote_single: bool,

    /// Print debug lines for each item.
    #[arg(short = 'd')]
    pub debug: bool,

    /// Playlist whose item paths to list; omit to list playlist names.
    pub name: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub enum LibrarySource {
    #[default]
    Auto,
    Stdin,
    Path(PathBuf),
}

impl From<&str> for LibrarySource {
    fn from(s: &str) -> Self {
        match s {
            "-" => LibrarySource::Stdin,
            path => LibrarySource::Path(PathBuf::from(path)),
        }
    }
}
