use std::env;
use std::fs::File;
use std::io;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::anyhow;
use clap::Parser;
use either::Either;
use itertools::Itertools;
use tap::Pipe;

pub use crate::cli::{Config, LibrarySource};

use crate::format::PathFormat;
use crate::library::{Item, Library};

mod cli;

pub mod format;
pub mod library;
pub mod plist;

pub fn run() -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
    let mut config = Config::parse();

    let library = load_library(config.library.take().unwrap_or_default())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.debug {
        print_versions(&mut out, &library)?;
        print_args(&mut out, env::args())?;
    }

    match config.name.take() {
        None => list_playlists(&mut out, &library)?,
        Some(name) => list_playlist_items(&mut out, &library, &name, &config)?,
    }

    Ok(())
}

fn load_library(source: LibrarySource) -> anyhow::Result<Library> {
    let input = match source {
        LibrarySource::Stdin => Either::Left(io::stdin()),
        LibrarySource::Path(path) => Either::Right(open_library(&path)?),
        LibrarySource::Auto => {
            let path = library::default_library_path()
                .ok_or_else(|| anyhow!("no library XML found; pass -f <FILE>"))?;
            Either::Right(open_library(&path)?)
        }
    }
    .pipe(BufReader::new);

    Ok(library::from_reader(input)?)
}

fn open_library(path: &Path) -> anyhow::Result<File> {
    File::open(path).map_err(|e| anyhow!("cannot open library file {}: {}", path.display(), e))
}

/// Print every playlist name, in library order. Duplicates stay.
pub fn list_playlists<W: Write>(out: &mut W, library: &Library) -> io::Result<()> {
    for playlist in &library.playlists {
        writeln!(out, "{}", playlist.name)?;
    }
    Ok(())
}

/// Print the formatted path of every file-backed item in every playlist
/// named `name`. An unknown name prints nothing.
pub fn list_playlist_items<W: Write>(
    out: &mut W,
    library: &Library,
    name: &str,
    config: &Config,
) -> io::Result<()> {
    let format = PathFormat::from_config(config);
    for playlist in library.playlists.iter().filter(|p| p.name == name) {
        for item in &playlist.items {
            if config.debug {
                print_item(out, item)?;
            }
            let Some(location) = item.location.as_ref() else {
                continue;
            };
            if location.scheme() != "file" {
                continue;
            }
            let path = library::decoded_path(location);
            writeln!(out, "{}{}", config.prefix, format.apply(&path))?;
        }
    }
    Ok(())
}

fn print_versions<W: Write>(out: &mut W, library: &Library) -> io::Result<()> {
    writeln!(
        out,
        "# Library API ver : {}.{}",
        library.major_version.unwrap_or_default(),
        library.minor_version.unwrap_or_default()
    )?;
    writeln!(
        out,
        "# Application ver : {}",
        library.application_version.as_deref().unwrap_or_default()
    )
}

fn print_args<W: Write, I: IntoIterator<Item = String>>(out: &mut W, args: I) -> io::Result<()> {
    writeln!(out, "# ARGS : Start")?;
    for arg in args {
        writeln!(out, "# {}", arg)?;
    }
    writeln!(out, "# ARGS : End")
}

fn print_item<W: Write>(out: &mut W, item: &Item) -> io::Result<()> {
    writeln!(out, "# ---")?;
    writeln!(out, "# Title    : {}", item.title)?;
    writeln!(out, "# Kind     : {}", item.kind.as_deref().unwrap_or_default())?;
    if let Some(location) = item.location.as_ref() {
        writeln!(out, "# Scheme   : {}", location.scheme())?;
        writeln!(out, "# Loc(STR) : {}", location)?;
        writeln!(out, "# Path     : {}", library::decoded_path(location))?;
        writeln!(
            out,
            "# PathComp : |{}|",
            library::decoded_segments(location).iter().format("|")
        )?;
    }
    Ok(())
}
