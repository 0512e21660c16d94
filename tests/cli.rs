use assert_cmd::Command;
use predicates::prelude::*;

const LIBRARY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Major Version</key><integer>1</integer>
    <key>Minor Version</key><integer>1</integer>
    <key>Application Version</key><string>12.9.5.5</string>
    <key>Tracks</key>
    <dict>
        <key>101</key>
        <dict>
            <key>Track ID</key><integer>101</integer>
            <key>Name</key><string>My Song</string>
            <key>Kind</key><string>MPEG audio file</string>
            <key>Location</key><string>file:///Users/me/Music/My%20Song.mp3</string>
        </dict>
        <key>102</key>
        <dict>
            <key>Track ID</key><integer>102</integer>
            <key>Name</key><string>Stream Only</string>
            <key>Location</key><string>http://radio.example.com/live</string>
        </dict>
        <key>103</key>
        <dict>
            <key>Track ID</key><integer>103</integer>
            <key>Name</key><string>No File</string>
        </dict>
        <key>104</key>
        <dict>
            <key>Track ID</key><integer>104</integer>
            <key>Name</key><string>B Side</string>
            <key>Location</key><string>file:///Users/me/Music/B%20Side.mp3</string>
        </dict>
    </dict>
    <key>Playlists</key>
    <array>
        <dict>
            <key>Name</key><string>Library</string>
            <key>Playlist Items</key>
            <array>
                <dict><key>Track ID</key><integer>101</integer></dict>
                <dict><key>Track ID</key><integer>102</integer></dict>
                <dict><key>Track ID</key><integer>103</integer></dict>
                <dict><key>Track ID</key><integer>104</integer></dict>
            </array>
        </dict>
        <dict>
            <key>Name</key><string>Road Trip</string>
            <key>Playlist Items</key>
            <array>
                <dict><key>Track ID</key><integer>101</integer></dict>
                <dict><key>Track ID</key><integer>102</integer></dict>
                <dict><key>Track ID</key><integer>103</integer></dict>
            </array>
        </dict>
        <dict>
            <key>Name</key><string>Road Trip</string>
            <key>Playlist Items</key>
            <array>
                <dict><key>Track ID</key><integer>104</integer></dict>
            </array>
        </dict>
    </array>
</dict>
</plist>"#;

fn playlist_paths() -> Command {
    Command::cargo_bin("playlist-paths-rs").unwrap()
}

fn library_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("Library.xml");
    std::fs::write(&path, LIBRARY_XML).unwrap();
    path
}

#[test]
fn lists_all_playlist_names() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .assert()
        .success()
        .stdout("Library\nRoad Trip\nRoad Trip\n")
        .stderr(predicates::str::is_empty());
}

#[test]
fn lists_item_paths_from_every_matching_playlist() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("--library")
        .arg(library_file(&dir))
        .arg("Road Trip")
        .assert()
        .success()
        .stdout("/Users/me/Music/My Song.mp3\n/Users/me/Music/B Side.mp3\n");
}

#[test]
fn unknown_playlist_prints_nothing_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .arg("Nope")
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
}

#[test]
fn escapes_and_strips_base_path() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .arg("-e")
        .arg("-r")
        .arg("/Users/me/Music/")
        .arg("Road Trip")
        .assert()
        .success()
        .stdout("My\\ Song.mp3\nB\\ Side.mp3\n");
}

#[test]
fn prefixes_and_quotes_each_line() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .arg("-p")
        .arg("put ")
        .arg("--qd")
        .arg("--qs")
        .arg("Road Trip")
        .assert()
        .success()
        .stdout("put '\"/Users/me/Music/My Song.mp3\"'\nput '\"/Users/me/Music/B Side.mp3\"'\n");
}

#[test]
fn normalizes_paths_to_nfc() {
    let dir = tempfile::tempdir().unwrap();
    // decomposed e + combining acute in the percent-encoded location
    let xml = r#"<plist><dict>
        <key>Tracks</key>
        <dict>
            <key>1</key>
            <dict>
                <key>Name</key><string>Accented</string>
                <key>Location</key><string>file:///m/Cafe%CC%81.mp3</string>
            </dict>
        </dict>
        <key>Playlists</key>
        <array>
            <dict>
                <key>Name</key><string>P</string>
                <key>Playlist Items</key>
                <array><dict><key>Track ID</key><integer>1</integer></dict></array>
            </dict>
        </array>
    </dict></plist>"#;
    let path = dir.path().join("nfc.xml");
    std::fs::write(&path, xml).unwrap();

    playlist_paths()
        .arg("-f")
        .arg(&path)
        .arg("-n")
        .arg("P")
        .assert()
        .success()
        .stdout("/m/Caf\u{e9}.mp3\n");
}

#[test]
fn reads_library_from_stdin() {
    playlist_paths()
        .arg("-f")
        .arg("-")
        .write_stdin(LIBRARY_XML)
        .assert()
        .success()
        .stdout("Library\nRoad Trip\nRoad Trip\n");
}

#[test]
fn finds_library_under_music_dir_by_default() {
    let home = tempfile::tempdir().unwrap();
    let music = home.path().join("Music");
    std::fs::create_dir(&music).unwrap();
    std::fs::write(music.join("Library.xml"), LIBRARY_XML).unwrap();

    playlist_paths()
        .env("HOME", home.path())
        .assert()
        .success()
        .stdout("Library\nRoad Trip\nRoad Trip\n");
}

#[test]
fn fails_when_no_library_exists_anywhere() {
    let home = tempfile::tempdir().unwrap();
    playlist_paths()
        .env("HOME", home.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("no library XML found"));
}

#[test]
fn rejects_unknown_flags_with_usage() {
    playlist_paths()
        .arg("-x")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Usage"));
}

#[test]
fn missing_library_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(dir.path().join("absent.xml"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("cannot open library file"));
}

#[test]
fn malformed_library_is_fatal() {
    playlist_paths()
        .arg("-f")
        .arg("-")
        .write_stdin("<plist><dict><key>Tracks</key>")
        .assert()
        .failure()
        .stdout(predicates::str::is_empty());
}

#[test]
fn debug_mode_interleaves_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .arg("-d")
        .arg("Road Trip")
        .assert()
        .success()
        .stdout(predicates::str::contains("# Library API ver : 1.1"))
        .stdout(predicates::str::contains("# Application ver : 12.9.5.5"))
        .stdout(predicates::str::contains("# ARGS : Start"))
        .stdout(predicates::str::contains("# ARGS : End"))
        .stdout(predicates::str::contains("# Title    : My Song"))
        .stdout(predicates::str::contains("# Kind     : MPEG audio file"))
        .stdout(predicates::str::contains("# Scheme   : http"))
        .stdout(predicates::str::contains(
            "# Loc(STR) : file:///Users/me/Music/My%20Song.mp3",
        ))
        .stdout(predicates::str::contains("# Path     : /Users/me/Music/My Song.mp3"))
        .stdout(predicates::str::contains(
            "# PathComp : |Users|me|Music|My Song.mp3|",
        ))
        .stdout(predicates::str::contains("\n/Users/me/Music/My Song.mp3\n"));
}

#[test]
fn debug_without_playlist_lists_names_after_header() {
    let dir = tempfile::tempdir().unwrap();
    playlist_paths()
        .arg("-f")
        .arg(library_file(&dir))
        .arg("-d")
        .assert()
        .success()
        .stdout(predicates::str::contains("# ARGS : End\nLibrary\n"));
}
