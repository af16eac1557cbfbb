// SPDX-License-Identifier: GPL-3.0-only
use std::collections::BTreeMap;
use std::io::Write;
use sevenz_rust2::{ArchiveEntry, ArchiveWriter, SourceReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::config::Config;

/// Create a test configuration rooted in a fresh temporary game directory
pub fn create_test_config(game_dir: &Path) -> Config {
    Config {
        game_dir: game_dir.to_path_buf(),
        download_dir: Some(game_dir.join("downloads")),
        log_level: "error".to_string(), // Reduce log noise in tests
        ..Config::default()
    }
}

/// Create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp directory")
}

/// Write a ZIP archive; names ending in `/` become directory entries
pub fn create_test_zip(dir: &Path, file_name: &str, contents: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(file_name);
    let file = std::fs::File::create(&zip_path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in contents {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap();
    zip_path
}

/// Write a 7z archive by staging the entries on disk and compressing the tree
pub fn create_test_7z(dir: &Path, file_name: &str, contents: &[(&str, &[u8])]) -> PathBuf {
    let staging = create_temp_dir();
    for (name, data) in contents {
        let path = staging.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, data).unwrap();
    }

    let archive_path = dir.join(file_name);
    sevenz_rust2::compress_to_path(staging.path(), &archive_path).unwrap();
    archive_path
}

/// Write a 7z archive entry by entry, either as one solid block or one block per entry
pub fn create_test_7z_entries(dir: &Path, file_name: &str, contents: &[(&str, &[u8])], solid: bool) -> PathBuf {
    let archive_path = dir.join(file_name);
    let mut writer = ArchiveWriter::create(&archive_path).unwrap();

    if solid {
        let entries = contents.iter().map(|(name, _)| ArchiveEntry::new_file(name)).collect();
        let readers = contents.iter().map(|(_, data)| SourceReader::new(*data)).collect();
        writer.push_archive_entries(entries, readers).unwrap();
    } else {
        for (name, data) in contents {
            writer.push_archive_entry(ArchiveEntry::new_file(name), Some(*data)).unwrap();
        }
    }

    writer.finish().unwrap();
    archive_path
}

/// Stored RAR4 archive: a `Haze Midnight/` directory entry, `Haze Midnight/readme.txt`,
/// `Haze Midnight/materials/pak01_dir.vpk` and a `../escape.vpk` entry
pub const HAZE_MIDNIGHT_RAR: &[u8] = include_bytes!("../../tests/fixtures/haze_midnight.rar");

/// Copy the RAR fixture into `dir`
pub fn create_test_rar(dir: &Path, file_name: &str) -> PathBuf {
    let rar_path = dir.join(file_name);
    std::fs::write(&rar_path, HAZE_MIDNIGHT_RAR).unwrap();
    rar_path
}

/// Relative path -> contents (`None` for directories) for every entry under `root`
pub fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let contents = entry
                .file_type()
                .is_file()
                .then(|| std::fs::read(entry.path()).unwrap());
            (relative, contents)
        })
        .collect()
}
