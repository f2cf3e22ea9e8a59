#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fab::config::{AppPaths, BackupConfig, Settings};
use fab::shell::SafePath;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

/// An app directory and a shared directory under one temp root
pub struct Device {
    pub root: TempDir,
    pub app: PathBuf,
    pub shared: PathBuf,
}

impl Device {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let app = root.path().join("data").join("org.example.app");
        let shared = root.path().join("sdcard").join("org.example.app");
        fs::create_dir_all(&app).unwrap();
        fs::create_dir_all(&shared).unwrap();
        Self { root, app, shared }
    }

    pub fn config(&self) -> BackupConfig {
        let settings = Settings::default();
        let paths = AppPaths::new(
            SafePath::try_from(self.app.as_path()).unwrap(),
            SafePath::try_from(self.shared.as_path()).unwrap(),
            &settings,
        )
        .unwrap();
        BackupConfig::new(paths, settings)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.shared.join("firefox-android-backup.tar.gz")
    }

    /// Write a file below the app directory, creating parents
    pub fn write_live(&self, rel: &str, contents: &str) {
        write_file(&self.app.join(rel), contents);
    }

    /// Write the archive the restore reads
    pub fn write_archive(&self, files: &[(&str, &str)]) {
        build_archive(&self.archive_path(), files);
    }
}

pub fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Build a tar.gz whose top-level entries are the first components of `files`
pub fn build_archive(path: &Path, files: &[(&str, &str)]) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut dirs = std::collections::BTreeSet::new();
    for (rel, _) in files {
        let mut prefix = PathBuf::new();
        let components: Vec<_> = Path::new(rel).components().collect();
        for component in &components[..components.len() - 1] {
            prefix.push(component);
            dirs.insert(prefix.clone());
        }
    }

    for dir in dirs {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        builder
            .append_data(&mut header, &dir, std::io::empty())
            .unwrap();
    }

    for (rel, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, rel, contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap();
}

/// Relative path -> contents for every file below `dir`; directories map to `None`
pub fn snapshot(dir: &Path) -> BTreeMap<String, Option<String>> {
    let mut tree = BTreeMap::new();
    if dir.exists() {
        collect(dir, dir, &mut tree);
    }
    tree
}

fn collect(root: &Path, dir: &Path, tree: &mut BTreeMap<String, Option<String>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
        if path.is_dir() {
            tree.insert(rel, None);
            collect(root, &path, tree);
        } else {
            tree.insert(rel, Some(fs::read_to_string(&path).unwrap()));
        }
    }
}

/// Files (not directories) below `dir`
pub fn files(dir: &Path) -> BTreeMap<String, String> {
    snapshot(dir)
        .into_iter()
        .filter_map(|(rel, contents)| contents.map(|c| (rel, c)))
        .collect()
}
