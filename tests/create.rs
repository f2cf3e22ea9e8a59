//! `backup create` against a stand-in `nc` that stores the stream

mod common;

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use common::Device;
use flate2::read::GzDecoder;
use predicates::prelude::*;

const LAYOUT: [&str; 7] = [
    "shared_prefs",
    "files",
    "databases",
    "cache",
    "nimbus_data",
    "no_backup",
    "glean_data",
];

/// Directory holding an `nc` that writes its input to `sink`
fn stub_nc(device: &Device) -> (PathBuf, PathBuf) {
    let bin = device.root.path().join("bin");
    let sink = device.root.path().join("received.tar.gz");
    fs::create_dir_all(&bin).unwrap();

    let nc = bin.join("nc");
    fs::write(&nc, format!("#!/bin/sh\ncat > '{}'\n", sink.display())).unwrap();
    fs::set_permissions(&nc, fs::Permissions::from_mode(0o755)).unwrap();
    (bin, sink)
}

fn fab_create(device: &Device, bin: &Path) -> Command {
    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let mut cmd = Command::cargo_bin("fab").unwrap();
    cmd.env("GRE_HOME", &device.app)
        .env("FAB_SHARED_DIR", &device.shared)
        .env("PATH", path)
        .env_remove("FAB_SETTINGS")
        .env_remove("RUST_LOG")
        .args(["backup", "create"]);
    cmd
}

fn shell_has_pipefail() -> bool {
    std::process::Command::new("/bin/sh")
        .args(["-c", "set -o pipefail"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[test]
fn test_failed_tar_is_not_reported_as_success() {
    // No layout entries exist, so tar fails while nc succeeds.
    let device = Device::new();
    let (bin, _sink) = stub_nc(&device);

    fab_create(&device, &bin)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Backup successfully created").not())
        .stderr(predicate::str::contains("Process exited non-successfully"));
}

#[test]
fn test_archive_streamed_with_layout_entries() {
    if !shell_has_pipefail() {
        eprintln!("skipping: /bin/sh has no pipefail");
        return;
    }

    let device = Device::new();
    for entry in LAYOUT {
        device.write_live(&format!("{}/data", entry), entry);
    }
    device.write_live("lib/libxul.so", "library");
    let (bin, sink) = stub_nc(&device);

    fab_create(&device, &bin)
        .assert()
        .success()
        .stdout(predicate::str::contains("DONE: backup create finished."));

    let mut archive = tar::Archive::new(GzDecoder::new(File::open(&sink).unwrap()));
    let top_level: BTreeSet<String> = archive
        .entries()
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            let path = entry.path().unwrap().into_owned();
            path.components()
                .next()
                .unwrap()
                .as_os_str()
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    let expected: BTreeSet<String> = LAYOUT.iter().map(|e| e.to_string()).collect();
    assert_eq!(top_level, expected);
}
