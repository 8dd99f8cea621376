//! Folder-mode enumeration: wildcard matching and per-file failure isolation

mod common;

use cert_inspect::error::AcquisitionError;
use cert_inspect::source::{enumerate_files, load_file, wildcard_match};
use std::path::Path;

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect()
}

fn populate(dir: &Path) {
    let chain = common::issued_chain();
    std::fs::write(dir.join("a.pem"), &chain.leaf_pem).unwrap();
    std::fs::write(dir.join("b.der"), &chain.leaf_der).unwrap();
    std::fs::write(dir.join("c.PEM"), &chain.ca_pem).unwrap();
    std::fs::write(dir.join("junk.txt"), "not a certificate").unwrap();
}

#[test]
fn star_pattern_matches_everything() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let files = enumerate_files(dir.path(), "*", false).unwrap();
    assert_eq!(files.len(), 4);
}

#[test]
fn suffix_pattern_filters_by_name() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let names = file_names(&enumerate_files(dir.path(), "*.pem", false).unwrap());
    assert!(names.contains(&"a.pem".to_string()));
    assert!(!names.contains(&"b.der".to_string()));
    assert!(!names.contains(&"junk.txt".to_string()));
    // Case sensitivity is the platform's; on Unix "c.PEM" stays out
    #[cfg(not(windows))]
    assert!(!names.contains(&"c.PEM".to_string()));
    #[cfg(windows)]
    assert!(names.contains(&"c.PEM".to_string()));
}

#[test]
fn recursion_is_opt_in() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    let chain = common::issued_chain();
    std::fs::write(sub.join("nested.pem"), &chain.leaf_pem).unwrap();

    let flat = file_names(&enumerate_files(dir.path(), "*.pem", false).unwrap());
    assert!(!flat.contains(&"nested.pem".to_string()));

    let deep = file_names(&enumerate_files(dir.path(), "*.pem", true).unwrap());
    assert!(deep.contains(&"nested.pem".to_string()));
}

#[test]
fn missing_folder_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("not-here");
    assert!(matches!(
        enumerate_files(&gone, "*", false),
        Err(AcquisitionError::FolderNotFound { .. })
    ));
}

#[test]
fn one_bad_file_does_not_stop_the_sequence() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let files = enumerate_files(dir.path(), "*", false).unwrap();
    let mut loaded = 0;
    let mut failed = 0;
    for file in &files {
        match load_file(file) {
            Ok(_) => loaded += 1,
            Err(AcquisitionError::NotACertificate { .. }) => failed += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(loaded, 3);
    assert_eq!(failed, 1);
}

#[test]
fn question_mark_is_zero_or_one() {
    assert!(wildcard_match("cert?.pem", "cert.pem"));
    assert!(wildcard_match("cert?.pem", "cert1.pem"));
    assert!(!wildcard_match("cert?.pem", "cert12.pem"));
}
