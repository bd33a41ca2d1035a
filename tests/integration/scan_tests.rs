use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use twinfind::duplicates::{DuplicateFinder, FinderConfig, MatchMethod};

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path.canonicalize().unwrap()
}

#[test]
fn test_three_way_group_splits_by_digest() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "A", b"xxxx");
    let b = write(dir.path(), "B", b"xxxx");
    write(dir.path(), "C", b"xxxy");

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].method, MatchMethod::DigestMatched);
    assert_eq!(sets[0].files, vec![a, b]);
    assert_eq!(sets[0].size, 4);
    assert!(sets[0].digest.is_some());
    assert_eq!(summary.reclaimable_bytes, 4);
    assert_eq!(summary.files_read, 3);
    assert_eq!(summary.digests_computed, 3);
    assert_eq!(summary.error_count, 0);
}

#[test]
fn test_pair_is_compared_without_digest() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "one.bin", b"same bytes");
    let b = write(dir.path(), "two.bin", b"same bytes");

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].method, MatchMethod::ContentCompared);
    assert_eq!(sets[0].files, vec![a, b]);
    assert_eq!(sets[0].digest, None);
    assert_eq!(summary.digests_computed, 0);
    assert_eq!(summary.duplicate_files, 1);
}

#[test]
fn test_same_size_different_content_pair() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a", b"abcd");
    write(dir.path(), "b", b"abce");

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.files_read, 2);
    assert_eq!(summary.reclaimable_bytes, 0);
}

#[test]
fn test_unique_sizes_are_never_read() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a", b"1");
    write(dir.path(), "b", b"22");
    write(dir.path(), "c", b"333");

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.size_groups, 0);
    assert_eq!(summary.files_read, 0);
}

#[test]
fn test_nested_directories_are_walked() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "top.txt", b"nested content");
    write(dir.path(), "x/y/z/deep.txt", b"nested content");
    write(dir.path(), "x/other.txt", b"something else");

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    // root, top.txt, x, x/other.txt, x/y, x/y/z, deep.txt
    assert_eq!(summary.files_scanned, 7);
    assert_eq!(summary.candidates, 3);
}

#[test]
fn test_sets_are_ordered_by_size() {
    let dir = TempDir::new().unwrap();
    for name in ["big1", "big2", "big3"] {
        write(dir.path(), name, &[7u8; 300]);
    }
    for name in ["small1", "small2"] {
        write(dir.path(), name, &[1u8; 10]);
    }

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].size, 10);
    assert_eq!(sets[1].size, 300);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.reclaimable_bytes, 10 + 600);
}

#[test]
fn test_exclude_patterns_skip_directories() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep.txt", b"payload");
    write(dir.path(), ".git/objects/copy.txt", b"payload");
    write(dir.path(), "cache/copy.txt", b"payload");

    let config = FinderConfig::default()
        .with_exclude_patterns(&["\\.git".to_string(), "cache".to_string()])
        .unwrap();
    let (sets, summary) = DuplicateFinder::new(config)
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.candidates, 1);
    // root, .git, cache, keep.txt
    assert_eq!(summary.files_scanned, 4);
}

#[test]
fn test_invalid_exclude_pattern_is_rejected() {
    let result = FinderConfig::default().with_exclude_patterns(&["(unclosed".to_string()]);
    assert!(result.is_err());
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.candidates, 0);
}

#[test]
fn test_larger_files_span_many_buffers() {
    let dir = TempDir::new().unwrap();
    let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let mut altered = content.clone();
    altered[199_999] ^= 0xff;
    write(dir.path(), "a", &content);
    write(dir.path(), "b", &content);
    write(dir.path(), "c", &altered);

    let config = FinderConfig::default().with_buffer_size(4096);
    let (sets, _) = DuplicateFinder::new(config)
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
}
