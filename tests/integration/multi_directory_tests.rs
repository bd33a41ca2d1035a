use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use twinfind::duplicates::{DuplicateFinder, DuplicateSet};

fn membership(sets: &[DuplicateSet]) -> BTreeSet<Vec<PathBuf>> {
    sets.iter().map(|s| s.files.clone()).collect()
}

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir2.path().join("b.txt"), b"dup").unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(summary.candidates, 2);
}

#[test]
fn test_argument_order_does_not_change_membership() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    for (i, dir) in [&dir1, &dir2].iter().enumerate() {
        fs::write(dir.path().join("pair"), b"pair content").unwrap();
        fs::write(dir.path().join("triple"), b"triple!").unwrap();
        fs::write(dir.path().join(format!("unique{i}")), format!("unique {i}")).unwrap();
    }
    fs::write(dir2.path().join("triple-again"), b"triple!").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (forward, forward_summary) = finder
        .find_duplicates_in_paths(vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();
    let (backward, backward_summary) = finder
        .find_duplicates_in_paths(vec![dir2.path().to_path_buf(), dir1.path().to_path_buf()])
        .unwrap();

    assert_eq!(forward.len(), 2);
    assert_eq!(membership(&forward), membership(&backward));
    assert_eq!(
        forward_summary.reclaimable_bytes,
        backward_summary.reclaimable_bytes
    );
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), b"content").unwrap();
    fs::write(sub.join("b.txt"), b"content").unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf(), sub.clone()])
        .unwrap();

    assert_eq!(summary.candidates, 2);
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
}

#[test]
fn test_same_root_twice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only"), b"alone").unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf(), dir.path().to_path_buf()])
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.candidates, 1);
}

#[test]
fn test_file_roots_mixed_with_directory_roots() {
    let dir = tempdir().unwrap();
    let loose = tempdir().unwrap();
    fs::write(dir.path().join("inside"), b"mixed roots").unwrap();
    let file = loose.path().join("loose");
    fs::write(&file, b"mixed roots").unwrap();

    let (sets, _) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![file.clone(), dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert!(sets[0].files.contains(&file.canonicalize().unwrap()));
}
