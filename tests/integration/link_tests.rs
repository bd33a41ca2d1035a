use std::fs;

use tempfile::tempdir;
use twinfind::duplicates::DuplicateFinder;

#[test]
fn test_hard_links_are_reported_as_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let linked = dir.path().join("linked.txt");
    fs::write(&original, b"identical content").unwrap();

    if let Err(e) = fs::hard_link(&original, &linked) {
        eprintln!("Skipping hard link test: {}", e);
        return;
    }

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    // Two names are two candidates; identity is the canonical path, not the inode.
    assert_eq!(summary.candidates, 2);
    assert_eq!(sets.len(), 1);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_symlink_cycle_terminates() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(inner.join("a.txt"), b"cycle").unwrap();
        fs::write(dir.path().join("b.txt"), b"cycle").unwrap();
        symlink(dir.path(), inner.join("back")).unwrap();

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].len(), 2);
        assert_eq!(summary.error_count, 0);
    }

    #[test]
    fn test_symlinked_file_inside_tree_is_not_followed() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.bin");
        fs::write(&target, b"only once").unwrap();
        symlink(&target, dir.path().join("alias.bin")).unwrap();

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap();

        assert!(sets.is_empty());
        assert_eq!(summary.candidates, 1);
    }

    #[test]
    fn test_symlinked_directory_outside_tree_is_not_followed() {
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("x"), b"elsewhere").unwrap();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("y"), b"elsewhere").unwrap();
        symlink(outside.path(), dir.path().join("link")).unwrap();

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap();

        assert!(sets.is_empty());
        assert_eq!(summary.candidates, 1);
    }

    #[test]
    fn test_symlink_given_as_root_is_followed() {
        let real = tempdir().unwrap();
        fs::write(real.path().join("a"), b"via root link").unwrap();
        fs::write(real.path().join("b"), b"via root link").unwrap();
        let holder = tempdir().unwrap();
        let link = holder.path().join("root-link");
        symlink(real.path(), &link).unwrap();

        let (sets, _) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![link])
            .unwrap();

        assert_eq!(sets.len(), 1);
        let canonical = real.path().canonicalize().unwrap();
        assert!(sets[0].files.iter().all(|p| p.starts_with(&canonical)));
    }

    #[test]
    fn test_root_link_and_target_together_scan_once() {
        let real = tempdir().unwrap();
        fs::write(real.path().join("a"), b"twice?").unwrap();
        fs::write(real.path().join("b"), b"twice?").unwrap();
        let holder = tempdir().unwrap();
        let link = holder.path().join("root-link");
        symlink(real.path(), &link).unwrap();

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![real.path().to_path_buf(), link])
            .unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].len(), 2);
    }
}
