use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use twinfind::duplicates::{DuplicateFinder, FinderError};
use twinfind::error::ExitCode;

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DuplicateFinder::with_defaults().find_duplicates_in_paths(vec![missing.clone()]);

    match result {
        Err(FinderError::RootNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected RootNotFound, got: {:?}", other.map(|(s, _)| s.len())),
    }
}

#[test]
fn test_missing_second_root_fails_before_scanning() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates_in_paths(vec![
        dir.path().to_path_buf(),
        PathBuf::from("/definitely/not/here/twinfind"),
    ]);

    assert!(matches!(result, Err(FinderError::RootNotFound(_))));
}

#[test]
fn test_no_paths_is_fatal() {
    let result = DuplicateFinder::with_defaults().find_duplicates_in_paths(Vec::new());
    assert!(matches!(result, Err(FinderError::NoPaths)));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs::File;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn set_mode(path: &Path, mode: u32) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn test_unreadable_file_is_counted_and_scan_continues() {
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked.bin");
        fs::write(&locked, vec![9u8; 4096]).unwrap();
        fs::write(dir.path().join("twin.bin"), vec![9u8; 4096]).unwrap();
        fs::write(dir.path().join("p1"), b"pair").unwrap();
        fs::write(dir.path().join("p2"), b"pair").unwrap();
        set_mode(&locked, 0o000);

        if File::open(&locked).is_ok() {
            eprintln!("Skipping: permissions are not enforced for this user");
            set_mode(&locked, 0o644);
            return;
        }

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap();
        set_mode(&locked, 0o644);

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].size, 4);
        assert_eq!(summary.error_count, 1);
        let expected = dir.path().canonicalize().unwrap().join("locked.bin");
        assert_eq!(summary.errors[0].path(), expected.as_path());
        assert_eq!(
            ExitCode::for_scan(sets.len(), summary.error_count),
            ExitCode::PartialSuccess
        );
    }

    #[test]
    fn test_unlistable_directory_is_counted_and_scan_continues() {
        let dir = tempdir().unwrap();
        let sealed = dir.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        fs::write(sealed.join("hidden"), b"twin").unwrap();
        fs::write(dir.path().join("visible"), b"twin").unwrap();
        set_mode(&sealed, 0o000);

        if fs::read_dir(&sealed).is_ok() {
            eprintln!("Skipping: permissions are not enforced for this user");
            set_mode(&sealed, 0o755);
            return;
        }

        let (sets, summary) = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap();
        set_mode(&sealed, 0o755);

        assert!(sets.is_empty());
        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.error_count, 1);
    }

    #[test]
    fn test_named_pipe_root_completes() {
        let dir = tempdir().unwrap();
        let fifo = dir.path().join("pipe");
        let created = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .is_ok_and(|status| status.success());
        if !created {
            eprintln!("Skipping: mkfifo unavailable");
            return;
        }

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let outcome = DuplicateFinder::with_defaults()
                .find_duplicates_in_paths(vec![fifo])
                .map(|(sets, summary)| (sets.len(), summary.error_count));
            let _ = tx.send(outcome);
        });

        let outcome = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("scan of a named pipe root did not finish");
        assert_eq!(outcome.unwrap(), (0, 0));
    }
}
