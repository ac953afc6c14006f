use std::fs;

use notifier_engine::{ensure_state_dir, parent_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn bare_file_name_resolves_to_current_dir() {
    assert_eq!(parent_dir("state.ron".as_ref()), std::path::PathBuf::from("."));
    assert_eq!(
        parent_dir("/var/lib/notifier/state.ron".as_ref()),
        std::path::PathBuf::from("/var/lib/notifier")
    );
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("state.ron");
    let writer = AtomicFileWriter::new(&target);

    writer.write("hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    writer.write("world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");

    // Only the target remains; temp files were renamed away.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let writer = AtomicFileWriter::new(not_a_dir.join("state.ron"));
    let result = writer.write("data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "x");
}
