use std::time::SystemTime;

use chrono::{TimeZone, Utc};
use storfetch_fs::{Error, StagedFile, set_modified};
use tempfile::tempdir;

#[test]
fn test_promote_keeps_calendar_timestamp() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("e3b0c442");
    let staged = StagedFile::new(&dest, "e3b0c442_").unwrap();
    std::fs::write(staged.path(), b"").unwrap();

    let stamp: SystemTime = Utc.with_ymd_and_hms(2018, 3, 20, 15, 48, 42).unwrap().into();
    staged.promote(stamp).unwrap();

    assert_eq!(std::fs::metadata(&dest).unwrap().modified().unwrap(), stamp);
}

#[test]
fn test_promote_replaces_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("object");
    std::fs::write(&dest, "stale").unwrap();

    let staged = StagedFile::new(&dest, "object_").unwrap();
    std::fs::write(staged.path(), "fresh").unwrap();
    staged.promote(SystemTime::now()).unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
}

#[test]
fn test_only_destination_remains_after_promote() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("object");

    let staged = StagedFile::new(&dest, "object_").unwrap();
    std::fs::write(staged.path(), "data").unwrap();
    staged.promote(SystemTime::now()).unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("object")]);
}

#[test]
fn test_set_modified_missing_file() {
    let dir = tempdir().unwrap();
    let result = set_modified(dir.path().join("missing"), SystemTime::now());

    assert!(matches!(result, Err(Error::Timestamp { .. })));
}
