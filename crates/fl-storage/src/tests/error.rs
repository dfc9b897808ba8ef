use crate::{FileOperation, StorageError};

use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq};

fn io_error(operation: FileOperation) -> StorageError {
    StorageError::io(operation, PathBuf::from("/cache/users.json"), std::io::Error::other("test"))
}

#[test]
fn given_read_write_replace_or_lock_failure_when_is_transient_then_true() {
    for operation in [
        FileOperation::Read,
        FileOperation::Write,
        FileOperation::Replace,
        FileOperation::Lock,
    ] {
        assert!(io_error(operation).is_transient(), "{operation} should be transient");
    }
}

#[test]
fn given_create_dir_or_backup_failure_when_is_transient_then_false() {
    assert!(!io_error(FileOperation::CreateDir).is_transient());
    assert!(!io_error(FileOperation::Backup).is_transient());
}

#[test]
fn given_corrupted_error_when_is_transient_then_false() {
    let err = StorageError::corrupted(PathBuf::from("/test"), "bad json");
    assert!(!err.is_transient());
}

#[test]
fn given_any_error_when_recovery_hint_then_returns_non_empty_string() {
    let errors = vec![
        io_error(FileOperation::CreateDir),
        io_error(FileOperation::Read),
        io_error(FileOperation::Lock),
        io_error(FileOperation::Backup),
        StorageError::corrupted(PathBuf::from("/test"), "bad"),
    ];

    for err in errors {
        let hint = err.recovery_hint();
        assert!(
            !hint.is_empty(),
            "recovery_hint should not be empty for {err:?}"
        );
    }
}

#[test]
fn given_serialization_error_when_from_serde_json_then_converts() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let storage_err: StorageError = json_err.into();

    assert!(matches!(storage_err, StorageError::Serialization { .. }));
}

#[test]
fn given_io_error_when_display_then_names_operation_and_path() {
    let message = io_error(FileOperation::Replace).to_string();

    assert_that!(message, contains_substring("Failed to replace /cache/users.json"));
}

#[test]
fn given_corrupted_error_when_display_then_includes_path_and_message() {
    let err = StorageError::corrupted(PathBuf::from("/cache/users.json"), "trailing comma");
    let message = err.to_string();

    assert_that!(message, contains_substring("/cache/users.json"));
    assert_that!(message, contains_substring("trailing comma"));
}

#[test]
fn given_file_operation_when_display_then_reads_as_verb() {
    assert_that!(FileOperation::CreateDir.to_string(), eq("create directory"));
    assert_that!(FileOperation::Backup.to_string(), eq("back up"));
}
