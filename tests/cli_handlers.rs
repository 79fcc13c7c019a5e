//! Integration tests for the command handlers and verbosity handling
//!
//! These drive the handlers the way `main` does, on temporary trees, without
//! prompting: every sync here either needs no confirmation or runs with
//! `confirm_changes` disabled.

use std::fs;

use tempfile::TempDir;
use vector_sync::handlers::{handle_init, handle_status, handle_sync, SyncOptions};
use vector_sync::metadata::{metadata_path, read_metadata};
use vector_sync::settings::Settings;
use vector_sync::{SyncError, VerbosityLevel};

fn unattended() -> Settings {
    Settings {
        confirm_changes: false,
        file_logging: false,
    }
}

/// Test verbosity determination from flags (as done in main.rs)
#[test]
fn test_verbosity_from_flags() {
    assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_flags(false, true), VerbosityLevel::Quiet);
    // Verbose wins when both are given
    assert_eq!(VerbosityLevel::from_flags(true, true), VerbosityLevel::Verbose);
}

#[test]
fn test_init_status_sync_round() {
    let laptop = TempDir::new().unwrap();
    let desktop = TempDir::new().unwrap();

    handle_init("laptop", laptop.path(), VerbosityLevel::Normal).unwrap();
    handle_init("desktop", desktop.path(), VerbosityLevel::Quiet).unwrap();

    fs::create_dir_all(laptop.path().join("photos")).unwrap();
    fs::write(laptop.path().join("photos/cat.jpg"), [0u8, 1, 2, 3]).unwrap();
    handle_status(laptop.path(), VerbosityLevel::Verbose).unwrap();

    handle_sync(
        desktop.path(),
        laptop.path(),
        SyncOptions::default(),
        &unattended(),
        VerbosityLevel::Verbose,
    )
    .unwrap();

    assert_eq!(
        fs::read(desktop.path().join("photos/cat.jpg")).unwrap(),
        vec![0u8, 1, 2, 3]
    );
    let desktop_record = read_metadata(&metadata_path(desktop.path())).unwrap();
    let laptop_record = read_metadata(&metadata_path(laptop.path())).unwrap();
    assert_eq!(desktop_record.version_vector, laptop_record.version_vector);
    assert_eq!(desktop_record.version_vector.get("laptop"), 1);
    assert_eq!(desktop_record.id, "desktop");

    // Nothing left to do the second time around
    handle_sync(
        laptop.path(),
        desktop.path(),
        SyncOptions::default(),
        &unattended(),
        VerbosityLevel::Normal,
    )
    .unwrap();
}

#[test]
fn test_sync_error_surfaces_through_anyhow() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    handle_init("twin", a.path(), VerbosityLevel::Quiet).unwrap();
    handle_init("twin", b.path(), VerbosityLevel::Quiet).unwrap();

    let err = handle_sync(
        a.path(),
        b.path(),
        SyncOptions {
            yes: true,
            dry_run: false,
        },
        &unattended(),
        VerbosityLevel::Quiet,
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::IdentityConflict(_))
    ));
}

#[test]
fn test_sync_requires_initialized_trees() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    handle_init("a", a.path(), VerbosityLevel::Quiet).unwrap();

    let result = handle_sync(
        a.path(),
        b.path(),
        SyncOptions::default(),
        &unattended(),
        VerbosityLevel::Quiet,
    );
    assert!(result.is_err());
}
