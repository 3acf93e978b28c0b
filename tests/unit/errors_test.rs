//! Unit tests for error types: Display formatting and std::error::Error
//! trait coverage.

use keebook::types::errors::{DecodeError, IconError, ListenerError, SettingsError, StoreError};

#[test]
fn test_decode_error_display() {
    assert_eq!(
        DecodeError::MissingField("t".to_string()).to_string(),
        "Missing request field: t"
    );
    assert_eq!(
        DecodeError::Base64("bad symbol".to_string()).to_string(),
        "Base64 decode failed: bad symbol"
    );
    assert_eq!(
        DecodeError::Cipher("bad padding".to_string()).to_string(),
        "Cipher decode failed: bad padding"
    );
}

#[test]
fn test_icon_error_display() {
    assert_eq!(
        IconError::Fetch("timeout".to_string()).to_string(),
        "Icon fetch failed: timeout"
    );
    assert_eq!(
        IconError::BadContent("empty icon payload".to_string()).to_string(),
        "Icon content rejected: empty icon payload"
    );
}

#[test]
fn test_store_error_display() {
    assert_eq!(
        StoreError::GroupNotFound("Bookmarks".to_string()).to_string(),
        "Group not found: Bookmarks"
    );
    assert_eq!(
        StoreError::RecordNotFound("abc".to_string()).to_string(),
        "Record not found: abc"
    );
    assert_eq!(
        StoreError::DatabaseError("locked".to_string()).to_string(),
        "Vault database error: locked"
    );
}

#[test]
fn test_listener_error_display() {
    assert_eq!(
        ListenerError::Bind("address in use".to_string()).to_string(),
        "Failed to bind listener: address in use"
    );
    assert_eq!(
        ListenerError::AlreadyRunning.to_string(),
        "Listener is already running"
    );
}

#[test]
fn test_settings_error_display() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

#[test]
fn test_errors_are_std_errors() {
    // All error types must coerce to trait objects for boundary handling.
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(DecodeError::Utf8("x".to_string())),
        Box::new(IconError::Cache("x".to_string())),
        Box::new(StoreError::Corrupt("x".to_string())),
        Box::new(ListenerError::Accept("x".to_string())),
        Box::new(SettingsError::SerializationError("x".to_string())),
    ];
    for error in errors {
        assert!(!error.to_string().is_empty());
    }
}
