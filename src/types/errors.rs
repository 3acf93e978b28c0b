use std::fmt;

// === DecodeError ===

/// Errors produced while decoding an incoming save-request payload.
#[derive(Debug)]
pub enum DecodeError {
    /// A query field is missing from the request.
    MissingField(String),
    /// A field is not valid base64.
    Base64(String),
    /// Ciphertext decryption failed (bad length or padding).
    Cipher(String),
    /// Decoded bytes are not valid UTF-8.
    Utf8(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingField(name) => write!(f, "Missing request field: {}", name),
            DecodeError::Base64(msg) => write!(f, "Base64 decode failed: {}", msg),
            DecodeError::Cipher(msg) => write!(f, "Cipher decode failed: {}", msg),
            DecodeError::Utf8(msg) => write!(f, "Decoded payload is not UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

// === IconError ===

/// Errors raised while fetching or registering a site icon.
///
/// These are always recovered locally — a failed resolution falls back to
/// the default icon marker and never aborts the request.
#[derive(Debug)]
pub enum IconError {
    /// Network fetch failed (unreachable host, bad status, timeout).
    Fetch(String),
    /// The fetched body was unusable.
    BadContent(String),
    /// Cache registration failed in the underlying store.
    Cache(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::Fetch(msg) => write!(f, "Icon fetch failed: {}", msg),
            IconError::BadContent(msg) => write!(f, "Icon content rejected: {}", msg),
            IconError::Cache(msg) => write!(f, "Icon cache error: {}", msg),
        }
    }
}

impl std::error::Error for IconError {}

// === StoreError ===

/// Errors from the vault store adapter.
#[derive(Debug)]
pub enum StoreError {
    /// The named group was not found.
    GroupNotFound(String),
    /// Record with the given ID was not found.
    RecordNotFound(String),
    /// Database operation failed.
    DatabaseError(String),
    /// Stored data had an unexpected shape.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::GroupNotFound(name) => write!(f, "Group not found: {}", name),
            StoreError::RecordNotFound(id) => write!(f, "Record not found: {}", id),
            StoreError::DatabaseError(msg) => write!(f, "Vault database error: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "Corrupt vault data: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === ListenerError ===

/// Errors related to the loopback listener lifecycle.
#[derive(Debug)]
pub enum ListenerError {
    /// The listener could not bind its loopback port. Fatal at startup.
    Bind(String),
    /// The listener is already running.
    AlreadyRunning,
    /// Socket-level failure while accepting a request.
    Accept(String),
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerError::Bind(msg) => write!(f, "Failed to bind listener: {}", msg),
            ListenerError::AlreadyRunning => write!(f, "Listener is already running"),
            ListenerError::Accept(msg) => write!(f, "Accept failed: {}", msg),
        }
    }
}

impl std::error::Error for ListenerError {}

// === SettingsError ===

/// Errors related to settings persistence.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
