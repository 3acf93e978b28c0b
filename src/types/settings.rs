use serde::{Deserialize, Serialize};

/// Payload decoding scheme for incoming requests.
///
/// The extension and the companion must agree on one mode; there is no
/// fallback probing between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecodeMode {
    /// Each field is plain base64 of UTF-8 text.
    Base64,
    /// Each field is base64 of AES-128-CBC ciphertext with the fixed wire key.
    Aes,
}

/// Named boolean toggles read at pipeline decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    ShowDebugMessages,
    ShowSuccessNotification,
    WriteDateAsNote,
    PreventDuplicateEntries,
}

/// Companion settings container, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanionSettings {
    #[serde(default)]
    pub show_debug_messages: bool,
    #[serde(default = "default_true")]
    pub show_success_notification: bool,
    #[serde(default = "default_true")]
    pub write_date_as_note: bool,
    #[serde(default = "default_true")]
    pub prevent_duplicate_entries: bool,
    #[serde(default = "default_decode_mode")]
    pub decode_mode: DecodeMode,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_decode_mode() -> DecodeMode {
    DecodeMode::Aes
}

fn default_listen_port() -> u16 {
    1339
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for CompanionSettings {
    fn default() -> Self {
        Self {
            show_debug_messages: false,
            show_success_notification: true,
            write_date_as_note: true,
            prevent_duplicate_entries: true,
            decode_mode: DecodeMode::Aes,
            listen_port: 1339,
            fetch_timeout_secs: 10,
        }
    }
}

impl CompanionSettings {
    /// Reads one named flag.
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::ShowDebugMessages => self.show_debug_messages,
            Flag::ShowSuccessNotification => self.show_success_notification,
            Flag::WriteDateAsNote => self.write_date_as_note,
            Flag::PreventDuplicateEntries => self.prevent_duplicate_entries,
        }
    }
}
