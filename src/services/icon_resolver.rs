//! Icon resolver and content-addressed cache front end.
//!
//! Icons arrive either as a URL to fetch or as inline bytes (a `data:` URL
//! decoded by the payload decoder). Fetching is best-effort: any network
//! failure falls back to the default icon marker. Cached icons are
//! deduplicated by SHA-256 of their bytes, so the same image downloaded
//! from two different hosts collapses to a single stored copy.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::blocking::Client;
use ring::digest;

use crate::store::VaultStore;
use crate::types::errors::IconError;
use crate::types::record::IconRef;

/// Upper bound on accepted icon payloads. Favicons are tiny; anything
/// bigger is almost certainly not an icon.
const MAX_ICON_BYTES: usize = 512 * 1024;

/// Hex SHA-256 content hash of icon bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let hash = digest::digest(&digest::SHA256, bytes);
    hex_encode(hash.as_ref())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Where one request's icon comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Remote image to download.
    Url(String),
    /// Bytes already delivered in the payload.
    Bytes(Vec<u8>),
}

impl IconSource {
    /// Interprets the decoded icon field.
    ///
    /// An empty field means no icon was offered. A `data:` URL yields its
    /// inline payload; anything else is treated as a URL to fetch.
    pub fn from_field(field: &str) -> Option<IconSource> {
        if field.is_empty() {
            return None;
        }
        if let Some(rest) = field.strip_prefix("data:") {
            let (meta, payload) = rest.split_once(',')?;
            if meta.ends_with(";base64") {
                return BASE64.decode(payload).ok().map(IconSource::Bytes);
            }
            return Some(IconSource::Bytes(payload.as_bytes().to_vec()));
        }
        Some(IconSource::Url(field.to_string()))
    }
}

/// Resolves icon sources into cache references.
///
/// Fetching and cache registration are split so callers can download
/// outside the vault lock and register inside it.
pub struct IconResolver {
    client: Client,
}

impl IconResolver {
    /// Creates a resolver with an explicit fetch timeout.
    pub fn new(fetch_timeout: Duration) -> Result<Self, IconError> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| IconError::Fetch(format!("client construction: {}", e)))?;
        Ok(Self { client })
    }

    /// Obtains the raw icon bytes for a source.
    ///
    /// Performs network I/O for URL sources; must be called without the
    /// vault lock held.
    pub fn fetch_bytes(&self, source: &IconSource) -> Result<Vec<u8>, IconError> {
        let bytes = match source {
            IconSource::Bytes(bytes) => bytes.clone(),
            IconSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .map_err(|e| IconError::Fetch(e.to_string()))?;
                if !response.status().is_success() {
                    return Err(IconError::Fetch(format!("status {}", response.status())));
                }
                response
                    .bytes()
                    .map_err(|e| IconError::Fetch(e.to_string()))?
                    .to_vec()
            }
        };

        if bytes.is_empty() {
            return Err(IconError::BadContent("empty icon payload".to_string()));
        }
        if bytes.len() > MAX_ICON_BYTES {
            return Err(IconError::BadContent(format!(
                "icon payload of {} bytes exceeds limit",
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    /// Registers icon bytes in the cache, reusing any entry with an equal
    /// content hash.
    ///
    /// Must run inside the caller's vault critical section so the
    /// hash-scan-then-insert sequence is atomic. Entries are never deleted.
    pub fn register(
        &self,
        store: &mut dyn VaultStore,
        bytes: Vec<u8>,
    ) -> Result<IconRef, IconError> {
        let hash = content_hash(&bytes);
        let cached = store
            .list_icon_cache()
            .map_err(|e| IconError::Cache(e.to_string()))?;
        if let Some(entry) = cached.iter().find(|e| e.content_hash == hash) {
            return Ok(IconRef::Cached(entry.id));
        }

        let entry = store
            .add_icon_cache_entry(bytes)
            .map_err(|e| IconError::Cache(e.to_string()))?;
        Ok(IconRef::Cached(entry.id))
    }
}
