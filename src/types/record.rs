use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product name used for the group title, tags and the date note.
pub const PRODUCT_NAME: &str = "KeeBook";

/// Name of the vault group that owns all bookmark records.
pub const GROUP_NAME: &str = "Bookmarks (KeeBook)";

/// Reserved title identifying the rolling "last accessed" marker record.
pub const LAST_ACCESSED_TITLE: &str = "KeeBook - Last accessed";

/// A stored bookmark entity inside a vault group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub icon: IconRef,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Reference from a record to its icon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum IconRef {
    /// The host's default bookmark icon.
    Default,
    /// An entry in the shared icon cache.
    Cached(Uuid),
}

impl IconRef {
    /// True if this reference points into the icon cache.
    pub fn is_custom(&self) -> bool {
        matches!(self, IconRef::Cached(_))
    }
}

/// Handle for a named group of records in the vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
}

/// One entry in the content-addressed icon cache.
///
/// `content_hash` is the hex SHA-256 of `bytes`; no two entries may share
/// a hash. Lookups are by hash equality, never by source URL, so the same
/// icon downloaded from two different hosts collapses to one entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IconCacheEntry {
    pub id: Uuid,
    pub content_hash: String,
    pub bytes: Vec<u8>,
}

/// One incoming save request, exactly as received on the wire.
///
/// Lives only for the duration of a single request; the decoder turns it
/// into plaintext title/url/icon fields.
#[derive(Debug, Clone)]
pub struct BookmarkRequest {
    pub raw_title: String,
    pub raw_url: String,
    pub raw_icon: String,
}

/// Plaintext fields produced by a successful payload decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub title: String,
    pub url: String,
    pub icon: String,
}
