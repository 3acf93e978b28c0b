//! Duplicate detection for incoming bookmarks.

use crate::store::VaultStore;
use crate::types::errors::StoreError;
use crate::types::record::Group;

/// Decides whether a (title, url) pair already exists in the group.
///
/// When `prevent_duplicates` is off the answer is always `false` and no
/// scan is performed at all — the short-circuit is part of the contract,
/// not an optimization. Otherwise the group's records are scanned linearly
/// with case-sensitive exact matching on both fields; the first match wins.
/// O(records) per request, which is fine at single-user group sizes.
pub fn is_duplicate(
    store: &dyn VaultStore,
    group: &Group,
    title: &str,
    url: &str,
    prevent_duplicates: bool,
) -> Result<bool, StoreError> {
    if !prevent_duplicates {
        return Ok(false);
    }

    for record in store.list_records(group)? {
        if record.title == title && record.url == url {
            return Ok(true);
        }
    }
    Ok(false)
}
