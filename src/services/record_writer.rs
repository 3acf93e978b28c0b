//! Record assembly and the rolling "last accessed" marker.
//!
//! Builds bookmark records with deterministic tags and an optional UTC
//! date note, appends them to the target group, and maintains the single
//! marker record that summarizes recent ingestion activity.

use chrono::Utc;
use uuid::Uuid;

use crate::store::VaultStore;
use crate::types::errors::StoreError;
use crate::types::record::{Group, IconRef, Record, LAST_ACCESSED_TITLE, PRODUCT_NAME};

/// Tag applied to every bookmark record.
pub const BOOKMARK_TAG: &str = "bookmark";

/// Tag applied when the url uses the secure scheme.
pub const SECURE_URL_TAG: &str = "secure-url";

/// Tag applied when the record carries a cached (non-default) icon.
pub const CUSTOM_ICON_TAG: &str = "custom-icon";

const SECURE_SCHEME_PREFIX: &str = "https://";

/// Returns the current UNIX timestamp in seconds.
fn now() -> i64 {
    Utc::now().timestamp()
}

/// Formats the current UTC time as `YYYY.MM.DD - hh:mm` (24-hour clock).
pub fn long_utc_date() -> String {
    Utc::now().format("%Y.%m.%d - %H:%M").to_string()
}

/// Computes the deterministic tag set for a record.
pub fn tags_for(url: &str, icon: &IconRef) -> Vec<String> {
    let mut tags = vec![BOOKMARK_TAG.to_string()];
    if url.starts_with(SECURE_SCHEME_PREFIX) {
        tags.push(SECURE_URL_TAG.to_string());
    }
    if icon.is_custom() {
        tags.push(CUSTOM_ICON_TAG.to_string());
    }
    tags
}

/// Assembles a new bookmark record.
///
/// The note is the fixed-format UTC date line followed by the product
/// name, and is only written when `write_date_note` is set.
pub fn build_record(title: &str, url: &str, icon: IconRef, write_date_note: bool) -> Record {
    let timestamp = now();
    let note = if write_date_note {
        Some(format!("{}\n{}", long_utc_date(), PRODUCT_NAME))
    } else {
        None
    };

    Record {
        id: Uuid::new_v4(),
        title: title.to_string(),
        url: url.to_string(),
        note,
        tags: tags_for(url, &icon),
        icon,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// Builds and appends a new record to the group.
pub fn create_record(
    store: &mut dyn VaultStore,
    group: &Group,
    title: &str,
    url: &str,
    icon: IconRef,
    write_date_note: bool,
) -> Result<Record, StoreError> {
    let record = build_record(title, url, icon, write_date_note);
    store.append_record(group, record.clone())?;
    Ok(record)
}

/// Rewrites the group's "last accessed" marker with the newest title.
///
/// The marker is located by its reserved title; its note (the rolling log)
/// is captured, the old marker is deleted, and a fresh one is inserted
/// with the new title appended on its own line. At most one marker record
/// exists per group. Callers treat failures here as best-effort: the
/// primary record has already been committed when this runs.
pub fn update_last_accessed_marker(
    store: &mut dyn VaultStore,
    group: &Group,
    title: &str,
) -> Result<(), StoreError> {
    let previous = store
        .list_records(group)?
        .into_iter()
        .find(|r| r.title == LAST_ACCESSED_TITLE);

    let mut log = String::new();
    if let Some(old) = previous {
        if let Some(note) = old.note {
            log = note;
        }
        store.remove_record(group, old.id)?;
    }

    if !log.is_empty() {
        log.push('\n');
    }
    log.push_str(title);

    let timestamp = now();
    let marker = Record {
        id: Uuid::new_v4(),
        title: LAST_ACCESSED_TITLE.to_string(),
        url: String::new(),
        note: Some(log),
        tags: Vec::new(),
        icon: IconRef::Default,
        created_at: timestamp,
        updated_at: timestamp,
    };
    store.append_record(group, marker)
}
