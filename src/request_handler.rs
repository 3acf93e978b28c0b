//! Per-request save pipeline.
//!
//! Drives one incoming request through decode, duplicate check, icon
//! resolution and the record write. All errors are converted to strings at
//! this boundary so a malformed request can never take down the listener.
//!
//! Locking discipline: the vault lock is taken once for the cheap early
//! duplicate check, released for the icon download, then taken again for
//! the combined re-check / icon registration / append / marker update.
//! The second critical section keeps check-then-insert atomic; network
//! I/O never runs under the lock.

use log::debug;

use crate::services::duplicate_checker;
use crate::services::icon_resolver::{IconResolver, IconSource};
use crate::services::notifier::UiNotifier;
use crate::services::payload_decoder::{PayloadDecoder, PayloadDecoderTrait};
use crate::services::record_writer;
use crate::services::settings_engine::FlagSource;
use crate::store::{SharedVault, VaultStore};
use crate::types::record::{BookmarkRequest, Group, IconRef, Record, GROUP_NAME};
use crate::types::settings::Flag;

/// Terminal state of one handled request.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A new record was committed.
    Saved(Record),
    /// The pair already existed and the prevent-duplicate flag was on.
    Skipped,
}

fn lock_vault(vault: &SharedVault) -> std::sync::MutexGuard<'_, Box<dyn VaultStore>> {
    match vault.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn debug_enabled(flags: &dyn FlagSource) -> bool {
    flags.get_flag(Flag::ShowDebugMessages)
}

/// Handles one decoded-or-not save request end to end.
///
/// Returns `Err` only for decode and store failures; those abort the
/// request with no further mutation. Icon and marker failures are
/// recovered internally and never fail the request.
pub fn handle_save_request(
    vault: &SharedVault,
    decoder: &PayloadDecoder,
    resolver: &IconResolver,
    flags: &dyn FlagSource,
    notifier: &dyn UiNotifier,
    request: &BookmarkRequest,
) -> Result<SaveOutcome, String> {
    // RECEIVED -> DECODING
    let payload = decoder
        .decode(request)
        .map_err(|e| format!("decode: {}", e))?;

    if debug_enabled(flags) {
        debug!(
            "decoded request: title='{}' url='{}' icon-source-len={}",
            payload.title,
            payload.url,
            payload.icon.len()
        );
    }

    // DEDUP_CHECK (early, before spending a network fetch)
    let group = {
        let mut store = lock_vault(vault);
        let group = store
            .find_or_create_group(GROUP_NAME)
            .map_err(|e| format!("store: {}", e))?;
        let prevent = flags.get_flag(Flag::PreventDuplicateEntries);
        let duplicate =
            duplicate_checker::is_duplicate(&**store, &group, &payload.title, &payload.url, prevent)
                .map_err(|e| format!("store: {}", e))?;
        if duplicate {
            if debug_enabled(flags) {
                debug!("skipping duplicate entry '{}'", payload.title);
            }
            return Ok(SaveOutcome::Skipped);
        }
        group
    };

    // ICON_RESOLVE: best-effort, lock-free network fetch
    let icon_bytes = match IconSource::from_field(&payload.icon) {
        None => None,
        Some(source) => match resolver.fetch_bytes(&source) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                if debug_enabled(flags) {
                    debug!("icon resolution failed, using default: {}", e);
                }
                None
            }
        },
    };

    // WRITE_RECORD + UPDATE_MARKER under one lock so the duplicate
    // re-check and the hash-then-register sequence stay atomic.
    let record = {
        let mut store = lock_vault(vault);

        let prevent = flags.get_flag(Flag::PreventDuplicateEntries);
        let duplicate =
            duplicate_checker::is_duplicate(&**store, &group, &payload.title, &payload.url, prevent)
                .map_err(|e| format!("store: {}", e))?;
        if duplicate {
            if debug_enabled(flags) {
                debug!("skipping duplicate entry '{}' (raced another request)", payload.title);
            }
            return Ok(SaveOutcome::Skipped);
        }

        let icon = match icon_bytes {
            None => IconRef::Default,
            Some(bytes) => match resolver.register(&mut **store, bytes) {
                Ok(icon) => icon,
                Err(e) => {
                    if debug_enabled(flags) {
                        debug!("icon cache registration failed, using default: {}", e);
                    }
                    IconRef::Default
                }
            },
        };

        let record = record_writer::create_record(
            &mut **store,
            &group,
            &payload.title,
            &payload.url,
            icon,
            flags.get_flag(Flag::WriteDateAsNote),
        )
        .map_err(|e| format!("store: {}", e))?;

        // Marker failures never undo the committed record.
        if let Err(e) =
            record_writer::update_last_accessed_marker(&mut **store, &group, &payload.title)
        {
            if debug_enabled(flags) {
                debug!("last-accessed marker update failed: {}", e);
            }
        }

        record
    };

    // NOTIFY_SUCCESS
    notify_success(notifier, flags, &group, &record.title);

    Ok(SaveOutcome::Saved(record))
}

fn notify_success(notifier: &dyn UiNotifier, flags: &dyn FlagSource, group: &Group, title: &str) {
    notifier.refresh_ui(group);
    if flags.get_flag(Flag::ShowSuccessNotification) {
        notifier.show_success(title);
    }
}
