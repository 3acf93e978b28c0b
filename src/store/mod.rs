//! Record store adapter — the capability surface the pipeline uses to talk
//! to the vault.
//!
//! The host vault is an external collaborator; everything the ingestion
//! pipeline needs from it is expressed by [`VaultStore`] so the core can be
//! tested without a real host. Two implementations ship with the crate:
//! [`MemoryVault`] for tests and host embedding, and [`SqliteVault`] for a
//! standalone persistent vault file.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::types::errors::StoreError;
use crate::types::record::{Group, IconCacheEntry, Record};

pub mod memory_vault;
pub mod sqlite_vault;

pub use memory_vault::MemoryVault;
pub use sqlite_vault::SqliteVault;

/// Capability interface over the host vault.
///
/// All pipeline mutations flow through a [`SharedVault`] lock so that
/// check-then-act sequences (duplicate scan then insert, hash scan then
/// cache registration) stay atomic under concurrent request handling.
pub trait VaultStore: Send {
    /// Looks up a group by name under the root container, creating it on
    /// first use.
    fn find_or_create_group(&mut self, name: &str) -> Result<Group, StoreError>;

    /// Enumerates the group's records in insertion order.
    fn list_records(&self, group: &Group) -> Result<Vec<Record>, StoreError>;

    /// Appends a record to the group.
    fn append_record(&mut self, group: &Group, record: Record) -> Result<(), StoreError>;

    /// Removes a record from the group by id.
    fn remove_record(&mut self, group: &Group, id: Uuid) -> Result<(), StoreError>;

    /// Enumerates the shared icon cache.
    fn list_icon_cache(&self) -> Result<Vec<IconCacheEntry>, StoreError>;

    /// Registers icon bytes in the cache and returns the entry.
    ///
    /// Idempotent by content: if an entry with the same content hash already
    /// exists it is returned unchanged, so no two entries ever share a hash.
    fn add_icon_cache_entry(&mut self, bytes: Vec<u8>) -> Result<IconCacheEntry, StoreError>;
}

/// Single-writer handle to the vault shared across handler threads.
pub type SharedVault = Arc<Mutex<Box<dyn VaultStore>>>;

/// Wraps a store in the shared single-writer handle.
pub fn shared(store: impl VaultStore + 'static) -> SharedVault {
    Arc::new(Mutex::new(Box::new(store)))
}
