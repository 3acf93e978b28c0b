//! In-memory vault store.
//!
//! Backs the test suite and host processes that keep the vault resident in
//! memory. Groups keep their records in insertion order, matching how the
//! host vault presents them.

use uuid::Uuid;

use crate::services::icon_resolver::content_hash;
use crate::types::errors::StoreError;
use crate::types::record::{Group, IconCacheEntry, Record};

use super::VaultStore;

/// Vault store holding everything in process memory.
#[derive(Default)]
pub struct MemoryVault {
    groups: Vec<(Group, Vec<Record>)>,
    icon_cache: Vec<IconCacheEntry>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn group_slot(&mut self, group: &Group) -> Result<&mut Vec<Record>, StoreError> {
        self.groups
            .iter_mut()
            .find(|(g, _)| g.id == group.id)
            .map(|(_, records)| records)
            .ok_or_else(|| StoreError::GroupNotFound(group.name.clone()))
    }
}

impl VaultStore for MemoryVault {
    fn find_or_create_group(&mut self, name: &str) -> Result<Group, StoreError> {
        if let Some((group, _)) = self.groups.iter().find(|(g, _)| g.name == name) {
            return Ok(group.clone());
        }
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.groups.push((group.clone(), Vec::new()));
        Ok(group)
    }

    fn list_records(&self, group: &Group) -> Result<Vec<Record>, StoreError> {
        self.groups
            .iter()
            .find(|(g, _)| g.id == group.id)
            .map(|(_, records)| records.clone())
            .ok_or_else(|| StoreError::GroupNotFound(group.name.clone()))
    }

    fn append_record(&mut self, group: &Group, record: Record) -> Result<(), StoreError> {
        self.group_slot(group)?.push(record);
        Ok(())
    }

    fn remove_record(&mut self, group: &Group, id: Uuid) -> Result<(), StoreError> {
        let records = self.group_slot(group)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    fn list_icon_cache(&self) -> Result<Vec<IconCacheEntry>, StoreError> {
        Ok(self.icon_cache.clone())
    }

    fn add_icon_cache_entry(&mut self, bytes: Vec<u8>) -> Result<IconCacheEntry, StoreError> {
        let hash = content_hash(&bytes);
        if let Some(existing) = self.icon_cache.iter().find(|e| e.content_hash == hash) {
            return Ok(existing.clone());
        }
        let entry = IconCacheEntry {
            id: Uuid::new_v4(),
            content_hash: hash,
            bytes,
        };
        self.icon_cache.push(entry.clone());
        Ok(entry)
    }
}
