//! SQLite-backed vault store.
//!
//! Persists groups, records and the icon cache in the standalone KeeBook
//! vault file managed by [`crate::database::Database`]. Tags are stored as
//! a JSON array column; the icon reference is a nullable cache-entry id
//! (NULL means the default icon).

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::services::icon_resolver::content_hash;
use crate::types::errors::StoreError;
use crate::types::record::{Group, IconCacheEntry, IconRef, Record};

use super::VaultStore;

/// Raw record columns as read from SQLite, before id/tag/icon parsing.
type RecordRow = (String, String, String, Option<String>, String, Option<String>, i64, i64);

/// Vault store backed by a SQLite database file.
pub struct SqliteVault {
    db: Database,
}

impl SqliteVault {
    /// Wraps an already opened vault database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn parse_uuid(value: &str, what: &str) -> Result<Uuid, StoreError> {
        Uuid::parse_str(value)
            .map_err(|e| StoreError::Corrupt(format!("bad {} '{}': {}", what, value, e)))
    }

    fn parse_record(row: RecordRow) -> Result<Record, StoreError> {
        let (id, title, url, note, tags_json, icon_id, created_at, updated_at) = row;

        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| StoreError::Corrupt(format!("bad tag column: {}", e)))?;
        let icon = match icon_id {
            None => IconRef::Default,
            Some(cache_id) => IconRef::Cached(Self::parse_uuid(&cache_id, "icon id")?),
        };

        Ok(Record {
            id: Self::parse_uuid(&id, "record id")?,
            title,
            url,
            note,
            tags,
            icon,
            created_at,
            updated_at,
        })
    }
}

impl VaultStore for SqliteVault {
    fn find_or_create_group(&mut self, name: &str) -> Result<Group, StoreError> {
        let conn = self.db.connection();
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM groups WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StoreError::DatabaseError(other.to_string())),
            })?;

        if let Some(id_str) = existing {
            return Ok(Group {
                id: Self::parse_uuid(&id_str, "group id")?,
                name: name.to_string(),
            });
        }

        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        conn.execute(
            "INSERT INTO groups (id, name) VALUES (?1, ?2)",
            params![group.id.to_string(), group.name],
        )
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(group)
    }

    fn list_records(&self, group: &Group) -> Result<Vec<Record>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, url, note, tags, icon_id, created_at, updated_at \
                 FROM records WHERE group_id = ?1 ORDER BY rowid",
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![group.id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            let raw: RecordRow = row.map_err(|e| StoreError::DatabaseError(e.to_string()))?;
            results.push(Self::parse_record(raw)?);
        }
        Ok(results)
    }

    fn append_record(&mut self, group: &Group, record: Record) -> Result<(), StoreError> {
        let tags_json = serde_json::to_string(&record.tags)
            .map_err(|e| StoreError::Corrupt(format!("tag serialization: {}", e)))?;
        let icon_id = match &record.icon {
            IconRef::Default => None,
            IconRef::Cached(id) => Some(id.to_string()),
        };

        self.db
            .connection()
            .execute(
                "INSERT INTO records (id, group_id, title, url, note, tags, icon_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id.to_string(),
                    group.id.to_string(),
                    record.title,
                    record.url,
                    record.note,
                    tags_json,
                    icon_id,
                    record.created_at,
                    record.updated_at
                ],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn remove_record(&mut self, group: &Group, id: Uuid) -> Result<(), StoreError> {
        let affected = self
            .db
            .connection()
            .execute(
                "DELETE FROM records WHERE id = ?1 AND group_id = ?2",
                params![id.to_string(), group.id.to_string()],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    fn list_icon_cache(&self) -> Result<Vec<IconCacheEntry>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT id, content_hash, bytes FROM icon_cache ORDER BY rowid")
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            let (id_str, content_hash, bytes): (String, String, Vec<u8>) =
                row.map_err(|e| StoreError::DatabaseError(e.to_string()))?;
            results.push(IconCacheEntry {
                id: Self::parse_uuid(&id_str, "cache id")?,
                content_hash,
                bytes,
            });
        }
        Ok(results)
    }

    fn add_icon_cache_entry(&mut self, bytes: Vec<u8>) -> Result<IconCacheEntry, StoreError> {
        let hash = content_hash(&bytes);
        let conn = self.db.connection();

        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM icon_cache WHERE content_hash = ?1",
                params![hash],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StoreError::DatabaseError(other.to_string())),
            })?;

        if let Some(id_str) = existing {
            return Ok(IconCacheEntry {
                id: Self::parse_uuid(&id_str, "cache id")?,
                content_hash: hash,
                bytes,
            });
        }

        let entry = IconCacheEntry {
            id: Uuid::new_v4(),
            content_hash: hash,
            bytes,
        };
        conn.execute(
            "INSERT INTO icon_cache (id, content_hash, bytes) VALUES (?1, ?2, ?3)",
            params![entry.id.to_string(), entry.content_hash, entry.bytes],
        )
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(entry)
    }
}
