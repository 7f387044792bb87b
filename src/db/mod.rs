//! SQLite database handle: open, create and upgrade the schema.

pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::ProviderResult;
use self::schema::{CREATE_CHOSEN_PHOTOS, CREATE_METADATA_CACHE, SCHEMA_VERSION};

/// The provider's database file. Opened lazily by the owning provider and
/// held for its lifetime; never explicitly closed.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open(path: &Path) -> ProviderResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open an in-memory database (used in tests).
    pub fn open_in_memory() -> ProviderResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create the tables on a fresh file, or apply the version upgrade on an
    /// older one. A version 0 database is a new file.
    fn initialize(&self) -> ProviderResult<()> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version == 0 {
            tracing::info!(version = SCHEMA_VERSION, "creating provider schema");
            self.conn.execute_batch(CREATE_CHOSEN_PHOTOS)?;
            self.conn.execute_batch(CREATE_METADATA_CACHE)?;
            self.set_version(SCHEMA_VERSION)?;
        } else if version < SCHEMA_VERSION {
            self.upgrade(version)?;
        }

        Ok(())
    }

    /// Version 1 -> 2 drops and recreates the metadata cache (cached
    /// metadata is lost; chosen photos are preserved). No later upgrade
    /// paths exist.
    fn upgrade(&self, from_version: i32) -> ProviderResult<()> {
        tracing::info!(from_version, to_version = SCHEMA_VERSION, "upgrading provider schema");
        if from_version < 2 {
            self.conn
                .execute_batch("DROP TABLE IF EXISTS metadata_cache;")?;
            self.conn.execute_batch(CREATE_METADATA_CACHE)?;
        }
        self.set_version(SCHEMA_VERSION)?;
        Ok(())
    }

    fn set_version(&self, version: i32) -> ProviderResult<()> {
        self.conn.pragma_update(None, "user_version", version)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Default database file location.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gallery-provider")
        .join("gallery_source.db")
}
