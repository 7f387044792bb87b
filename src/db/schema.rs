//! Schema definitions for the provider database.

/// Current schema version, recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 2;

/// User-chosen photo references. The `ON CONFLICT REPLACE` uniqueness
/// constraint makes a re-insert of an existing uri overwrite the old row
/// instead of failing.
pub const CREATE_CHOSEN_PHOTOS: &str = r#"
CREATE TABLE chosen_photos (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT NOT NULL,
    UNIQUE (uri) ON CONFLICT REPLACE
);
"#;

/// Cached photo metadata, keyed on uri with the same replace policy.
pub const CREATE_METADATA_CACHE: &str = r#"
CREATE TABLE metadata_cache (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT NOT NULL,
    datetime INTEGER,
    location TEXT,
    UNIQUE (uri) ON CONFLICT REPLACE
);
"#;
