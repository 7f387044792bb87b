//! Table contract and resource identifiers.
//!
//! Everything an operation needs to know about a table (its name, column
//! set, content type, default sort order and which operations it permits)
//! lives in an immutable [`TableSpec`]. The two specs are built once as
//! constants; the [`Contract`] owns the authority string and routes parsed
//! [`ResourceUri`]s to the matching spec.

use std::fmt;

use crate::error::{ProviderError, ProviderResult};

/// URI scheme for all resource identifiers handled by this crate.
pub const SCHEME: &str = "content";

/// Row id column shared by both tables.
pub const COLUMN_ID: &str = "_id";

/// Required photo reference column shared by both tables.
pub const COLUMN_URI: &str = "uri";

/// Optional timestamp column on the metadata cache.
pub const COLUMN_DATETIME: &str = "datetime";

/// Optional location column on the metadata cache.
pub const COLUMN_LOCATION: &str = "location";

/// Static description of one provider table.
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub content_type: &'static str,
    pub default_sort_order: &'static str,
    pub supports_delete: bool,
}

impl TableSpec {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}

/// User-chosen photo references.
pub const CHOSEN_PHOTOS: TableSpec = TableSpec {
    name: "chosen_photos",
    columns: &[COLUMN_ID, COLUMN_URI],
    content_type: "vnd.gallery.cursor.dir/chosen_photos",
    default_sort_order: "_id ASC",
    supports_delete: true,
};

/// Cached per-photo metadata. Rows are never deleted or updated, only
/// replaced wholesale by a newer insert with the same uri.
pub const METADATA_CACHE: TableSpec = TableSpec {
    name: "metadata_cache",
    columns: &[COLUMN_ID, COLUMN_URI, COLUMN_DATETIME, COLUMN_LOCATION],
    content_type: "vnd.gallery.cursor.dir/metadata_cache",
    // The metadata cache has no documented default of its own; insertion
    // order matches the chosen photos table.
    default_sort_order: "_id ASC",
    supports_delete: false,
};

/// A parsed resource identifier: `content://<authority>/<table>[/<id>]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    authority: String,
    table: String,
    row_id: Option<i64>,
}

impl ResourceUri {
    /// Build the base identifier for a table under the given authority.
    pub fn for_table(authority: &str, table: &TableSpec) -> Self {
        Self {
            authority: authority.to_string(),
            table: table.name.to_string(),
            row_id: None,
        }
    }

    /// Mint a single-row reference by appending a row id to this identifier.
    pub fn with_row_id(&self, row_id: i64) -> Self {
        Self {
            authority: self.authority.clone(),
            table: self.table.clone(),
            row_id: Some(row_id),
        }
    }

    /// Parse a `content://<authority>/<table>[/<id>]` string.
    pub fn parse(s: &str) -> ProviderResult<Self> {
        let rest = s
            .strip_prefix("content://")
            .ok_or_else(|| ProviderError::InvalidArgument(format!("malformed URI {s}")))?;

        let mut segments = rest.split('/');
        let authority = segments.next().unwrap_or("");
        let table = segments.next().unwrap_or("");
        if authority.is_empty() || table.is_empty() {
            return Err(ProviderError::InvalidArgument(format!("malformed URI {s}")));
        }

        let row_id = match segments.next() {
            None => None,
            Some(id) => Some(id.parse::<i64>().map_err(|_| {
                ProviderError::InvalidArgument(format!("malformed row id in URI {s}"))
            })?),
        };
        if segments.next().is_some() {
            return Err(ProviderError::InvalidArgument(format!("malformed URI {s}")));
        }

        Ok(Self {
            authority: authority.to_string(),
            table: table.to_string(),
            row_id,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn row_id(&self) -> Option<i64> {
        self.row_id
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}://{}/{}", self.authority, self.table)?;
        if let Some(id) = self.row_id {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

/// Routes resource identifiers to table specs for one authority.
#[derive(Debug, Clone)]
pub struct Contract {
    authority: String,
}

impl Contract {
    pub fn new(authority: &str) -> Self {
        Self {
            authority: authority.to_string(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Resolve a table-level identifier to its spec.
    ///
    /// Single-row identifiers (with an id suffix) are not operation targets
    /// and resolve to `None`, as does anything under a foreign authority or
    /// an unregistered table name.
    pub fn resolve(&self, uri: &ResourceUri) -> Option<&'static TableSpec> {
        if uri.authority() != self.authority || uri.row_id().is_some() {
            return None;
        }
        match uri.table() {
            name if name == CHOSEN_PHOTOS.name => Some(&CHOSEN_PHOTOS),
            name if name == METADATA_CACHE.name => Some(&METADATA_CACHE),
            _ => None,
        }
    }

    pub fn chosen_photos_uri(&self) -> ResourceUri {
        ResourceUri::for_table(&self.authority, &CHOSEN_PHOTOS)
    }

    pub fn metadata_cache_uri(&self) -> ResourceUri {
        ResourceUri::for_table(&self.authority, &METADATA_CACHE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_uri() {
        let uri = ResourceUri::parse("content://gallery/chosen_photos").unwrap();
        assert_eq!(uri.authority(), "gallery");
        assert_eq!(uri.table(), "chosen_photos");
        assert_eq!(uri.row_id(), None);
        assert_eq!(uri.to_string(), "content://gallery/chosen_photos");
    }

    #[test]
    fn test_parse_row_uri() {
        let uri = ResourceUri::parse("content://gallery/metadata_cache/42").unwrap();
        assert_eq!(uri.row_id(), Some(42));
        assert_eq!(uri.to_string(), "content://gallery/metadata_cache/42");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourceUri::parse("http://gallery/chosen_photos").is_err());
        assert!(ResourceUri::parse("content://gallery").is_err());
        assert!(ResourceUri::parse("content:///chosen_photos").is_err());
        assert!(ResourceUri::parse("content://gallery/chosen_photos/abc").is_err());
        assert!(ResourceUri::parse("content://gallery/chosen_photos/1/extra").is_err());
    }

    #[test]
    fn test_with_row_id_mints_reference() {
        let contract = Contract::new("gallery");
        let minted = contract.chosen_photos_uri().with_row_id(7);
        assert_eq!(minted.to_string(), "content://gallery/chosen_photos/7");
    }

    #[test]
    fn test_resolve_known_tables() {
        let contract = Contract::new("gallery");
        let chosen = contract.resolve(&contract.chosen_photos_uri()).unwrap();
        assert_eq!(chosen.name, "chosen_photos");
        assert!(chosen.supports_delete);

        let metadata = contract.resolve(&contract.metadata_cache_uri()).unwrap();
        assert_eq!(metadata.name, "metadata_cache");
        assert!(!metadata.supports_delete);
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let contract = Contract::new("gallery");

        // Unknown table
        let uri = ResourceUri::parse("content://gallery/sources").unwrap();
        assert!(contract.resolve(&uri).is_none());

        // Foreign authority
        let uri = ResourceUri::parse("content://other/chosen_photos").unwrap();
        assert!(contract.resolve(&uri).is_none());

        // Row-level identifiers are not operation targets
        let uri = contract.chosen_photos_uri().with_row_id(1);
        assert!(contract.resolve(&uri).is_none());
    }
}
