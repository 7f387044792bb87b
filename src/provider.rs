//! The provider itself: URI-addressed CRUD over the two tables.
//!
//! Every public operation resolves its identifier through the [`Contract`]
//! first, then delegates to a table-generic helper. Writes go through the
//! [`ChangeNotifier`]; `apply_batch` wraps its sub-operations between
//! `hold()` and `release()` so a batch publishes each touched identifier
//! once, after the batch completes.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::contract::{Contract, ResourceUri, TableSpec};
use crate::db::Database;
use crate::error::{ProviderError, ProviderResult};
use crate::notifier::{ChangeNotifier, NotificationTransport};
use crate::values::RowValues;

/// One write in a batch.
#[derive(Debug)]
pub enum BatchOperation {
    Insert {
        uri: ResourceUri,
        values: RowValues,
    },
    Delete {
        uri: ResourceUri,
        filter: Option<String>,
        filter_args: Vec<Value>,
    },
}

/// Outcome of one batch operation, in submission order.
#[derive(Debug)]
pub enum BatchResult {
    Inserted(ResourceUri),
    Deleted(usize),
}

/// A materialized query result tied to the identifier it was read from.
///
/// The queried identifier has been registered as an observer dependency with
/// the notification transport, so later writes behind it reach whoever holds
/// this result's subscription.
#[derive(Debug)]
pub struct QueryResult {
    pub uri: ResourceUri,
    pub rows: Vec<RowValues>,
}

/// URI-dispatched access to the chosen photos and metadata cache tables.
///
/// Writes take `&mut self`: the notifier's mode flag and pending set are
/// single-writer state, so overlapping batches require external
/// synchronization by the caller.
pub struct GalleryProvider {
    db: Database,
    contract: Contract,
    notifier: ChangeNotifier,
}

impl GalleryProvider {
    /// Open the configured database file and attach the (optional)
    /// notification transport.
    pub fn open(
        config: &Config,
        transport: Option<Arc<dyn NotificationTransport>>,
    ) -> ProviderResult<Self> {
        Self::open_at(&config.db_path, &config.authority, transport)
    }

    pub fn open_at(
        path: &Path,
        authority: &str,
        transport: Option<Arc<dyn NotificationTransport>>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            db: Database::open(path)?,
            contract: Contract::new(authority),
            notifier: ChangeNotifier::new(transport),
        })
    }

    /// In-memory provider (used in tests).
    pub fn open_in_memory(
        authority: &str,
        transport: Option<Arc<dyn NotificationTransport>>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
            contract: Contract::new(authority),
            notifier: ChangeNotifier::new(transport),
        })
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    fn resolve(&self, uri: &ResourceUri) -> ProviderResult<&'static TableSpec> {
        resolve(&self.contract, uri)
    }

    /// The content type string for a table-level identifier.
    pub fn type_of(&self, uri: &ResourceUri) -> ProviderResult<&'static str> {
        Ok(self.resolve(uri)?.content_type)
    }

    /// Insert-or-replace a row keyed on its `uri` field.
    ///
    /// Returns the minted single-row reference and notifies it.
    pub fn insert(&mut self, uri: &ResourceUri, values: &RowValues) -> ProviderResult<ResourceUri> {
        let table = self.resolve(uri)?;
        let minted = insert_row(self.db.conn(), table, uri, values)?;
        self.notifier.notify(minted.clone());
        Ok(minted)
    }

    /// Delete rows matching the filter (no filter deletes all rows).
    ///
    /// Only the chosen photos table permits deletes. Returns the number of
    /// rows removed and notifies the table identifier when it is non-zero.
    pub fn delete(
        &mut self,
        uri: &ResourceUri,
        filter: Option<&str>,
        filter_args: &[Value],
    ) -> ProviderResult<usize> {
        let table = self.resolve(uri)?;
        if !table.supports_delete {
            return Err(ProviderError::Unsupported("Deletes are not supported"));
        }
        let count = delete_rows(self.db.conn(), table, filter, filter_args)?;
        if count > 0 {
            self.notifier.notify(uri.clone());
        }
        Ok(count)
    }

    /// Updates are disallowed for both tables.
    pub fn update(
        &mut self,
        uri: &ResourceUri,
        _values: &RowValues,
        _filter: Option<&str>,
        _filter_args: &[Value],
    ) -> ProviderResult<usize> {
        self.resolve(uri)?;
        Err(ProviderError::Unsupported("Updates are not allowed"))
    }

    /// Read rows from a table.
    ///
    /// The projection is restricted to the table's column set and the
    /// table's default sort order applies when none is given. `Ok(None)`
    /// means no notification transport is attached: collaborator absence,
    /// not a data error.
    pub fn query(
        &self,
        uri: &ResourceUri,
        projection: Option<&[&str]>,
        filter: Option<&str>,
        filter_args: &[Value],
        sort_order: Option<&str>,
    ) -> ProviderResult<Option<QueryResult>> {
        let table = self.resolve(uri)?;
        let Some(transport) = self.notifier.transport() else {
            return Ok(None);
        };

        let columns: Vec<&str> = match projection {
            Some(requested) => {
                for column in requested {
                    if !table.has_column(column) {
                        return Err(ProviderError::InvalidArgument(format!(
                            "unknown column {column} in projection for {}",
                            table.name
                        )));
                    }
                }
                requested.to_vec()
            }
            None => table.columns.to_vec(),
        };

        let order_by = match sort_order {
            Some(order) if !order.trim().is_empty() => order,
            _ => table.default_sort_order,
        };

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), table.name);
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);

        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(filter_args), |row| {
                let mut values = RowValues::new();
                for (idx, column) in columns.iter().enumerate() {
                    values.put(column, row.get::<_, Value>(idx)?);
                }
                Ok(values)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        transport.register_observer(uri);
        Ok(Some(QueryResult {
            uri: uri.clone(),
            rows,
        }))
    }

    /// Execute a sequence of writes as one transaction, coalescing change
    /// notifications until the batch completes.
    ///
    /// The notifier is released on success and failure alike; a failed batch
    /// rolls its writes back but still flushes whatever notifications were
    /// gathered before the failure.
    pub fn apply_batch(
        &mut self,
        operations: Vec<BatchOperation>,
    ) -> ProviderResult<Vec<BatchResult>> {
        self.notifier.hold();
        let result = self.apply_operations(operations);
        self.notifier.release();
        result
    }

    fn apply_operations(
        &mut self,
        operations: Vec<BatchOperation>,
    ) -> ProviderResult<Vec<BatchResult>> {
        let Self {
            db,
            contract,
            notifier,
        } = self;

        let tx = db.conn_mut().transaction()?;
        let mut results = Vec::with_capacity(operations.len());
        for operation in operations {
            match operation {
                BatchOperation::Insert { uri, values } => {
                    let table = resolve(contract, &uri)?;
                    let minted = insert_row(&tx, table, &uri, &values)?;
                    notifier.notify(minted.clone());
                    results.push(BatchResult::Inserted(minted));
                }
                BatchOperation::Delete {
                    uri,
                    filter,
                    filter_args,
                } => {
                    let table = resolve(contract, &uri)?;
                    if !table.supports_delete {
                        return Err(ProviderError::Unsupported("Deletes are not supported"));
                    }
                    let count = delete_rows(&tx, table, filter.as_deref(), &filter_args)?;
                    if count > 0 {
                        notifier.notify(uri.clone());
                    }
                    results.push(BatchResult::Deleted(count));
                }
            }
        }
        tx.commit()?;
        Ok(results)
    }
}

fn resolve(contract: &Contract, uri: &ResourceUri) -> ProviderResult<&'static TableSpec> {
    contract
        .resolve(uri)
        .ok_or_else(|| ProviderError::InvalidArgument(format!("unknown URI {uri}")))
}

fn insert_row(
    conn: &Connection,
    table: &'static TableSpec,
    target: &ResourceUri,
    values: &RowValues,
) -> ProviderResult<ResourceUri> {
    if values.uri_text().is_none() {
        return Err(ProviderError::InvalidArgument(format!(
            "initial values must contain a non-empty uri field for {target}"
        )));
    }
    for column in values.columns() {
        if !table.has_column(column) {
            return Err(ProviderError::InvalidArgument(format!(
                "unknown column {column} for table {}",
                table.name
            )));
        }
    }

    let columns: Vec<&str> = values.columns().collect();
    let placeholders: Vec<&str> = std::iter::repeat("?").take(columns.len()).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))?;

    let row_id = conn.last_insert_rowid();
    if row_id <= 0 {
        return Err(ProviderError::WriteFailure {
            uri: target.clone(),
        });
    }

    tracing::debug!(table = table.name, row_id, "inserted row");
    Ok(target.with_row_id(row_id))
}

fn delete_rows(
    conn: &Connection,
    table: &'static TableSpec,
    filter: Option<&str>,
    filter_args: &[Value],
) -> ProviderResult<usize> {
    let mut sql = format!("DELETE FROM {}", table.name);
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        sql.push_str(filter);
    }
    let count = conn.execute(&sql, params_from_iter(filter_args))?;
    tracing::debug!(table = table.name, count, "deleted rows");
    Ok(count)
}
