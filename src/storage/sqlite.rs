//! SQLite storage implementation

use super::cursor::TeaCursor;
use super::schema;
use super::selection::{Selection, SortOrder};
use crate::contract::{TABLE_NAME, TeaColumn};
use crate::notify::{ChangeNotifier, ChangeObserver, SubscriptionHandle};
use crate::tea::{Tea, TeaValues};
use crate::uri::{ContentUri, ResourceKind, TeaUris, UriMatch};
use crate::{Error, Operation, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use std::sync::Arc;

/// SQLite-backed store for tea records.
///
/// Every read and write goes through a content address. Writes are validated
/// before they reach SQLite, and successful writes notify subscribers of the
/// address they touched.
pub struct TeaStore {
    conn: Connection,
    uris: TeaUris,
    notifier: ChangeNotifier,
}

impl TeaStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, TeaUris::default())
    }

    /// Open a database file answering to the given addressing table
    pub fn open_with(path: &Path, uris: TeaUris) -> Result<Self> {
        tracing::info!("Opening tea store at {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn, uris)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, TeaUris::default())
    }

    pub fn from_connection(mut conn: Connection, uris: TeaUris) -> Result<Self> {
        schema::apply_migrations(&mut conn)?;
        Ok(Self {
            conn,
            uris,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Addressing table this store answers to
    pub fn uris(&self) -> &TeaUris {
        &self.uris
    }

    // ========== Reads ==========

    /// Query the collection or a single tea.
    ///
    /// An empty `columns` slice selects every column. On an item address the
    /// selection is replaced by the id from the address.
    pub fn query(
        &self,
        uri: &ContentUri,
        columns: &[TeaColumn],
        selection: Option<&Selection>,
        sort: Option<&SortOrder>,
    ) -> Result<TeaCursor<'_>> {
        let target = self.uris.classify(uri);
        if target == UriMatch::Unrecognized {
            return Err(Error::InvalidUri(uri.to_uri_string()));
        }

        let columns = if columns.is_empty() {
            TeaColumn::all().to_vec()
        } else {
            columns.to_vec()
        };
        let column_list = columns.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ");

        let mut sql = format!("SELECT {} FROM {}", column_list, TABLE_NAME);
        let args = push_where(&mut sql, target, selection);
        if let Some(sort) = sort {
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort.to_sql());
        }

        tracing::debug!("query {} -> {}", uri, sql);
        let stmt = self.conn.prepare(&sql).map_err(|e| Error::storage_at(uri, e))?;
        TeaCursor::open(uri.clone(), columns, stmt, args)
    }

    /// Fetch a single tea by id
    pub fn get(&self, id: i64) -> Result<Option<Tea>> {
        let mut cursor = self.query(&self.uris.item_uri(id), &[], None, None)?;
        match cursor.next().transpose()? {
            Some(row) => Ok(row.to_tea()),
            None => Ok(None),
        }
    }

    /// Every tea, in the given order
    pub fn all(&self, sort: Option<&SortOrder>) -> Result<Vec<Tea>> {
        self.query(&self.uris.collection_uri(), &[], None, sort)?.into_teas()
    }

    /// Number of rows an address (and selection) would return
    pub fn count(&self, uri: &ContentUri, selection: Option<&Selection>) -> Result<usize> {
        let target = self.uris.classify(uri);
        if target == UriMatch::Unrecognized {
            return Err(Error::InvalidUri(uri.to_uri_string()));
        }

        let mut sql = format!("SELECT COUNT(*) FROM {}", TABLE_NAME);
        let args = push_where(&mut sql, target, selection);
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(args), |row| row.get(0))
            .map_err(|e| Error::storage_at(uri, e))?;
        Ok(count as usize)
    }

    /// Resource kind of an address
    pub fn resource_kind(&self, uri: &ContentUri) -> Result<ResourceKind> {
        self.uris.resource_kind(uri)
    }

    /// MIME-style content type of an address
    pub fn content_type(&self, uri: &ContentUri) -> Result<String> {
        Ok(self.uris.mime_type(self.resource_kind(uri)?))
    }

    // ========== Writes ==========

    /// Insert a new tea into the collection, returning its item address.
    pub fn insert(&self, uri: &ContentUri, values: &TeaValues) -> Result<ContentUri> {
        if self.uris.classify(uri) != UriMatch::Collection {
            return Err(unsupported(Operation::Insert, uri));
        }

        values.validate_for_insert().map_err(|source| {
            tracing::warn!("Rejected insert into {}: {}", uri, source);
            Error::Validation {
                uri: uri.to_uri_string(),
                source,
            }
        })?;

        let columns = values.to_columns();
        let names = columns.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!("INSERT INTO {} ({}) VALUES ({})", TABLE_NAME, names, placeholders);

        self.conn
            .execute(&sql, params_from_iter(columns.into_iter().map(|(_, v)| v)))
            .map_err(|e| {
                tracing::error!("Failed to insert row for {}: {}", uri, e);
                Error::storage_at(uri, e)
            })?;

        let id = self.conn.last_insert_rowid();
        let new_uri = self.uris.item_uri(id);
        tracing::debug!("Inserted {}", new_uri);

        self.notifier.notify(uri);
        Ok(new_uri)
    }

    /// Update the collection (rows matching `selection`) or a single tea.
    /// Returns the number of rows changed.
    pub fn update(
        &self,
        uri: &ContentUri,
        values: &TeaValues,
        selection: Option<&Selection>,
    ) -> Result<usize> {
        let target = self.uris.classify(uri);
        if target == UriMatch::Unrecognized {
            return Err(unsupported(Operation::Update, uri));
        }

        values.validate_for_update().map_err(|source| {
            tracing::warn!("Rejected update of {}: {}", uri, source);
            Error::Validation {
                uri: uri.to_uri_string(),
                source,
            }
        })?;

        if values.is_empty() {
            return Ok(0);
        }

        let columns = values.to_columns();
        let assignments = columns
            .iter()
            .map(|(c, _)| format!("{} = ?", c.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {}", TABLE_NAME, assignments);
        let mut args: Vec<Value> = columns.into_iter().map(|(_, v)| v).collect();
        args.extend(push_where(&mut sql, target, selection));

        let rows = self.conn.execute(&sql, params_from_iter(args)).map_err(|e| {
            tracing::error!("Failed to update {}: {}", uri, e);
            Error::storage_at(uri, e)
        })?;
        tracing::debug!("Updated {} row(s) at {}", rows, uri);

        if rows > 0 {
            self.notifier.notify(uri);
        }
        Ok(rows)
    }

    /// Delete from the collection (rows matching `selection`, or all rows)
    /// or a single tea. Returns the number of rows removed.
    pub fn delete(&self, uri: &ContentUri, selection: Option<&Selection>) -> Result<usize> {
        let target = self.uris.classify(uri);
        if target == UriMatch::Unrecognized {
            return Err(unsupported(Operation::Delete, uri));
        }

        let mut sql = format!("DELETE FROM {}", TABLE_NAME);
        let args = push_where(&mut sql, target, selection);

        let rows = self.conn.execute(&sql, params_from_iter(args)).map_err(|e| {
            tracing::error!("Failed to delete {}: {}", uri, e);
            Error::storage_at(uri, e)
        })?;
        tracing::debug!("Deleted {} row(s) at {}", rows, uri);

        if rows > 0 {
            self.notifier.notify(uri);
        }
        Ok(rows)
    }

    // ========== Change Notifications ==========

    /// Watch an address for changes. With `descendants`, changes to any
    /// address beneath it are delivered too.
    pub fn subscribe(
        &self,
        uri: &ContentUri,
        descendants: bool,
        observer: Arc<dyn ChangeObserver>,
    ) -> SubscriptionHandle {
        self.notifier.subscribe(uri.clone(), descendants, observer)
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.notifier.unsubscribe(handle)
    }

    /// Announce a change at `uri` without writing anything.
    pub fn notify_change(&self, uri: &ContentUri) -> usize {
        self.notifier.notify(uri)
    }

    // ========== Statistics ==========

    /// Totals over the whole collection
    pub fn stats(&self) -> Result<InventoryStats> {
        let (teas, units, value, out_of_stock) = self.conn.query_row(
            &format!(
                "SELECT COUNT(*), COALESCE(SUM(quantity), 0), COALESCE(SUM(price * quantity), 0.0), \
                 COALESCE(SUM(CASE WHEN quantity = 0 THEN 1 ELSE 0 END), 0) FROM {}",
                TABLE_NAME
            ),
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )?;

        Ok(InventoryStats {
            teas: teas as usize,
            units,
            stock_value: value,
            out_of_stock: out_of_stock as usize,
        })
    }
}

fn unsupported(operation: Operation, uri: &ContentUri) -> Error {
    Error::UnsupportedOperation {
        operation,
        uri: uri.to_uri_string(),
    }
}

/// Append the `WHERE` clause for `target` to `sql` and return its arguments.
/// Item addresses always filter by id alone.
fn push_where(sql: &mut String, target: UriMatch, selection: Option<&Selection>) -> Vec<Value> {
    match (target, selection) {
        (UriMatch::Item(id), _) => {
            sql.push_str(&format!(" WHERE {} = ?", TeaColumn::Id.as_str()));
            vec![Value::Integer(id)]
        }
        (_, Some(selection)) => {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            selection.args().to_vec()
        }
        (_, None) => Vec::new(),
    }
}

/// Inventory totals
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InventoryStats {
    pub teas: usize,
    pub units: i64,
    pub stock_value: f64,
    pub out_of_stock: usize,
}

impl std::fmt::Display for InventoryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Inventory Statistics:")?;
        writeln!(f, "  Teas: {}", self.teas)?;
        writeln!(f, "  Units in stock: {}", self.units)?;
        writeln!(f, "  Stock value: {:.2}", self.stock_value)?;
        write!(f, "  Out of stock: {}", self.out_of_stock)
    }
}
