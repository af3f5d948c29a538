//! Database schema definitions and version upgrades
//!
//! The schema version is mirrored in `PRAGMA user_version`. A fresh file is
//! created at [`SCHEMA_VERSION`]; an older file is walked forward through
//! [`upgrade`] one version at a time inside a single transaction.

use crate::{Error, Result};
use rusqlite::{Connection, Transaction};

/// Version written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// SQL to create the teas table
pub const CREATE_TEAS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS teas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type INTEGER NOT NULL,
    price REAL NOT NULL DEFAULT 0,
    quantity INTEGER NOT NULL,
    image TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_teas_name ON teas(name)",
    "CREATE INDEX IF NOT EXISTS idx_teas_type ON teas(type)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_TEAS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Bring the database on `conn` to [`SCHEMA_VERSION`].
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let current = user_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current == 0 {
        tracing::info!("Creating tea schema at version {}", SCHEMA_VERSION);
        for stmt in all_schema_statements() {
            tx.execute(stmt, [])?;
        }
    } else {
        for version in current..SCHEMA_VERSION {
            tracing::info!("Upgrading tea schema from version {} to {}", version, version + 1);
            upgrade(&tx, version)?;
        }
    }
    tx.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
    tx.commit()?;

    Ok(())
}

/// Upgrade step from `from` to `from + 1`. Version 1 is the first schema,
/// so there are no steps yet.
fn upgrade(_tx: &Transaction<'_>, _from: u32) -> Result<()> {
    Ok(())
}

pub fn user_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_gets_current_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'teas'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        let err = apply_migrations(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion { found: 99, supported: SCHEMA_VERSION }
        ));
    }

    #[test]
    fn test_price_defaults_to_zero() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO teas (name, type, quantity) VALUES ('Sencha', 1, 3)", [])
            .unwrap();
        let price: f64 = conn.query_row("SELECT price FROM teas", [], |row| row.get(0)).unwrap();
        assert_eq!(price, 0.0);
    }
}
