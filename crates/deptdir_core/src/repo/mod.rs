//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define typed CRUD contracts for departments and employees.
//! - Keep SQL details and ordering rules inside the persistence boundary.
//!
//! # Invariants
//! - Repositories are only constructed over migrated connections whose
//!   tables match `db::schema`.
//! - Missing rows are reported as absence, never as errors.

pub mod dept_repo;
pub mod employee_repo;
pub mod error;
pub mod page;

use crate::db::migrations::latest_version;
use crate::db::schema::{find_schema_gap, SchemaGap, TableDef};
use error::{RepoError, RepoResult};
use rusqlite::Connection;

/// Verifies schema version and the mapped tables/columns on `conn`.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[TableDef]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    match find_schema_gap(conn, tables)? {
        None => Ok(()),
        Some(SchemaGap::MissingTable(table)) => Err(RepoError::MissingRequiredTable(table)),
        Some(SchemaGap::MissingColumn { table, column }) => {
            Err(RepoError::MissingRequiredColumn { table, column })
        }
    }
}

/// Converts a SQLite `COUNT(*)` result into an unsigned total.
pub(crate) fn count_to_u64(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{value}`")))
}
