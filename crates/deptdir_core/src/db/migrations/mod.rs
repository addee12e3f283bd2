//! Directory schema migrations.
//!
//! Each step is one SQL file. Pending steps run in one transaction, and the
//! result is checked against `schema::DIRECTORY_TABLES` before it commits,
//! so a store is either fully migrated and mapped or left untouched.
//!
//! Versions are strictly increasing; the last one is mirrored to
//! `PRAGMA user_version`.

use crate::db::schema::{find_schema_gap, DIRECTORY_TABLES};
use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "user_indexes",
        sql: include_str!("0002_user_indexes.sql"),
    },
];

/// Schema version a fully migrated store reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Runs pending migrations and verifies the mapped tables.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store is ahead of this build.
/// - `SchemaMismatch` when a mapped table or column is absent afterwards.
///   Nothing is committed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    if from_version == latest {
        return verify_tables(conn, latest);
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from_version) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    verify_tables(&tx, latest)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}

fn verify_tables(conn: &Connection, version: u32) -> DbResult<()> {
    match find_schema_gap(conn, &DIRECTORY_TABLES)? {
        None => Ok(()),
        Some(gap) => Err(DbError::SchemaMismatch { version, gap }),
    }
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
