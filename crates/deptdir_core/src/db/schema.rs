//! Explicit table definitions and field-to-column mapping.
//!
//! # Responsibility
//! - Name every persisted table and column the repositories rely on.
//! - Map model field names to storage column names in one place.
//! - Report the first mapped table or column a connection lacks.
//!
//! # Invariants
//! - Every entry here exists in the migrated schema. The migration runner
//!   checks this before committing, and repositories check it again when
//!   they are constructed.
//! - Column constraints in the migration SQL use the limits exported by
//!   `crate::model`.

use rusqlite::Connection;
use std::fmt::{Display, Formatter};

/// One model field and the column that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: &'static str,
    pub column: &'static str,
}

/// One persisted table and its mapped columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnDef],
}

pub const DEPT_TABLE_NAME: &str = "tbl_dept";
pub const DEPT_ID_COLUMN: &str = "deptId";
pub const DEPT_NAME_COLUMN: &str = "deptName";

pub const EMPLOYEE_TABLE_NAME: &str = "tbl_user";
pub const EMPLOYEE_ID_COLUMN: &str = "id";
pub const EMPLOYEE_NAME_COLUMN: &str = "name";
pub const EMPLOYEE_AGE_COLUMN: &str = "age";
pub const EMPLOYEE_CREATED_AT_COLUMN: &str = "createdAt";
pub const EMPLOYEE_DEPT_ID_COLUMN: &str = "deptId";

pub const DEPT_TABLE: TableDef = TableDef {
    name: DEPT_TABLE_NAME,
    primary_key: DEPT_ID_COLUMN,
    columns: &[
        ColumnDef {
            field: "dept_id",
            column: DEPT_ID_COLUMN,
        },
        ColumnDef {
            field: "dept_name",
            column: DEPT_NAME_COLUMN,
        },
    ],
};

pub const EMPLOYEE_TABLE: TableDef = TableDef {
    name: EMPLOYEE_TABLE_NAME,
    primary_key: EMPLOYEE_ID_COLUMN,
    columns: &[
        ColumnDef {
            field: "id",
            column: EMPLOYEE_ID_COLUMN,
        },
        ColumnDef {
            field: "name",
            column: EMPLOYEE_NAME_COLUMN,
        },
        ColumnDef {
            field: "age",
            column: EMPLOYEE_AGE_COLUMN,
        },
        ColumnDef {
            field: "created_at",
            column: EMPLOYEE_CREATED_AT_COLUMN,
        },
        ColumnDef {
            field: "dept",
            column: EMPLOYEE_DEPT_ID_COLUMN,
        },
    ],
};

/// Every table the directory store owns.
pub const DIRECTORY_TABLES: [TableDef; 2] = [DEPT_TABLE, EMPLOYEE_TABLE];

/// First mapping entry missing from a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGap {
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for SchemaGap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable(table) => write!(f, "table `{table}` is missing"),
            Self::MissingColumn { table, column } => {
                write!(f, "column `{column}` is missing from `{table}`")
            }
        }
    }
}

/// Returns the first table or column of `tables` that `conn` lacks.
pub fn find_schema_gap(
    conn: &Connection,
    tables: &[TableDef],
) -> rusqlite::Result<Option<SchemaGap>> {
    for table in tables {
        let present = table_columns(conn, table.name)?;
        if present.is_empty() {
            return Ok(Some(SchemaGap::MissingTable(table.name)));
        }
        if let Some(def) = table
            .columns
            .iter()
            .find(|def| !present.iter().any(|column| column == def.column))
        {
            return Ok(Some(SchemaGap::MissingColumn {
                table: table.name,
                column: def.column,
            }));
        }
    }
    Ok(None)
}

/// Column names of `table`; empty when the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let mut rows = stmt.query([table])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(0)?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::{
        find_schema_gap, SchemaGap, TableDef, DEPT_TABLE, DIRECTORY_TABLES, EMPLOYEE_TABLE,
    };
    use rusqlite::Connection;
    use crate::model::{DEPT_ID_MAX_LEN, DEPT_NAME_MAX_LEN, EMPLOYEE_AGE_MAX, EMPLOYEE_NAME_MAX_LEN};

    const INIT_SQL: &str = include_str!("migrations/0001_init.sql");

    fn column_for(table: &TableDef, field: &str) -> Option<&'static str> {
        table
            .columns
            .iter()
            .find(|def| def.field == field)
            .map(|def| def.column)
    }

    #[test]
    fn model_fields_map_to_expected_columns() {
        assert_eq!(column_for(&EMPLOYEE_TABLE, "created_at"), Some("createdAt"));
        assert_eq!(column_for(&EMPLOYEE_TABLE, "dept"), Some("deptId"));
        assert_eq!(column_for(&DEPT_TABLE, "dept_name"), Some("deptName"));
        assert_eq!(column_for(&DEPT_TABLE, "employees"), None);
    }

    #[test]
    fn find_schema_gap_reports_first_missing_entry() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(
            find_schema_gap(&conn, &DIRECTORY_TABLES).unwrap(),
            Some(SchemaGap::MissingTable("tbl_dept"))
        );

        conn.execute_batch(
            "CREATE TABLE tbl_dept (deptId TEXT PRIMARY KEY, deptName TEXT);
             CREATE TABLE tbl_user (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);",
        )
        .unwrap();
        assert_eq!(find_schema_gap(&conn, &[DEPT_TABLE]).unwrap(), None);
        assert_eq!(
            find_schema_gap(&conn, &DIRECTORY_TABLES).unwrap(),
            Some(SchemaGap::MissingColumn {
                table: "tbl_user",
                column: "createdAt"
            })
        );
    }

    #[test]
    fn primary_keys_are_mapped_columns() {
        for table in DIRECTORY_TABLES {
            assert!(
                table.columns.iter().any(|def| def.column == table.primary_key),
                "primary key of {} is not mapped",
                table.name
            );
        }
    }

    #[test]
    fn migration_constraints_match_model_limits() {
        let expected = [
            format!("length(deptId) BETWEEN 1 AND {DEPT_ID_MAX_LEN}"),
            format!("length(deptName) <= {DEPT_NAME_MAX_LEN}"),
            format!("length(name) <= {EMPLOYEE_NAME_MAX_LEN}"),
            format!("age BETWEEN 0 AND {EMPLOYEE_AGE_MAX}"),
        ];
        for fragment in expected {
            assert!(INIT_SQL.contains(&fragment), "missing `{fragment}`");
        }
    }
}
