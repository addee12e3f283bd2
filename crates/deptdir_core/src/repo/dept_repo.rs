//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and paged listing over `tbl_dept`.
//!
//! # Invariants
//! - `save` upserts by `deptId`; the key itself is never rewritten.
//! - Deleting a department leaves its employees in place with their
//!   department reference cleared (`ON DELETE SET NULL`).

use crate::db::schema::DEPT_TABLE;
use crate::model::dept::Dept;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::page::{DeptSortField, Page, PageRequest};
use crate::repo::{count_to_u64, ensure_connection_ready};
use log::debug;
use rusqlite::{params, Connection, Row};

const DEPT_SELECT_SQL: &str = "SELECT
    deptId,
    deptName
FROM tbl_dept";

/// Repository interface for department persistence.
pub trait DeptRepository {
    /// Inserts a new department or replaces the name of an existing one.
    fn save(&self, dept: &Dept) -> RepoResult<Dept>;
    /// Saves every department in one transaction.
    fn save_all(&self, depts: &[Dept]) -> RepoResult<Vec<Dept>>;
    fn find_by_id(&self, dept_id: &str) -> RepoResult<Option<Dept>>;
    fn exists_by_id(&self, dept_id: &str) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<u64>;
    /// Lists all departments ordered by `dept_id`.
    fn find_all(&self) -> RepoResult<Vec<Dept>>;
    fn find_all_paged(&self, request: &PageRequest<DeptSortField>) -> RepoResult<Page<Dept>>;
    /// Deletes one department. Missing ids are a no-op.
    fn delete_by_id(&self, dept_id: &str) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDeptRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeptRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[DEPT_TABLE])?;
        Ok(Self { conn })
    }
}

impl DeptRepository for SqliteDeptRepository<'_> {
    fn save(&self, dept: &Dept) -> RepoResult<Dept> {
        upsert_dept(self.conn, dept)?;
        load_required_dept(self.conn, &dept.dept_id)
    }

    fn save_all(&self, depts: &[Dept]) -> RepoResult<Vec<Dept>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(depts.len());
        for dept in depts {
            upsert_dept(&tx, dept)?;
            saved.push(load_required_dept(&tx, &dept.dept_id)?);
        }
        tx.commit()?;
        Ok(saved)
    }

    fn find_by_id(&self, dept_id: &str) -> RepoResult<Option<Dept>> {
        find_dept(self.conn, dept_id)
    }

    fn exists_by_id(&self, dept_id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tbl_dept WHERE deptId = ?1);",
            [dept_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<u64> {
        count_depts(self.conn)
    }

    fn find_all(&self) -> RepoResult<Vec<Dept>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPT_SELECT_SQL} ORDER BY deptId ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut depts = Vec::new();
        while let Some(row) = rows.next()? {
            depts.push(parse_dept_row(row)?);
        }
        Ok(depts)
    }

    fn find_all_paged(&self, request: &PageRequest<DeptSortField>) -> RepoResult<Page<Dept>> {
        // Count and slice read one snapshot.
        let tx = self.conn.unchecked_transaction()?;
        let total = count_depts(&tx)?;
        let Some((limit, offset)) = request.window(total) else {
            return Ok(Page::new(Vec::new(), request, total));
        };

        let sql = format!(
            "{DEPT_SELECT_SQL} ORDER BY {} LIMIT ?1 OFFSET ?2;",
            request.sort().order_by_clause("")
        );
        let mut depts = Vec::new();
        {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params![limit, offset])?;
            while let Some(row) = rows.next()? {
                depts.push(parse_dept_row(row)?);
            }
        }
        tx.commit()?;
        Ok(Page::new(depts, request, total))
    }

    fn delete_by_id(&self, dept_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_dept WHERE deptId = ?1;", [dept_id])?;
        debug!(
            "event=dept_delete module=repo status=ok affected={}",
            changed
        );
        Ok(())
    }
}

fn upsert_dept(conn: &Connection, dept: &Dept) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO tbl_dept (deptId, deptName)
         VALUES (?1, ?2)
         ON CONFLICT(deptId) DO UPDATE SET deptName = excluded.deptName;",
        params![dept.dept_id.as_str(), dept.dept_name.as_str()],
    )?;
    debug!("event=dept_save module=repo status=ok");
    Ok(())
}

fn find_dept(conn: &Connection, dept_id: &str) -> RepoResult<Option<Dept>> {
    let mut stmt = conn.prepare(&format!("{DEPT_SELECT_SQL} WHERE deptId = ?1;"))?;
    let mut rows = stmt.query([dept_id])?;
    match rows.next()? {
        Some(row) => parse_dept_row(row).map(Some),
        None => Ok(None),
    }
}

fn count_depts(conn: &Connection) -> RepoResult<u64> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM tbl_dept;", [], |row| row.get(0))?;
    count_to_u64(total)
}

fn load_required_dept(conn: &Connection, dept_id: &str) -> RepoResult<Dept> {
    find_dept(conn, dept_id)?.ok_or_else(|| {
        RepoError::InvalidData(format!("department `{dept_id}` missing right after write"))
    })
}

fn parse_dept_row(row: &Row<'_>) -> RepoResult<Dept> {
    Ok(Dept {
        dept_id: row.get("deptId")?,
        dept_name: row.get("deptName")?,
    })
}
