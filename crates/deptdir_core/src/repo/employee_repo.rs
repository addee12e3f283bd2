//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, name search and paged listing over `tbl_user`.
//! - Own the targeted `update_by_param` write.
//! - Resolve the department back-reference as a query.
//!
//! # Invariants
//! - Every insert path stamps `createdAt` through `PrePersist`.
//! - No update path writes `createdAt`.
//! - Read paths hydrate `dept` with a join and reject dangling references.
//! - Unfiltered and search listings are ordered by `id ASC`.

use crate::db::schema::{DEPT_TABLE, EMPLOYEE_TABLE};
use crate::model::dept::Dept;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::lifecycle::{now_epoch_ms, PrePersist};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::page::{EmployeeSortField, Page, PageRequest};
use crate::repo::{count_to_u64, ensure_connection_ready};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    u.id AS id,
    u.name AS name,
    u.age AS age,
    u.createdAt AS createdAt,
    u.deptId AS deptId,
    d.deptName AS deptName
FROM tbl_user u
LEFT JOIN tbl_dept d ON d.deptId = u.deptId";

/// Repository interface for employee persistence and queries.
pub trait EmployeeRepository {
    /// Inserts a new employee or fully replaces an existing one.
    ///
    /// Records without an id, or whose id has no row, are inserted with a
    /// storage-assigned id. Existing rows get `name`, `age` and department
    /// replaced; `created_at` keeps its stored value.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Saves every employee in one transaction.
    fn save_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn exists_by_id(&self, id: EmployeeId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<u64>;
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    fn find_all_paged(
        &self,
        request: &PageRequest<EmployeeSortField>,
    ) -> RepoResult<Page<Employee>>;
    /// Deletes one employee. Missing ids are a no-op.
    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()>;
    /// Case-sensitive substring match on `name`.
    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Employee>>;
    /// Same match as `find_by_name_contains`, expressed as a GLOB pattern.
    fn find_by_name_pattern(&self, fragment: &str) -> RepoResult<Vec<Employee>>;
    /// Writes exactly `name`, `age` and department for `employee.id`.
    ///
    /// Returns affected rows: `0` when the id is unset or unknown.
    fn update_by_param(&self, employee: &Employee) -> RepoResult<usize>;
    /// Employees currently assigned to `dept_id`.
    fn find_by_dept_id(&self, dept_id: &str) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[DEPT_TABLE, EMPLOYEE_TABLE])?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        let tx = self.conn.unchecked_transaction()?;
        let id = save_employee(&tx, employee)?;
        let saved = load_required_employee(&tx, id)?;
        tx.commit()?;
        Ok(saved)
    }

    fn save_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(employees.len());
        for employee in employees {
            let id = save_employee(&tx, employee)?;
            saved.push(load_required_employee(&tx, id)?);
        }
        tx.commit()?;
        debug!(
            "event=employee_save_all module=repo status=ok count={}",
            saved.len()
        );
        Ok(saved)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        find_employee(self.conn, id)
    }

    fn exists_by_id(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tbl_user WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<u64> {
        count_employees(self.conn)
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        query_employees(
            self.conn,
            &format!("{EMPLOYEE_SELECT_SQL} ORDER BY u.id ASC;"),
            Vec::new(),
        )
    }

    fn find_all_paged(
        &self,
        request: &PageRequest<EmployeeSortField>,
    ) -> RepoResult<Page<Employee>> {
        // Count and slice read one snapshot.
        let tx = self.conn.unchecked_transaction()?;
        let total = count_employees(&tx)?;
        let Some((limit, offset)) = request.window(total) else {
            return Ok(Page::new(Vec::new(), request, total));
        };

        let sql = format!(
            "{EMPLOYEE_SELECT_SQL} ORDER BY {} LIMIT ? OFFSET ?;",
            request.sort().order_by_clause("u.")
        );
        let employees = query_employees(
            &tx,
            &sql,
            vec![Value::Integer(limit), Value::Integer(offset)],
        )?;
        tx.commit()?;
        Ok(Page::new(employees, request, total))
    }

    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_user WHERE id = ?1;", [id])?;
        debug!(
            "event=employee_delete module=repo status=ok id={} affected={}",
            id, changed
        );
        Ok(())
    }

    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Employee>> {
        query_employees(
            self.conn,
            &format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE ?1 = '' OR instr(u.name, ?1) > 0
                 ORDER BY u.id ASC;"
            ),
            vec![Value::Text(fragment.to_string())],
        )
    }

    fn find_by_name_pattern(&self, fragment: &str) -> RepoResult<Vec<Employee>> {
        query_employees(
            self.conn,
            &format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE u.name GLOB ?1
                 ORDER BY u.id ASC;"
            ),
            vec![Value::Text(glob_contains_pattern(fragment))],
        )
    }

    fn update_by_param(&self, employee: &Employee) -> RepoResult<usize> {
        let Some(id) = employee.id else {
            return Ok(0);
        };
        let changed = write_mutable_fields(self.conn, id, employee)?;
        debug!(
            "event=employee_update_by_param module=repo status=ok id={} affected={}",
            id, changed
        );
        Ok(changed)
    }

    fn find_by_dept_id(&self, dept_id: &str) -> RepoResult<Vec<Employee>> {
        query_employees(
            self.conn,
            &format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE u.deptId = ?1
                 ORDER BY u.id ASC;"
            ),
            vec![Value::Text(dept_id.to_string())],
        )
    }
}

/// Replaces the row for `employee.id` when it exists, otherwise inserts.
fn save_employee(conn: &Connection, employee: &Employee) -> RepoResult<EmployeeId> {
    if let Some(id) = employee.id {
        if write_mutable_fields(conn, id, employee)? > 0 {
            debug!(
                "event=employee_save module=repo status=ok mode=replace id={}",
                id
            );
            return Ok(id);
        }
    }
    insert_employee(conn, employee)
}

/// Writes `name`, `age` and `deptId` for one row; `createdAt` is untouched.
fn write_mutable_fields(
    conn: &Connection,
    id: EmployeeId,
    employee: &Employee,
) -> RepoResult<usize> {
    let changed = conn.execute(
        "UPDATE tbl_user
         SET
            name = ?1,
            age = ?2,
            deptId = ?3
         WHERE id = ?4;",
        params![employee.name.as_str(), employee.age, employee.dept_id(), id],
    )?;
    Ok(changed)
}

fn insert_employee(conn: &Connection, employee: &Employee) -> RepoResult<EmployeeId> {
    let mut record = employee.clone();
    record.pre_persist(now_epoch_ms());

    conn.execute(
        "INSERT INTO tbl_user (
            name,
            age,
            createdAt,
            deptId
        ) VALUES (?1, ?2, ?3, ?4);",
        params![
            record.name.as_str(),
            record.age,
            record.created_at,
            record.dept_id(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        "event=employee_save module=repo status=ok mode=insert id={}",
        id
    );
    Ok(id)
}

fn find_employee(conn: &Connection, id: EmployeeId) -> RepoResult<Option<Employee>> {
    let mut found = query_employees(
        conn,
        &format!("{EMPLOYEE_SELECT_SQL} WHERE u.id = ?1;"),
        vec![Value::Integer(id)],
    )?;
    Ok(found.pop())
}

fn load_required_employee(conn: &Connection, id: EmployeeId) -> RepoResult<Employee> {
    find_employee(conn, id)?
        .ok_or_else(|| RepoError::InvalidData(format!("employee {id} missing right after write")))
}

fn count_employees(conn: &Connection) -> RepoResult<u64> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM tbl_user;", [], |row| row.get(0))?;
    count_to_u64(total)
}

fn query_employees(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<Employee>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut employees = Vec::new();
    while let Some(row) = rows.next()? {
        employees.push(parse_employee_row(row)?);
    }
    Ok(employees)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let dept = match (
        row.get::<_, Option<String>>("deptId")?,
        row.get::<_, Option<String>>("deptName")?,
    ) {
        (Some(dept_id), Some(dept_name)) => Some(Dept { dept_id, dept_name }),
        (None, _) => None,
        (Some(dept_id), None) => {
            return Err(RepoError::InvalidData(format!(
                "employee {id} references unknown department `{dept_id}` in tbl_user.deptId"
            )));
        }
    };

    Ok(Employee {
        id: Some(id),
        name: row.get("name")?,
        age: row.get("age")?,
        created_at: row.get("createdAt")?,
        dept,
    })
}

/// Builds a GLOB pattern matching any name that contains `fragment`.
///
/// GLOB metacharacters in `fragment` are wrapped in character classes so
/// they match literally.
fn glob_contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('*');
    for ch in fragment.chars() {
        match ch {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(ch);
                pattern.push(']');
            }
            _ => pattern.push(ch),
        }
    }
    pattern.push('*');
    pattern
}
