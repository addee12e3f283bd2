//! Department model.

use serde::{Deserialize, Serialize};

/// Department primary key as stored in `tbl_dept.deptId`.
pub type DeptId = String;

/// Maximum characters in `Dept::dept_id`.
pub const DEPT_ID_MAX_LEN: usize = 20;
/// Maximum characters in `Dept::dept_name`.
pub const DEPT_NAME_MAX_LEN: usize = 50;

/// Organizational unit employees can be assigned to.
///
/// The set of members is not stored here; use
/// `EmployeeRepository::find_by_dept_id` to look it up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dept {
    /// Caller-chosen key. Cannot change once persisted.
    pub dept_id: DeptId,
    pub dept_name: String,
}

impl Dept {
    pub fn new(dept_id: impl Into<DeptId>, dept_name: impl Into<String>) -> Self {
        Self {
            dept_id: dept_id.into(),
            dept_name: dept_name.into(),
        }
    }
}
