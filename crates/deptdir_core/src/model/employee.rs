//! Employee model.
//!
//! # Invariants
//! - `id` is `None` until storage assigns one and never changes afterwards.
//! - `created_at` is owned by the insert path (see `PrePersist`); values set
//!   by callers are discarded.
//! - `dept` is a many-to-one reference; only its `dept_id` is written.

use crate::model::dept::{Dept, DeptId};
use crate::model::lifecycle::PrePersist;
use serde::{Deserialize, Serialize};

/// Storage-assigned employee key (`tbl_user.id`).
pub type EmployeeId = i64;

/// Maximum characters in `Employee::name`.
pub const EMPLOYEE_NAME_MAX_LEN: usize = 20;
/// Largest accepted `Employee::age` (three digits, unsigned).
pub const EMPLOYEE_AGE_MAX: i32 = 999;

/// Directory member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    pub name: String,
    pub age: Option<i32>,
    /// Unix epoch milliseconds of first persistence.
    pub created_at: Option<i64>,
    pub dept: Option<Dept>,
}

impl Employee {
    /// Creates an unsaved employee with no age and no department.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            age: None,
            created_at: None,
            dept: None,
        }
    }

    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_dept(mut self, dept: Dept) -> Self {
        self.dept = Some(dept);
        self
    }

    /// Foreign key written to `tbl_user.deptId`.
    pub fn dept_id(&self) -> Option<&DeptId> {
        self.dept.as_ref().map(|dept| &dept.dept_id)
    }

    /// Returns whether storage has assigned an id yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl PrePersist for Employee {
    fn pre_persist(&mut self, now_epoch_ms: i64) {
        self.created_at = Some(now_epoch_ms);
    }
}
