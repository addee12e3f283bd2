//! Directory domain model.
//!
//! # Responsibility
//! - Define the Department and Employee record shapes.
//! - Expose column limits applied by the storage schema.
//!
//! # Invariants
//! - Departments are identified by a caller-chosen `dept_id`.
//! - Employees are identified by a storage-assigned `EmployeeId`.
//! - A department never owns its employees; membership is a query.

pub mod dept;
pub mod employee;
pub mod lifecycle;

pub use dept::{Dept, DeptId, DEPT_ID_MAX_LEN, DEPT_NAME_MAX_LEN};
pub use employee::{Employee, EmployeeId, EMPLOYEE_AGE_MAX, EMPLOYEE_NAME_MAX_LEN};
pub use lifecycle::{now_epoch_ms, PrePersist};
