//! Persistence and query core for the department/employee directory.
//! Routing and view rendering live outside this crate and consume the
//! repository traits and `DirectoryService`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DirectoryConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    now_epoch_ms, Dept, DeptId, Employee, EmployeeId, PrePersist, DEPT_ID_MAX_LEN,
    DEPT_NAME_MAX_LEN, EMPLOYEE_AGE_MAX, EMPLOYEE_NAME_MAX_LEN,
};
pub use repo::dept_repo::{DeptRepository, SqliteDeptRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::page::{
    DeptSortField, Direction, EmployeeSortField, Page, PageRequest, Sort, SortField,
};
pub use service::directory_service::DirectoryService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
