//! Directory use-case service.
//!
//! # Invariants
//! - Every write goes through exactly one repository call, so repository
//!   atomicity carries over unchanged.
//! - Absence is reported as `None`/empty, never as an error.

use crate::model::dept::Dept;
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::dept_repo::DeptRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::error::RepoResult;
use crate::repo::page::{DeptSortField, EmployeeSortField, Page, PageRequest};

/// Use-case facade over department and employee repositories.
pub struct DirectoryService<D: DeptRepository, E: EmployeeRepository> {
    depts: D,
    employees: E,
}

impl<D: DeptRepository, E: EmployeeRepository> DirectoryService<D, E> {
    pub fn new(depts: D, employees: E) -> Self {
        Self { depts, employees }
    }

    /// Creates a department or renames an existing one.
    pub fn register_department(
        &self,
        dept_id: impl Into<String>,
        dept_name: impl Into<String>,
    ) -> RepoResult<Dept> {
        self.depts.save(&Dept::new(dept_id, dept_name))
    }

    pub fn department(&self, dept_id: &str) -> RepoResult<Option<Dept>> {
        self.depts.find_by_id(dept_id)
    }

    pub fn departments(&self, request: &PageRequest<DeptSortField>) -> RepoResult<Page<Dept>> {
        self.depts.find_all_paged(request)
    }

    /// Members of one department, or `None` when the department is unknown.
    pub fn department_members(&self, dept_id: &str) -> RepoResult<Option<Vec<Employee>>> {
        if !self.depts.exists_by_id(dept_id)? {
            return Ok(None);
        }
        self.employees.find_by_dept_id(dept_id).map(Some)
    }

    /// Removes a department; its members stay with no department.
    pub fn remove_department(&self, dept_id: &str) -> RepoResult<()> {
        self.depts.delete_by_id(dept_id)
    }

    /// Inserts `employee` as a new record, ignoring any id it carries.
    pub fn hire(&self, employee: &Employee) -> RepoResult<Employee> {
        let mut record = employee.clone();
        record.id = None;
        self.employees.save(&record)
    }

    /// Full replace through `save`.
    pub fn replace(&self, employee: &Employee) -> RepoResult<Employee> {
        self.employees.save(employee)
    }

    /// Targeted update of name, age and department.
    ///
    /// Returns the stored record afterwards, or `None` when no row matched.
    pub fn reassign(&self, employee: &Employee) -> RepoResult<Option<Employee>> {
        if self.employees.update_by_param(employee)? == 0 {
            return Ok(None);
        }
        match employee.id {
            Some(id) => self.employees.find_by_id(id),
            None => Ok(None),
        }
    }

    pub fn employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.employees.find_by_id(id)
    }

    pub fn search_by_name(&self, fragment: &str) -> RepoResult<Vec<Employee>> {
        self.employees.find_by_name_contains(fragment)
    }

    pub fn employees(
        &self,
        request: &PageRequest<EmployeeSortField>,
    ) -> RepoResult<Page<Employee>> {
        self.employees.find_all_paged(request)
    }

    pub fn dismiss(&self, id: EmployeeId) -> RepoResult<()> {
        self.employees.delete_by_id(id)
    }
}
