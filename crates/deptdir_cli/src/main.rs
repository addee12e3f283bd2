//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and storage the way a host process would.
//! - Print directory counts for quick local sanity checks.

use deptdir_core::{
    core_version, DeptRepository, DirectoryConfig, EmployeeRepository, SqliteDeptRepository,
    SqliteEmployeeRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("deptdir error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = DirectoryConfig::from_env()?;
    config.init_logging()?;

    let conn = config.open_store()?;
    let depts = SqliteDeptRepository::try_new(&conn)?;
    let employees = SqliteEmployeeRepository::try_new(&conn)?;
    let dept_count = depts.count()?;
    let employee_count = employees.count()?;

    info!(
        "event=cli_status module=cli status=ok departments={} employees={}",
        dept_count, employee_count
    );
    println!("deptdir_core version={}", core_version());
    println!("departments={dept_count} employees={employee_count}");
    Ok(())
}
