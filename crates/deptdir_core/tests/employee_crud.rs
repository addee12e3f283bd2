use deptdir_core::db::open_db_in_memory;
use deptdir_core::{
    Dept, DeptRepository, Employee, EmployeeRepository, RepoError, SqliteDeptRepository,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let depts = SqliteDeptRepository::try_new(&conn).unwrap();
    depts
        .save_all(&[Dept::new("d001", "부서1"), Dept::new("d002", "부서2")])
        .unwrap();
    conn
}

fn stored_created_at(conn: &Connection, id: i64) -> Option<i64> {
    conn.query_row(
        "SELECT createdAt FROM tbl_user WHERE id = ?1;",
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn save_and_find_roundtrip_stamps_created_at() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut employee = Employee::new("홍길동1")
        .with_age(21)
        .with_dept(Dept::new("d001", "부서1"));
    employee.created_at = Some(1);

    let saved = repo.save(&employee).unwrap();
    let id = saved.id.unwrap();
    let loaded = repo.find_by_id(id).unwrap().unwrap();

    assert_eq!(loaded.name, employee.name);
    assert_eq!(loaded.age, employee.age);
    assert_eq!(loaded.dept, employee.dept);
    let created_at = loaded.created_at.unwrap();
    assert_ne!(created_at, 1);
    assert_eq!(loaded, saved);
}

#[test]
fn ids_are_assigned_monotonically() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let first = repo.save(&Employee::new("a")).unwrap().id.unwrap();
    let second = repo.save(&Employee::new("b")).unwrap().id.unwrap();
    repo.delete_by_id(second).unwrap();
    let third = repo.save(&Employee::new("c")).unwrap().id.unwrap();

    assert!(first < second);
    assert!(second < third);
}

#[test]
fn save_existing_replaces_fields_but_keeps_created_at() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo
        .save(&Employee::new("홍길동").with_age(21).with_dept(Dept::new("d001", "부서1")))
        .unwrap();
    let id = saved.id.unwrap();
    let original_created_at = stored_created_at(&conn, id);

    let mut replacement = Employee::new("홍길순").with_id(id).with_age(15);
    replacement.created_at = Some(5);
    let replaced = repo.save(&replacement).unwrap();

    assert_eq!(replaced.id, Some(id));
    assert_eq!(replaced.name, "홍길순");
    assert_eq!(replaced.age, Some(15));
    assert_eq!(replaced.dept, None);
    assert_eq!(replaced.created_at, original_created_at);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn save_with_unknown_id_inserts_new_record() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo.save(&Employee::new("ghost").with_id(4242)).unwrap();

    assert_ne!(saved.id, Some(4242));
    assert!(saved.created_at.is_some());
    assert!(!repo.exists_by_id(4242).unwrap());
}

#[test]
fn find_missing_returns_none_and_delete_missing_is_noop() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_id(999).unwrap().is_none());
    repo.delete_by_id(999).unwrap();

    let id = repo.save(&Employee::new("kim")).unwrap().id.unwrap();
    repo.delete_by_id(id).unwrap();
    repo.delete_by_id(id).unwrap();
    assert!(repo.find_by_id(id).unwrap().is_none());
}

#[test]
fn update_by_param_writes_only_targeted_fields() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo
        .save(&Employee::new("홍길동").with_age(21).with_dept(Dept::new("d001", "부서1")))
        .unwrap();
    let id = saved.id.unwrap();
    let original_created_at = stored_created_at(&conn, id);

    let mut update = Employee::new("홍길자")
        .with_id(id)
        .with_age(35)
        .with_dept(Dept::new("d002", "ignored name"));
    update.created_at = Some(7);

    let affected = repo.update_by_param(&update).unwrap();
    assert_eq!(affected, 1);

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "홍길자");
    assert_eq!(loaded.age, Some(35));
    assert_eq!(loaded.dept, Some(Dept::new("d002", "부서2")));
    assert_eq!(loaded.created_at, original_created_at);
    assert_eq!(update.created_at, Some(7));
}

#[test]
fn update_by_param_can_clear_optional_fields() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .save(&Employee::new("lee").with_age(40).with_dept(Dept::new("d001", "부서1")))
        .unwrap()
        .id
        .unwrap();

    let affected = repo
        .update_by_param(&Employee::new("lee").with_id(id))
        .unwrap();
    assert_eq!(affected, 1);

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.age, None);
    assert_eq!(loaded.dept, None);
}

#[test]
fn update_by_param_on_missing_id_reports_zero() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.update_by_param(&Employee::new("nobody").with_id(12345))
            .unwrap(),
        0
    );
    assert_eq!(repo.update_by_param(&Employee::new("unsaved")).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn constraint_violations_surface_from_storage() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let long_name = Employee::new("n".repeat(21));
    let too_old = Employee::new("old").with_age(1000);
    let negative_age = Employee::new("young").with_age(-1);
    let dangling = Employee::new("lost").with_dept(Dept::new("d999", "missing"));

    for invalid in [long_name, too_old, negative_age, dangling] {
        let err = repo.save(&invalid).unwrap_err();
        assert!(
            matches!(err, RepoError::ConstraintViolation(_)),
            "unexpected error for {invalid:?}: {err}"
        );
    }
    assert_eq!(repo.count().unwrap(), 0);

    let id = repo.save(&Employee::new("ok").with_age(999)).unwrap().id.unwrap();
    let err = repo
        .update_by_param(&Employee::new("ok").with_id(id).with_dept(Dept::new("d999", "missing")))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn save_all_stamps_every_insert_and_rolls_back_on_failure() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut stale = Employee::new("batch1");
    stale.created_at = Some(3);
    let saved = repo
        .save_all(&[stale, Employee::new("batch2").with_age(30)])
        .unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved
        .iter()
        .all(|employee| employee.created_at.is_some() && employee.created_at != Some(3)));

    let failing = [Employee::new("batch3"), Employee::new("n".repeat(40))];
    assert!(repo.save_all(&failing).is_err());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn deleting_department_keeps_members_without_department() {
    let conn = setup();
    let depts = SqliteDeptRepository::try_new(&conn).unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .save(&Employee::new("park").with_dept(Dept::new("d001", "부서1")))
        .unwrap()
        .id
        .unwrap();
    assert_eq!(repo.find_by_dept_id("d001").unwrap().len(), 1);

    depts.delete_by_id("d001").unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "park");
    assert_eq!(loaded.dept, None);
    assert!(repo.find_by_dept_id("d001").unwrap().is_empty());
}

#[test]
fn find_all_returns_every_employee_in_id_order() {
    let conn = setup();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    for name in ["c", "a", "b"] {
        repo.save(&Employee::new(name)).unwrap();
    }

    let all = repo.find_all().unwrap();
    let names: Vec<_> = all.iter().map(|employee| employee.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}
