use deptdir_core::{Dept, Employee};

#[test]
fn employee_serialization_uses_expected_wire_fields() {
    let mut employee = Employee::new("홍길동")
        .with_id(7)
        .with_age(21)
        .with_dept(Dept::new("d001", "부서1"));
    employee.created_at = Some(1_700_000_000_000);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "홍길동");
    assert_eq!(json["age"], 21);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["dept"]["dept_id"], "d001");
    assert_eq!(json["dept"]["dept_name"], "부서1");

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn new_employee_has_no_identity_or_timestamp() {
    let employee = Employee::new("kim");

    assert!(employee.is_new());
    assert_eq!(employee.age, None);
    assert_eq!(employee.created_at, None);
    assert_eq!(employee.dept_id(), None);
}

#[test]
fn unassigned_department_serializes_as_null() {
    let json = serde_json::to_value(Employee::new("kim")).unwrap();
    assert!(json["dept"].is_null());
    assert!(json["id"].is_null());
}
