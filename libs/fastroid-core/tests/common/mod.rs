//! Shared fixtures for the integration tests
#![allow(dead_code)]

use fastroid_core::{
    Entity, EntitySchema, FastroidError, FieldDef, FieldType, InputBinding, Record, RelationDef,
    Required, Result, SqliteHelper, Value, When,
};
use rusqlite::Connection;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Department {
    pub department_id: i64,
    pub name: Option<String>,
    pub employees: Vec<Employee>,
}

impl Record for Department {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "departmentId" => Ok(self.department_id.into()),
            "name" => Ok(self.name.clone().into()),
            _ => Err(FastroidError::unknown_field("Department", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "departmentId" => self.department_id = value.as_i64(field)?,
            "name" => self.name = value.into_text(field)?,
            _ => return Err(FastroidError::unknown_field("Department", field)),
        }
        Ok(())
    }

    fn relation_slot(&mut self, relation: &str) -> Result<&mut dyn Record> {
        match relation {
            "employees" => {
                self.employees.push(Employee::default());
                let last = self.employees.len() - 1;
                Ok(&mut self.employees[last])
            }
            _ => Err(FastroidError::unknown_relation("Department", relation)),
        }
    }
}

impl Entity for Department {
    fn schema() -> EntitySchema {
        EntitySchema::new("Department")
            .field(
                FieldDef::new("departmentId", FieldType::Long)
                    .identity()
                    .auto_increment()
                    .order(1),
            )
            .field(FieldDef::new("name", FieldType::Text).column())
            .relation(RelationDef::to_many("employees", "department", Employee::schema))
    }
}

/// Covers every supported field type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub employee_id: i64,
    pub name: Option<String>,
    pub age: i32,
    pub salary: f64,
    pub rating: f32,
    pub level: i16,
    pub photo: Option<Vec<u8>>,
    pub department_id: i64,
    pub department: Option<Box<Department>>,
}

impl Record for Employee {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "employeeId" => Ok(self.employee_id.into()),
            "name" => Ok(self.name.clone().into()),
            "age" => Ok(self.age.into()),
            "salary" => Ok(self.salary.into()),
            "rating" => Ok(self.rating.into()),
            "level" => Ok(self.level.into()),
            "photo" => Ok(self.photo.clone().into()),
            "departmentId" => Ok(self.department_id.into()),
            _ => Err(FastroidError::unknown_field("Employee", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "employeeId" => self.employee_id = value.as_i64(field)?,
            "name" => self.name = value.into_text(field)?,
            "age" => self.age = value.as_i32(field)?,
            "salary" => self.salary = value.as_f64(field)?,
            "rating" => self.rating = value.as_f32(field)?,
            "level" => self.level = value.as_i16(field)?,
            "photo" => self.photo = value.into_blob(field)?,
            "departmentId" => self.department_id = value.as_i64(field)?,
            _ => return Err(FastroidError::unknown_field("Employee", field)),
        }
        Ok(())
    }

    fn relation_slot(&mut self, relation: &str) -> Result<&mut dyn Record> {
        match relation {
            "department" => Ok(&mut **self.department.insert(Box::default())),
            _ => Err(FastroidError::unknown_relation("Employee", relation)),
        }
    }
}

impl Entity for Employee {
    fn schema() -> EntitySchema {
        EntitySchema::new("Employee")
            .field(
                FieldDef::new("employeeId", FieldType::Long)
                    .identity()
                    .auto_increment()
                    .order(1),
            )
            .field(FieldDef::new("name", FieldType::Text).column().order(2))
            .field(FieldDef::new("age", FieldType::Int).column())
            .field(FieldDef::new("salary", FieldType::Double).column())
            .field(FieldDef::new("rating", FieldType::Float).column())
            .field(FieldDef::new("level", FieldType::Short).column())
            .field(FieldDef::new("photo", FieldType::Blob).column())
            .field(FieldDef::new("departmentId", FieldType::Long).column())
            .relation(RelationDef::to_one(
                "department",
                "departmentId",
                Department::schema,
            ))
    }
}

/// Identity without auto-increment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub project_id: i64,
    pub title: Option<String>,
}

impl Record for Project {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "projectId" => Ok(self.project_id.into()),
            "title" => Ok(self.title.clone().into()),
            _ => Err(FastroidError::unknown_field("Project", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "projectId" => self.project_id = value.as_i64(field)?,
            "title" => self.title = value.into_text(field)?,
            _ => return Err(FastroidError::unknown_field("Project", field)),
        }
        Ok(())
    }
}

impl Entity for Project {
    fn schema() -> EntitySchema {
        EntitySchema::new("Project")
            .field(FieldDef::new("projectId", FieldType::Long).identity())
            .field(FieldDef::new("title", FieldType::Text).column())
    }
}

/// Two to-one relations, for multi-join queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub assignment_id: i64,
    pub employee_id: i64,
    pub project_id: i64,
    pub role: Option<String>,
    pub employee: Option<Employee>,
    pub project: Option<Project>,
}

impl Record for Assignment {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "assignmentId" => Ok(self.assignment_id.into()),
            "employeeId" => Ok(self.employee_id.into()),
            "projectId" => Ok(self.project_id.into()),
            "role" => Ok(self.role.clone().into()),
            _ => Err(FastroidError::unknown_field("Assignment", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "assignmentId" => self.assignment_id = value.as_i64(field)?,
            "employeeId" => self.employee_id = value.as_i64(field)?,
            "projectId" => self.project_id = value.as_i64(field)?,
            "role" => self.role = value.into_text(field)?,
            _ => return Err(FastroidError::unknown_field("Assignment", field)),
        }
        Ok(())
    }

    fn relation_slot(&mut self, relation: &str) -> Result<&mut dyn Record> {
        match relation {
            "employee" => Ok(self.employee.insert(Employee::default())),
            "project" => Ok(self.project.insert(Project::default())),
            _ => Err(FastroidError::unknown_relation("Assignment", relation)),
        }
    }
}

impl Entity for Assignment {
    fn schema() -> EntitySchema {
        EntitySchema::new("Assignment")
            .field(
                FieldDef::new("assignmentId", FieldType::Long)
                    .identity()
                    .auto_increment(),
            )
            .field(FieldDef::new("employeeId", FieldType::Long).column())
            .field(FieldDef::new("projectId", FieldType::Long).column())
            .field(FieldDef::new("role", FieldType::Text).column())
            .relation(RelationDef::to_one("employee", "employeeId", Employee::schema))
            .relation(RelationDef::to_one("project", "projectId", Project::schema))
    }
}

/// Form read from widgets before it becomes a [`Contact`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub contact_method: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub memo: Option<String>,
}

impl Record for ContactForm {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "name" => Ok(self.name.clone().into()),
            "contactMethod" => Ok(self.contact_method.clone().into()),
            "phone" => Ok(self.phone.clone().into()),
            "age" => Ok(self.age.clone().into()),
            "memo" => Ok(self.memo.clone().into()),
            _ => Err(FastroidError::unknown_field("ContactForm", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        let text = value.into_text(field)?;
        match field {
            "name" => self.name = text,
            "contactMethod" => self.contact_method = text,
            "phone" => self.phone = text,
            "age" => self.age = text,
            "memo" => self.memo = text,
            _ => return Err(FastroidError::unknown_field("ContactForm", field)),
        }
        Ok(())
    }
}

impl Entity for ContactForm {
    fn schema() -> EntitySchema {
        EntitySchema::new("ContactForm")
            .field(
                FieldDef::new("name", FieldType::Text)
                    .order(1)
                    .required(Required::always().label("Name"))
                    .input(InputBinding::Text { id: "edit_name" }),
            )
            .field(
                FieldDef::new("contactMethod", FieldType::Text)
                    .order(2)
                    .input(InputBinding::Radio {
                        group_id: "group_method",
                        choices: &[("radio_email", "email"), ("radio_phone", "phone")],
                    }),
            )
            .field(
                FieldDef::new("phone", FieldType::Text)
                    .order(3)
                    .required(
                        Required::always()
                            .label("Phone")
                            .when(When::equals("contactMethod", "phone")),
                    )
                    .input(InputBinding::Text { id: "edit_phone" }),
            )
            .field(FieldDef::new("age", FieldType::Text).input(InputBinding::Text { id: "edit_age" }))
            .field(FieldDef::new("memo", FieldType::Text).input(InputBinding::Text { id: "edit_memo" }))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub contact_id: i64,
    pub name: Option<String>,
    pub contact_method: Option<String>,
    pub phone: Option<String>,
    pub age: i32,
}

impl Record for Contact {
    fn value(&self, field: &str) -> Result<Value> {
        match field {
            "contactId" => Ok(self.contact_id.into()),
            "name" => Ok(self.name.clone().into()),
            "contactMethod" => Ok(self.contact_method.clone().into()),
            "phone" => Ok(self.phone.clone().into()),
            "age" => Ok(self.age.into()),
            _ => Err(FastroidError::unknown_field("Contact", field)),
        }
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "contactId" => self.contact_id = value.as_i64(field)?,
            "name" => self.name = value.into_text(field)?,
            "contactMethod" => self.contact_method = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "age" => self.age = value.as_i32(field)?,
            _ => return Err(FastroidError::unknown_field("Contact", field)),
        }
        Ok(())
    }
}

impl Entity for Contact {
    fn schema() -> EntitySchema {
        EntitySchema::new("Contact")
            .field(
                FieldDef::new("contactId", FieldType::Long)
                    .identity()
                    .auto_increment(),
            )
            .field(FieldDef::new("name", FieldType::Text).column())
            .field(FieldDef::new("contactMethod", FieldType::Text).column())
            .field(FieldDef::new("phone", FieldType::Text).column())
            .field(FieldDef::new("age", FieldType::Int).column())
    }
}

/// Create the tables of the fixture entities in the database at `db_path`
///
/// # Errors
/// Returns an error if the database cannot be opened or the schema cannot be created
pub fn create_test_schema<P: AsRef<Path>>(db_path: P) -> Result<()> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch(
        r"
        CREATE TABLE DEPARTMENT (
            DEPARTMENT_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NAME TEXT
        );
        CREATE TABLE EMPLOYEE (
            EMPLOYEE_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NAME TEXT,
            AGE INTEGER,
            SALARY REAL,
            RATING REAL,
            LEVEL INTEGER,
            PHOTO BLOB,
            DEPARTMENT_ID INTEGER
        );
        CREATE TABLE PROJECT (
            PROJECT_ID INTEGER PRIMARY KEY,
            TITLE TEXT
        );
        CREATE TABLE ASSIGNMENT (
            ASSIGNMENT_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            EMPLOYEE_ID INTEGER,
            PROJECT_ID INTEGER,
            ROLE TEXT
        );
        CREATE TABLE CONTACT (
            CONTACT_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NAME TEXT,
            CONTACT_METHOD TEXT,
            PHONE TEXT,
            AGE INTEGER
        );
        ",
    )?;
    Ok(())
}

/// A temporary database with the fixture schema, and a helper over it
///
/// Keep the returned file alive for as long as the helper is used.
pub fn create_test_database() -> (NamedTempFile, SqliteHelper) {
    let file = NamedTempFile::new().expect("create temp database");
    create_test_schema(file.path()).expect("create test schema");
    let helper = SqliteHelper::new(file.path());
    (file, helper)
}

/// Open a raw connection for arranging or inspecting rows directly
pub fn raw_connection(file: &NamedTempFile) -> Connection {
    Connection::open(file.path()).expect("open raw connection")
}

pub fn employee(name: &str, age: i32, department_id: i64) -> Employee {
    Employee {
        name: Some(name.to_string()),
        age,
        salary: 1000.0 * f64::from(age),
        rating: 3.5,
        level: 2,
        photo: None,
        department_id,
        ..Employee::default()
    }
}

pub fn department(name: &str) -> Department {
    Department {
        name: Some(name.to_string()),
        ..Department::default()
    }
}
