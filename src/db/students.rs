use rusqlite::{params, Row};
use tracing::debug;

use crate::error::{Result, StoreContext, StoreError};
use crate::models::{Entity, NewStudent, Student};

use super::record::{Column, Record};
use super::{require_field, RecordStore};

/// Filterable columns of the `students` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentColumn {
    Id,
    Name,
    Surname,
    Department,
    DateOfBirth,
}

impl Column for StudentColumn {
    fn name(self) -> &'static str {
        match self {
            StudentColumn::Id => "id",
            StudentColumn::Name => "name",
            StudentColumn::Surname => "surname",
            StudentColumn::Department => "department",
            StudentColumn::DateOfBirth => "date_of_birth",
        }
    }
}

impl Record for Student {
    const ENTITY: Entity = Entity::Student;
    const COLUMNS: &'static str = "id, name, surname, department, date_of_birth";
    type Column = StudentColumn;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Student {
            id: row.get(0)?,
            name: row.get(1)?,
            surname: row.get(2)?,
            department: row.get(3)?,
            date_of_birth: row.get(4)?,
        })
    }
}

fn check_student(student: &NewStudent) -> Result<()> {
    require_field("name", &student.name)?;
    require_field("surname", &student.surname)?;
    require_field("department", &student.department)
}

impl RecordStore {
    /// Insert a student and return the generated id.
    pub fn create_student(&self, student: &NewStudent) -> Result<i64> {
        check_student(student)?;
        self.conn()
            .execute(
                "INSERT INTO students (name, surname, department, date_of_birth)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    student.name,
                    student.surname,
                    student.department,
                    student.date_of_birth
                ],
            )
            .context("failed to insert student")?;

        let id = self.conn().last_insert_rowid();
        debug!(id, "inserted student");
        Ok(id)
    }

    /// Overwrite every field of an existing student.
    pub fn update_student(&self, id: i64, student: &NewStudent) -> Result<()> {
        check_student(student)?;
        let updated = self
            .conn()
            .execute(
                "UPDATE students SET name = ?1, surname = ?2, department = ?3, date_of_birth = ?4
                 WHERE id = ?5",
                params![
                    student.name,
                    student.surname,
                    student.department,
                    student.date_of_birth,
                    id
                ],
            )
            .context("failed to update student")?;

        if updated == 0 {
            Err(StoreError::NotFound {
                entity: Entity::Student,
                id,
            })
        } else {
            debug!(id, "updated student");
            Ok(())
        }
    }

    pub fn students_by_department(&self, department: &str) -> Result<Vec<Student>> {
        self.find_by::<Student>(StudentColumn::Department, department)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn tom() -> NewStudent {
        NewStudent {
            name: "Tom".into(),
            surname: "Roe".into(),
            department: "CS".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        }
    }

    #[test]
    fn created_student_reads_back() {
        let store = RecordStore::open_in_memory().unwrap();
        let first = store.create_student(&tom()).unwrap();
        let second = store.create_student(&tom()).unwrap();
        assert_ne!(first, second);

        let found = store.find_by::<Student>(StudentColumn::Id, first).unwrap();
        assert_eq!(found.len(), 1);
        let student = &found[0];
        assert_eq!(student.name, "Tom");
        assert_eq!(student.surname, "Roe");
        assert_eq!(student.department, "CS");
        assert_eq!(student.date_of_birth, "2000-01-01");
    }

    #[test]
    fn blank_required_field_is_a_constraint_violation() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut student = tom();
        student.surname = "  ".into();
        let err = store.create_student(&student).unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert!(store.list::<Student>().unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store.create_student(&tom()).unwrap();
        let mut changed = tom();
        changed.department = "Math".into();
        store.update_student(id, &changed).unwrap();

        assert!(store.students_by_department("CS").unwrap().is_empty());
        let math = store.students_by_department("Math").unwrap();
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].id, id);
    }

    #[test]
    fn update_of_missing_student_is_not_found() {
        let store = RecordStore::open_in_memory().unwrap();
        let err = store.update_student(99, &tom()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::Student,
                id: 99
            }
        ));
    }

    #[test]
    fn delete_then_lookup_is_empty() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store.create_student(&tom()).unwrap();
        assert!(store.delete::<Student>(id).unwrap());
        assert!(store.find_by::<Student>(StudentColumn::Id, id).unwrap().is_empty());
        assert!(!store.delete::<Student>(id).unwrap());
    }
}
