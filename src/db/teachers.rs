use rusqlite::{params, Row};
use tracing::debug;

use crate::error::{Result, StoreContext, StoreError};
use crate::models::{Entity, NewTeacher, Teacher};

use super::record::{Column, Record};
use super::{require_field, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherColumn {
    Id,
    Name,
    Surname,
    Department,
}

impl Column for TeacherColumn {
    fn name(self) -> &'static str {
        match self {
            TeacherColumn::Id => "id",
            TeacherColumn::Name => "name",
            TeacherColumn::Surname => "surname",
            TeacherColumn::Department => "department",
        }
    }
}

impl Record for Teacher {
    const ENTITY: Entity = Entity::Teacher;
    const COLUMNS: &'static str = "id, name, surname, department";
    type Column = TeacherColumn;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Teacher {
            id: row.get(0)?,
            name: row.get(1)?,
            surname: row.get(2)?,
            department: row.get(3)?,
        })
    }
}

fn check_teacher(teacher: &NewTeacher) -> Result<()> {
    require_field("name", &teacher.name)?;
    require_field("surname", &teacher.surname)?;
    require_field("department", &teacher.department)
}

impl RecordStore {
    pub fn create_teacher(&self, teacher: &NewTeacher) -> Result<i64> {
        check_teacher(teacher)?;
        self.conn()
            .execute(
                "INSERT INTO teachers (name, surname, department) VALUES (?1, ?2, ?3)",
                params![teacher.name, teacher.surname, teacher.department],
            )
            .context("failed to insert teacher")?;

        let id = self.conn().last_insert_rowid();
        debug!(id, "inserted teacher");
        Ok(id)
    }

    /// Overwrite name, surname and department. Courses taught by the teacher
    /// are unaffected.
    pub fn update_teacher(&self, id: i64, teacher: &NewTeacher) -> Result<()> {
        check_teacher(teacher)?;
        let updated = self
            .conn()
            .execute(
                "UPDATE teachers SET name = ?1, surname = ?2, department = ?3 WHERE id = ?4",
                params![teacher.name, teacher.surname, teacher.department, id],
            )
            .context("failed to update teacher")?;

        if updated == 0 {
            Err(StoreError::NotFound {
                entity: Entity::Teacher,
                id,
            })
        } else {
            debug!(id, "updated teacher");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, NewCourse};

    fn ana() -> NewTeacher {
        NewTeacher {
            name: "Ana".into(),
            surname: "Lee".into(),
            department: "CS".into(),
        }
    }

    #[test]
    fn create_and_update_teacher() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store.create_teacher(&ana()).unwrap();
        assert_eq!(id, 1);

        let renamed = NewTeacher {
            surname: "Park".into(),
            ..ana()
        };
        store.update_teacher(id, &renamed).unwrap();
        let found = store
            .find_by::<Teacher>(TeacherColumn::Surname, "Park")
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name(), "Ana Park");
    }

    #[test]
    fn deleting_teacher_leaves_courses_dangling() {
        let store = RecordStore::open_in_memory().unwrap();
        let teacher_id = store.create_teacher(&ana()).unwrap();
        let course_id = store
            .create_course(&NewCourse {
                title: "DB101".into(),
                description: None,
                teacher_id: Some(teacher_id),
            })
            .unwrap();

        assert!(store.delete::<Teacher>(teacher_id).unwrap());
        let course = store.get::<Course>(course_id).unwrap().unwrap();
        assert_eq!(course.teacher_id, Some(teacher_id));
    }
}
