use rusqlite::{params, Row};
use tracing::debug;

use crate::error::{Result, StoreContext, StoreError};
use crate::models::{Course, Entity, NewCourse};

use super::record::{Column, Record};
use super::{require_field, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseColumn {
    Id,
    Title,
    Description,
    TeacherId,
}

impl Column for CourseColumn {
    fn name(self) -> &'static str {
        match self {
            CourseColumn::Id => "id",
            CourseColumn::Title => "title",
            CourseColumn::Description => "description",
            CourseColumn::TeacherId => "teacher_id",
        }
    }
}

impl Record for Course {
    const ENTITY: Entity = Entity::Course;
    const COLUMNS: &'static str = "id, title, description, teacher_id";
    type Column = CourseColumn;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Course {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            teacher_id: row.get(3)?,
        })
    }
}

impl RecordStore {
    /// Insert a course. The teacher id is stored as given; it is not checked
    /// against the `teachers` table.
    pub fn create_course(&self, course: &NewCourse) -> Result<i64> {
        require_field("title", &course.title)?;
        self.conn()
            .execute(
                "INSERT INTO courses (title, description, teacher_id) VALUES (?1, ?2, ?3)",
                params![course.title, course.description, course.teacher_id],
            )
            .context("failed to insert course")?;

        let id = self.conn().last_insert_rowid();
        debug!(id, "inserted course");
        Ok(id)
    }

    pub fn update_course(&self, id: i64, course: &NewCourse) -> Result<()> {
        require_field("title", &course.title)?;
        let updated = self
            .conn()
            .execute(
                "UPDATE courses SET title = ?1, description = ?2, teacher_id = ?3 WHERE id = ?4",
                params![course.title, course.description, course.teacher_id, id],
            )
            .context("failed to update course")?;

        if updated == 0 {
            Err(StoreError::NotFound {
                entity: Entity::Course,
                id,
            })
        } else {
            debug!(id, "updated course");
            Ok(())
        }
    }

    /// Courses currently assigned to one teacher.
    pub fn courses_by_teacher(&self, teacher_id: i64) -> Result<Vec<Course>> {
        self.find_by::<Course>(CourseColumn::TeacherId, teacher_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_round_trip_as_none() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store
            .create_course(&NewCourse {
                title: "Seminar".into(),
                description: None,
                teacher_id: None,
            })
            .unwrap();
        let course = store.get::<Course>(id).unwrap().unwrap();
        assert_eq!(course.description, None);
        assert_eq!(course.teacher_id, None);
    }

    #[test]
    fn courses_by_teacher_filters_on_assignment() {
        let store = RecordStore::open_in_memory().unwrap();
        for (title, teacher) in [("DB101", Some(1)), ("OS201", Some(2)), ("DB202", Some(1))] {
            store
                .create_course(&NewCourse {
                    title: title.into(),
                    description: Some("intro".into()),
                    teacher_id: teacher,
                })
                .unwrap();
        }

        let titles: Vec<_> = store
            .courses_by_teacher(1)
            .unwrap()
            .into_iter()
            .map(|course| course.title)
            .collect();
        assert_eq!(titles, vec!["DB101", "DB202"]);
    }

    #[test]
    fn update_reassigns_teacher() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store
            .create_course(&NewCourse {
                title: "DB101".into(),
                description: None,
                teacher_id: Some(1),
            })
            .unwrap();
        store
            .update_course(
                id,
                &NewCourse {
                    title: "DB101".into(),
                    description: Some("databases".into()),
                    teacher_id: Some(3),
                },
            )
            .unwrap();
        assert!(store.courses_by_teacher(1).unwrap().is_empty());
        assert_eq!(store.courses_by_teacher(3).unwrap()[0].id, id);

        let missing = NewCourse {
            title: "x".into(),
            description: None,
            teacher_id: None,
        };
        assert!(matches!(
            store.update_course(42, &missing),
            Err(StoreError::NotFound { id: 42, .. })
        ));
    }
}
