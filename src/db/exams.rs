use rusqlite::{params, Row};
use tracing::debug;

use crate::error::{Result, StoreContext, StoreError};
use crate::models::{Entity, Exam, NewExam};

use super::record::{Column, Record};
use super::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamColumn {
    Id,
    DateOfExam,
    CourseId,
    MaxScore,
}

impl Column for ExamColumn {
    fn name(self) -> &'static str {
        match self {
            ExamColumn::Id => "id",
            ExamColumn::DateOfExam => "date_of_exam",
            ExamColumn::CourseId => "course_id",
            ExamColumn::MaxScore => "max_score",
        }
    }
}

impl Record for Exam {
    const ENTITY: Entity = Entity::Exam;
    const COLUMNS: &'static str = "id, date_of_exam, course_id, max_score";
    type Column = ExamColumn;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Exam {
            id: row.get(0)?,
            date_of_exam: row.get(1)?,
            course_id: row.get(2)?,
            max_score: row.get(3)?,
        })
    }
}

impl RecordStore {
    /// Schedule an exam. Exams cannot be edited afterwards; a reschedule is a
    /// new exam.
    pub fn create_exam(&self, exam: &NewExam) -> Result<i64> {
        if exam.max_score < 0 {
            return Err(StoreError::ConstraintViolation(format!(
                "max_score must not be negative (got {})",
                exam.max_score
            )));
        }
        self.conn()
            .execute(
                "INSERT INTO exams (date_of_exam, course_id, max_score) VALUES (?1, ?2, ?3)",
                params![exam.date_of_exam, exam.course_id, exam.max_score],
            )
            .context("failed to insert exam")?;

        let id = self.conn().last_insert_rowid();
        debug!(id, course_id = exam.course_id, "inserted exam");
        Ok(id)
    }
}
