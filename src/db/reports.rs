//! Cross-entity queries: enrolment derived from grades, and score averages.

use rusqlite::params;
use tracing::debug;

use crate::error::{Result, StoreContext};
use crate::models::{AverageScope, Student};

use super::record::Record;
use super::RecordStore;

impl RecordStore {
    /// Students holding at least one grade for an exam of `course_id`. Each
    /// student appears once no matter how many grades they have.
    pub fn find_students_enrolled_in(&self, course_id: i64) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT DISTINCT s.id, s.name, s.surname, s.department, s.date_of_birth
                 FROM students s
                 INNER JOIN grades g ON s.id = g.student_id
                 INNER JOIN exams e ON g.exam_id = e.id
                 INNER JOIN courses c ON e.course_id = c.id
                 WHERE c.id = ?1
                 ORDER BY s.id",
            )
            .context("failed to prepare enrolment query")?;

        let students = stmt
            .query_map([course_id], Student::from_row)
            .context("failed to iterate enrolled students")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to collect enrolled students")?;

        Ok(students)
    }

    /// Mean score over the grades selected by `scope`, or `None` when no
    /// grade matches.
    pub fn average(&self, scope: &AverageScope) -> Result<Option<f64>> {
        let average: Option<f64> = match scope {
            AverageScope::StudentInCourse {
                student_id,
                course_id,
            } => self.conn().query_row(
                "SELECT AVG(g.score)
                 FROM students s
                 INNER JOIN grades g ON s.id = g.student_id
                 INNER JOIN exams e ON g.exam_id = e.id
                 INNER JOIN courses c ON e.course_id = c.id
                 WHERE s.id = ?1 AND c.id = ?2",
                params![student_id, course_id],
                |row| row.get::<_, Option<f64>>(0),
            ),
            AverageScope::Student(student_id) => self.conn().query_row(
                "SELECT AVG(score) FROM grades WHERE student_id = ?1",
                [student_id],
                |row| row.get::<_, Option<f64>>(0),
            ),
            AverageScope::Department(department) => self.conn().query_row(
                "SELECT AVG(g.score)
                 FROM grades g
                 INNER JOIN students s ON g.student_id = s.id
                 WHERE s.department = ?1",
                [department],
                |row| row.get::<_, Option<f64>>(0),
            ),
        }
        .context("failed to compute average")?;

        debug!(?scope, ?average, "average");
        Ok(average)
    }
}
