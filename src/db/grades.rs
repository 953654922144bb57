use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::error::{Result, StoreContext, StoreError};
use crate::models::{Entity, Grade, GradeReport, NewGrade};

use super::record::{Column, Record};
use super::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeColumn {
    Id,
    StudentId,
    ExamId,
    Score,
}

impl Column for GradeColumn {
    fn name(self) -> &'static str {
        match self {
            GradeColumn::Id => "id",
            GradeColumn::StudentId => "student_id",
            GradeColumn::ExamId => "exam_id",
            GradeColumn::Score => "score",
        }
    }
}

impl Record for Grade {
    const ENTITY: Entity = Entity::Grade;
    const COLUMNS: &'static str = "id, student_id, exam_id, score";
    type Column = GradeColumn;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Grade {
            id: row.get(0)?,
            student_id: row.get(1)?,
            exam_id: row.get(2)?,
            score: row.get(3)?,
        })
    }
}

impl RecordStore {
    /// Record a grade after checking it against the exam's ceiling.
    ///
    /// The exam must exist. A score above `max_score` is rejected; a score
    /// equal to it is accepted. Exams stored without a ceiling accept any
    /// score. The student id is not checked.
    ///
    /// The lookup and the insert are separate statements, so a concurrent
    /// change to the exam between them is not detected.
    pub fn add_grade(&self, grade: &NewGrade) -> Result<i64> {
        let max_score: Option<Option<i64>> = self
            .conn()
            .query_row(
                "SELECT max_score FROM exams WHERE id = ?1",
                [grade.exam_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to look up exam")?;

        let Some(max_score) = max_score else {
            warn!(exam_id = grade.exam_id, "grade rejected: exam not found");
            return Err(StoreError::NotFound {
                entity: Entity::Exam,
                id: grade.exam_id,
            });
        };

        if let Some(max_score) = max_score {
            if grade.score > max_score {
                warn!(
                    exam_id = grade.exam_id,
                    score = grade.score,
                    max_score,
                    "grade rejected: score above maximum"
                );
                return Err(StoreError::ScoreExceedsMaximum {
                    score: grade.score,
                    max_score,
                });
            }
        }

        self.conn()
            .execute(
                "INSERT INTO grades (student_id, exam_id, score) VALUES (?1, ?2, ?3)",
                params![grade.student_id, grade.exam_id, grade.score],
            )
            .context("failed to insert grade")?;

        let id = self.conn().last_insert_rowid();
        debug!(
            id,
            student_id = grade.student_id,
            exam_id = grade.exam_id,
            "inserted grade"
        );
        Ok(id)
    }

    /// Every grade a student earned in one course, with the exam date and the
    /// course title joined in.
    pub fn find_grades(&self, course_id: i64, student_id: i64) -> Result<Vec<GradeReport>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT g.score, e.date_of_exam, c.title
                 FROM grades g
                 INNER JOIN exams e ON g.exam_id = e.id
                 INNER JOIN courses c ON e.course_id = c.id
                 WHERE c.id = ?1 AND g.student_id = ?2
                 ORDER BY e.date_of_exam, g.id",
            )
            .context("failed to prepare grades query")?;

        let grades = stmt
            .query_map([course_id, student_id], |row| {
                Ok(GradeReport {
                    score: row.get(0)?,
                    exam_date: row.get(1)?,
                    course_title: row.get(2)?,
                })
            })
            .context("failed to iterate grades")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to collect grades")?;

        Ok(grades)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{NewCourse, NewExam};

    fn store_with_exam(max_score: i64) -> RecordStore {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .create_course(&NewCourse {
                title: "DB101".into(),
                description: None,
                teacher_id: None,
            })
            .unwrap();
        store
            .create_exam(&NewExam {
                date_of_exam: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                course_id: 1,
                max_score,
            })
            .unwrap();
        store
    }

    fn grade(score: i64) -> NewGrade {
        NewGrade {
            student_id: 1,
            exam_id: 1,
            score,
        }
    }

    #[test]
    fn score_above_maximum_is_rejected_without_insert() {
        let store = store_with_exam(100);
        let err = store.add_grade(&grade(101)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ScoreExceedsMaximum {
                score: 101,
                max_score: 100
            }
        ));
        assert!(store.list::<Grade>().unwrap().is_empty());
    }

    #[test]
    fn score_equal_to_maximum_is_accepted() {
        let store = store_with_exam(100);
        let id = store.add_grade(&grade(100)).unwrap();
        let stored = store.get::<Grade>(id).unwrap().unwrap();
        assert_eq!(stored.score, 100);
        assert_eq!(stored.exam_id, Some(1));
    }

    #[test]
    fn unknown_exam_is_not_found() {
        let store = store_with_exam(100);
        let err = store
            .add_grade(&NewGrade {
                exam_id: 7,
                ..grade(10)
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::Exam,
                id: 7
            }
        ));
        assert!(store.list::<Grade>().unwrap().is_empty());
    }

    #[test]
    fn exam_without_ceiling_accepts_any_score() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO exams (date_of_exam, course_id, max_score) VALUES ('2024-05-01', 1, NULL)",
                [],
            )
            .unwrap();
        assert!(store.add_grade(&grade(1_000)).is_ok());
    }

    #[test]
    fn find_grades_joins_exam_and_course() {
        let store = store_with_exam(100);
        store.add_grade(&grade(90)).unwrap();
        store
            .add_grade(&NewGrade {
                student_id: 2,
                ..grade(40)
            })
            .unwrap();

        let grades = store.find_grades(1, 1).unwrap();
        assert_eq!(
            grades,
            vec![GradeReport {
                score: 90,
                exam_date: "2024-05-01".into(),
                course_title: "DB101".into(),
            }]
        );
        assert!(store.find_grades(2, 1).unwrap().is_empty());
    }
}
