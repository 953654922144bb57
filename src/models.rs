//! Domain models that mirror the SQLite schema and get passed between the
//! record store and the menu shell. They stay plain data holders so the
//! persistence layer owns every query and the shell owns every piece of text.

use std::fmt;

use chrono::NaiveDate;

/// The five record collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Student,
    Teacher,
    Course,
    Exam,
    Grade,
}

impl Entity {
    /// Every entity in schema creation order.
    pub const ALL: [Entity; 5] = [
        Entity::Student,
        Entity::Teacher,
        Entity::Course,
        Entity::Exam,
        Entity::Grade,
    ];

    /// Name of the backing table.
    pub fn table(self) -> &'static str {
        match self {
            Entity::Student => "students",
            Entity::Teacher => "teachers",
            Entity::Course => "courses",
            Entity::Exam => "exams",
            Entity::Grade => "grades",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Student => "student",
            Entity::Teacher => "teacher",
            Entity::Course => "course",
            Entity::Exam => "exam",
            Entity::Grade => "grade",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A row of the `students` table.
pub struct Student {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub department: String,
    /// The stored text, as written. New rows always hold `YYYY-MM-DD`; rows
    /// from older databases are passed through unparsed.
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq)]
/// A course, optionally assigned to a teacher. The `teacher_id` may dangle
/// once the teacher is deleted.
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exam {
    pub id: i64,
    /// Stored date text, unparsed.
    pub date_of_exam: String,
    pub course_id: Option<i64>,
    /// Ceiling for every grade recorded against this exam. `None` means the
    /// exam was stored without a ceiling.
    pub max_score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub student_id: Option<i64>,
    pub exam_id: Option<i64>,
    pub score: i64,
}

/// Joined view of one grade for display: the score, when the exam took place
/// and which course it belonged to.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub score: i64,
    pub exam_date: String,
    pub course_title: String,
}

/// Field values for inserting or overwriting a student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub surname: String,
    pub department: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeacher {
    pub name: String,
    pub surname: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExam {
    pub date_of_exam: NaiveDate,
    pub course_id: i64,
    pub max_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGrade {
    pub student_id: i64,
    pub exam_id: i64,
    pub score: i64,
}

/// Filter dimension for [`crate::db::RecordStore::average`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AverageScope {
    /// Grades of one student within one course.
    StudentInCourse { student_id: i64, course_id: i64 },
    /// Every grade of one student.
    Student(i64),
    /// Every grade of every student in a department.
    Department(String),
}

impl Student {
    /// `Name Surname` for list views.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}
