//! Menu actions and their dispatch onto the record store.
//!
//! The shell collects one raw string per [`Field`] of the chosen [`Action`],
//! turns them into a typed [`Request`] (all validation happens here, before
//! the store is touched), and hands the request to [`execute`], which runs
//! exactly one store operation and returns a structured [`Outcome`].

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{
    AverageScope, Course, Entity, Exam, Grade, GradeReport, NewCourse, NewExam, NewGrade,
    NewStudent, NewTeacher, Student, Teacher,
};
use crate::validation::{
    optional_text, parse_date, parse_integer, parse_optional_integer, require_text,
};

/// How a form field filters keystrokes and how its value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    OptionalText,
    Integer,
    OptionalInteger,
    Date,
}

impl FieldKind {
    /// Whether `ch` may be typed into a field of this kind.
    pub fn accepts(self, ch: char) -> bool {
        match self {
            FieldKind::Text | FieldKind::OptionalText => !ch.is_control(),
            FieldKind::Integer | FieldKind::OptionalInteger => ch.is_ascii_digit() || ch == '-',
            FieldKind::Date => ch.is_ascii_digit() || ch == '-',
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(self, FieldKind::OptionalText | FieldKind::OptionalInteger)
    }
}

/// One labelled input of an action form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(label: &'static str, kind: FieldKind) -> Field {
    Field { label, kind }
}

const STUDENT_FIELDS: &[Field] = &[
    field("Name", FieldKind::Text),
    field("Surname", FieldKind::Text),
    field("Department", FieldKind::Text),
    field("Date of birth", FieldKind::Date),
];
const STUDENT_UPDATE_FIELDS: &[Field] = &[
    field("Student id", FieldKind::Integer),
    field("Name", FieldKind::Text),
    field("Surname", FieldKind::Text),
    field("Department", FieldKind::Text),
    field("Date of birth", FieldKind::Date),
];
const TEACHER_FIELDS: &[Field] = &[
    field("Name", FieldKind::Text),
    field("Surname", FieldKind::Text),
    field("Department", FieldKind::Text),
];
const TEACHER_UPDATE_FIELDS: &[Field] = &[
    field("Teacher id", FieldKind::Integer),
    field("Name", FieldKind::Text),
    field("Surname", FieldKind::Text),
    field("Department", FieldKind::Text),
];
const COURSE_FIELDS: &[Field] = &[
    field("Title", FieldKind::Text),
    field("Description", FieldKind::OptionalText),
    field("Teacher id", FieldKind::OptionalInteger),
];
const COURSE_UPDATE_FIELDS: &[Field] = &[
    field("Course id", FieldKind::Integer),
    field("Title", FieldKind::Text),
    field("Description", FieldKind::OptionalText),
    field("Teacher id", FieldKind::OptionalInteger),
];
const EXAM_FIELDS: &[Field] = &[
    field("Exam date", FieldKind::Date),
    field("Course id", FieldKind::Integer),
    field("Max score", FieldKind::Integer),
];
const GRADE_FIELDS: &[Field] = &[
    field("Student id", FieldKind::Integer),
    field("Exam id", FieldKind::Integer),
    field("Score", FieldKind::Integer),
];
const STUDENT_ID: &[Field] = &[field("Student id", FieldKind::Integer)];
const TEACHER_ID: &[Field] = &[field("Teacher id", FieldKind::Integer)];
const COURSE_ID: &[Field] = &[field("Course id", FieldKind::Integer)];
const EXAM_ID: &[Field] = &[field("Exam id", FieldKind::Integer)];
const GRADE_ID: &[Field] = &[field("Grade id", FieldKind::Integer)];
const DEPARTMENT: &[Field] = &[field("Department", FieldKind::Text)];
const COURSE_AND_STUDENT: &[Field] = &[
    field("Course id", FieldKind::Integer),
    field("Student id", FieldKind::Integer),
];

/// Every entry of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddStudent,
    UpdateStudent,
    DeleteStudent,
    StudentsByDepartment,
    StudentsInCourse,
    ListStudents,
    AddTeacher,
    UpdateTeacher,
    DeleteTeacher,
    ListTeachers,
    AddCourse,
    UpdateCourse,
    DeleteCourse,
    CoursesByTeacher,
    ListCourses,
    AddExam,
    DeleteExam,
    ListExams,
    AddGrade,
    DeleteGrade,
    GradesInCourse,
    ListGrades,
    AverageInCourse,
    AverageForStudent,
    AverageForDepartment,
    Quit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 26] = [
        Action::AddStudent,
        Action::UpdateStudent,
        Action::DeleteStudent,
        Action::StudentsByDepartment,
        Action::StudentsInCourse,
        Action::ListStudents,
        Action::AddTeacher,
        Action::UpdateTeacher,
        Action::DeleteTeacher,
        Action::ListTeachers,
        Action::AddCourse,
        Action::UpdateCourse,
        Action::DeleteCourse,
        Action::CoursesByTeacher,
        Action::ListCourses,
        Action::AddExam,
        Action::DeleteExam,
        Action::ListExams,
        Action::AddGrade,
        Action::DeleteGrade,
        Action::GradesInCourse,
        Action::ListGrades,
        Action::AverageInCourse,
        Action::AverageForStudent,
        Action::AverageForDepartment,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::AddStudent => "Add student",
            Action::UpdateStudent => "Update student",
            Action::DeleteStudent => "Delete student",
            Action::StudentsByDepartment => "Students in department",
            Action::StudentsInCourse => "Students enrolled in course",
            Action::ListStudents => "All students",
            Action::AddTeacher => "Add teacher",
            Action::UpdateTeacher => "Update teacher",
            Action::DeleteTeacher => "Delete teacher",
            Action::ListTeachers => "All teachers",
            Action::AddCourse => "Add course",
            Action::UpdateCourse => "Update course",
            Action::DeleteCourse => "Delete course",
            Action::CoursesByTeacher => "Courses taught by teacher",
            Action::ListCourses => "All courses",
            Action::AddExam => "Add exam",
            Action::DeleteExam => "Delete exam",
            Action::ListExams => "All exams",
            Action::AddGrade => "Add grade",
            Action::DeleteGrade => "Delete grade",
            Action::GradesInCourse => "Student grades in course",
            Action::ListGrades => "All grades",
            Action::AverageInCourse => "Student average in course",
            Action::AverageForStudent => "Student overall average",
            Action::AverageForDepartment => "Department average",
            Action::Quit => "Quit",
        }
    }

    /// Inputs the action needs, in prompt order. Empty for actions that run
    /// immediately.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Action::AddStudent => STUDENT_FIELDS,
            Action::UpdateStudent => STUDENT_UPDATE_FIELDS,
            Action::DeleteStudent | Action::AverageForStudent => STUDENT_ID,
            Action::StudentsByDepartment | Action::AverageForDepartment => DEPARTMENT,
            Action::StudentsInCourse | Action::DeleteCourse => COURSE_ID,
            Action::AddTeacher => TEACHER_FIELDS,
            Action::UpdateTeacher => TEACHER_UPDATE_FIELDS,
            Action::DeleteTeacher | Action::CoursesByTeacher => TEACHER_ID,
            Action::AddCourse => COURSE_FIELDS,
            Action::UpdateCourse => COURSE_UPDATE_FIELDS,
            Action::AddExam => EXAM_FIELDS,
            Action::DeleteExam => EXAM_ID,
            Action::AddGrade => GRADE_FIELDS,
            Action::DeleteGrade => GRADE_ID,
            Action::GradesInCourse | Action::AverageInCourse => COURSE_AND_STUDENT,
            Action::ListStudents
            | Action::ListTeachers
            | Action::ListCourses
            | Action::ListExams
            | Action::ListGrades
            | Action::Quit => &[],
        }
    }
}

/// A fully typed, validated request for one store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    AddStudent(NewStudent),
    UpdateStudent(i64, NewStudent),
    AddTeacher(NewTeacher),
    UpdateTeacher(i64, NewTeacher),
    AddCourse(NewCourse),
    UpdateCourse(i64, NewCourse),
    AddExam(NewExam),
    AddGrade(NewGrade),
    Delete(Entity, i64),
    StudentsByDepartment(String),
    StudentsInCourse(i64),
    CoursesByTeacher(i64),
    GradesInCourse { course_id: i64, student_id: i64 },
    List(Entity),
    Average(AverageScope),
    Quit,
}

/// Raw form values paired with the field labels used in error messages.
struct Inputs<'a> {
    fields: &'static [Field],
    values: &'a [String],
}

impl Inputs<'_> {
    fn raw(&self, idx: usize) -> (&'static str, &str) {
        let label = self.fields.get(idx).map_or("value", |field| field.label);
        let value = self.values.get(idx).map_or("", String::as_str);
        (label, value)
    }

    fn text(&self, idx: usize) -> Result<String> {
        let (label, value) = self.raw(idx);
        require_text(label, value)
    }

    fn optional_text(&self, idx: usize) -> Option<String> {
        optional_text(self.raw(idx).1)
    }

    fn integer(&self, idx: usize) -> Result<i64> {
        let (label, value) = self.raw(idx);
        parse_integer(label, value)
    }

    fn optional_integer(&self, idx: usize) -> Result<Option<i64>> {
        let (label, value) = self.raw(idx);
        parse_optional_integer(label, value)
    }

    fn date(&self, idx: usize) -> Result<chrono::NaiveDate> {
        let (label, value) = self.raw(idx);
        parse_date(label, value)
    }

    fn student(&self, offset: usize) -> Result<NewStudent> {
        Ok(NewStudent {
            name: self.text(offset)?,
            surname: self.text(offset + 1)?,
            department: self.text(offset + 2)?,
            date_of_birth: self.date(offset + 3)?,
        })
    }

    fn teacher(&self, offset: usize) -> Result<NewTeacher> {
        Ok(NewTeacher {
            name: self.text(offset)?,
            surname: self.text(offset + 1)?,
            department: self.text(offset + 2)?,
        })
    }

    fn course(&self, offset: usize) -> Result<NewCourse> {
        Ok(NewCourse {
            title: self.text(offset)?,
            description: self.optional_text(offset + 1),
            teacher_id: self.optional_integer(offset + 2)?,
        })
    }
}

impl Request {
    /// Validate the raw values collected for `action`. Any failure is a
    /// [`crate::StoreError::Validation`] and nothing reaches the store.
    pub fn parse(action: Action, values: &[String]) -> Result<Request> {
        let input = Inputs {
            fields: action.fields(),
            values,
        };

        let request = match action {
            Action::AddStudent => Request::AddStudent(input.student(0)?),
            Action::UpdateStudent => Request::UpdateStudent(input.integer(0)?, input.student(1)?),
            Action::DeleteStudent => Request::Delete(Entity::Student, input.integer(0)?),
            Action::StudentsByDepartment => Request::StudentsByDepartment(input.text(0)?),
            Action::StudentsInCourse => Request::StudentsInCourse(input.integer(0)?),
            Action::ListStudents => Request::List(Entity::Student),
            Action::AddTeacher => Request::AddTeacher(input.teacher(0)?),
            Action::UpdateTeacher => Request::UpdateTeacher(input.integer(0)?, input.teacher(1)?),
            Action::DeleteTeacher => Request::Delete(Entity::Teacher, input.integer(0)?),
            Action::ListTeachers => Request::List(Entity::Teacher),
            Action::AddCourse => Request::AddCourse(input.course(0)?),
            Action::UpdateCourse => Request::UpdateCourse(input.integer(0)?, input.course(1)?),
            Action::DeleteCourse => Request::Delete(Entity::Course, input.integer(0)?),
            Action::CoursesByTeacher => Request::CoursesByTeacher(input.integer(0)?),
            Action::ListCourses => Request::List(Entity::Course),
            Action::AddExam => Request::AddExam(NewExam {
                date_of_exam: input.date(0)?,
                course_id: input.integer(1)?,
                max_score: input.integer(2)?,
            }),
            Action::DeleteExam => Request::Delete(Entity::Exam, input.integer(0)?),
            Action::ListExams => Request::List(Entity::Exam),
            Action::AddGrade => Request::AddGrade(NewGrade {
                student_id: input.integer(0)?,
                exam_id: input.integer(1)?,
                score: input.integer(2)?,
            }),
            Action::DeleteGrade => Request::Delete(Entity::Grade, input.integer(0)?),
            Action::GradesInCourse => Request::GradesInCourse {
                course_id: input.integer(0)?,
                student_id: input.integer(1)?,
            },
            Action::ListGrades => Request::List(Entity::Grade),
            Action::AverageInCourse => Request::Average(AverageScope::StudentInCourse {
                course_id: input.integer(0)?,
                student_id: input.integer(1)?,
            }),
            Action::AverageForStudent => {
                Request::Average(AverageScope::Student(input.integer(0)?))
            }
            Action::AverageForDepartment => {
                Request::Average(AverageScope::Department(input.text(0)?))
            }
            Action::Quit => Request::Quit,
        };

        Ok(request)
    }
}

/// Structured result of one executed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created { entity: Entity, id: i64 },
    Updated { entity: Entity, id: i64 },
    /// `removed` is false when no row had that id.
    Deleted { entity: Entity, id: i64, removed: bool },
    Students(Vec<Student>),
    Teachers(Vec<Teacher>),
    Courses(Vec<Course>),
    Exams(Vec<Exam>),
    Grades(Vec<Grade>),
    GradeReports(Vec<GradeReport>),
    Average {
        scope: AverageScope,
        value: Option<f64>,
    },
    Quit,
}

/// Run one request against the store.
pub fn execute(store: &RecordStore, request: Request) -> Result<Outcome> {
    let outcome = match request {
        Request::AddStudent(student) => Outcome::Created {
            entity: Entity::Student,
            id: store.create_student(&student)?,
        },
        Request::UpdateStudent(id, student) => {
            store.update_student(id, &student)?;
            Outcome::Updated {
                entity: Entity::Student,
                id,
            }
        }
        Request::AddTeacher(teacher) => Outcome::Created {
            entity: Entity::Teacher,
            id: store.create_teacher(&teacher)?,
        },
        Request::UpdateTeacher(id, teacher) => {
            store.update_teacher(id, &teacher)?;
            Outcome::Updated {
                entity: Entity::Teacher,
                id,
            }
        }
        Request::AddCourse(course) => Outcome::Created {
            entity: Entity::Course,
            id: store.create_course(&course)?,
        },
        Request::UpdateCourse(id, course) => {
            store.update_course(id, &course)?;
            Outcome::Updated {
                entity: Entity::Course,
                id,
            }
        }
        Request::AddExam(exam) => Outcome::Created {
            entity: Entity::Exam,
            id: store.create_exam(&exam)?,
        },
        Request::AddGrade(grade) => Outcome::Created {
            entity: Entity::Grade,
            id: store.add_grade(&grade)?,
        },
        Request::Delete(entity, id) => {
            let removed = match entity {
                Entity::Student => store.delete::<Student>(id)?,
                Entity::Teacher => store.delete::<Teacher>(id)?,
                Entity::Course => store.delete::<Course>(id)?,
                Entity::Exam => store.delete::<Exam>(id)?,
                Entity::Grade => store.delete::<Grade>(id)?,
            };
            Outcome::Deleted {
                entity,
                id,
                removed,
            }
        }
        Request::StudentsByDepartment(department) => {
            Outcome::Students(store.students_by_department(&department)?)
        }
        Request::StudentsInCourse(course_id) => {
            Outcome::Students(store.find_students_enrolled_in(course_id)?)
        }
        Request::CoursesByTeacher(teacher_id) => {
            Outcome::Courses(store.courses_by_teacher(teacher_id)?)
        }
        Request::GradesInCourse {
            course_id,
            student_id,
        } => Outcome::GradeReports(store.find_grades(course_id, student_id)?),
        Request::List(entity) => match entity {
            Entity::Student => Outcome::Students(store.list()?),
            Entity::Teacher => Outcome::Teachers(store.list()?),
            Entity::Course => Outcome::Courses(store.list()?),
            Entity::Exam => Outcome::Exams(store.list()?),
            Entity::Grade => Outcome::Grades(store.list()?),
        },
        Request::Average(scope) => {
            let value = store.average(&scope)?;
            Outcome::Average { scope, value }
        }
        Request::Quit => Outcome::Quit,
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn every_action_is_listed_once() {
        for action in Action::ALL {
            assert_eq!(
                Action::ALL.iter().filter(|other| **other == action).count(),
                1,
                "{action:?}"
            );
        }
    }

    #[test]
    fn bad_date_never_reaches_the_store() {
        let err = Request::parse(
            Action::AddStudent,
            &values(&["Tom", "Roe", "CS", "01/01/2000"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation {
                field: "Date of birth",
                ..
            }
        ));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let request = Request::parse(Action::AddCourse, &values(&["DB101", " ", ""])).unwrap();
        assert_eq!(
            request,
            Request::AddCourse(NewCourse {
                title: "DB101".into(),
                description: None,
                teacher_id: None,
            })
        );
    }

    #[test]
    fn list_actions_need_no_input() {
        assert_eq!(
            Request::parse(Action::ListExams, &[]).unwrap(),
            Request::List(Entity::Exam)
        );
        assert!(Action::ListExams.fields().is_empty());
    }

    #[test]
    fn execute_add_then_delete() {
        let store = RecordStore::open_in_memory().unwrap();
        let add = Request::parse(Action::AddTeacher, &values(&["Ana", "Lee", "CS"])).unwrap();
        assert_eq!(
            execute(&store, add).unwrap(),
            Outcome::Created {
                entity: Entity::Teacher,
                id: 1
            }
        );

        let delete = Request::parse(Action::DeleteTeacher, &values(&["1"])).unwrap();
        assert_eq!(
            execute(&store, delete.clone()).unwrap(),
            Outcome::Deleted {
                entity: Entity::Teacher,
                id: 1,
                removed: true
            }
        );
        assert_eq!(
            execute(&store, delete).unwrap(),
            Outcome::Deleted {
                entity: Entity::Teacher,
                id: 1,
                removed: false
            }
        );
    }
}
