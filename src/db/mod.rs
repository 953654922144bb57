//! The record store, split across one submodule per entity plus the shared
//! connection handling and reporting queries.

mod connection;
mod courses;
mod exams;
mod grades;
mod record;
mod reports;
mod students;
mod teachers;

pub use connection::RecordStore;
pub use courses::CourseColumn;
pub use exams::ExamColumn;
pub use grades::GradeColumn;
pub use record::{Column, Record};
pub use students::StudentColumn;
pub use teachers::TeacherColumn;

use crate::error::{Result, StoreError};

/// Refuse blank text for a NOT NULL column. SQLite would happily store an
/// empty string, which the schema treats as missing.
fn require_field(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(StoreError::ConstraintViolation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
