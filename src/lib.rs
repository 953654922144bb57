//! Core library surface for the university records application.
//!
//! The record store in [`db`] is usable on its own; [`actions`] maps menu
//! entries onto it and [`ui`] drives the interactive terminal menu.
pub mod actions;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;
pub mod validation;

/// The persistence entry point and its typed failures.
pub use db::RecordStore;
pub use error::StoreError;

/// Entity records and insert payloads.
pub use models::{
    AverageScope, Course, Entity, Exam, Grade, GradeReport, NewCourse, NewExam, NewGrade,
    NewStudent, NewTeacher, Student, Teacher,
};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
