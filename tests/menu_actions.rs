use university_records::actions::{execute, Action, Outcome, Request};
use university_records::{Entity, RecordStore, StoreError};

fn run(store: &RecordStore, action: Action, raw: &[&str]) -> Result<Outcome, StoreError> {
    let values: Vec<String> = raw.iter().map(|value| value.to_string()).collect();
    let request = Request::parse(action, &values)?;
    execute(store, request)
}

#[test]
fn menu_flow_from_empty_store() {
    let store = RecordStore::open_in_memory().expect("open store");

    run(&store, Action::AddTeacher, &["Ana", "Lee", "CS"]).expect("teacher");
    run(&store, Action::AddCourse, &["DB101", "intro", "1"]).expect("course");
    run(&store, Action::AddExam, &["2024-05-01", "1", "100"]).expect("exam");
    let created =
        run(&store, Action::AddStudent, &["Tom", "Roe", "CS", "2000-01-01"]).expect("student");
    assert_eq!(
        created,
        Outcome::Created {
            entity: Entity::Student,
            id: 1
        }
    );

    let too_high = run(&store, Action::AddGrade, &["1", "1", "120"]);
    assert!(matches!(too_high, Err(StoreError::ScoreExceedsMaximum { .. })));
    run(&store, Action::AddGrade, &["1", "1", "90"]).expect("grade");

    match run(&store, Action::AverageForStudent, &["1"]).expect("average") {
        Outcome::Average { value, .. } => assert_eq!(value, Some(90.0)),
        other => panic!("unexpected outcome {other:?}"),
    }

    match run(&store, Action::CoursesByTeacher, &["1"]).expect("courses") {
        Outcome::Courses(courses) => assert_eq!(courses[0].title, "DB101"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn update_of_unknown_id_reports_not_found() {
    let store = RecordStore::open_in_memory().expect("open store");
    let result = run(&store, Action::UpdateTeacher, &["5", "Ana", "Lee", "CS"]);
    assert!(matches!(
        result,
        Err(StoreError::NotFound {
            entity: Entity::Teacher,
            id: 5
        })
    ));
}

#[test]
fn average_with_no_grades_is_none() {
    let store = RecordStore::open_in_memory().expect("open store");
    match run(&store, Action::AverageForDepartment, &["Physics"]).expect("average") {
        Outcome::Average { value, .. } => assert_eq!(value, None),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn quit_touches_nothing() {
    let store = RecordStore::open_in_memory().expect("open store");
    assert_eq!(run(&store, Action::Quit, &[]).expect("quit"), Outcome::Quit);
}
