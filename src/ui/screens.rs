use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::actions::{Action, Outcome};
use crate::models::{AverageScope, Course, Exam, Grade, GradeReport, Student, Teacher};

/// What the result pane shows: the outcome of the most recent action,
/// pre-rendered into lines plus the current scroll offset.
pub(crate) struct ResultView {
    pub(crate) title: String,
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) scroll: u16,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            title: "Results".to_string(),
            lines: vec![Line::from(Span::styled(
                "Pick an action from the menu.",
                Style::default().fg(Color::DarkGray),
            ))],
            scroll: 0,
        }
    }
}

impl ResultView {
    pub(crate) fn from_outcome(action: Action, outcome: &Outcome) -> Self {
        Self {
            title: action.label().to_string(),
            lines: outcome_lines(outcome),
            scroll: 0,
        }
    }

    pub(crate) fn scroll_by(&mut self, offset: i32) {
        let max = self.lines.len().saturating_sub(1).min(u16::MAX as usize) as i32;
        self.scroll = (i32::from(self.scroll) + offset).clamp(0, max) as u16;
    }
}

/// One-line footer summary for a successful action.
pub(crate) fn summary(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created { entity, id } => format!("Added {entity} {id}."),
        Outcome::Updated { entity, id } => format!("Updated {entity} {id}."),
        Outcome::Deleted {
            entity,
            id,
            removed: true,
        } => format!("Deleted {entity} {id}."),
        Outcome::Deleted {
            entity,
            id,
            removed: false,
        } => format!("No {entity} with id {id}; nothing deleted."),
        Outcome::Students(rows) => count_message(rows.len(), "student"),
        Outcome::Teachers(rows) => count_message(rows.len(), "teacher"),
        Outcome::Courses(rows) => count_message(rows.len(), "course"),
        Outcome::Exams(rows) => count_message(rows.len(), "exam"),
        Outcome::Grades(rows) => count_message(rows.len(), "grade"),
        Outcome::GradeReports(rows) => count_message(rows.len(), "grade"),
        Outcome::Average { value: Some(_), .. } => "Average computed.".to_string(),
        Outcome::Average { value: None, .. } => "No grades match.".to_string(),
        Outcome::Quit => "Goodbye.".to_string(),
    }
}

fn count_message(count: usize, noun: &str) -> String {
    match count {
        0 => format!("No {noun}s found."),
        1 => format!("Found 1 {noun}."),
        n => format!("Found {n} {noun}s."),
    }
}

fn header(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn empty(text: &'static str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    ))]
}

fn id_or_dash(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn outcome_lines(outcome: &Outcome) -> Vec<Line<'static>> {
    match outcome {
        Outcome::Created { .. } | Outcome::Updated { .. } | Outcome::Deleted { .. } => {
            vec![Line::from(summary(outcome))]
        }
        Outcome::Students(rows) => student_lines(rows),
        Outcome::Teachers(rows) => teacher_lines(rows),
        Outcome::Courses(rows) => course_lines(rows),
        Outcome::Exams(rows) => exam_lines(rows),
        Outcome::Grades(rows) => grade_lines(rows),
        Outcome::GradeReports(rows) => report_lines(rows),
        Outcome::Average { scope, value } => average_lines(scope, *value),
        Outcome::Quit => Vec::new(),
    }
}

fn student_lines(rows: &[Student]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No students found.");
    }
    let mut lines = vec![header(format!(
        "{:>5}  {:<24} {:<16} {}",
        "ID", "Name", "Department", "Born"
    ))];
    lines.extend(rows.iter().map(|s| {
        Line::from(format!(
            "{:>5}  {:<24} {:<16} {}",
            s.id,
            s.full_name(),
            s.department,
            s.date_of_birth
        ))
    }));
    lines
}

fn teacher_lines(rows: &[Teacher]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No teachers found.");
    }
    let mut lines = vec![header(format!("{:>5}  {:<24} {}", "ID", "Name", "Department"))];
    lines.extend(
        rows.iter()
            .map(|t| Line::from(format!("{:>5}  {:<24} {}", t.id, t.full_name(), t.department))),
    );
    lines
}

fn course_lines(rows: &[Course]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No courses found.");
    }
    let mut lines = vec![header(format!(
        "{:>5}  {:<20} {:>7}  {}",
        "ID", "Title", "Teacher", "Description"
    ))];
    lines.extend(rows.iter().map(|c| {
        Line::from(format!(
            "{:>5}  {:<20} {:>7}  {}",
            c.id,
            c.title,
            id_or_dash(c.teacher_id),
            c.description.as_deref().unwrap_or("")
        ))
    }));
    lines
}

fn exam_lines(rows: &[Exam]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No exams found.");
    }
    let mut lines = vec![header(format!(
        "{:>5}  {:<10}  {:>6}  {:>9}",
        "ID", "Date", "Course", "Max score"
    ))];
    lines.extend(rows.iter().map(|e| {
        Line::from(format!(
            "{:>5}  {:<10}  {:>6}  {:>9}",
            e.id,
            e.date_of_exam,
            id_or_dash(e.course_id),
            id_or_dash(e.max_score)
        ))
    }));
    lines
}

fn grade_lines(rows: &[Grade]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No grades found.");
    }
    let mut lines = vec![header(format!(
        "{:>5}  {:>7}  {:>5}  {:>5}",
        "ID", "Student", "Exam", "Score"
    ))];
    lines.extend(rows.iter().map(|g| {
        Line::from(format!(
            "{:>5}  {:>7}  {:>5}  {:>5}",
            g.id,
            id_or_dash(g.student_id),
            id_or_dash(g.exam_id),
            g.score
        ))
    }));
    lines
}

fn report_lines(rows: &[GradeReport]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return empty("No grades found.");
    }
    let mut lines = vec![header(format!("{:>5}  {:<10}  {}", "Score", "Exam date", "Course"))];
    lines.extend(rows.iter().map(|r| {
        Line::from(format!(
            "{:>5}  {:<10}  {}",
            r.score, r.exam_date, r.course_title
        ))
    }));
    lines
}

fn average_lines(scope: &AverageScope, value: Option<f64>) -> Vec<Line<'static>> {
    let subject = match scope {
        AverageScope::StudentInCourse {
            student_id,
            course_id,
        } => format!("Student {student_id} in course {course_id}"),
        AverageScope::Student(student_id) => format!("Student {student_id}"),
        AverageScope::Department(department) => format!("Department {department}"),
    };
    match value {
        Some(value) => vec![
            Line::from(subject),
            Line::from(Span::styled(
                format!("Average score: {value:.2}"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ],
        None => vec![
            Line::from(subject),
            Line::from(Span::styled(
                "No grades recorded, so there is no average.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;

    #[test]
    fn delete_of_missing_row_is_reported_softly() {
        let outcome = Outcome::Deleted {
            entity: Entity::Course,
            id: 9,
            removed: false,
        };
        assert_eq!(summary(&outcome), "No course with id 9; nothing deleted.");
    }

    #[test]
    fn empty_average_is_not_shown_as_zero() {
        let outcome = Outcome::Average {
            scope: AverageScope::Student(1),
            value: None,
        };
        let view = ResultView::from_outcome(Action::AverageForStudent, &outcome);
        let text: String = view.lines[1]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(!text.contains('0'));
        assert_eq!(summary(&outcome), "No grades match.");
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut view = ResultView::from_outcome(Action::ListGrades, &Outcome::Grades(Vec::new()));
        view.scroll_by(5);
        assert_eq!(view.scroll, 0);
        view.scroll_by(-3);
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn scrolling_long_results_stops_at_the_offset_limit() {
        let mut view = ResultView::default();
        view.lines = vec![Line::from("row"); u16::MAX as usize + 10];
        view.scroll = u16::MAX - 5;
        view.scroll_by(10);
        assert_eq!(view.scroll, u16::MAX);
        view.scroll_by(-10);
        assert_eq!(view.scroll, u16::MAX - 10);
    }
}
