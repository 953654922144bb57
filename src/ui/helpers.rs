use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Footer text for a failed action.
pub(crate) fn describe_error(err: &StoreError) -> String {
    match err {
        StoreError::Validation { field, reason } => format!("{field}: {reason}."),
        StoreError::NotFound { entity, id } => format!("No {entity} with id {id}."),
        StoreError::ScoreExceedsMaximum { score, max_score } => {
            format!("Score {score} is above the exam maximum of {max_score}.")
        }
        StoreError::ConstraintViolation(detail) => format!("Rejected: {detail}."),
        StoreError::Store { .. } | StoreError::Io { .. } => format!("Database error: {err}"),
    }
}
