use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::actions::{Action, Field};

/// Input state for the popup that collects an action's arguments. One raw
/// string per field; parsing happens only when the form is submitted.
#[derive(Clone)]
pub(crate) struct ActionForm {
    pub(crate) action: Action,
    pub(crate) values: Vec<String>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl ActionForm {
    pub(crate) fn new(action: Action) -> Self {
        Self {
            action,
            values: vec![String::new(); action.fields().len()],
            active: 0,
            error: None,
        }
    }

    pub(crate) fn fields(&self) -> &'static [Field] {
        self.action.fields()
    }

    /// Move focus forward, wrapping to the first field.
    pub(crate) fn next_field(&mut self) {
        let count = self.values.len();
        if count > 0 {
            self.active = (self.active + 1) % count;
        }
    }

    /// Move focus backward, wrapping to the last field.
    pub(crate) fn prev_field(&mut self) {
        let count = self.values.len();
        if count > 0 {
            self.active = (self.active + count - 1) % count;
        }
    }

    /// Append a character to the active field if its kind allows it.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields().get(self.active) else {
            return false;
        };
        if !field.kind.accepts(ch) {
            return false;
        }
        self.values[self.active].push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.active) {
            value.pop();
        }
    }

    /// Render a single `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, idx: usize) -> Line<'static> {
        let field = self.fields()[idx];
        let value = &self.values[idx];
        let is_active = idx == self.active;

        let display = if value.is_empty() {
            if field.kind.is_optional() {
                "<optional>".to_string()
            } else {
                "<required>".to_string()
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset inside the form for the active field.
    pub(crate) fn cursor_offset(&self) -> usize {
        let label = self.fields().get(self.active).map_or(0, |f| f.label.len());
        let value = self
            .values
            .get(self.active)
            .map_or(0, |v| v.chars().count());
        label + ": ".len() + value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_respects_field_kind() {
        let mut form = ActionForm::new(Action::AddExam);
        assert!(!form.push_char('x'));
        for ch in "2024-05-01".chars() {
            assert!(form.push_char(ch));
        }
        form.next_field();
        assert!(form.push_char('3'));
        assert!(!form.push_char(' '));
        form.backspace();
        assert_eq!(form.values, vec!["2024-05-01", "", ""]);
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = ActionForm::new(Action::AddGrade);
        form.prev_field();
        assert_eq!(form.active, 2);
        form.next_field();
        assert_eq!(form.active, 0);
    }
}
