use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::actions::{execute, Action, Outcome, Request};
use crate::db::RecordStore;

use super::forms::ActionForm;
use super::helpers::{centered_rect, describe_error};
use super::screens::{summary, ResultView};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width share of the action menu.
const MENU_PERCENT: u16 = 34;
/// Lines moved per PageUp/PageDown in the result pane.
const PAGE: i32 = 10;

/// Whether keystrokes drive the menu or an open form.
enum Mode {
    Normal,
    Form(ActionForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the record store
/// for the whole session; [`App::into_store`] hands it back for closing.
pub struct App {
    store: RecordStore,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
    result: ResultView,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            selected: 0,
            mode: Mode::Normal,
            status: None,
            result: ResultView::default(),
        }
    }

    /// Give up the UI state and return the store.
    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Process one key press. Returns `true` once the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Form(form) => self.handle_form_key(code, form, &mut exit),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = Action::ALL.len() - 1,
            KeyCode::PageUp => self.result.scroll_by(-PAGE),
            KeyCode::PageDown => self.result.scroll_by(PAGE),
            KeyCode::Enter => {
                let action = self.current_action();
                self.clear_status();
                if action.fields().is_empty() {
                    self.run(action, &[], exit);
                } else {
                    return Mode::Form(ActionForm::new(action));
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_form_key(&mut self, code: KeyCode, mut form: ActionForm, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(
                    format!("{} cancelled.", form.action.label()),
                    StatusKind::Info,
                );
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                self.clear_status();
                self.run(form.action, &form.values, exit);
                match self.failure() {
                    Some(message) => form.error = Some(message.to_string()),
                    None => return Mode::Normal,
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Form(form)
    }

    /// Validate the collected values, run the matching store operation and
    /// publish its outcome in the result pane and footer. Failures only ever
    /// land in the footer; they never end the session.
    fn run(&mut self, action: Action, values: &[String], exit: &mut bool) {
        let outcome = Request::parse(action, values).and_then(|request| {
            debug!(?request, "executing");
            execute(&self.store, request)
        });

        match outcome {
            Ok(Outcome::Quit) => {
                info!("quit requested");
                *exit = true;
            }
            Ok(outcome) => {
                self.set_status(summary(&outcome), StatusKind::Info);
                self.result = ResultView::from_outcome(action, &outcome);
            }
            Err(err) => {
                info!(action = action.label(), error = %err, "action failed");
                self.set_status(describe_error(&err), StatusKind::Error);
            }
        }
    }

    /// Footer text of the last failed action, if the footer holds one.
    fn failure(&self) -> Option<&str> {
        match &self.status {
            Some(StatusMessage {
                text,
                kind: StatusKind::Error,
            }) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(MENU_PERCENT),
                Constraint::Percentage(100 - MENU_PERCENT),
            ])
            .split(content_area);

        self.draw_menu(frame, columns[0]);
        self.draw_result(frame, columns[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Form(form) = &self.mode {
            self.draw_form(frame, area, form);
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Action::ALL
            .iter()
            .enumerate()
            .map(|(idx, action)| ListItem::new(format!("{:>2}. {}", idx + 1, action.label())))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("University Records").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.result.title.clone())
            .borders(Borders::ALL);
        let paragraph = Paragraph::new(self.result.lines.clone())
            .block(block)
            .scroll((self.result.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Run   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Scroll results   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::Form(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &ActionForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.action.label())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.values.len())
            .map(|idx| form.build_line(idx))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Dates use YYYY-MM-DD • Enter to submit • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn current_action(&self) -> Action {
        Action::ALL[self.selected]
    }

    fn move_selection(&mut self, offset: isize) {
        let len = Action::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Student, Teacher};

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn select(app: &mut App, action: Action) {
        app.selected = Action::ALL
            .iter()
            .position(|candidate| *candidate == action)
            .unwrap();
    }

    #[test]
    fn form_submission_creates_record() {
        let mut app = App::new(RecordStore::open_in_memory().unwrap());
        select(&mut app, Action::AddTeacher);
        assert!(!app.handle_key(KeyCode::Enter));
        type_text(&mut app, "Ana");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Lee");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "CS");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        let teachers = app.store.list::<Teacher>().unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].department, "CS");
    }

    #[test]
    fn invalid_date_keeps_form_open() {
        let mut app = App::new(RecordStore::open_in_memory().unwrap());
        select(&mut app, Action::AddStudent);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "Tom");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Roe");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "CS");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "2000-13-01");
        assert!(!app.handle_key(KeyCode::Enter));

        match &app.mode {
            Mode::Form(form) => assert!(form.error.is_some()),
            Mode::Normal => panic!("form should stay open"),
        }
        assert!(app.store.list::<Student>().unwrap().is_empty());
    }

    #[test]
    fn failed_action_does_not_end_session() {
        let mut app = App::new(RecordStore::open_in_memory().unwrap());
        select(&mut app, Action::AddGrade);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "50");
        assert!(!app.handle_key(KeyCode::Enter));
        let footer = app.failure().map(str::to_string);
        assert!(footer.is_some());
        match &app.mode {
            Mode::Form(form) => assert_eq!(form.error, footer),
            Mode::Normal => panic!("form should stay open"),
        }

        app.handle_key(KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
        select(&mut app, Action::Quit);
        assert!(app.handle_key(KeyCode::Enter));
    }

    #[test]
    fn menu_selection_wraps() {
        let mut app = App::new(RecordStore::open_in_memory().unwrap());
        app.handle_key(KeyCode::Up);
        assert_eq!(app.current_action(), Action::Quit);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.current_action(), Action::AddStudent);
    }
}
