//! Ratatui front-end: an action menu on the left, the latest result on the
//! right, and a popup form for collecting arguments.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
