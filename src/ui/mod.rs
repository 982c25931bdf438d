//! Ratatui front-end: a filter strip, the record card, a footer, and the
//! rating prompt drawn on top when it is open.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
