use std::mem;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{error, warn};

use crate::controller::{FilterOutcome, SelectionController};
use crate::error::StoreError;
use crate::view::BowtieView;

use super::forms::{RatingForm, RATING_PREFIX};
use super::helpers::{centered_rect, segment_line, surface_error};

/// Height of the segmented selector strip.
const SEGMENT_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Marker shown on the card when the bow tie is a favorite.
const FAVORITE_MARKER: &str = "* Favorite *";

/// Modes layered on top of the single record screen.
enum Mode {
    Normal,
    Rating(RatingForm),
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

/// Central application state for the bow tie screen.
pub struct App {
    conn: Connection,
    keys: Vec<String>,
    selected: usize,
    controller: SelectionController,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app around an opened store and select the first segment.
    pub fn new(conn: Connection, keys: Vec<String>) -> Self {
        let mut app = Self {
            conn,
            keys,
            selected: 0,
            controller: SelectionController::new(),
            mode: Mode::Normal,
            status: None,
        };

        if app.keys.is_empty() {
            app.set_status("The store holds no bow ties.", StatusKind::Error);
        } else {
            app.select_segment(0);
        }
        app
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Rating(form) => self.handle_rating(code, form),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Left | KeyCode::BackTab => self.move_segment(-1),
            KeyCode::Right | KeyCode::Tab => self.move_segment(1),
            KeyCode::Char(ch @ '1'..='9') => {
                let idx = ch as usize - '1' as usize;
                if idx < self.keys.len() {
                    self.select_segment(idx);
                }
            }
            KeyCode::Char('w') => self.wear(),
            KeyCode::Char('f') => self.toggle_favorite(),
            KeyCode::Char('r') => {
                if self.controller.current().is_some() {
                    self.clear_status();
                    return Mode::Rating(RatingForm::default());
                }
                self.set_status("No bow tie selected.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_rating(&mut self, code: KeyCode, mut form: RatingForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Rating cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => return self.submit_rating(form),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Rating(form)
    }

    /// Save the typed rating. Validation failures re-open the prompt; any
    /// other failure closes it and leaves the card as it was.
    fn submit_rating(&mut self, form: RatingForm) -> Mode {
        match self.controller.rate(&self.conn, &form.value) {
            Ok(bowtie) => {
                let message = format!("Rated {bowtie} {:.1}/5.", bowtie.rating);
                self.set_status(message, StatusKind::Info);
                Mode::Normal
            }
            Err(err) if err.is_validation() => {
                warn!(input = %form.value, "rejected rating: {err}");
                let message = surface_error(&err);
                self.set_status(message.clone(), StatusKind::Error);
                Mode::Rating(RatingForm::reprompt(message))
            }
            Err(err) => {
                self.report_failure("save rating", &err);
                Mode::Normal
            }
        }
    }

    fn wear(&mut self) {
        match self.controller.wear(&self.conn, Utc::now()) {
            Ok(bowtie) => {
                let message = format!("Wore {bowtie} ({} times).", bowtie.times_worn);
                self.set_status(message, StatusKind::Info);
            }
            Err(err) => self.report_failure("record wear", &err),
        }
    }

    fn toggle_favorite(&mut self) {
        match self.controller.toggle_favorite(&self.conn) {
            Ok(bowtie) => {
                let message = if bowtie.is_favorite {
                    format!("Marked {bowtie} as a favorite.")
                } else {
                    format!("Removed {bowtie} from favorites.")
                };
                self.set_status(message, StatusKind::Info);
            }
            Err(err) => self.report_failure("update favorite", &err),
        }
    }

    fn move_segment(&mut self, offset: isize) {
        let len = self.keys.len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + offset).rem_euclid(len as isize) as usize;
        self.select_segment(next);
    }

    fn select_segment(&mut self, idx: usize) {
        let Some(key) = self.keys.get(idx).cloned() else {
            return;
        };
        match self.controller.set_filter(&self.conn, &key) {
            Ok(FilterOutcome::Selected) => {
                self.selected = idx;
                self.clear_status();
            }
            Ok(FilterOutcome::NoMatch) => {
                self.set_status(format!("No bow tie for filter {key}."), StatusKind::Error);
            }
            Err(err) => self.report_failure("load bow tie", &err),
        }
    }

    fn report_failure(&mut self, action: &str, err: &StoreError) {
        error!(action, "store operation failed: {err}");
        self.set_status(surface_error(err), StatusKind::Error);
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

    fn tint(&self) -> Color {
        self.controller
            .current()
            .map(|bowtie| bowtie.tint_color.to_color())
            .unwrap_or(Color::Gray)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEGMENT_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_segments(frame, chunks[0]);
        self.draw_card(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Mode::Rating(form) = &self.mode {
            self.draw_rating_form(frame, area, form);
        }
    }

    fn draw_segments(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Filter");
        let paragraph = Paragraph::new(segment_line(&self.keys, self.selected, self.tint()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_card(&self, frame: &mut Frame, area: Rect) {
        let Some(bowtie) = self.controller.current() else {
            let placeholder = Paragraph::new("No bow tie to show.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(placeholder, area);
            return;
        };

        let view = BowtieView::from(bowtie);
        let tint_style = Style::default().fg(view.tint);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(tint_style)
            .title(Span::styled(
                view.name.clone(),
                tint_style.add_modifier(Modifier::BOLD),
            ));

        let mut lines: Vec<Line> = view
            .photo_lines
            .iter()
            .map(|row| Line::from(Span::styled(row.clone(), tint_style)))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            view.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(view.rating_label));
        lines.push(Line::from(view.times_worn_label));
        lines.push(Line::from(view.last_worn_label));
        if view.favorite_visible {
            lines.push(Line::from(Span::styled(
                FAVORITE_MARKER,
                tint_style.add_modifier(Modifier::BOLD),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
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

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match self.mode {
            Mode::Rating(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[←→]", key_style),
                Span::raw(" Filter   "),
                Span::styled("[W]", key_style),
                Span::raw(" Wear   "),
                Span::styled("[R]", key_style),
                Span::raw(" Rate   "),
                Span::styled("[F]", key_style),
                Span::raw(" Favorite   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_rating_form(&self, frame: &mut Frame, area: Rect, form: &RatingForm) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("New Rating").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Rate this bow tie. Enter to save, Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + RATING_PREFIX.len() as u16 + form.value_len() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}
