use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::StoreError;

/// Build the segmented selector: one padded cell per filter key, with the
/// active cell filled in the current tint.
pub(crate) fn segment_line(keys: &[String], selected: usize, tint: Color) -> Line<'static> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (idx, key) in keys.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("|", Style::default().fg(Color::DarkGray)));
        }
        let cell = format!(" {key} ");
        if idx == selected {
            spans.push(Span::styled(
                cell,
                Style::default()
                    .fg(Color::Black)
                    .bg(tint)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(cell, Style::default().fg(tint)));
        }
    }
    Line::from(spans)
}

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

/// Footer text for a store error. Validation messages are already phrased for
/// the user; storage failures get a prefix so they read as a failed save.
pub(crate) fn surface_error(err: &StoreError) -> String {
    match err {
        StoreError::Validation(validation) => {
            let message = validation.to_string();
            let mut chars = message.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => message,
            }
        }
        StoreError::Io(inner) => format!("Could not save: {inner}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ValidationError, ValidationProblem};

    #[test]
    fn active_segment_is_highlighted() {
        let keys = vec!["R".to_string(), "O".to_string(), "Y".to_string()];
        let line = segment_line(&keys, 1, Color::Red);

        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, " R | O | Y ");
        assert_eq!(line.spans[2].style.bg, Some(Color::Red));
        assert_eq!(line.spans[0].style.bg, None);
    }

    #[test]
    fn validation_errors_read_as_sentences() {
        let err = StoreError::from(ValidationError::new(
            "rating",
            ValidationProblem::TooSmall { min: 0.0 },
        ));
        assert_eq!(surface_error(&err), "Rating must be at least 0.");
    }
}
