use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Label shown in front of the rating input; also used for cursor placement.
pub(crate) const RATING_PREFIX: &str = "Rating: ";

/// State of the "New Rating" prompt.
#[derive(Default, Clone)]
pub(crate) struct RatingForm {
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl RatingForm {
    /// Fresh prompt carrying the reason the previous attempt was rejected.
    pub(crate) fn reprompt(error: String) -> Self {
        Self {
            value: String::new(),
            error: Some(error),
        }
    }

    /// Accept characters that can appear in a decimal number.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() || ch == '.' || ch == '-' {
            self.value.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let (display, style) = if self.value.is_empty() {
            ("<0 to 5>".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (self.value.clone(), Style::default().fg(Color::Yellow))
        };

        Line::from(vec![Span::raw(RATING_PREFIX), Span::styled(display, style)])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}
