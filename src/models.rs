//! Domain models that mirror the SQLite schema and get passed between the
//! store, the selection controller and the TUI. They stay plain data holders
//! so the other layers can focus on persistence and presentation.

use std::fmt;

use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::Deserialize;

/// Lowest rating the store accepts.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating the store accepts.
pub const MAX_RATING: f64 = 5.0;

/// RGB tint stored alongside each bow tie and applied to the card chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TintColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl TintColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Terminal color used when drawing borders and the active segment.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.red, self.green, self.blue)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One bow tie as persisted in the `bowties` table.
pub struct Bowtie {
    /// Primary key from the database. Saves are addressed by it.
    pub id: i64,
    pub name: String,
    /// Filter key used by the segmented selector. Never changes after insert.
    pub search_key: String,
    /// Rating in `MIN_RATING..=MAX_RATING`; the store rejects anything else.
    pub rating: f64,
    pub times_worn: i64,
    pub last_worn: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub tint_color: TintColor,
    /// Raw picture bytes. The bundled pictures are ASCII art.
    pub photo_data: Vec<u8>,
}

impl fmt::Display for Bowtie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Field values for a bow tie that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBowtie {
    pub name: String,
    pub search_key: String,
    pub rating: f64,
    pub times_worn: i64,
    pub last_worn: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub tint_color: TintColor,
    pub photo_data: Vec<u8>,
}

impl NewBowtie {
    /// Attach the row id handed out by SQLite.
    pub fn into_bowtie(self, id: i64) -> Bowtie {
        Bowtie {
            id,
            name: self.name,
            search_key: self.search_key,
            rating: self.rating,
            times_worn: self.times_worn,
            last_worn: self.last_worn,
            is_favorite: self.is_favorite,
            tint_color: self.tint_color,
            photo_data: self.photo_data,
        }
    }
}
