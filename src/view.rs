//! One-way projection of a bow tie onto the strings and colors the card shows.

use ratatui::style::Color;

use crate::models::Bowtie;

/// Everything the record card needs, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct BowtieView {
    pub name: String,
    pub rating_label: String,
    pub times_worn_label: String,
    pub last_worn_label: String,
    pub favorite_visible: bool,
    pub tint: Color,
    pub photo_lines: Vec<String>,
}

impl From<&Bowtie> for BowtieView {
    fn from(bowtie: &Bowtie) -> Self {
        let last_worn = bowtie
            .last_worn
            .map(|date| date.format("%m/%d/%y").to_string())
            .unwrap_or_else(|| "never".to_string());

        Self {
            name: bowtie.name.clone(),
            rating_label: format!("Rating: {:.1}/5", bowtie.rating),
            times_worn_label: format!("# times worn: {}", bowtie.times_worn),
            last_worn_label: format!("Last worn: {last_worn}"),
            favorite_visible: bowtie.is_favorite,
            tint: bowtie.tint_color.to_color(),
            photo_lines: String::from_utf8_lossy(&bowtie.photo_data)
                .lines()
                .map(str::to_string)
                .collect(),
        }
    }
}
