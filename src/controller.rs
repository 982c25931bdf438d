//! Selection state plus the handlers that mutate the selected bow tie.
//!
//! Every mutation works on a copy of the current record: the copy is saved
//! first and only adopted once the store accepted it, so a failed save leaves
//! the displayed record exactly as it was.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::{find_by_search_key, save_bowtie};
use crate::error::{StoreError, ValidationError, ValidationProblem};
use crate::models::Bowtie;

/// Result of switching the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Selected,
    /// No bow tie carries the key; the previous selection is kept.
    NoMatch,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    search_key: Option<String>,
    current: Option<Bowtie>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_key(&self) -> Option<&str> {
        self.search_key.as_deref()
    }

    pub fn current(&self) -> Option<&Bowtie> {
        self.current.as_ref()
    }

    /// Resolve the first bow tie for `key` and make it current.
    pub fn set_filter(&mut self, conn: &Connection, key: &str) -> Result<FilterOutcome, StoreError> {
        match find_by_search_key(conn, key)? {
            Some(bowtie) => {
                info!(key, id = bowtie.id, "selected bow tie");
                self.search_key = Some(key.to_string());
                self.current = Some(bowtie);
                Ok(FilterOutcome::Selected)
            }
            None => {
                warn!(key, "no bow tie matches filter");
                Ok(FilterOutcome::NoMatch)
            }
        }
    }

    /// Record another wear of the current bow tie at `now`.
    pub fn wear(&mut self, conn: &Connection, now: DateTime<Utc>) -> Result<&Bowtie, StoreError> {
        let mut updated = self.current.clone().ok_or(StoreError::NoSelection)?;
        updated.times_worn += 1;
        updated.last_worn = Some(now);
        self.commit(conn, updated)
    }

    /// Parse `input` and store it as the current bow tie's rating. A
    /// `StoreError::Validation` means the user should be asked again.
    pub fn rate(&mut self, conn: &Connection, input: &str) -> Result<&Bowtie, StoreError> {
        let mut updated = self.current.clone().ok_or(StoreError::NoSelection)?;
        updated.rating = parse_rating(input)?;
        self.commit(conn, updated)
    }

    pub fn toggle_favorite(&mut self, conn: &Connection) -> Result<&Bowtie, StoreError> {
        let mut updated = self.current.clone().ok_or(StoreError::NoSelection)?;
        updated.is_favorite = !updated.is_favorite;
        self.commit(conn, updated)
    }

    fn commit(&mut self, conn: &Connection, updated: Bowtie) -> Result<&Bowtie, StoreError> {
        save_bowtie(conn, &updated)?;
        info!(
            id = updated.id,
            rating = updated.rating,
            times_worn = updated.times_worn,
            "updated bow tie"
        );
        let current: &Bowtie = self.current.insert(updated);
        Ok(current)
    }
}

/// Numeric parse step for the rating prompt. Range checks happen in the store.
pub fn parse_rating(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        // `-0` parses to negative zero, which is in range but prints with a sign.
        .map(|value| value + 0.0)
        .ok_or_else(|| {
            ValidationError::new(
                "rating",
                ValidationProblem::NotANumber {
                    input: trimmed.to_string(),
                },
            )
        })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::{fetch_bowtie, open_in_memory};
    use crate::seed::seed_if_empty;
    use crate::view::BowtieView;

    fn seeded() -> (Connection, SelectionController) {
        let conn = open_in_memory().unwrap();
        seed_if_empty(&conn).unwrap();
        let mut controller = SelectionController::new();
        assert_eq!(
            controller.set_filter(&conn, "R").unwrap(),
            FilterOutcome::Selected
        );
        (conn, controller)
    }

    #[test]
    fn set_filter_switches_current_record() {
        let (conn, mut controller) = seeded();
        controller.set_filter(&conn, "B").unwrap();

        assert_eq!(controller.search_key(), Some("B"));
        assert_eq!(controller.current().unwrap().search_key, "B");
    }

    #[test]
    fn unmatched_filter_keeps_previous_selection() {
        let (conn, mut controller) = seeded();
        let before = controller.current().cloned();

        assert_eq!(
            controller.set_filter(&conn, "Z").unwrap(),
            FilterOutcome::NoMatch
        );
        assert_eq!(controller.search_key(), Some("R"));
        assert_eq!(controller.current().cloned(), before);
    }

    #[test]
    fn wear_increments_count_and_stamps_time() {
        let (conn, mut controller) = seeded();
        let before = controller.current().unwrap().times_worn;
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();

        let id = controller.wear(&conn, now).unwrap().id;

        let stored = fetch_bowtie(&conn, id).unwrap();
        assert_eq!(stored.times_worn, before + 1);
        assert_eq!(stored.last_worn, Some(now));
        assert_eq!(controller.current(), Some(&stored));
    }

    #[test]
    fn rate_in_range_is_stored() {
        let (conn, mut controller) = seeded();
        let id = controller.rate(&conn, " 3.5 ").unwrap().id;

        assert_eq!(fetch_bowtie(&conn, id).unwrap().rating, 3.5);
        assert_eq!(controller.current().unwrap().rating, 3.5);
    }

    #[test]
    fn rate_out_of_range_preserves_prior_rating() {
        let (conn, mut controller) = seeded();
        let prior = controller.current().unwrap().rating;
        let id = controller.current().unwrap().id;

        let err = controller.rate(&conn, "9").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(controller.current().unwrap().rating, prior);
        assert_eq!(fetch_bowtie(&conn, id).unwrap().rating, prior);
    }

    #[test]
    fn rate_rejects_non_numeric_input() {
        let (conn, mut controller) = seeded();
        let err = controller.rate(&conn, "abc").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError {
                problem: ValidationProblem::NotANumber { .. },
                ..
            })
        ));
        assert!(parse_rating("inf").is_err());
        assert!(parse_rating("").is_err());
    }

    #[test]
    fn negative_zero_rating_is_stored_as_zero() {
        let (conn, mut controller) = seeded();
        let value = parse_rating("-0").unwrap();
        assert!(value.is_sign_positive());

        let id = controller.rate(&conn, "-0").unwrap().id;
        let stored = fetch_bowtie(&conn, id).unwrap();
        assert!(stored.rating.is_sign_positive());
        assert_eq!(BowtieView::from(&stored).rating_label, "Rating: 0.0/5");
    }

    #[test]
    fn toggle_favorite_persists() {
        let (conn, mut controller) = seeded();
        let was = controller.current().unwrap().is_favorite;
        let id = controller.toggle_favorite(&conn).unwrap().id;
        assert_eq!(fetch_bowtie(&conn, id).unwrap().is_favorite, !was);
    }

    #[test]
    fn mutations_without_selection_fail() {
        let conn = open_in_memory().unwrap();
        let mut controller = SelectionController::new();
        assert!(matches!(
            controller.wear(&conn, Utc::now()),
            Err(StoreError::NoSelection)
        ));
        assert!(matches!(
            controller.rate(&conn, "2"),
            Err(StoreError::NoSelection)
        ));
    }

    #[test]
    fn failed_save_leaves_selection_untouched() {
        let (conn, mut controller) = seeded();
        let before = controller.current().cloned();
        conn.execute("DROP TABLE bowties", []).unwrap();

        let err = controller.wear(&conn, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(controller.current().cloned(), before);
    }
}
