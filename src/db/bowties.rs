use rusqlite::ffi::SQLITE_CONSTRAINT_CHECK;
use rusqlite::{params, Connection, Error as SqlError, OptionalExtension, Row};
use tracing::debug;

use crate::error::{StoreError, ValidationError, ValidationProblem};
use crate::models::{Bowtie, NewBowtie, TintColor, MAX_RATING, MIN_RATING};

const SELECT_COLUMNS: &str = "SELECT id, name, search_key, rating, times_worn, last_worn,
        is_favorite, tint_red, tint_green, tint_blue, photo_data
     FROM bowties";

fn bowtie_from_row(row: &Row<'_>) -> rusqlite::Result<Bowtie> {
    Ok(Bowtie {
        id: row.get(0)?,
        name: row.get(1)?,
        search_key: row.get(2)?,
        rating: row.get(3)?,
        times_worn: row.get(4)?,
        last_worn: row.get(5)?,
        is_favorite: row.get(6)?,
        tint_color: TintColor::new(row.get(7)?, row.get(8)?, row.get(9)?),
        photo_data: row.get(10)?,
    })
}

/// First bow tie (in insertion order) carrying `key`, if any.
pub fn find_by_search_key(conn: &Connection, key: &str) -> Result<Option<Bowtie>, StoreError> {
    let bowtie = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE search_key = ?1 ORDER BY id LIMIT 1"),
            params![key],
            bowtie_from_row,
        )
        .optional()?;
    Ok(bowtie)
}

/// Load a single bow tie by primary key.
pub fn fetch_bowtie(conn: &Connection, id: i64) -> Result<Bowtie, StoreError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        bowtie_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound { id })
}

pub fn count_all(conn: &Connection) -> Result<i64, StoreError> {
    let count = conn.query_row("SELECT COUNT(*) FROM bowties", [], |row| row.get(0))?;
    Ok(count)
}

/// Distinct filter keys ordered by the first bow tie that introduced them.
/// This is what the segmented selector shows, so every tab has a record.
pub fn fetch_search_keys(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT search_key FROM bowties
         GROUP BY search_key
         ORDER BY MIN(id)",
    )?;

    let keys = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(keys)
}

/// Insert a new bow tie and hand back the hydrated record.
pub fn insert_bowtie(conn: &Connection, bowtie: &NewBowtie) -> Result<Bowtie, StoreError> {
    validate_rating(bowtie.rating)?;
    validate_times_worn(bowtie.times_worn)?;

    conn.execute(
        "INSERT INTO bowties (
            name, search_key, rating, times_worn, last_worn, is_favorite,
            tint_red, tint_green, tint_blue, photo_data
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            bowtie.name,
            bowtie.search_key,
            bowtie.rating,
            bowtie.times_worn,
            bowtie.last_worn,
            bowtie.is_favorite,
            bowtie.tint_color.red,
            bowtie.tint_color.green,
            bowtie.tint_color.blue,
            bowtie.photo_data,
        ],
    )
    .map_err(map_check_constraint)?;

    let id = conn.last_insert_rowid();
    Ok(bowtie.clone().into_bowtie(id))
}

/// Persist the mutable fields of an existing bow tie. Name, filter key, tint
/// and photo are fixed once seeded, so they are not written back.
pub fn save_bowtie(conn: &Connection, bowtie: &Bowtie) -> Result<(), StoreError> {
    validate_rating(bowtie.rating)?;
    validate_times_worn(bowtie.times_worn)?;

    let updated = conn
        .execute(
            "UPDATE bowties
             SET rating = ?1, times_worn = ?2, last_worn = ?3, is_favorite = ?4
             WHERE id = ?5",
            params![
                bowtie.rating,
                bowtie.times_worn,
                bowtie.last_worn,
                bowtie.is_favorite,
                bowtie.id
            ],
        )
        .map_err(map_check_constraint)?;

    if updated == 0 {
        return Err(StoreError::NotFound { id: bowtie.id });
    }

    debug!(id = bowtie.id, "saved bow tie");
    Ok(())
}

/// Range check applied to every rating before it reaches SQLite.
pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if !rating.is_finite() {
        return Err(ValidationError::new(
            "rating",
            ValidationProblem::NotANumber {
                input: rating.to_string(),
            },
        ));
    }
    if rating < MIN_RATING {
        return Err(ValidationError::new(
            "rating",
            ValidationProblem::TooSmall { min: MIN_RATING },
        ));
    }
    if rating > MAX_RATING {
        return Err(ValidationError::new(
            "rating",
            ValidationProblem::TooLarge { max: MAX_RATING },
        ));
    }
    Ok(())
}

fn validate_times_worn(times_worn: i64) -> Result<(), ValidationError> {
    if times_worn < 0 {
        Err(ValidationError::new(
            "times worn",
            ValidationProblem::TooSmall { min: 0.0 },
        ))
    } else {
        Ok(())
    }
}

/// Turn a CHECK constraint failure into a validation error so callers can
/// re-prompt instead of abandoning the save. Other constraint failures
/// (NOT NULL, UNIQUE) stay storage errors.
fn map_check_constraint(err: SqlError) -> StoreError {
    let field = match &err {
        SqlError::SqliteFailure(failure, message)
            if failure.extended_code == SQLITE_CONSTRAINT_CHECK =>
        {
            match message {
                Some(text) if text.contains("times_worn") => "times worn",
                _ => "rating",
            }
        }
        _ => return err.into(),
    };
    ValidationError::new(field, ValidationProblem::OutOfRange).into()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::open_in_memory;

    fn sample(name: &str, key: &str) -> NewBowtie {
        NewBowtie {
            name: name.to_string(),
            search_key: key.to_string(),
            rating: 4.0,
            times_worn: 2,
            last_worn: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            is_favorite: false,
            tint_color: TintColor::new(200, 30, 40),
            photo_data: b"><>".to_vec(),
        }
    }

    #[test]
    fn find_returns_first_record_for_key() {
        let conn = open_in_memory().unwrap();
        let first = insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();
        insert_bowtie(&conn, &sample("Scarlet", "R")).unwrap();
        insert_bowtie(&conn, &sample("Navy", "B")).unwrap();

        let found = find_by_search_key(&conn, "R").unwrap().unwrap();
        assert_eq!(found, first);
        assert!(find_by_search_key(&conn, "Z").unwrap().is_none());
    }

    #[test]
    fn counts_and_keys_follow_insertion_order() {
        let conn = open_in_memory().unwrap();
        assert_eq!(count_all(&conn).unwrap(), 0);

        insert_bowtie(&conn, &sample("Navy", "B")).unwrap();
        insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();
        insert_bowtie(&conn, &sample("Cobalt", "B")).unwrap();

        assert_eq!(count_all(&conn).unwrap(), 3);
        assert_eq!(fetch_search_keys(&conn).unwrap(), vec!["B", "R"]);
    }

    #[test]
    fn save_round_trips_mutable_fields() {
        let conn = open_in_memory().unwrap();
        let mut bowtie = insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();

        bowtie.rating = 2.5;
        bowtie.times_worn = 3;
        bowtie.last_worn = Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        bowtie.is_favorite = true;
        save_bowtie(&conn, &bowtie).unwrap();

        assert_eq!(fetch_bowtie(&conn, bowtie.id).unwrap(), bowtie);
    }

    #[test]
    fn save_rejects_out_of_range_rating_as_validation() {
        let conn = open_in_memory().unwrap();
        let mut bowtie = insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();

        bowtie.rating = 9.0;
        let err = save_bowtie(&conn, &bowtie).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError {
                problem: ValidationProblem::TooLarge { .. },
                ..
            })
        ));

        bowtie.rating = -1.0;
        let err = save_bowtie(&conn, &bowtie).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError {
                problem: ValidationProblem::TooSmall { .. },
                ..
            })
        ));

        assert_eq!(fetch_bowtie(&conn, bowtie.id).unwrap().rating, 4.0);
    }

    #[test]
    fn check_constraint_maps_to_validation() {
        let conn = open_in_memory().unwrap();
        let bowtie = insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();

        let err = conn
            .execute(
                "UPDATE bowties SET rating = 7 WHERE id = ?1",
                params![bowtie.id],
            )
            .map_err(map_check_constraint)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn other_constraint_failures_stay_storage_errors() {
        let conn = open_in_memory().unwrap();
        let bowtie = insert_bowtie(&conn, &sample("Crimson", "R")).unwrap();

        let err = conn
            .execute(
                "UPDATE bowties SET name = NULL WHERE id = ?1",
                params![bowtie.id],
            )
            .map_err(map_check_constraint)
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn save_of_unknown_row_is_not_found() {
        let conn = open_in_memory().unwrap();
        let ghost = sample("Ghost", "G").into_bowtie(42);
        assert!(matches!(
            save_bowtie(&conn, &ghost),
            Err(StoreError::NotFound { id: 42 })
        ));
        assert!(matches!(
            fetch_bowtie(&conn, 42),
            Err(StoreError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn nan_rating_is_not_a_number() {
        let err = validate_rating(f64::NAN).unwrap_err();
        assert!(matches!(err.problem, ValidationProblem::NotANumber { .. }));
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(5.0).is_ok());
    }
}
