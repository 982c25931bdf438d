//! Bundled sample data and the one-time seeding step run at startup.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

use crate::db::{count_all, insert_bowtie};
use crate::models::{NewBowtie, TintColor};

/// Dataset compiled into the binary.
const SAMPLE_DATA: &str = include_str!("../assets/sample_data.json");

/// Pictures referenced by `imageName` in the dataset.
const PHOTOS: &[(&str, &[u8])] = &[
    ("crimson", include_bytes!("../assets/photos/crimson.txt")),
    ("tangerine", include_bytes!("../assets/photos/tangerine.txt")),
    ("sunflower", include_bytes!("../assets/photos/sunflower.txt")),
    ("emerald", include_bytes!("../assets/photos/emerald.txt")),
    ("midnight", include_bytes!("../assets/photos/midnight.txt")),
    ("plum", include_bytes!("../assets/photos/plum.txt")),
];

/// One entry of the sample dataset, as written in the JSON file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleEntry {
    pub name: String,
    pub search_key: String,
    pub rating: f64,
    pub tint_color: TintColor,
    pub image_name: String,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_worn: i64,
    #[serde(default)]
    pub is_favorite: bool,
}

impl SampleEntry {
    fn into_new_bowtie(self) -> Result<NewBowtie> {
        let photo = PHOTOS
            .iter()
            .find(|(name, _)| *name == self.image_name)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| anyhow!("unknown sample image \"{}\"", self.image_name))?;

        Ok(NewBowtie {
            name: self.name,
            search_key: self.search_key,
            rating: self.rating,
            times_worn: self.times_worn,
            last_worn: self.last_worn,
            is_favorite: self.is_favorite,
            tint_color: self.tint_color,
            photo_data: photo,
        })
    }
}

/// Parse a dataset in the bundled JSON layout.
pub fn parse_sample_data(json: &str) -> Result<Vec<SampleEntry>> {
    serde_json::from_str(json).context("failed to parse sample data")
}

/// Populate an empty store from the bundled dataset. Returns how many bow ties
/// were inserted, which is zero whenever the store already holds records.
pub fn seed_if_empty(conn: &Connection) -> Result<usize> {
    seed_from_json(conn, SAMPLE_DATA)
}

/// Seeding entry point shared with tests so alternative datasets can be fed
/// through the same checks.
pub fn seed_from_json(conn: &Connection, json: &str) -> Result<usize> {
    let existing = count_all(conn).context("failed to count bow ties")?;
    if existing > 0 {
        info!(existing, "store already seeded");
        return Ok(0);
    }

    let bowties = parse_sample_data(json)?
        .into_iter()
        .map(SampleEntry::into_new_bowtie)
        .collect::<Result<Vec<_>>>()?;

    let tx = conn
        .unchecked_transaction()
        .context("failed to start seeding transaction")?;
    for bowtie in &bowties {
        insert_bowtie(&tx, bowtie)
            .with_context(|| format!("failed to insert sample bow tie \"{}\"", bowtie.name))?;
    }
    tx.commit().context("failed to commit sample data")?;

    info!(inserted = bowties.len(), "seeded sample bow ties");
    Ok(bowties.len())
}
