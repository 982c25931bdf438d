//! Persistence module split across logical submodules.

mod bowties;
mod connection;

pub use bowties::{
    count_all, fetch_bowtie, fetch_search_keys, find_by_search_key, insert_bowtie, save_bowtie,
    validate_rating,
};
pub use connection::{ensure_schema, open_in_memory, open_store};
