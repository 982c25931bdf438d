//! Core library surface for the Bow Ties TUI application.
//!
//! The record logic (store, seeding, selection, projection) is independent of
//! the terminal so it can be driven from tests or other front-ends; `ui` binds
//! it to Ratatui.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod seed;
pub mod ui;
pub mod view;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{count_all, fetch_search_keys, find_by_search_key, open_in_memory, open_store};

pub use config::AppConfig;
pub use controller::{FilterOutcome, SelectionController};
pub use error::{StoreError, ValidationError, ValidationProblem};
pub use models::{Bowtie, NewBowtie, TintColor};
pub use seed::seed_if_empty;
pub use ui::{run_app, App};
pub use view::BowtieView;
