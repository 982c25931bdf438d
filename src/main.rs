//! Binary entry point: resolve config, start logging, open and seed the store,
//! then drive the Ratatui event loop until the user exits.
use anyhow::Context;
use bow_ties::{fetch_search_keys, logging, open_store, run_app, seed_if_empty, App, AppConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(&config.log_path)?;
    info!(data_dir = %config.data_dir.display(), "starting bow ties");

    let conn = open_store(&config.db_path)?;
    seed_if_empty(&conn)?;
    let keys = fetch_search_keys(&conn).context("failed to load filter keys")?;

    let mut app = App::new(conn, keys);
    run_app(&mut app)
}
