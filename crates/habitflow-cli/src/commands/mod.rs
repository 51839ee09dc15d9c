//! CLI command modules plus shared store/date helpers.

pub mod config;
pub mod entry;
pub mod habit;
pub mod stats;
pub mod today;

use chrono::{Local, NaiveDate};
use habitflow_core::{parse_date_key, Catalog, JsonStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// The caller's current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional `--date` argument, defaulting to today.
pub fn resolve_date(arg: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match arg {
        Some(s) => Ok(parse_date_key(s)?),
        None => Ok(today()),
    }
}

/// Load the catalog, seeding the defaults on a fresh data directory.
pub fn load_catalog_or_seed(store: &JsonStore) -> Result<Catalog, Box<dyn std::error::Error>> {
    if store.catalog_path().exists() {
        return Ok(store.load_catalog()?);
    }
    let seeded = Catalog::with_defaults(today());
    store.save_catalog(&seeded)?;
    Ok(seeded)
}
