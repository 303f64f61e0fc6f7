//! CLI command implementations

pub mod exit;
pub mod rates;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use ratesync_core::config::Config;

/// Get the ratesync directory from environment or default
pub fn get_ratesync_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RATESYNC_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".ratesync"))
        .context("Could not find home directory; set RATESYNC_DIR")
}

/// Load config from an explicit file or the ratesync directory
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_file(path),
        None => Config::load(&get_ratesync_dir()?),
    }
}

/// Requested date, or today in local time
pub fn as_of(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
