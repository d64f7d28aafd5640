use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::db::{self, Country, Item, ItemStore};
use crate::fetch::PageSource;
use crate::parser;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    /// Re-read every written item by key after the write phase.
    pub read_back: bool,
}

/// Outcome of one complete run. Also the Lambda response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub scraped: usize,
    pub written: usize,
    pub read: usize,
    /// Reads that succeeded but found no item. Informational only.
    pub missing: usize,
    pub write_secs: f64,
    pub read_secs: Option<f64>,
}

/// Fetch → extract → write all → optionally read all back. Stops at the first error.
pub async fn run<P, S>(source: &P, store: &S, opts: &RunOptions) -> Result<RunSummary>
where
    P: PageSource,
    S: ItemStore,
{
    info!("Handler Start");

    info!("Scraping Start");
    let html = source
        .fetch(&opts.url)
        .await
        .context("visiting target url")?;
    let countries = parser::extract_countries(&html);
    info!(count = countries.len(), "Scraping Complete");

    let items = countries
        .iter()
        .map(db::country_item)
        .collect::<Result<Vec<_>>>()
        .context("marshalling country into item")?;
    let write_secs = write_all(store, items).await?;

    let mut summary = RunSummary {
        scraped: countries.len(),
        written: countries.len(),
        read: 0,
        missing: 0,
        write_secs,
        read_secs: None,
    };

    if opts.read_back {
        let keys = countries
            .iter()
            .map(|c| db::country_key(&c.name))
            .collect::<Result<Vec<_>>>()
            .context("marshalling country name into key")?;
        let (missing, read_secs) = read_all(store, keys, &countries).await?;
        summary.read = countries.len();
        summary.missing = missing;
        summary.read_secs = Some(read_secs);
    }

    Ok(summary)
}

async fn write_all<S: ItemStore>(store: &S, items: Vec<Item>) -> Result<f64> {
    info!("Database Writes Start");
    let start = Instant::now();

    for (i, item) in items.into_iter().enumerate() {
        info!("Writing Item {}", i);
        store
            .put_item(item)
            .await
            .with_context(|| format!("writing item {}", i))?;
    }

    let secs = start.elapsed().as_secs_f64();
    info!("Database Writes Complete");
    info!("{}", took("Database writing", secs));
    Ok(secs)
}

/// Returns (keys with no stored item, elapsed seconds).
async fn read_all<S: ItemStore>(
    store: &S,
    keys: Vec<Item>,
    countries: &[Country],
) -> Result<(usize, f64)> {
    info!("Database Reads Start");
    let start = Instant::now();
    let mut missing = 0;

    for (i, key) in keys.into_iter().enumerate() {
        info!("Reading Item {}", i);
        let found = store
            .get_item(key)
            .await
            .with_context(|| format!("reading item {}", i))?;
        // Absence is not an error here; only the call itself can fail the run.
        if found.is_none() {
            missing += 1;
            warn!(name = %countries[i].name, "Item {} not found on read-back", i);
        }
    }

    let secs = start.elapsed().as_secs_f64();
    info!("Database Reads Complete");
    info!("{}", took("Database reading", secs));
    Ok((missing, secs))
}

/// Shared wording for every elapsed-time log line.
pub fn took(what: &str, secs: f64) -> String {
    format!("{} took: {:.6} seconds", what, secs)
}
