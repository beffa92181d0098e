//! Browse published listings.

use super::{fail, print_listing_table, resolve_filter, QueryOpts};
use crate::config::Config;
use crate::store::CatalogStore;
use anyhow::Result;
use colored::Colorize;

pub fn run(opts: &QueryOpts) -> Result<()> {
    let listings = match fetch(opts) {
        Ok(listings) => listings,
        Err(e) => fail(opts.json, &e),
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("{} No skills in the catalog match those filters.", "!".yellow().bold());
        return Ok(());
    }

    print_listing_table(&listings);
    println!();
    println!(
        "  {}",
        "mdskills info <slug> for details, mdskills install <owner>/<slug> to install".dimmed()
    );
    Ok(())
}

fn fetch(opts: &QueryOpts) -> Result<Vec<crate::model::StoredListing>> {
    let cfg = Config::from_env()?;
    let store = CatalogStore::reader(&cfg)?;
    let filter = resolve_filter(&store, opts)?;
    store.list(&filter)
}
