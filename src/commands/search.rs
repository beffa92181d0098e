//! Search published listings.

use super::{fail, print_listing_table, resolve_filter, QueryOpts};
use crate::config::Config;
use crate::store::CatalogStore;
use anyhow::Result;
use colored::Colorize;

pub fn run(query: &str, opts: &QueryOpts) -> Result<()> {
    let listings = match fetch(query, opts) {
        Ok(listings) => listings,
        Err(e) => fail(opts.json, &e),
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("{} No skills matched '{}'.", "!".yellow().bold(), query);
        println!("  Try a broader query, or browse with 'mdskills list'.");
        return Ok(());
    }

    println!(
        "{} {} result{} for '{}'",
        "→".blue().bold(),
        listings.len(),
        if listings.len() == 1 { "" } else { "s" },
        query
    );
    println!();
    print_listing_table(&listings);
    Ok(())
}

fn fetch(query: &str, opts: &QueryOpts) -> Result<Vec<crate::model::StoredListing>> {
    let cfg = Config::from_env()?;
    let store = CatalogStore::reader(&cfg)?;
    let filter = resolve_filter(&store, opts)?;
    store.search(query, &filter)
}
