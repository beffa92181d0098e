//! Generate AI reviews for listings via the Anthropic Messages API.
//!
//! Dry-run by default; `--apply` writes the review columns. A malformed
//! model response is discarded and tallied, never retried.

use crate::anthropic;
use crate::config::Config;
use crate::model::StoredListing;
use crate::store::CatalogStore;
use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use std::time::Duration;

const REVIEW_SLEEP: Duration = Duration::from_millis(1000);
const DEFAULT_BATCH: usize = 10;

pub fn run(slug: Option<&str>, all: bool, limit: Option<usize>, apply: bool) -> Result<()> {
    let cfg = Config::from_env()?;
    let api_key = cfg.anthropic_key()?.to_string();
    let store = if apply {
        CatalogStore::writer(&cfg)?
    } else {
        CatalogStore::reader(&cfg)?
    };

    let targets: Vec<StoredListing> = match (slug, all) {
        (Some(slug), _) => vec![store
            .get_by_slug(slug)?
            .ok_or_else(|| anyhow!("Skill '{}' not found", slug))?],
        (None, true) => store.unreviewed(limit.unwrap_or(DEFAULT_BATCH))?,
        (None, false) => bail!("Pass --slug <slug> or --all"),
    };

    if targets.is_empty() {
        println!("{} Nothing to review.", "✓".green().bold());
        return Ok(());
    }

    let mut written = 0usize;
    let mut discarded = 0usize;
    let mut failed = 0usize;
    let total = targets.len();

    for (index, listing) in targets.iter().enumerate() {
        match anthropic::generate_review(&api_key, listing) {
            Ok(Some(review)) => {
                if apply {
                    match store.set_review(listing.id, &review) {
                        Ok(()) => {
                            written += 1;
                            println!(
                                "  {} {} ({:.1}/10)",
                                "✓".green(),
                                listing.slug,
                                review.quality_score
                            );
                        }
                        Err(e) => {
                            failed += 1;
                            println!("  {} {}: {}", "✗".red(), listing.slug, e);
                        }
                    }
                } else {
                    written += 1;
                    println!(
                        "  {} {} ({:.1}/10): {}",
                        "→".blue(),
                        listing.slug,
                        review.quality_score,
                        review.summary.dimmed()
                    );
                }
            }
            Ok(None) => {
                discarded += 1;
                println!(
                    "  {} {}: model response discarded (malformed)",
                    "!".yellow(),
                    listing.slug
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), listing.slug, e);
            }
        }
        if index + 1 < total {
            std::thread::sleep(REVIEW_SLEEP);
        }
    }

    println!();
    println!(
        "{} {} reviewed, {} discarded, {} failed{}",
        if failed == 0 { "✓".green().bold() } else { "!".yellow().bold() },
        written,
        discarded,
        failed,
        if apply { "" } else { " (dry run)" }
    );
    Ok(())
}
