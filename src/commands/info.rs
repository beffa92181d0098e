//! Show one listing in detail.

use super::fail;
use crate::config::Config;
use crate::model::StoredListing;
use crate::store::CatalogStore;
use anyhow::{anyhow, Result};
use colored::Colorize;

pub fn run(slug: &str, json: bool) -> Result<()> {
    let listing = match fetch(slug) {
        Ok(listing) => listing,
        Err(e) => fail(json, &e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    print_detail(&listing);
    Ok(())
}

fn fetch(slug: &str) -> Result<StoredListing> {
    let cfg = Config::from_env()?;
    let store = CatalogStore::reader(&cfg)?;
    store.get_by_slug(slug)?.ok_or_else(|| {
        anyhow!(
            "Skill '{}' not found. Try 'mdskills search {}'.",
            slug,
            slug
        )
    })
}

fn permission_line(label: &str, granted: bool) -> String {
    if granted {
        format!("  {} {}", "●".yellow(), label)
    } else {
        format!("  {} {}", "○".dimmed(), label.dimmed())
    }
}

fn print_detail(listing: &StoredListing) {
    println!();
    println!("{} {}", listing.name.bold(), format!("({})", listing.slug).dimmed());
    println!("{}", listing.description);
    println!();
    println!("  {}  {}", "Type:".bold(), listing.artifact_type.label());
    println!("  {}  {}", "Format:".bold(), listing.format_standard);
    println!(
        "  {}  ★ {}  ⑂ {}  ↓ {}",
        "Popularity:".bold(),
        listing.stars,
        listing.forks,
        listing.installs
    );
    if !listing.platforms.is_empty() {
        println!("  {}  {}", "Platforms:".bold(), listing.platforms.join(", "));
    }
    if !listing.tags.is_empty() {
        println!("  {}  {}", "Tags:".bold(), listing.tags.join(", "));
    }
    println!("  {}  {}", "Source:".bold(), listing.github_url.cyan());

    println!();
    println!("{}", "Inferred permissions (keyword heuristic, not a guarantee):".bold());
    let p = &listing.permissions;
    println!("{}", permission_line("filesystem read", p.filesystem_read));
    println!("{}", permission_line("filesystem write", p.filesystem_write));
    println!("{}", permission_line("shell execution", p.shell_exec));
    println!("{}", permission_line("network access", p.network_access));
    println!("{}", permission_line("git write", p.git_write));

    if let Some(summary) = &listing.review_summary {
        println!();
        println!(
            "{}{}",
            "Review".bold(),
            listing
                .review_score
                .map(|s| format!(" ({:.1}/10)", s))
                .unwrap_or_default()
        );
        println!("  {}", summary);
        if let Some(strengths) = &listing.review_strengths {
            for s in strengths {
                println!("  {} {}", "+".green(), s);
            }
        }
        if let Some(weaknesses) = &listing.review_weaknesses {
            for w in weaknesses {
                println!("  {} {}", "-".red(), w);
            }
        }
    }
    println!();
    println!(
        "  {}",
        format!("mdskills install {}/{}", listing.owner, listing.slug).cyan()
    );
}
