//! CLI command implementations.

pub mod import;
pub mod info;
pub mod install;
pub mod interactive;
pub mod list;
pub mod reviews;
pub mod search;

use crate::model::StoredListing;
use crate::store::{CatalogStore, ListFilter, Sort};
use anyhow::{bail, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// Known per-client skill directories.
pub const CLIENT_SKILL_DIRS: &[(&str, &str)] = &[
    ("claude-code", "~/.claude/skills"),
    ("cursor", "~/.cursor/rules"),
    ("windsurf", "~/.windsurf/workflows"),
    ("continue", "~/.continue/rules"),
];

/// Expanded skill directory for a client, if it is one we know.
pub fn client_skill_dir(client: &str) -> Option<PathBuf> {
    CLIENT_SKILL_DIRS
        .iter()
        .find(|(slug, _)| *slug == client)
        .map(|(_, dir)| PathBuf::from(shellexpand::tilde(dir).as_ref()))
}

/// Shared flags for the read commands.
#[derive(Debug, Clone)]
pub struct QueryOpts {
    pub json: bool,
    pub category: Option<String>,
    pub artifact_type: Option<String>,
    pub featured: bool,
    pub sort: String,
    pub limit: usize,
}

/// Resolve CLI filter flags against the catalog. An explicitly requested
/// category that does not exist is fatal.
pub fn resolve_filter(store: &CatalogStore, opts: &QueryOpts) -> Result<ListFilter> {
    let category_id = match &opts.category {
        Some(slug) => match store.category_by_slug(slug)? {
            Some(category) => Some(category.id),
            None => bail!(
                "Unknown category '{}'. Categories are a fixed taxonomy; check the site for valid slugs.",
                slug
            ),
        },
        None => None,
    };
    let artifact_type = match &opts.artifact_type {
        Some(s) => Some(s.parse().map_err(anyhow::Error::msg)?),
        None => None,
    };
    Ok(ListFilter {
        category_id,
        artifact_type,
        featured: opts.featured,
        sort: Some(Sort::parse(&opts.sort)?),
        limit: opts.limit,
    })
}

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Type")]
    artifact: String,
    #[tabled(rename = "Stars")]
    stars: i64,
    #[tabled(rename = "Installs")]
    installs: i64,
}

pub fn print_listing_table(listings: &[StoredListing]) {
    let rows: Vec<ListingRow> = listings
        .iter()
        .map(|l| ListingRow {
            name: l.name.clone(),
            slug: l.slug.clone(),
            artifact: l.artifact_type.label().to_string(),
            stars: l.stars,
            installs: l.installs,
        })
        .collect();
    println!("{}", Table::new(&rows));
}

/// Print a handled error and exit 1, honoring the `--json` contract.
pub fn fail(json: bool, err: &anyhow::Error) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": err.to_string() }));
    } else {
        eprintln!("{} {}", "✗".red().bold(), err);
    }
    std::process::exit(1);
}

/// y/N confirmation on stdin.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
