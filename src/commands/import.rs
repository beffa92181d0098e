//! Import a skill from GitHub into the catalog.
//!
//! Default is a dry run that prints the record the pipeline built; `--apply`
//! writes it. `--all` discovers every SKILL.md (and plugin manifest) in the
//! repo via one recursive tree listing and imports them sequentially, with a
//! short sleep between items to stay under the GitHub rate limit.

use crate::config::Config;
use crate::github::{self, GithubClient, RepoRef};
use crate::model::{ArtifactType, Listing};
use crate::pipeline::{self, BuiltImport, Overrides};
use crate::store::CatalogStore;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::time::Duration;

const BATCH_SLEEP: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Default)]
pub struct ImportArgs {
    pub url: String,
    pub apply: bool,
    pub all: bool,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub artifact_type: Option<String>,
    pub limit: Option<usize>,
}

pub fn run(args: &ImportArgs) -> Result<()> {
    let overrides = Overrides {
        slug: args.slug.clone(),
        name: args.name.clone(),
        category: args.category.clone(),
        artifact_type: match &args.artifact_type {
            Some(s) => Some(s.parse::<ArtifactType>().map_err(anyhow::Error::msg)?),
            None => None,
        },
    };

    // URL validation happens before any network call.
    let repo = github::parse_repo_url(&args.url)?;

    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let gh = GithubClient::new(token)?;

    if args.all {
        if overrides.slug.is_some() || overrides.name.is_some() {
            bail!("--slug and --name apply to a single import, not --all");
        }
        run_batch(&gh, &repo, args)
    } else {
        run_single(&gh, &repo, &overrides, args.apply)
    }
}

fn run_single(gh: &GithubClient, repo: &RepoRef, overrides: &Overrides, apply: bool) -> Result<()> {
    println!(
        "{} Importing from {}/{}{}...",
        "→".blue().bold(),
        repo.owner,
        repo.repo,
        repo.subpath
            .as_deref()
            .map(|s| format!(" ({})", s))
            .unwrap_or_default()
    );

    let built = pipeline::discover_and_build(gh, repo, overrides)?;
    print_built(&built);

    if !apply {
        println!();
        println!(
            "{} Dry run. Pass {} to write this record to the catalog.",
            "!".yellow().bold(),
            "--apply".cyan()
        );
        return Ok(());
    }

    let cfg = Config::from_env()?;
    let store = CatalogStore::writer(&cfg)?;
    let summary = persist_built(&store, built)?;
    println!();
    println!("{} {}", "✓".green().bold(), summary);
    Ok(())
}

/// Resolve the category and write one built import. Returns a one-line
/// summary for the caller to print.
fn persist_built(store: &CatalogStore, built: BuiltImport) -> Result<String> {
    let category_id = match &built.category_slug {
        Some(slug) => match store.category_by_slug(slug)? {
            Some(category) => Some(category.id),
            None if built.category_explicit => bail!(
                "Unknown category '{}'. Categories are a fixed taxonomy; pick an existing slug.",
                slug
            ),
            None => None,
        },
        None => None,
    };

    let record = Listing {
        category_id,
        ..built.record
    };
    let outcome = store
        .persist(&record)
        .with_context(|| format!("Upsert failed for '{}'", record.slug))?;

    for (client, err) in &outcome.skipped_clients {
        eprintln!(
            "  {} could not link client {}: {}",
            "!".yellow(),
            client,
            err
        );
    }

    Ok(format!(
        "Upserted '{}' ({} client link{})",
        outcome.listing.slug,
        outcome.linked_clients,
        if outcome.linked_clients == 1 { "" } else { "s" }
    ))
}

fn run_batch(gh: &GithubClient, repo: &RepoRef, args: &ImportArgs) -> Result<()> {
    let meta = gh
        .repo_metadata(&repo.owner, &repo.repo)
        .into_result()?
        .with_context(|| format!("Repository {}/{} not found", repo.owner, repo.repo))?;

    let blobs = gh
        .tree_blobs(&repo.owner, &repo.repo, &meta.default_branch)
        .into_result()?
        .with_context(|| format!("No tree for {}/{}", repo.owner, repo.repo))?;

    let mut candidates = github::bulk_candidates(&blobs);
    if let Some(sub) = &repo.subpath {
        let prefix = format!("{}/", sub.trim_end_matches('/'));
        candidates.retain(|c| c.doc_path.starts_with(&prefix));
    }
    if let Some(limit) = args.limit {
        candidates.truncate(limit);
    }

    if candidates.is_empty() {
        println!(
            "{} No SKILL.md files or plugins found in {}/{}.",
            "!".yellow().bold(),
            repo.owner,
            repo.repo
        );
        return Ok(());
    }

    println!(
        "{} Found {} candidate{} in {}/{}.",
        "→".blue().bold(),
        candidates.len(),
        if candidates.len() == 1 { "" } else { "s" },
        repo.owner,
        repo.repo
    );

    let store = if args.apply {
        let cfg = Config::from_env()?;
        Some(CatalogStore::writer(&cfg)?)
    } else {
        None
    };

    let mut succeeded = 0usize;
    let mut failed: Vec<(String, String)> = Vec::new();
    let total = candidates.len();

    for (index, candidate) in candidates.iter().enumerate() {
        let result = pipeline::build_candidate(gh, repo, Some(&meta), candidate).and_then(|built| {
            let slug = built.record.slug.clone();
            match &store {
                Some(store) => persist_built(store, built).map(|_| slug),
                None => Ok(slug),
            }
        });
        match result {
            Ok(slug) => {
                succeeded += 1;
                println!("  {} {} ({})", "✓".green(), slug, candidate.doc_path.dimmed());
            }
            Err(e) => {
                failed.push((candidate.doc_path.clone(), e.to_string()));
                println!("  {} {}: {}", "✗".red(), candidate.doc_path, e);
            }
        }
        if index + 1 < total {
            std::thread::sleep(BATCH_SLEEP);
        }
    }

    println!();
    println!(
        "{} {} succeeded, {} failed{}",
        if failed.is_empty() { "✓".green().bold() } else { "!".yellow().bold() },
        succeeded,
        failed.len(),
        if store.is_none() { " (dry run)" } else { "" }
    );
    for (path, err) in &failed {
        println!("  {} {}: {}", "✗".red(), path, err.dimmed());
    }
    Ok(())
}

fn print_built(built: &BuiltImport) {
    let record = &built.record;
    println!();
    println!("  {}  {}", "Name:".bold(), record.name);
    println!("  {}  {}", "Slug:".bold(), record.slug);
    println!("  {}  {}", "Type:".bold(), record.artifact_type.label());
    println!("  {}  {}", "Format:".bold(), record.format_standard);
    println!(
        "  {}  {}",
        "Category:".bold(),
        built.category_slug.as_deref().unwrap_or("(none)")
    );
    println!("  {}  {}", "Platforms:".bold(), record.platforms.join(", "));
    if !record.tags.is_empty() {
        println!("  {}  {}", "Tags:".bold(), record.tags.join(", "));
    }
    let p = &record.permissions;
    let mut flags = Vec::new();
    if p.filesystem_read {
        flags.push("fs-read");
    }
    if p.filesystem_write {
        flags.push("fs-write");
    }
    if p.shell_exec {
        flags.push("shell");
    }
    if p.network_access {
        flags.push("network");
    }
    if p.git_write {
        flags.push("git");
    }
    if !flags.is_empty() {
        println!("  {}  {}", "Permissions:".bold(), flags.join(", ").yellow());
    }
    println!("  {}  {}", "Source:".bold(), record.github_url.cyan());
    println!("  {}  {}", "Description:".bold(), record.description);
}
