//! Install a catalog skill into a local client skill directory.

use super::{client_skill_dir, confirm, CLIENT_SKILL_DIRS};
use crate::config::Config;
use crate::store::CatalogStore;
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use std::fs;

pub fn run(spec: &str, client: Option<&str>, yes: bool) -> Result<()> {
    // Accept both "owner/slug" and a bare slug.
    let slug = spec.rsplit('/').next().unwrap_or(spec).trim();
    if slug.is_empty() {
        bail!("Expected a skill reference like owner/slug");
    }

    let cfg = Config::from_env()?;
    let store = CatalogStore::reader(&cfg)?;
    let listing = store
        .get_by_slug(slug)?
        .ok_or_else(|| anyhow!("Skill '{}' not found. Try 'mdskills search {}'.", slug, slug))?;

    let client = client.unwrap_or("claude-code");
    let base_dir = client_skill_dir(client).ok_or_else(|| {
        anyhow!(
            "Unknown client '{}'. Known clients: {}",
            client,
            CLIENT_SKILL_DIRS
                .iter()
                .map(|(slug, _)| *slug)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let content = listing
        .content
        .as_deref()
        .ok_or_else(|| anyhow!("Listing '{}' has no installable content", slug))?;

    // Claude Code skills live in a directory per skill; other clients take a
    // single markdown file.
    let target = if client == "claude-code" {
        base_dir.join(&listing.slug).join("SKILL.md")
    } else {
        base_dir.join(format!("{}.md", listing.slug))
    };

    println!();
    println!("{} {}", listing.name.bold(), format!("({})", listing.slug).dimmed());
    println!("  {}", listing.description);
    if listing.permissions.any() {
        let p = &listing.permissions;
        let mut flags = Vec::new();
        if p.filesystem_read {
            flags.push("filesystem read");
        }
        if p.filesystem_write {
            flags.push("filesystem write");
        }
        if p.shell_exec {
            flags.push("shell execution");
        }
        if p.network_access {
            flags.push("network access");
        }
        if p.git_write {
            flags.push("git write");
        }
        println!(
            "  {} May use: {}",
            "!".yellow().bold(),
            flags.join(", ").yellow()
        );
    }
    println!();

    if !yes && !confirm(&format!("Install to {}?", target.display()))? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&target, content)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    // Popularity counters are advisory; a failed bump never fails the install.
    let _ = store.bump_installs(&listing.slug);

    println!(
        "{} {} installed to {}",
        "✓".green().bold(),
        listing.slug.bold(),
        target.display()
    );
    Ok(())
}
