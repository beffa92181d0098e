//! mdskills CLI - client and import pipeline for the mdskills skill catalog.
//!
//! # Usage
//!
//! ```bash
//! mdskills search pdf            # Search the catalog
//! mdskills list --category devops
//! mdskills info pdf              # Show one listing
//! mdskills install acme/pdf      # Install into ~/.claude/skills
//! mdskills import acme/skills    # Dry-run a GitHub import
//! mdskills import acme/skills --all --apply
//! mdskills reviews --all --apply # Backfill AI reviews
//! mdskills                       # Interactive mode
//! ```

mod anthropic;
mod commands;
mod config;
mod frontmatter;
mod github;
mod infer;
mod model;
mod pipeline;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::QueryOpts;

/// mdskills catalog CLI
///
/// Search, install, and import AI agent skills (SKILL.md packs, MCP servers,
/// rulesets, plugins).
#[derive(Parser)]
#[command(name = "mdskills")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search published skills
    #[command(visible_alias = "s")]
    Search {
        /// Search query (name, description, slug)
        query: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Filter by category slug
        #[arg(long)]
        category: Option<String>,

        /// Filter by artifact type (skill_pack, mcp_server, ...)
        #[arg(long = "type")]
        artifact_type: Option<String>,

        /// Sort order: stars, installs, recent
        #[arg(long, default_value = "stars")]
        sort: String,

        /// Maximum results
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Browse published skills
    #[command(visible_alias = "ls")]
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Filter by category slug
        #[arg(long)]
        category: Option<String>,

        /// Filter by artifact type
        #[arg(long = "type")]
        artifact_type: Option<String>,

        /// Only featured skills
        #[arg(long)]
        featured: bool,

        /// Sort order: stars, installs, recent
        #[arg(long, default_value = "stars")]
        sort: String,

        /// Maximum results
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show one skill in detail
    #[command(visible_alias = "show")]
    Info {
        /// Listing slug
        slug: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Install a skill into a local client directory
    #[command(visible_alias = "i")]
    Install {
        /// Skill reference (owner/slug or slug)
        spec: String,

        /// Target client (claude-code, cursor, windsurf, continue)
        #[arg(long)]
        client: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Import a skill from a GitHub repository
    Import {
        /// GitHub URL or owner/repo shorthand
        url: String,

        /// Write to the catalog (default is a dry run)
        #[arg(long)]
        apply: bool,

        /// Import every SKILL.md and plugin in the repository
        #[arg(long)]
        all: bool,

        /// Override the generated slug
        #[arg(long)]
        slug: Option<String>,

        /// Override the inferred display name
        #[arg(long)]
        name: Option<String>,

        /// Override the inferred category (must exist)
        #[arg(long)]
        category: Option<String>,

        /// Override the inferred artifact type
        #[arg(long = "type")]
        artifact_type: Option<String>,

        /// Limit batch imports to the first N candidates
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate AI reviews for listings
    Reviews {
        /// Review a single listing by slug
        #[arg(long)]
        slug: Option<String>,

        /// Review unreviewed listings, most-starred first
        #[arg(long)]
        all: bool,

        /// Maximum listings to review with --all
        #[arg(long)]
        limit: Option<usize>,

        /// Write reviews to the catalog (default is a dry run)
        #[arg(long)]
        apply: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search {
            query,
            json,
            category,
            artifact_type,
            sort,
            limit,
        }) => commands::search::run(
            &query,
            &QueryOpts {
                json,
                category,
                artifact_type,
                featured: false,
                sort,
                limit,
            },
        ),
        Some(Commands::List {
            json,
            category,
            artifact_type,
            featured,
            sort,
            limit,
        }) => commands::list::run(&QueryOpts {
            json,
            category,
            artifact_type,
            featured,
            sort,
            limit,
        }),
        Some(Commands::Info { slug, json }) => commands::info::run(&slug, json),
        Some(Commands::Install { spec, client, yes }) => {
            commands::install::run(&spec, client.as_deref(), yes)
        }
        Some(Commands::Import {
            url,
            apply,
            all,
            slug,
            name,
            category,
            artifact_type,
            limit,
        }) => commands::import::run(&commands::import::ImportArgs {
            url,
            apply,
            all,
            slug,
            name,
            category,
            artifact_type,
            limit,
        }),
        Some(Commands::Reviews {
            slug,
            all,
            limit,
            apply,
        }) => commands::reviews::run(slug.as_deref(), all, limit, apply),
        None => commands::interactive::run(),
    }
}
