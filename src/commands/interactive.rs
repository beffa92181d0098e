//! Interactive prompt mode, entered when the CLI is run with no arguments.

use super::{print_listing_table, QueryOpts};
use crate::config::Config;
use crate::store::CatalogStore;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

fn default_opts() -> QueryOpts {
    QueryOpts {
        json: false,
        category: None,
        artifact_type: None,
        featured: false,
        sort: "stars".to_string(),
        limit: 10,
    }
}

pub fn run() -> Result<()> {
    let cfg = Config::from_env()?;
    let store = CatalogStore::reader(&cfg)?;

    println!("{}", "mdskills — AI agent skill catalog".bold());
    println!(
        "  {}",
        "type a search query, or: list, info <slug>, help, quit".dimmed()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", "mdskills>".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        let result = match command {
            "quit" | "q" | "exit" => break,
            "help" | "?" => {
                println!("  <query>       search the catalog");
                println!("  list          top skills by stars");
                println!("  info <slug>   show one skill in detail");
                println!("  quit          leave");
                Ok(())
            }
            "list" | "ls" => store.list(&super::resolve_filter(&store, &default_opts())?).map(|rows| {
                print_listing_table(&rows);
            }),
            "info" | "show" if !rest.is_empty() => match store.get_by_slug(rest) {
                Ok(Some(listing)) => {
                    println!("{} — {}", listing.name.bold(), listing.description);
                    println!("  {}", listing.github_url.cyan());
                    Ok(())
                }
                Ok(None) => {
                    println!("{} No skill '{}'.", "!".yellow(), rest);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            _ => store
                .search(input, &super::resolve_filter(&store, &default_opts())?)
                .map(|rows| {
                    if rows.is_empty() {
                        println!("{} No matches for '{}'.", "!".yellow(), input);
                    } else {
                        print_listing_table(&rows);
                    }
                }),
        };

        // Errors inside the loop are printed, not fatal.
        if let Err(e) = result {
            eprintln!("{} {}", "✗".red().bold(), e);
        }
    }

    Ok(())
}
