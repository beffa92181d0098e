//! Catalog persistence over the Supabase PostgREST surface.
//!
//! Reads use the anon key, writes the service-role key. Re-import safety
//! rests entirely on the upsert conflict keys (`slug` on `skills`,
//! `skill_id,client_id` on `listing_clients`); there is no optimistic
//! concurrency here and nothing is retried.

use crate::anthropic::Review;
use crate::config::Config;
use crate::model::{ArtifactType, Category, ClientRow, Listing, StoredListing};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::time::Duration;

const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Stars,
    Installs,
    Recent,
}

impl Sort {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "stars" => Ok(Sort::Stars),
            "installs" => Ok(Sort::Installs),
            "recent" => Ok(Sort::Recent),
            other => bail!("Unknown sort '{}'. Expected stars, installs, or recent", other),
        }
    }

    fn order(&self) -> &'static str {
        match self {
            Sort::Stars => "stars.desc",
            Sort::Installs => "installs.desc",
            Sort::Recent => "updated_at.desc",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category_id: Option<i64>,
    pub artifact_type: Option<ArtifactType>,
    pub featured: bool,
    pub sort: Option<Sort>,
    pub limit: usize,
}

/// Result of persisting one import.
#[derive(Debug)]
pub struct PersistOutcome {
    pub listing: StoredListing,
    pub linked_clients: usize,
    /// (client slug, error) pairs for links that failed; the import itself
    /// still counts as a success.
    pub skipped_clients: Vec<(String, String)>,
}

pub struct CatalogStore {
    http: reqwest::blocking::Client,
    base: String,
    key: String,
}

impl CatalogStore {
    fn with_key(cfg: &Config, key: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent("mdskills-cli")
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base: format!("{}/rest/v1", cfg.supabase_url),
            key: key.to_string(),
        })
    }

    pub fn reader(cfg: &Config) -> Result<Self> {
        Self::with_key(cfg, cfg.read_key()?)
    }

    pub fn writer(cfg: &Config) -> Result<Self> {
        Self::with_key(cfg, cfg.write_key()?)
    }

    fn get(&self, table: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base, table);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .map_err(|e| request_error(table, e))?;
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .with_context(|| format!("Unexpected response from {}", table))?;
        if !status.is_success() {
            bail!("Database error ({}): {}", status, rest_message(&body));
        }
        Ok(body)
    }

    fn rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let body = self.get(table, query)?;
        serde_json::from_value(body).with_context(|| format!("Unexpected row shape from {}", table))
    }

    pub fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let eq = format!("eq.{}", slug);
        let rows: Vec<Category> = self.rows(
            "categories",
            &[("select", "id,slug,name"), ("slug", &eq), ("limit", "1")],
        )?;
        Ok(rows.into_iter().next())
    }

    pub fn clients(&self) -> Result<Vec<ClientRow>> {
        self.rows("clients", &[("select", "id,slug,name"), ("order", "slug.asc")])
    }

    /// Upsert the listing by slug and return the stored row.
    pub fn upsert_listing(&self, record: &Listing) -> Result<StoredListing> {
        let url = format!("{}/skills", self.base);
        let response = self
            .http
            .post(&url)
            .query(&[("on_conflict", "slug")])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", UPSERT_PREFER)
            .json(&vec![record])
            .send()
            .context("Failed to reach the catalog database")?;
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .context("Unexpected response from skills upsert")?;
        if !status.is_success() {
            bail!("Database error ({}): {}", status, rest_message(&body));
        }
        let rows: Vec<StoredListing> =
            serde_json::from_value(body).context("Unexpected row shape from skills upsert")?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Upsert returned no row for slug '{}'", record.slug))
    }

    fn upsert_listing_client(
        &self,
        skill_id: i64,
        client_id: i64,
        install_instructions: &str,
        is_primary: bool,
    ) -> Result<()> {
        let url = format!("{}/listing_clients", self.base);
        let response = self
            .http
            .post(&url)
            .query(&[("on_conflict", "skill_id,client_id")])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&json!([{
                "skill_id": skill_id,
                "client_id": client_id,
                "install_instructions": install_instructions,
                "is_primary": is_primary,
            }]))
            .send()
            .context("Failed to reach the catalog database")?;
        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().unwrap_or_default();
            bail!("Database error ({}): {}", status, rest_message(&body));
        }
        Ok(())
    }

    /// Persist one built import: listing upsert first (fatal on error), then
    /// one client link per resolved platform, always force-including
    /// claude-code. Link failures are collected, not fatal.
    pub fn persist(&self, record: &Listing) -> Result<PersistOutcome> {
        let listing = self.upsert_listing(record)?;

        let known = self.clients()?;
        let mut wanted: Vec<String> = record.platforms.clone();
        if !wanted.iter().any(|p| p == "claude-code") {
            wanted.insert(0, "claude-code".to_string());
        }

        let mut linked = 0;
        let mut skipped = Vec::new();
        for platform in &wanted {
            let client = match known.iter().find(|c| &c.slug == platform) {
                Some(c) => c,
                // Platform names scanned out of prose may not be catalog
                // clients; those simply don't get a link row.
                None => continue,
            };
            let instructions = install_instructions(
                record.artifact_type,
                &client.slug,
                &record.owner,
                &record.slug,
            );
            let is_primary = client.slug == "claude-code";
            match self.upsert_listing_client(listing.id, client.id, &instructions, is_primary) {
                Ok(()) => linked += 1,
                Err(e) => skipped.push((client.slug.clone(), e.to_string())),
            }
        }

        Ok(PersistOutcome {
            listing,
            linked_clients: linked,
            skipped_clients: skipped,
        })
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Option<StoredListing>> {
        let eq = format!("eq.{}", slug);
        let rows: Vec<StoredListing> =
            self.rows("skills", &[("select", "*"), ("slug", &eq), ("limit", "1")])?;
        Ok(rows.into_iter().next())
    }

    pub fn search(&self, query: &str, filter: &ListFilter) -> Result<Vec<StoredListing>> {
        let term = sanitize_pattern(query);
        let or = format!(
            "(name.ilike.*{term}*,description.ilike.*{term}*,slug.ilike.*{term}*)",
            term = term
        );
        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("status", "eq.published".to_string()),
            ("or", or),
        ];
        push_filter_params(&mut params, filter);
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.rows("skills", &borrowed)
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<StoredListing>> {
        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("status", "eq.published".to_string()),
        ];
        push_filter_params(&mut params, filter);
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.rows("skills", &borrowed)
    }

    /// Listings with no review yet, most-starred first.
    pub fn unreviewed(&self, limit: usize) -> Result<Vec<StoredListing>> {
        let limit = limit.to_string();
        self.rows(
            "skills",
            &[
                ("select", "*"),
                ("status", "eq.published"),
                ("review_summary", "is.null"),
                ("order", "stars.desc"),
                ("limit", &limit),
            ],
        )
    }

    pub fn set_review(&self, skill_id: i64, review: &Review) -> Result<()> {
        let url = format!("{}/skills", self.base);
        let eq = format!("eq.{}", skill_id);
        let response = self
            .http
            .patch(&url)
            .query(&[("id", eq.as_str())])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(&json!({
                "review_summary": review.summary,
                "review_strengths": review.strengths,
                "review_weaknesses": review.weaknesses,
                "review_score": review.quality_score,
                "reviewed_at": chrono::Utc::now().to_rfc3339(),
            }))
            .send()
            .context("Failed to reach the catalog database")?;
        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().unwrap_or_default();
            bail!("Database error ({}): {}", status, rest_message(&body));
        }
        Ok(())
    }

    /// Best-effort install counter bump; callers ignore the result.
    pub fn bump_installs(&self, slug: &str) -> Result<()> {
        let current = self
            .get_by_slug(slug)?
            .ok_or_else(|| anyhow!("No listing '{}'", slug))?;
        let url = format!("{}/skills", self.base);
        let eq = format!("eq.{}", current.id);
        let response = self
            .http
            .patch(&url)
            .query(&[("id", eq.as_str())])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(&json!({ "installs": current.installs + 1 }))
            .send()
            .context("Failed to reach the catalog database")?;
        if !response.status().is_success() {
            bail!("Install count update failed ({})", response.status());
        }
        Ok(())
    }
}

fn push_filter_params(params: &mut Vec<(&'static str, String)>, filter: &ListFilter) {
    if let Some(id) = filter.category_id {
        params.push(("category_id", format!("eq.{}", id)));
    }
    if let Some(at) = filter.artifact_type {
        params.push(("artifact_type", format!("eq.{}", at.as_str())));
    }
    if filter.featured {
        params.push(("featured", "eq.true".to_string()));
    }
    let sort = filter.sort.unwrap_or(Sort::Stars);
    params.push(("order", sort.order().to_string()));
    let limit = if filter.limit == 0 { 20 } else { filter.limit };
    params.push(("limit", limit.to_string()));
}

/// Strip characters that would break the PostgREST `or=(...)` syntax.
fn sanitize_pattern(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Classify request failures for friendlier CLI messages.
fn request_error(what: &str, err: reqwest::Error) -> anyhow::Error {
    if err.is_timeout() {
        anyhow!("Request timed out while querying {}", what)
    } else if err.is_connect() {
        anyhow!("Could not connect to the catalog. Check your network and SUPABASE_URL.")
    } else {
        anyhow!("Request failed while querying {}: {}", what, err)
    }
}

fn rest_message(body: &serde_json::Value) -> String {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
        .unwrap_or_else(|| body.to_string())
}

/// Human-readable install instructions per client, dependent on artifact
/// type: MCP servers get client-specific shell syntax, everything else the
/// generic CLI install line.
pub fn install_instructions(
    artifact: ArtifactType,
    client_slug: &str,
    owner: &str,
    slug: &str,
) -> String {
    if artifact == ArtifactType::McpServer {
        return match client_slug {
            "claude-code" => format!("claude mcp add {} -- npx -y @{}/{}", slug, owner, slug),
            "cursor" => format!(
                "Add to ~/.cursor/mcp.json: {{\"{}\": {{\"command\": \"npx\", \"args\": [\"-y\", \"@{}/{}\"]}}}}",
                slug, owner, slug
            ),
            _ => format!(
                "Register the MCP server with: npx -y @{}/{} (see your client's MCP settings)",
                owner, slug
            ),
        };
    }
    format!("mdskills install {}/{}", owner, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_instructions_mcp_vs_generic() {
        let mcp = install_instructions(ArtifactType::McpServer, "claude-code", "acme", "db");
        assert!(mcp.starts_with("claude mcp add db"));
        let generic = install_instructions(ArtifactType::SkillPack, "cursor", "acme", "pdf");
        assert_eq!(generic, "mdskills install acme/pdf");
    }

    #[test]
    fn test_sanitize_pattern_strips_operator_chars() {
        assert_eq!(sanitize_pattern("pdf,(tools)*"), "pdftools");
        assert_eq!(sanitize_pattern("  plain query  "), "plain query");
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(Sort::parse("recent").unwrap(), Sort::Recent);
        assert!(Sort::parse("popular").is_err());
    }

    #[test]
    fn test_filter_params_defaults() {
        let mut params = Vec::new();
        push_filter_params(&mut params, &ListFilter::default());
        assert!(params.contains(&("order", "stars.desc".to_string())));
        assert!(params.contains(&("limit", "20".to_string())));
    }
}
