//! GitHub access for the import pipeline: URL parsing, raw-content and REST
//! fetches, and SKILL.md discovery.
//!
//! Fetches are never retried. A missing file is `FetchOutcome::NotFound` and
//! callers fall through to the next candidate; anything else that prevents an
//! answer is `FetchOutcome::Failed` and aborts the item being imported.

use anyhow::{bail, Result};
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

/// A parsed repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub subpath: Option<String>,
}

impl RepoRef {
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

/// Parse a GitHub URL or `owner/repo` shorthand.
///
/// Accepts full URLs with an optional `/tree/<branch>/<subpath>` suffix
/// (a `blob/` segment is rewritten to `tree/` first), trailing `.git`, and
/// trailing slashes.
pub fn parse_repo_url(input: &str) -> Result<RepoRef> {
    let cleaned = input.trim().replace("/blob/", "/tree/");
    let cleaned = cleaned.trim_end_matches('/');
    let cleaned = cleaned.strip_suffix(".git").unwrap_or(cleaned);

    let full_re =
        Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([^/\s]+)/([^/\s]+?)(?:/tree/[^/\s]+(?:/(.+))?)?$")
            .expect("url regex");
    if let Some(caps) = full_re.captures(cleaned) {
        return Ok(RepoRef {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            subpath: caps.get(3).map(|m| m.as_str().trim_matches('/').to_string()),
        });
    }

    let shorthand_re =
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.-]*)/([A-Za-z0-9][A-Za-z0-9_.-]*)$").expect("shorthand regex");
    if let Some(caps) = shorthand_re.captures(cleaned) {
        return Ok(RepoRef {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            subpath: None,
        });
    }

    bail!("Cannot parse GitHub URL: '{}'. Expected https://github.com/owner/repo[/tree/branch/path] or owner/repo", input)
}

/// Why a fetch could not produce a value.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub returned HTTP {status} for {url}")]
    Http { status: u16, url: String },
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Could not reach GitHub: {0}")]
    Connect(String),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl FetchError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Three-state fetch result: "definitely absent" is distinct from "could not
/// determine".
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Found(T),
    NotFound,
    Failed(FetchError),
}

impl<T> FetchOutcome<T> {
    /// Collapse to `Ok(Some)/Ok(None)` treating failure as a hard error.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            FetchOutcome::Found(v) => Ok(Some(v)),
            FetchOutcome::NotFound => Ok(None),
            FetchOutcome::Failed(e) => Err(e.into()),
        }
    }
}

/// Repository metadata from the REST API.
#[derive(Debug, Clone, Default)]
pub struct RepoMetadata {
    pub description: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    description: Option<String>,
    #[serde(default)]
    stargazers_count: i64,
    #[serde(default)]
    forks_count: i64,
    #[serde(default)]
    topics: Vec<String>,
    license: Option<ApiLicense>,
    #[serde(default = "default_branch")]
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiLicense {
    spdx_id: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// A directory entry from the contents API.
#[derive(Debug, Clone, Deserialize)]
pub struct DirEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct ApiTree {
    #[serde(default)]
    tree: Vec<ApiTreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiTreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Thin client over the raw-content mirror and the REST API. Unauthenticated
/// unless a `GITHUB_TOKEN` is supplied (higher rate limits).
pub struct GithubClient {
    http: reqwest::blocking::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent("mdskills-cli")
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, token })
    }

    /// Fetch raw file content at the repository HEAD ref.
    pub fn fetch_raw(&self, owner: &str, repo: &str, path: &str) -> FetchOutcome<String> {
        let url = format!("{}/{}/{}/HEAD/{}", RAW_BASE, owner, repo, path);
        let response = match self.http.get(&url).send() {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(FetchError::from_reqwest(&url, e)),
        };
        match response.status().as_u16() {
            200 => match response.text() {
                Ok(text) => FetchOutcome::Found(text),
                Err(e) => FetchOutcome::Failed(FetchError::Decode(e.to_string())),
            },
            404 => FetchOutcome::NotFound,
            status => FetchOutcome::Failed(FetchError::Http { status, url }),
        }
    }

    fn api_get(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    /// Fetch repository metadata via the REST API.
    pub fn repo_metadata(&self, owner: &str, repo: &str) -> FetchOutcome<RepoMetadata> {
        let url = format!("{}/repos/{}/{}", API_BASE, owner, repo);
        let response = match self.api_get(&url) {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(e),
        };
        match response.status().as_u16() {
            200 => match response.json::<ApiRepo>() {
                Ok(api) => FetchOutcome::Found(RepoMetadata {
                    description: api.description,
                    stars: api.stargazers_count,
                    forks: api.forks_count,
                    topics: api.topics,
                    license: api.license.and_then(|l| l.spdx_id),
                    default_branch: api.default_branch,
                }),
                Err(e) => FetchOutcome::Failed(FetchError::Decode(e.to_string())),
            },
            404 => FetchOutcome::NotFound,
            status => FetchOutcome::Failed(FetchError::Http { status, url }),
        }
    }

    /// List a directory via the contents API.
    pub fn list_dir(&self, owner: &str, repo: &str, path: &str) -> FetchOutcome<Vec<DirEntry>> {
        let url = format!("{}/repos/{}/{}/contents/{}", API_BASE, owner, repo, path);
        let response = match self.api_get(&url) {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(e),
        };
        match response.status().as_u16() {
            200 => match response.json::<Vec<DirEntry>>() {
                Ok(entries) => FetchOutcome::Found(entries),
                Err(e) => FetchOutcome::Failed(FetchError::Decode(e.to_string())),
            },
            404 => FetchOutcome::NotFound,
            status => FetchOutcome::Failed(FetchError::Http { status, url }),
        }
    }

    /// Fetch one recursive tree listing of blob paths.
    pub fn tree_blobs(&self, owner: &str, repo: &str, git_ref: &str) -> FetchOutcome<Vec<String>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            API_BASE, owner, repo, git_ref
        );
        let response = match self.api_get(&url) {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(e),
        };
        match response.status().as_u16() {
            200 => match response.json::<ApiTree>() {
                Ok(tree) => FetchOutcome::Found(
                    tree.tree
                        .into_iter()
                        .filter(|e| e.kind == "blob")
                        .map(|e| e.path)
                        .collect(),
                ),
                Err(e) => FetchOutcome::Failed(FetchError::Decode(e.to_string())),
            },
            404 => FetchOutcome::NotFound,
            status => FetchOutcome::Failed(FetchError::Http { status, url }),
        }
    }
}

/// A discovered source document.
#[derive(Debug, Clone)]
pub struct SourceDoc {
    pub path: String,
    pub content: String,
}

/// Find the skill document for a repo reference.
///
/// Phase one is a fixed ordered candidate list (subpath-relative first, then
/// repo-root conventions); first hit wins, no scoring. Phase two lists the
/// conventional skill directories and probes each immediate subdirectory —
/// one level, not a general walk.
pub fn discover_skill_md(gh: &GithubClient, repo: &RepoRef) -> Result<Option<SourceDoc>> {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(sub) = &repo.subpath {
        if sub.ends_with(".md") {
            candidates.push(sub.clone());
        } else {
            candidates.push(format!("{}/SKILL.md", sub));
            candidates.push(format!("{}/skill.md", sub));
        }
    }
    candidates.push("SKILL.md".to_string());
    candidates.push("skill.md".to_string());
    candidates.push(".claude/skills/SKILL.md".to_string());

    for path in &candidates {
        match gh.fetch_raw(&repo.owner, &repo.repo, path) {
            FetchOutcome::Found(content) => {
                return Ok(Some(SourceDoc {
                    path: path.clone(),
                    content,
                }))
            }
            FetchOutcome::NotFound => continue,
            FetchOutcome::Failed(e) => return Err(e.into()),
        }
    }

    for dir in [".claude/skills", "skills"] {
        let entries = match gh.list_dir(&repo.owner, &repo.repo, dir) {
            FetchOutcome::Found(entries) => entries,
            FetchOutcome::NotFound => continue,
            FetchOutcome::Failed(e) => return Err(e.into()),
        };
        for entry in entries.iter().filter(|e| e.kind == "dir") {
            let probe = format!("{}/SKILL.md", entry.path);
            match gh.fetch_raw(&repo.owner, &repo.repo, &probe) {
                FetchOutcome::Found(content) => {
                    return Ok(Some(SourceDoc {
                        path: probe,
                        content,
                    }))
                }
                FetchOutcome::NotFound => continue,
                FetchOutcome::Failed(e) => return Err(e.into()),
            }
        }
    }

    Ok(None)
}

/// A candidate surfaced by the bulk tree scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCandidate {
    /// Document path to import from (SKILL.md, or the plugin root README).
    pub doc_path: String,
    pub is_plugin: bool,
}

/// Filter one recursive tree listing down to importable candidates:
/// SKILL.md blobs, plus `.claude-plugin/` manifests surfaced as
/// pseudo-skills rooted at their README.
pub fn bulk_candidates(blob_paths: &[String]) -> Vec<BulkCandidate> {
    let skill_re = Regex::new(r"(^|/)(SKILL|skill)\.md$").expect("skill regex");
    let mut candidates: Vec<BulkCandidate> = blob_paths
        .iter()
        .filter(|p| skill_re.is_match(p))
        .map(|p| BulkCandidate {
            doc_path: p.clone(),
            is_plugin: false,
        })
        .collect();

    for path in blob_paths {
        if let Some(root) = path.strip_suffix(".claude-plugin/plugin.json") {
            let readme = format!("{}README.md", root);
            if blob_paths.iter().any(|p| p == &readme)
                && !candidates.iter().any(|c| c.doc_path == readme)
            {
                candidates.push(BulkCandidate {
                    doc_path: readme,
                    is_plugin: true,
                });
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let r = parse_repo_url("https://github.com/anthropics/skills").unwrap();
        assert_eq!(r.owner, "anthropics");
        assert_eq!(r.repo, "skills");
        assert!(r.subpath.is_none());
    }

    #[test]
    fn test_parse_url_with_tree_subpath() {
        let r = parse_repo_url("https://github.com/anthropics/skills/tree/main/skills/pdf").unwrap();
        assert_eq!(r.owner, "anthropics");
        assert_eq!(r.repo, "skills");
        assert_eq!(r.subpath.as_deref(), Some("skills/pdf"));
    }

    #[test]
    fn test_parse_normalizes_git_suffix_and_trailing_slash() {
        let a = parse_repo_url("https://github.com/acme/tools.git").unwrap();
        let b = parse_repo_url("https://github.com/acme/tools/").unwrap();
        let c = parse_repo_url("acme/tools").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_parse_blob_rewritten_to_tree() {
        let blob =
            parse_repo_url("https://github.com/acme/tools/blob/main/skills/pdf/SKILL.md").unwrap();
        let tree =
            parse_repo_url("https://github.com/acme/tools/tree/main/skills/pdf/SKILL.md").unwrap();
        assert_eq!(blob, tree);
        assert_eq!(blob.subpath.as_deref(), Some("skills/pdf/SKILL.md"));
    }

    #[test]
    fn test_parse_branch_without_subpath() {
        let r = parse_repo_url("https://github.com/acme/tools/tree/develop").unwrap();
        assert_eq!(r.owner, "acme");
        assert_eq!(r.repo, "tools");
        assert!(r.subpath.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_repo_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Cannot parse GitHub URL"));
        assert!(parse_repo_url("just-one-segment").is_err());
        assert!(parse_repo_url("").is_err());
    }

    #[test]
    fn test_bulk_candidates_filters_skill_md() {
        let paths = vec![
            "skills/pdf/SKILL.md".to_string(),
            "skills/pdf/reference.md".to_string(),
            "nested/deep/skill.md".to_string(),
            "SKILL.md".to_string(),
            "docs/NOT_SKILL.md".to_string(),
        ];
        let found = bulk_candidates(&paths);
        let docs: Vec<&str> = found.iter().map(|c| c.doc_path.as_str()).collect();
        assert_eq!(docs, vec!["skills/pdf/SKILL.md", "nested/deep/skill.md", "SKILL.md"]);
        assert!(found.iter().all(|c| !c.is_plugin));
    }

    #[test]
    fn test_bulk_candidates_surfaces_plugin_readmes() {
        let paths = vec![
            "my-plugin/.claude-plugin/plugin.json".to_string(),
            "my-plugin/README.md".to_string(),
            "bare/.claude-plugin/plugin.json".to_string(),
        ];
        let found = bulk_candidates(&paths);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].doc_path, "my-plugin/README.md");
        assert!(found[0].is_plugin);
    }
}
