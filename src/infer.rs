//! Field inference heuristics for imported listings.
//!
//! Each function here is pure and total: it consumes the parsed frontmatter,
//! document content, and repo metadata, and always produces a value via a
//! fallback chain. Nothing in this module performs I/O.

use crate::frontmatter::Frontmatter;
use crate::github::RepoMetadata;
use crate::model::{ArtifactType, FormatStandard, PermissionFlags};
use regex::Regex;

pub const DESCRIPTION_MAX: usize = 500;
pub const MAX_TAGS: usize = 15;

/// Clients that can consume plain markdown instruction files.
pub const MARKDOWN_CLIENTS: &[&str] = &[
    "claude-code",
    "cursor",
    "windsurf",
    "cline",
    "codex",
    "gemini-cli",
    "zed",
];

/// Clients with MCP support.
pub const MCP_CLIENTS: &[&str] = &["claude-code", "cursor", "windsurf", "cline", "continue", "zed"];

/// Platform names worth surfacing when the content mentions them.
const PLATFORM_MENTIONS: &[&str] = &["chatgpt", "grok", "replit", "copilot", "warp"];

/// Directory names too generic to make a meaningful slug.
const GENERIC_DIRS: &[&str] = &["skills", ".claude", "src", "lib", "root", "plugins"];

const ACRONYMS: &[&str] = &[
    "ai", "api", "aws", "cli", "css", "gcp", "html", "http", "json", "llm", "mcp", "pdf", "sdk",
    "seo", "sql", "ui", "ux", "xml", "yaml",
];

/// Brand spellings that generic title-casing would mangle.
fn brand_casing(word: &str) -> Option<&'static str> {
    match word {
        "openai" => Some("OpenAI"),
        "github" => Some("GitHub"),
        "gitlab" => Some("GitLab"),
        "chatgpt" => Some("ChatGPT"),
        "javascript" => Some("JavaScript"),
        "typescript" => Some("TypeScript"),
        "postgresql" => Some("PostgreSQL"),
        "graphql" => Some("GraphQL"),
        "nextjs" => Some("Next.js"),
        "nodejs" => Some("Node.js"),
        "ios" => Some("iOS"),
        "macos" => Some("macOS"),
        _ => None,
    }
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(brand) = brand_casing(&lower) {
        return brand.to_string();
    }
    if ACRONYMS.contains(&lower.as_str()) {
        return lower.to_uppercase();
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Title-case a hyphen/underscore-delimited identifier.
pub fn title_case(identifier: &str) -> String {
    identifier
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Headings that mean "this README's H1 is boilerplate, not a name".
const REJECT_HEADINGS: &[&str] = &[
    "installation",
    "install",
    "license",
    "usage",
    "getting started",
    "quick start",
    "table of contents",
    "contributing",
    "changelog",
    "readme",
    "documentation",
];

/// First plausible H1 from a README, markdown or `<h1>` form.
fn readme_heading(readme: &str) -> Option<String> {
    let h1_re = Regex::new(r"(?i)<h1[^>]*>(.*?)</h1>").expect("h1 regex");
    let mut candidate: Option<String> = None;
    for line in readme.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("# ") {
            candidate = Some(rest.trim().to_string());
            break;
        }
        if let Some(caps) = h1_re.captures(trimmed) {
            candidate = Some(caps[1].trim().to_string());
            break;
        }
    }
    let heading = candidate?;
    let lower = heading.to_lowercase();
    if REJECT_HEADINGS.iter().any(|r| lower == *r || lower.starts_with(*r)) {
        return None;
    }
    if heading.contains("![") || heading.contains("](") || heading.contains('`') || heading.contains("<img")
    {
        return None;
    }
    if heading.len() > 70 || heading.is_empty() {
        return None;
    }
    Some(heading)
}

/// Display name precedence: frontmatter name (verbatim when it already has a
/// space, title-cased when it is an identifier), then README H1, then the
/// skill directory name, then the repo name.
pub fn display_name(
    fm: &Frontmatter,
    readme: Option<&str>,
    dir_name: Option<&str>,
    repo: &str,
) -> String {
    if let Some(name) = fm.get("name") {
        let name = name.trim();
        if !name.is_empty() {
            if name.contains(' ') {
                return name.to_string();
            }
            return title_case(name);
        }
    }
    if let Some(readme) = readme {
        if let Some(heading) = readme_heading(readme) {
            return heading;
        }
    }
    if let Some(dir) = dir_name {
        if !GENERIC_DIRS.contains(&dir.to_lowercase().as_str()) {
            return title_case(dir);
        }
    }
    title_case(repo)
}

/// Strip markdown noise from a README and take its first real paragraph.
fn readme_excerpt(readme: &str) -> Option<String> {
    let fence_re = Regex::new(r"(?s)```.*?```").expect("fence regex");
    let badge_re = Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("badge regex");
    let link_re = Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("link regex");
    let html_re = Regex::new(r"<[^>]+>").expect("html regex");

    let cleaned = fence_re.replace_all(readme, "");
    let cleaned = badge_re.replace_all(&cleaned, "");
    let cleaned = link_re.replace_all(&cleaned, "$1");
    let cleaned = html_re.replace_all(&cleaned, "");

    let mut paragraph: Vec<&str> = Vec::new();
    for line in cleaned.lines() {
        let trimmed = line.trim();
        let skip = trimmed.starts_with('#')
            || trimmed.starts_with('>')
            || trimmed.starts_with('|')
            || trimmed.starts_with("- ")
            || trimmed.starts_with("* ");
        if paragraph.is_empty() {
            if trimmed.is_empty() || skip {
                continue;
            }
            paragraph.push(trimmed);
        } else {
            if trimmed.is_empty() || skip {
                break;
            }
            paragraph.push(trimmed);
        }
    }
    let text = paragraph.join(" ").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Cap a description at `DESCRIPTION_MAX` characters. When cutting
/// mid-sentence, prefer the last sentence boundary above the halfway mark,
/// then the last word boundary.
pub fn truncate_description(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= DESCRIPTION_MAX {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_MAX).collect();
    let half = DESCRIPTION_MAX / 2;
    let sentence_end = cut
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&end| end > half)
        .next_back();
    if let Some(end) = sentence_end {
        return cut[..end].trim_end().to_string();
    }
    match cut.rfind(' ') {
        Some(space) => cut[..space].trim_end().to_string(),
        None => cut,
    }
}

/// Description precedence: frontmatter, README excerpt, repo description,
/// generated fallback. Always ≤ 500 characters.
pub fn description(
    fm: &Frontmatter,
    readme: Option<&str>,
    meta: Option<&RepoMetadata>,
    artifact: ArtifactType,
    owner: &str,
    repo: &str,
) -> String {
    if let Some(desc) = fm.get("description") {
        if !desc.trim().is_empty() {
            return truncate_description(desc);
        }
    }
    if let Some(readme) = readme {
        if let Some(excerpt) = readme_excerpt(readme) {
            return truncate_description(&excerpt);
        }
    }
    if let Some(desc) = meta.and_then(|m| m.description.as_deref()) {
        if !desc.trim().is_empty() {
            return truncate_description(desc);
        }
    }
    truncate_description(&format!(
        "A {} for AI agents, imported from {}/{}.",
        artifact.label(),
        owner,
        repo
    ))
}

fn artifact_from_signal(text: &str) -> Option<ArtifactType> {
    let t = text.to_lowercase();
    if t.contains("mcp") {
        Some(ArtifactType::McpServer)
    } else if t.contains("rule") {
        Some(ArtifactType::Ruleset)
    } else if t.contains("workflow") {
        Some(ArtifactType::WorkflowPack)
    } else if t.contains("template") || t.contains("starter") {
        Some(ArtifactType::TemplateBundle)
    } else if t.contains("extension") {
        Some(ArtifactType::Extension)
    } else if t.contains("tool") {
        Some(ArtifactType::OpenapiAction)
    } else {
        None
    }
}

/// Artifact type from frontmatter signals, then repo-name signals, then the
/// `skill_pack` default.
pub fn artifact_type(fm: &Frontmatter, repo: &str) -> ArtifactType {
    for key in ["type", "artifact_type"] {
        if let Some(value) = fm.get(key) {
            if let Some(found) = artifact_from_signal(value) {
                return found;
            }
        }
    }
    artifact_from_signal(repo).unwrap_or(ArtifactType::SkillPack)
}

/// Source format from the discovered document path.
pub fn format_for_path(path: &str) -> FormatStandard {
    let file = path.rsplit('/').next().unwrap_or(path);
    let lower = file.to_lowercase();
    if lower == "skill.md" {
        FormatStandard::SkillMd
    } else if lower == "agents.md" {
        FormatStandard::AgentsMd
    } else if lower.ends_with(".cursorrules") || lower == ".cursorrules" {
        FormatStandard::Cursorrules
    } else if lower.ends_with(".mdc") {
        FormatStandard::Mdc
    } else {
        FormatStandard::Generic
    }
}

fn normalize_client(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '_'], "-")
}

/// Platform resolution: frontmatter `compatibility` verbatim, else the fixed
/// per-format mapping, else the MCP list for MCP servers, else every
/// markdown-capable client — extended by platforms the content names.
pub fn platforms(
    fm: &Frontmatter,
    format: FormatStandard,
    artifact: ArtifactType,
    content: &str,
) -> Vec<String> {
    if !fm.compatibility.is_empty() {
        return fm.compatibility.iter().map(|c| normalize_client(c)).collect();
    }
    let mut resolved: Vec<String> = match format {
        FormatStandard::Cursorrules | FormatStandard::Mdc => vec!["cursor".to_string()],
        FormatStandard::AgentsMd => vec!["codex".to_string()],
        _ if artifact == ArtifactType::McpServer => {
            MCP_CLIENTS.iter().map(|c| c.to_string()).collect()
        }
        _ => MARKDOWN_CLIENTS.iter().map(|c| c.to_string()).collect(),
    };
    let haystack = content.to_lowercase();
    for mention in PLATFORM_MENTIONS {
        if haystack.contains(mention) && !resolved.iter().any(|p| p == mention) {
            resolved.push(mention.to_string());
        }
    }
    resolved
}

/// Keyword inference for the five permission flags. Conservative-leaning and
/// high-false-positive; display metadata only. Frontmatter-declared
/// permissions win outright so a declared-vs-inferred comparison stays
/// meaningful.
pub fn permissions(fm: &Frontmatter, content: &str) -> PermissionFlags {
    if let Some(declared) = fm.get("permissions") {
        return declared_permissions(declared);
    }
    let fs_read_re =
        Regex::new(r"(?i)read(s|ing)? (a |the )?(file|director)|filesystem|file system|glob|\bls\b")
            .expect("fs read regex");
    let fs_write_re = Regex::new(
        r"(?i)writ(e|es|ing) (a |the |to )?(file|disk)|creat(e|es|ing) (a )?file|save(s|d)? to|output file|edit(s|ing)? (a |the )?file",
    )
    .expect("fs write regex");
    let shell_re =
        Regex::new(r"(?i)exec|command|shell|bash|terminal|npm|npx|pip").expect("shell regex");
    let network_re =
        Regex::new(r"(?i)\bhttp|\bapi\b|fetch|request|curl|download|webhook|endpoint")
            .expect("network regex");
    let git_re = Regex::new(
        r"(?i)git (commit|push|merge|rebase|checkout|add)|creat(e|es|ing) (a )?(pull request|pr\b|branch)",
    )
    .expect("git regex");

    PermissionFlags {
        filesystem_read: fs_read_re.is_match(content),
        filesystem_write: fs_write_re.is_match(content),
        shell_exec: shell_re.is_match(content),
        network_access: network_re.is_match(content),
        git_write: git_re.is_match(content),
    }
}

fn declared_permissions(declared: &str) -> PermissionFlags {
    let mut flags = PermissionFlags::default();
    for token in declared.split(',') {
        match token.trim().to_lowercase().as_str() {
            "filesystem_read" | "fs_read" | "read" => flags.filesystem_read = true,
            "filesystem_write" | "fs_write" | "write" => flags.filesystem_write = true,
            "shell_exec" | "shell" | "exec" => flags.shell_exec = true,
            "network_access" | "network" => flags.network_access = true,
            "git_write" | "git" => flags.git_write = true,
            _ => {}
        }
    }
    flags
}

/// Ordered category table. Evaluation order is tie-break order: the first
/// entry to reach the top score wins.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("writing", &["writing", "blog", "copywriting", "prose", "editing"]),
    ("coding", &["coding", "programming", "refactor", "debug", "code review"]),
    ("data-analysis", &["data", "analytics", "pandas", "visualization", "dataset"]),
    ("devops", &["devops", "deploy", "kubernetes", "docker", "terraform", "ci/cd"]),
    ("design", &["design", "figma", "ui kit", "branding", "typography"]),
    ("marketing", &["marketing", "seo", "campaign", "social media", "growth"]),
    ("productivity", &["productivity", "todo", "calendar", "notes", "workflow automation"]),
    ("research", &["research", "literature", "summarize", "papers", "citations"]),
    ("testing", &["testing", "unit test", "e2e", "coverage", "qa"]),
    ("documentation", &["documentation", "docs", "readme", "changelog", "api reference"]),
    ("security", &["security", "vulnerability", "audit", "pentest", "cve"]),
    ("database", &["database", "sql", "postgres", "migration", "schema"]),
    ("automation", &["automation", "scraping", "browser automation", "cron", "pipeline"]),
    ("ai-ml", &["machine learning", "llm", "prompt", "embedding", "fine-tune"]),
    ("finance", &["finance", "accounting", "invoice", "budget", "trading"]),
    ("education", &["education", "tutorial", "learning", "teaching", "course"]),
    ("translation", &["translation", "localization", "i18n", "multilingual"]),
];

const CATEGORY_MIN_SCORE: u32 = 2;
const TOPIC_WEIGHT: u32 = 3;
const TEXT_WEIGHT: u32 = 1;

/// Score every category against repo topics and free text. Pure, so the
/// tie-break (first entry in table order) is directly testable.
pub fn score_categories(topics: &[String], text: &str) -> Vec<(&'static str, u32)> {
    let haystack = text.to_lowercase();
    let topics: Vec<String> = topics.iter().map(|t| t.to_lowercase()).collect();
    CATEGORIES
        .iter()
        .map(|(slug, keywords)| {
            let mut score = 0;
            for keyword in keywords.iter() {
                if topics.iter().any(|t| t.contains(keyword)) {
                    score += TOPIC_WEIGHT;
                }
                if haystack.contains(keyword) {
                    score += TEXT_WEIGHT;
                }
            }
            (*slug, score)
        })
        .collect()
}

/// Highest-scoring category at the ≥2 threshold; ties keep table order.
pub fn detect_category(topics: &[String], text: &str) -> Option<&'static str> {
    let scores = score_categories(topics, text);
    let (best, score) = scores
        .into_iter()
        .fold(("", 0u32), |acc, (slug, score)| {
            if score > acc.1 {
                (slug, score)
            } else {
                acc
            }
        });
    if score >= CATEGORY_MIN_SCORE {
        Some(best)
    } else {
        None
    }
}

/// Whether the listing is a plain skill or a hybrid that ships a Claude Code
/// plugin.
pub fn skill_kind(skill_path: Option<&str>, topics: &[String], readme: Option<&str>) -> (String, bool) {
    let path_signal = skill_path
        .map(|p| p.contains(".claude/") || p.to_lowercase().contains("plugin"))
        .unwrap_or(false);
    let topics_signal = topics.iter().any(|t| t.to_lowercase().contains("plugin"))
        && topics.iter().any(|t| t.to_lowercase().contains("claude"));
    let readme_signal = readme
        .map(|r| {
            let head: String = r.chars().take(2000).collect();
            head.to_lowercase().contains("claude code plugin")
        })
        .unwrap_or(false);
    if path_signal || topics_signal || readme_signal {
        ("hybrid".to_string(), true)
    } else {
        ("skill".to_string(), false)
    }
}

/// Lowercase, collapse non-alphanumeric runs to single hyphens, trim.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_hyphen = true;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug from the skill's parent directory, rejecting generic directory names
/// in favor of the repo name. README-only imports use the repo name.
pub fn slug_for(skill_path: Option<&str>, repo: &str) -> String {
    if let Some(dir) = skill_path.and_then(parent_dir_name) {
        if !GENERIC_DIRS.contains(&dir.to_lowercase().as_str()) {
            let slug = slugify(&dir);
            if !slug.is_empty() {
                return slug;
            }
        }
    }
    slugify(repo)
}

/// Parent directory name of a document path ("skills/pdf/SKILL.md" → "pdf").
pub fn parent_dir_name(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    parts.pop()?;
    parts.pop().map(|s| s.to_string())
}

/// Frontmatter tags when present, else repo topics; capped at `MAX_TAGS`.
pub fn tags(fm: &Frontmatter, meta: Option<&RepoMetadata>) -> Vec<String> {
    let mut tags: Vec<String> = if !fm.tags.is_empty() {
        fm.tags.iter().map(|t| t.trim().to_lowercase()).collect()
    } else {
        meta.map(|m| m.topics.iter().map(|t| t.to_lowercase()).collect())
            .unwrap_or_default()
    };
    tags.retain(|t| !t.is_empty());
    tags.dedup();
    tags.truncate(MAX_TAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter;

    fn fm(input: &str) -> Frontmatter {
        frontmatter::parse(input)
    }

    #[test]
    fn test_display_name_frontmatter_with_space_is_verbatim() {
        let f = fm("---\nname: PDF Power Tools\n---\n");
        assert_eq!(display_name(&f, None, Some("pdf"), "tools"), "PDF Power Tools");
    }

    #[test]
    fn test_display_name_identifier_title_cased_with_acronyms() {
        let f = fm("---\nname: pdf-export-api\n---\n");
        assert_eq!(display_name(&f, None, None, "tools"), "PDF Export API");
    }

    #[test]
    fn test_display_name_brand_casing() {
        let f = fm("---\nname: openai_helper\n---\n");
        assert_eq!(display_name(&f, None, None, "tools"), "OpenAI Helper");
    }

    #[test]
    fn test_display_name_readme_h1_fallback() {
        let f = fm("no frontmatter");
        let readme = "badge\n\n# Invoice Wizard\n\nDoes invoices.";
        assert_eq!(display_name(&f, Some(readme), None, "tools"), "Invoice Wizard");
    }

    #[test]
    fn test_display_name_rejects_boilerplate_h1() {
        let f = fm("no frontmatter");
        let readme = "# Installation\n\nSteps.";
        assert_eq!(display_name(&f, Some(readme), Some("invoices"), "tools"), "Invoices");
    }

    #[test]
    fn test_display_name_rejects_image_h1() {
        let f = fm("x");
        let readme = "# ![logo](logo.png) Tool\n";
        assert_eq!(display_name(&f, Some(readme), None, "my-tool"), "My Tool");
    }

    #[test]
    fn test_description_frontmatter_precedence() {
        let f = fm("---\ndescription: Converts PDFs.\n---\n");
        let got = description(&f, Some("# H\n\nLonger readme text."), None, ArtifactType::SkillPack, "o", "r");
        assert_eq!(got, "Converts PDFs.");
    }

    #[test]
    fn test_description_readme_excerpt_strips_noise() {
        let f = fm("no frontmatter");
        let readme = "# Title\n\n```sh\nnpm i\n```\n\n> quote\n\n![badge](x.png)\nExtracts text from [PDF](https://e.com) files.\n\nSecond paragraph.";
        let got = description(&f, Some(readme), None, ArtifactType::SkillPack, "o", "r");
        assert_eq!(got, "Extracts text from PDF files.");
    }

    #[test]
    fn test_description_never_exceeds_cap() {
        let long = "word ".repeat(400);
        let f = fm("no frontmatter");
        let got = description(&f, Some(&long), None, ArtifactType::SkillPack, "o", "r");
        assert!(got.chars().count() <= DESCRIPTION_MAX);
    }

    #[test]
    fn test_truncation_prefers_sentence_boundary_above_half() {
        let mut text = "a".repeat(300);
        text.push('.');
        text.push(' ');
        text.push_str(&"b".repeat(400));
        let got = truncate_description(&text);
        assert_eq!(got.chars().count(), 301);
        assert!(got.ends_with('.'));
    }

    #[test]
    fn test_truncation_word_boundary_when_sentence_too_early() {
        // Only sentence boundary is below the halfway mark; fall back to the
        // last word boundary under the cap.
        let mut text = "Short. ".to_string();
        text.push_str(&"word ".repeat(200));
        let got = truncate_description(&text);
        assert!(got.chars().count() <= DESCRIPTION_MAX);
        assert!(got.ends_with("word"));
    }

    #[test]
    fn test_artifact_type_from_frontmatter() {
        assert_eq!(artifact_type(&fm("---\ntype: mcp-server\n---\n"), "r"), ArtifactType::McpServer);
        assert_eq!(artifact_type(&fm("---\ntype: cursor rules\n---\n"), "r"), ArtifactType::Ruleset);
        assert_eq!(
            artifact_type(&fm("---\nartifact_type: starter kit\n---\n"), "r"),
            ArtifactType::TemplateBundle
        );
    }

    #[test]
    fn test_artifact_type_from_repo_name_then_default() {
        let empty = fm("no frontmatter");
        assert_eq!(artifact_type(&empty, "awesome-mcp-servers"), ArtifactType::McpServer);
        assert_eq!(artifact_type(&empty, "agent-workflows"), ArtifactType::WorkflowPack);
        assert_eq!(artifact_type(&empty, "pdf-skills"), ArtifactType::SkillPack);
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path("skills/pdf/SKILL.md"), FormatStandard::SkillMd);
        assert_eq!(format_for_path("AGENTS.md"), FormatStandard::AgentsMd);
        assert_eq!(format_for_path(".cursorrules"), FormatStandard::Cursorrules);
        assert_eq!(format_for_path("rules/react.mdc"), FormatStandard::Mdc);
        assert_eq!(format_for_path("README.md"), FormatStandard::Generic);
    }

    #[test]
    fn test_platforms_compatibility_verbatim() {
        let f = fm("---\ncompatibility:\n  - Claude Code\n  - cursor\n---\n");
        assert_eq!(
            platforms(&f, FormatStandard::SkillMd, ArtifactType::SkillPack, ""),
            vec!["claude-code", "cursor"]
        );
    }

    #[test]
    fn test_platforms_format_mapping_and_mcp_list() {
        let empty = fm("x");
        assert_eq!(
            platforms(&empty, FormatStandard::Cursorrules, ArtifactType::Ruleset, ""),
            vec!["cursor"]
        );
        let mcp = platforms(&empty, FormatStandard::SkillMd, ArtifactType::McpServer, "");
        assert_eq!(mcp, MCP_CLIENTS);
    }

    #[test]
    fn test_platforms_extended_by_content_mentions() {
        let empty = fm("x");
        let got = platforms(
            &empty,
            FormatStandard::SkillMd,
            ArtifactType::SkillPack,
            "Also works in ChatGPT and Replit.",
        );
        assert!(got.contains(&"chatgpt".to_string()));
        assert!(got.contains(&"replit".to_string()));
    }

    #[test]
    fn test_permissions_inference() {
        let empty = fm("x");
        let flags = permissions(&empty, "Run `npx convert` in your terminal, then fetch the results from the API.");
        assert!(flags.shell_exec);
        assert!(flags.network_access);
        assert!(!flags.git_write);
    }

    #[test]
    fn test_permissions_declared_override_wins() {
        let f = fm("---\npermissions: shell, git\n---\n");
        let flags = permissions(&f, "this text mentions fetch and api everywhere");
        assert!(flags.shell_exec);
        assert!(flags.git_write);
        assert!(!flags.network_access);
    }

    #[test]
    fn test_category_score_one_is_null() {
        // "sql" appears once in text only: 1 point, below threshold.
        assert_eq!(detect_category(&[], "uses sql internally"), None);
    }

    #[test]
    fn test_category_score_two_wins() {
        // Two database keywords in text: exactly 2 points.
        assert_eq!(
            detect_category(&[], "sql migration helpers"),
            Some("database")
        );
    }

    #[test]
    fn test_category_topic_weight_is_three() {
        let topics = vec!["postgres".to_string()];
        let scores = score_categories(&topics, "");
        let db = scores.iter().find(|(s, _)| *s == "database").unwrap();
        assert_eq!(db.1, 3);
        assert_eq!(detect_category(&topics, ""), Some("database"));
    }

    #[test]
    fn test_category_tie_keeps_table_order() {
        // "testing" text keywords vs "documentation" text keywords, 2 each;
        // testing comes first in the table.
        let text = "unit test coverage for your docs and changelog";
        let scores = score_categories(&[], text);
        let testing = scores.iter().find(|(s, _)| *s == "testing").unwrap().1;
        let documentation = scores.iter().find(|(s, _)| *s == "documentation").unwrap().1;
        assert_eq!(testing, documentation);
        assert_eq!(detect_category(&[], text), Some("testing"));
    }

    #[test]
    fn test_category_deterministic() {
        let topics = vec!["docker".to_string()];
        let text = "deploy with terraform";
        let first = detect_category(&topics, text);
        for _ in 0..10 {
            assert_eq!(detect_category(&topics, text), first);
        }
    }

    #[test]
    fn test_skill_kind_hybrid_signals() {
        assert_eq!(
            skill_kind(Some(".claude/skills/x/SKILL.md"), &[], None),
            ("hybrid".to_string(), true)
        );
        let topics = vec!["claude".to_string(), "plugin".to_string()];
        assert_eq!(skill_kind(Some("skills/x/SKILL.md"), &topics, None).1, true);
        assert_eq!(skill_kind(Some("skills/x/SKILL.md"), &[], None).0, "skill");
    }

    #[test]
    fn test_slugify_idempotent() {
        let once = slugify("PDF & Office  Tools!");
        assert_eq!(once, "pdf-office-tools");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_slug_rejects_generic_dirs() {
        assert_eq!(slug_for(Some("skills/SKILL.md"), "pdf-helper"), "pdf-helper");
        assert_eq!(slug_for(Some("skills/pdf/SKILL.md"), "anything"), "pdf");
        assert_eq!(slug_for(None, "My_Repo"), "my-repo");
    }

    #[test]
    fn test_tags_prefer_frontmatter_then_topics_capped() {
        let f = fm("---\ntags: PDF, ocr\n---\n");
        let meta = RepoMetadata {
            topics: vec!["ignored".to_string()],
            ..Default::default()
        };
        assert_eq!(tags(&f, Some(&meta)), vec!["pdf", "ocr"]);

        let empty = fm("x");
        let many = RepoMetadata {
            topics: (0..20).map(|i| format!("t{}", i)).collect(),
            ..Default::default()
        };
        assert_eq!(tags(&empty, Some(&many)).len(), MAX_TAGS);
    }
}
