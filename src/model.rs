//! Catalog data model: listings, categories, clients, and the closed enums
//! that classify a listing's packaging and source format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a listing is packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    SkillPack,
    McpServer,
    WorkflowPack,
    Ruleset,
    OpenapiAction,
    Extension,
    TemplateBundle,
    Plugin,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::SkillPack => "skill_pack",
            ArtifactType::McpServer => "mcp_server",
            ArtifactType::WorkflowPack => "workflow_pack",
            ArtifactType::Ruleset => "ruleset",
            ArtifactType::OpenapiAction => "openapi_action",
            ArtifactType::Extension => "extension",
            ArtifactType::TemplateBundle => "template_bundle",
            ArtifactType::Plugin => "plugin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactType::SkillPack => "skill pack",
            ArtifactType::McpServer => "MCP server",
            ArtifactType::WorkflowPack => "workflow pack",
            ArtifactType::Ruleset => "ruleset",
            ArtifactType::OpenapiAction => "OpenAPI action",
            ArtifactType::Extension => "extension",
            ArtifactType::TemplateBundle => "template bundle",
            ArtifactType::Plugin => "plugin",
        }
    }
}

impl FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "skill_pack" => Ok(ArtifactType::SkillPack),
            "mcp_server" => Ok(ArtifactType::McpServer),
            "workflow_pack" => Ok(ArtifactType::WorkflowPack),
            "ruleset" => Ok(ArtifactType::Ruleset),
            "openapi_action" => Ok(ArtifactType::OpenapiAction),
            "extension" => Ok(ArtifactType::Extension),
            "template_bundle" => Ok(ArtifactType::TemplateBundle),
            "plugin" => Ok(ArtifactType::Plugin),
            other => Err(format!(
                "Unknown artifact type '{}'. Expected one of: skill_pack, mcp_server, \
                 workflow_pack, ruleset, openapi_action, extension, template_bundle, plugin",
                other
            )),
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The on-disk convention the source document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStandard {
    SkillMd,
    AgentsMd,
    Cursorrules,
    Mdc,
    Generic,
}

impl FormatStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatStandard::SkillMd => "skill_md",
            FormatStandard::AgentsMd => "agents_md",
            FormatStandard::Cursorrules => "cursorrules",
            FormatStandard::Mdc => "mdc",
            FormatStandard::Generic => "generic",
        }
    }
}

impl fmt::Display for FormatStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five inferred capability flags. Display metadata, not a security
/// boundary: inference is keyword-based and leans toward false positives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default)]
    pub filesystem_read: bool,
    #[serde(default)]
    pub filesystem_write: bool,
    #[serde(default)]
    pub shell_exec: bool,
    #[serde(default)]
    pub network_access: bool,
    #[serde(default)]
    pub git_write: bool,
}

impl PermissionFlags {
    pub fn any(&self) -> bool {
        self.filesystem_read
            || self.filesystem_write
            || self.shell_exec
            || self.network_access
            || self.git_write
    }
}

/// A catalog record as written by the import pipeline.
///
/// Popularity counters that the importer does not own (installs, upvotes)
/// are intentionally absent so a re-import upsert cannot clobber them.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub repo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_path: Option<String>,
    pub github_url: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    pub artifact_type: ArtifactType,
    pub format_standard: FormatStandard,
    pub platforms: Vec<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub permissions: PermissionFlags,
    pub stars: i64,
    pub forks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub skill_type: String,
    pub has_plugin: bool,
    pub status: String,
    pub updated_at: String,
}

/// A catalog row as read back from the `skills` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredListing {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub readme: Option<String>,
    pub artifact_type: ArtifactType,
    #[serde(default = "default_format")]
    pub format_standard: FormatStandard,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub permissions: PermissionFlags,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub forks: i64,
    #[serde(default)]
    pub installs: i64,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub review_summary: Option<String>,
    #[serde(default)]
    pub review_strengths: Option<Vec<String>>,
    #[serde(default)]
    pub review_weaknesses: Option<Vec<String>>,
    #[serde(default)]
    pub review_score: Option<f64>,
}

fn default_format() -> FormatStandard {
    FormatStandard::Generic
}

/// Fixed taxonomy row a listing may point to. Never created by the importer.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// A known AI-agent integration target (static reference data).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_type_serde_names() {
        let json = serde_json::to_string(&ArtifactType::McpServer).unwrap();
        assert_eq!(json, "\"mcp_server\"");
        let back: ArtifactType = serde_json::from_str("\"template_bundle\"").unwrap();
        assert_eq!(back, ArtifactType::TemplateBundle);
    }

    #[test]
    fn test_artifact_type_from_str_accepts_hyphens() {
        assert_eq!(
            "mcp-server".parse::<ArtifactType>().unwrap(),
            ArtifactType::McpServer
        );
        assert!("daemon".parse::<ArtifactType>().is_err());
    }

    #[test]
    fn test_permission_flags_flatten_into_listing_json() {
        let flags = PermissionFlags {
            shell_exec: true,
            ..Default::default()
        };
        let value = serde_json::to_value(flags).unwrap();
        assert_eq!(value["shell_exec"], true);
        assert_eq!(value["network_access"], false);
    }
}
