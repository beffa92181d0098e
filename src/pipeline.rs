//! The import pipeline: discovery, inference, and record building.
//!
//! This is the single source of truth for field inference — the `import`
//! command (single and `--all`) and the interactive mode all come through
//! here, so no two entry points can drift apart.

use crate::frontmatter;
use crate::github::{
    discover_skill_md, BulkCandidate, FetchOutcome, GithubClient, RepoMetadata, RepoRef, SourceDoc,
};
use crate::infer;
use crate::model::{ArtifactType, FormatStandard, Listing};
use anyhow::{bail, Result};

/// Explicit flag values that take precedence over inference.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub artifact_type: Option<ArtifactType>,
}

/// A fully built record, with the category still unresolved (slug, not id —
/// resolution needs the database and happens at persist time).
#[derive(Debug)]
pub struct BuiltImport {
    pub record: Listing,
    pub category_slug: Option<String>,
    /// Category came from an explicit flag; a missing row is then fatal
    /// instead of silently null.
    pub category_explicit: bool,
}

fn parent_dir_path(path: &str) -> Option<String> {
    let (dir, _) = path.rsplit_once('/')?;
    if dir.is_empty() {
        None
    } else {
        Some(dir.to_string())
    }
}

/// Build the persistence record from fetched inputs. Pure — all I/O happens
/// before this point.
pub fn build_record(
    repo: &RepoRef,
    meta: Option<&RepoMetadata>,
    doc: &SourceDoc,
    readme: Option<&str>,
    is_plugin: bool,
    overrides: &Overrides,
) -> BuiltImport {
    let fm = frontmatter::parse(&doc.content);
    let format = infer::format_for_path(&doc.path);
    let dir_name = infer::parent_dir_name(&doc.path);
    let topics: Vec<String> = meta.map(|m| m.topics.clone()).unwrap_or_default();

    // A README-only import uses the README as content; there is no separate
    // supplementary doc in that case.
    let readme_distinct = readme.filter(|r| *r != doc.content);

    let artifact = overrides
        .artifact_type
        .or_else(|| is_plugin.then_some(ArtifactType::Plugin))
        .unwrap_or_else(|| infer::artifact_type(&fm, &repo.repo));

    let slug = overrides
        .slug
        .clone()
        .map(|s| infer::slugify(&s))
        .unwrap_or_else(|| infer::slug_for(Some(&doc.path), &repo.repo));

    let name = overrides.name.clone().unwrap_or_else(|| {
        infer::display_name(&fm, readme, dir_name.as_deref(), &repo.repo)
    });

    let description = infer::description(
        &fm,
        readme.or(Some(fm.body.as_str())),
        meta,
        artifact,
        &repo.owner,
        &repo.repo,
    );

    let category_blob = format!(
        "{} {} {}",
        description,
        readme.unwrap_or(""),
        repo.repo
    );
    let (category_slug, category_explicit) = match &overrides.category {
        Some(slug) => (Some(slug.clone()), true),
        None => (
            infer::detect_category(&topics, &category_blob).map(|s| s.to_string()),
            false,
        ),
    };

    let (skill_type, has_plugin) = infer::skill_kind(Some(&doc.path), &topics, readme);

    let github_url = match parent_dir_path(&doc.path) {
        Some(dir) if format != FormatStandard::Generic || is_plugin => {
            format!("{}/tree/HEAD/{}", repo.url(), dir)
        }
        _ => repo.url(),
    };

    let record = Listing {
        slug,
        name,
        description,
        owner: repo.owner.clone(),
        repo: repo.repo.clone(),
        skill_path: Some(doc.path.clone()),
        github_url,
        content: doc.content.clone(),
        readme: readme_distinct.map(|r| r.to_string()),
        artifact_type: artifact,
        format_standard: format,
        platforms: infer::platforms(&fm, format, artifact, &doc.content),
        tags: infer::tags(&fm, meta),
        permissions: infer::permissions(&fm, &doc.content),
        stars: meta.map(|m| m.stars).unwrap_or(0),
        forks: meta.map(|m| m.forks).unwrap_or(0),
        category_id: None,
        skill_type,
        has_plugin: has_plugin || is_plugin,
        status: "published".to_string(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    BuiltImport {
        record,
        category_slug,
        category_explicit,
    }
}

/// Fetch the supplementary README for a discovered skill document: the
/// skill's own directory first, then the repo root.
fn fetch_readme(gh: &GithubClient, repo: &RepoRef, doc_path: &str) -> Result<Option<String>> {
    if let Some(dir) = parent_dir_path(doc_path) {
        match gh.fetch_raw(&repo.owner, &repo.repo, &format!("{}/README.md", dir)) {
            FetchOutcome::Found(content) => return Ok(Some(content)),
            FetchOutcome::NotFound => {}
            FetchOutcome::Failed(e) => return Err(e.into()),
        }
    }
    gh.fetch_raw(&repo.owner, &repo.repo, "README.md").into_result()
}

/// Run discovery and build the record for a single repo reference.
pub fn discover_and_build(
    gh: &GithubClient,
    repo: &RepoRef,
    overrides: &Overrides,
) -> Result<BuiltImport> {
    let meta = gh.repo_metadata(&repo.owner, &repo.repo).into_result()?;

    if let Some(doc) = discover_skill_md(gh, repo)? {
        let readme = fetch_readme(gh, repo, &doc.path)?;
        return Ok(build_record(
            repo,
            meta.as_ref(),
            &doc,
            readme.as_deref(),
            false,
            overrides,
        ));
    }

    // No skill document anywhere: fall back to a README-only generic import.
    match gh.fetch_raw(&repo.owner, &repo.repo, "README.md") {
        FetchOutcome::Found(content) => {
            let doc = SourceDoc {
                path: "README.md".to_string(),
                content,
            };
            let readme = doc.content.clone();
            Ok(build_record(
                repo,
                meta.as_ref(),
                &doc,
                Some(&readme),
                false,
                overrides,
            ))
        }
        FetchOutcome::NotFound => bail!(
            "No SKILL.md or README.md found in {}/{}",
            repo.owner,
            repo.repo
        ),
        FetchOutcome::Failed(e) => Err(e.into()),
    }
}

/// Build the record for one bulk-discovered candidate path.
pub fn build_candidate(
    gh: &GithubClient,
    repo: &RepoRef,
    meta: Option<&RepoMetadata>,
    candidate: &BulkCandidate,
) -> Result<BuiltImport> {
    let content = match gh.fetch_raw(&repo.owner, &repo.repo, &candidate.doc_path) {
        FetchOutcome::Found(content) => content,
        FetchOutcome::NotFound => bail!("{} disappeared between listing and fetch", candidate.doc_path),
        FetchOutcome::Failed(e) => return Err(e.into()),
    };
    let doc = SourceDoc {
        path: candidate.doc_path.clone(),
        content,
    };
    let readme = if candidate.is_plugin {
        Some(doc.content.clone())
    } else {
        fetch_readme(gh, repo, &doc.path)?
    };
    Ok(build_record(
        repo,
        meta,
        &doc,
        readme.as_deref(),
        candidate.is_plugin,
        &Overrides::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormatStandard;

    fn repo_ref(subpath: Option<&str>) -> RepoRef {
        RepoRef {
            owner: "anthropics".to_string(),
            repo: "skills".to_string(),
            subpath: subpath.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_skill_md_import_semantics() {
        let doc = SourceDoc {
            path: "skills/pdf/SKILL.md".to_string(),
            content: "---\nname: pdf\ndescription: Work with PDF files.\n---\n# PDF\nInstructions."
                .to_string(),
        };
        let built = build_record(
            &repo_ref(Some("skills/pdf")),
            None,
            &doc,
            None,
            false,
            &Overrides::default(),
        );
        assert_eq!(built.record.slug, "pdf");
        assert_eq!(built.record.artifact_type, ArtifactType::SkillPack);
        assert_eq!(built.record.format_standard, FormatStandard::SkillMd);
        assert_eq!(built.record.description, "Work with PDF files.");
        assert_eq!(built.record.skill_path.as_deref(), Some("skills/pdf/SKILL.md"));
        assert!(built.record.github_url.ends_with("/tree/HEAD/skills/pdf"));
    }

    #[test]
    fn test_readme_only_import_semantics() {
        let readme = "# Handy Repo\n\nA grab bag of prompts.";
        let doc = SourceDoc {
            path: "README.md".to_string(),
            content: readme.to_string(),
        };
        let built = build_record(
            &repo_ref(None),
            None,
            &doc,
            Some(readme),
            false,
            &Overrides::default(),
        );
        assert_eq!(built.record.format_standard, FormatStandard::Generic);
        assert_eq!(built.record.slug, "skills");
        assert_eq!(built.record.content, readme);
        // Content already is the README; no supplementary copy stored.
        assert!(built.record.readme.is_none());
        assert_eq!(built.record.github_url, "https://github.com/anthropics/skills");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let doc = SourceDoc {
            path: "skills/pdf/SKILL.md".to_string(),
            content: "---\nname: pdf\n---\nbody".to_string(),
        };
        let overrides = Overrides {
            slug: Some("Custom Slug".to_string()),
            name: Some("Given Name".to_string()),
            category: Some("coding".to_string()),
            artifact_type: Some(ArtifactType::Ruleset),
        };
        let built = build_record(&repo_ref(None), None, &doc, None, false, &overrides);
        assert_eq!(built.record.slug, "custom-slug");
        assert_eq!(built.record.name, "Given Name");
        assert_eq!(built.record.artifact_type, ArtifactType::Ruleset);
        assert_eq!(built.category_slug.as_deref(), Some("coding"));
        assert!(built.category_explicit);
    }

    #[test]
    fn test_plugin_candidate_forces_plugin_type() {
        let doc = SourceDoc {
            path: "my-plugin/README.md".to_string(),
            content: "# My Plugin\n\nA Claude Code plugin.".to_string(),
        };
        let readme = doc.content.clone();
        let built = build_record(
            &repo_ref(None),
            None,
            &doc,
            Some(readme.as_str()),
            true,
            &Overrides::default(),
        );
        assert_eq!(built.record.artifact_type, ArtifactType::Plugin);
        assert_eq!(built.record.slug, "my-plugin");
        assert!(built.record.has_plugin);
    }
}
