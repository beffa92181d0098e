//! Frontmatter extraction for markdown skill documents.
//!
//! A deliberate non-YAML parser: each line of a leading `---`-delimited block
//! that looks like `key: value` becomes an entry in a flat map, with `tags`
//! and `compatibility` additionally accepting the indented list syntax.
//! Multi-line scalars, nested maps, and anchors silently degrade to missing
//! fields. Parsing never fails; a document without frontmatter comes back
//! with an empty map and the whole input as body.

use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    pub raw: HashMap<String, String>,
    pub tags: Vec<String>,
    pub compatibility: Vec<String>,
    pub body: String,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(|s| s.as_str())
    }
}

fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2 {
        let bytes = v.as_bytes();
        if (bytes[0] == b'"' && bytes[v.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[v.len() - 1] == b'\'')
        {
            return &v[1..v.len() - 1];
        }
    }
    v
}

/// Split the block into (frontmatter lines, body). Returns `None` when the
/// input has no leading delimiter or the block never closes.
fn split_block(content: &str) -> Option<(Vec<&str>, String)> {
    let mut lines = content.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    let all: Vec<&str> = content.lines().collect();
    let close = all.iter().skip(1).position(|l| l.trim() == "---")? + 1;
    let block = all[1..close].to_vec();
    let body = all[close + 1..].join("\n").trim_start().to_string();
    Some((block, body))
}

/// Collect a list-valued key: indented `- item` lines when present, else a
/// comma-split of the scalar value.
fn list_field(block: &[&str], raw: &HashMap<String, String>, key: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut collecting = false;
    for line in block {
        let trimmed = line.trim_start();
        if collecting {
            if let Some(item) = trimmed.strip_prefix("- ") {
                let item = strip_quotes(item).to_string();
                if !item.is_empty() {
                    items.push(item);
                }
                continue;
            }
            break;
        }
        if trimmed == format!("{}:", key) {
            collecting = true;
        }
    }
    if items.is_empty() {
        if let Some(scalar) = raw.get(key) {
            items = scalar
                .split(',')
                .map(|s| strip_quotes(s).to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    items
}

pub fn parse(content: &str) -> Frontmatter {
    let (block, body) = match split_block(content) {
        Some(parts) => parts,
        None => {
            return Frontmatter {
                body: content.to_string(),
                ..Default::default()
            }
        }
    };

    let kv_re = Regex::new(r"^(\w[\w-]*):\s*(.+)$").expect("frontmatter regex");
    let mut raw = HashMap::new();
    for line in &block {
        if let Some(caps) = kv_re.captures(line.trim_end()) {
            raw.insert(caps[1].to_string(), strip_quotes(&caps[2]).to_string());
        }
    }

    let tags = list_field(&block, &raw, "tags");
    let compatibility = list_field(&block, &raw, "compatibility");

    Frontmatter {
        raw,
        tags,
        compatibility,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_scalars_round_trip() {
        let fm = parse("---\nname: pdf-tools\ndescription: \"Work with PDFs\"\nversion: 1.2.0\n---\n# Body\n");
        assert_eq!(fm.get("name"), Some("pdf-tools"));
        assert_eq!(fm.get("description"), Some("Work with PDFs"));
        assert_eq!(fm.get("version"), Some("1.2.0"));
        assert_eq!(fm.body, "# Body");
    }

    #[test]
    fn test_no_frontmatter_returns_whole_input_as_body() {
        let input = "# Just a document\n\nNo metadata here.";
        let fm = parse(input);
        assert!(fm.raw.is_empty());
        assert!(fm.tags.is_empty());
        assert_eq!(fm.body, input);
    }

    #[test]
    fn test_unterminated_block_treated_as_body() {
        let input = "---\nname: broken\nno closing delimiter";
        let fm = parse(input);
        assert!(fm.raw.is_empty());
        assert_eq!(fm.body, input);
    }

    #[test]
    fn test_tags_list_syntax() {
        let fm = parse("---\nname: x\ntags:\n  - pdf\n  - documents\n  - \"ocr\"\n---\nbody");
        assert_eq!(fm.tags, vec!["pdf", "documents", "ocr"]);
    }

    #[test]
    fn test_tags_comma_fallback() {
        let fm = parse("---\ntags: pdf, documents , ocr\n---\nbody");
        assert_eq!(fm.tags, vec!["pdf", "documents", "ocr"]);
    }

    #[test]
    fn test_compatibility_list() {
        let fm = parse("---\ncompatibility:\n  - claude-code\n  - cursor\n---\n");
        assert_eq!(fm.compatibility, vec!["claude-code", "cursor"]);
    }

    #[test]
    fn test_nested_maps_silently_degrade() {
        let fm = parse("---\nmeta:\n  author: someone\nname: ok\n---\nbody");
        assert_eq!(fm.get("name"), Some("ok"));
        // "author" is indented under a nested map; the flat parser skips it.
        assert!(fm.get("author").is_none());
    }
}
