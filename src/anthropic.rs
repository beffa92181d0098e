//! AI review generation via the Anthropic Messages API.
//!
//! One templated prompt per listing. A malformed or out-of-range response is
//! discarded, never retried.

use crate::model::StoredListing;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const MODEL: &str = "claude-sonnet-4-5";
const MAX_CONTENT_CHARS: usize = 12_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub quality_score: f64,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

fn review_prompt(listing: &StoredListing) -> String {
    let content: String = listing
        .content
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(MAX_CONTENT_CHARS)
        .collect();
    format!(
        "You are reviewing a listing in a catalog of AI agent skills.\n\
         Name: {name}\n\
         Type: {artifact}\n\
         Description: {description}\n\
         Content:\n{content}\n\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"summary\": \"2-3 sentence assessment\", \
         \"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \
         \"quality_score\": <0-10>}}",
        name = listing.name,
        artifact = listing.artifact_type.label(),
        description = listing.description,
        content = content,
    )
}

/// Pull the first JSON object out of the model's text and validate it.
/// Returns `None` for anything unparseable or with a score outside 0–10.
fn parse_review(text: &str) -> Option<Review> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let review: Review = serde_json::from_str(&text[start..=end]).ok()?;
    if review.summary.trim().is_empty() {
        return None;
    }
    if !(0.0..=10.0).contains(&review.quality_score) {
        return None;
    }
    Some(review)
}

/// Generate a review for one listing. `Ok(None)` means the model responded
/// but the response was discarded as malformed.
pub fn generate_review(api_key: &str, listing: &StoredListing) -> Result<Option<Review>> {
    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let response = http
        .post(MESSAGES_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .json(&json!({
            "model": MODEL,
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": review_prompt(listing)}],
        }))
        .send()
        .context("Failed to reach the Anthropic API")?;
    let status = response.status();
    let body: MessagesResponse = response
        .json()
        .context("Unexpected response from the Anthropic API")?;
    if !status.is_success() {
        anyhow::bail!("Anthropic API error ({})", status);
    }
    let text = body
        .content
        .first()
        .map(|b| b.text.as_str())
        .unwrap_or_default();
    Ok(parse_review(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_accepts_surrounding_prose() {
        let text = "Here is the review:\n{\"summary\": \"Solid skill.\", \"strengths\": [\"clear\"], \"weaknesses\": [], \"quality_score\": 7.5}\nDone.";
        let review = parse_review(text).unwrap();
        assert_eq!(review.summary, "Solid skill.");
        assert_eq!(review.strengths, vec!["clear"]);
        assert_eq!(review.quality_score, 7.5);
    }

    #[test]
    fn test_parse_review_discards_out_of_range_score() {
        let text = "{\"summary\": \"x\", \"quality_score\": 11}";
        assert!(parse_review(text).is_none());
        let text = "{\"summary\": \"x\", \"quality_score\": -1}";
        assert!(parse_review(text).is_none());
    }

    #[test]
    fn test_parse_review_discards_malformed() {
        assert!(parse_review("no json here").is_none());
        assert!(parse_review("{\"quality_score\": 5}").is_none());
        assert!(parse_review("{\"summary\": \"  \", \"quality_score\": 5}").is_none());
    }
}
