//! Environment configuration, read once at startup.

use anyhow::{bail, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
    pub github_token: Option<String>,
    pub anthropic_api_key: Option<String>,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supabase_url = match non_empty("SUPABASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => bail!(
                "SUPABASE_URL is not set. Export your project URL, e.g. \
                 SUPABASE_URL=https://<project-ref>.supabase.co"
            ),
        };
        Ok(Self {
            supabase_url,
            anon_key: non_empty("SUPABASE_ANON_KEY"),
            service_role_key: non_empty("SUPABASE_SERVICE_ROLE_KEY"),
            github_token: non_empty("GITHUB_TOKEN"),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
        })
    }

    /// Key for read-only catalog access.
    pub fn read_key(&self) -> Result<&str> {
        match self.anon_key.as_deref().or(self.service_role_key.as_deref()) {
            Some(key) => Ok(key),
            None => bail!(
                "SUPABASE_ANON_KEY is not set. Copy the anon/public key from your \
                 Supabase project settings."
            ),
        }
    }

    /// Key required for writes (import --apply, reviews --apply).
    pub fn write_key(&self) -> Result<&str> {
        match self.service_role_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!(
                "SUPABASE_SERVICE_ROLE_KEY is not set. Writes require the service-role \
                 key from your Supabase project settings (keep it out of shell history)."
            ),
        }
    }

    pub fn anthropic_key(&self) -> Result<&str> {
        match self.anthropic_api_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!("ANTHROPIC_API_KEY is not set. Reviews need an Anthropic API key."),
        }
    }
}
