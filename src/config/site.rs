//! Site configuration (quire.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    /// IANA zone used for dates written without an offset
    pub timezone: String,

    // Directory
    pub content_dir: String,
    /// Directory under the content dir that `new` writes into
    pub new_post_dir: String,
    /// Glob patterns, relative to the content dir, of files to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    // Ingestion
    /// Abort on the first broken file instead of collecting failures
    pub fail_fast: bool,
    /// List drafts by default
    pub build_drafts: bool,
    /// List documents dated in the future by default
    pub build_future: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            author: String::new(),
            timezone: "UTC".to_string(),

            content_dir: "content".to_string(),
            new_post_dir: "posts".to_string(),
            ignore: Vec::new(),

            fail_fast: false,
            build_drafts: false,
            build_future: true,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Resolve the configured time zone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", self.timezone, e))
    }
}
