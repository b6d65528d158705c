//! quire: front-matter content ingestion for Markdown sites
//!
//! This crate parses the front-matter of blog posts and portfolio entries,
//! validates it and aggregates the documents into a registry that a static
//! site generator can list, index and look up. Rendering is left to the caller.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use std::path::Path;

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "quire.yml";

/// The main application
#[derive(Debug, Clone)]
pub struct Quire {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory
    pub content_dir: std::path::PathBuf,
    /// Zone for naive front-matter dates
    pub timezone: Tz,
}

impl Quire {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let timezone = config.tz()?;
        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            timezone,
        })
    }

    /// Run one ingestion pass over the content directory
    pub fn ingest(&self) -> Result<content::Ingestion> {
        let loader = content::ContentLoader::new(self)?;
        Ok(loader.load()?)
    }

    /// The listing filter implied by the site configuration
    pub fn default_filter(&self) -> content::Filter {
        let mut filter = if self.config.build_drafts {
            content::Filter::all()
        } else {
            content::Filter::published()
        };
        if !self.config.build_future {
            filter = filter.until(self.now());
        }
        filter
    }

    /// Current time in the site's zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }
}
