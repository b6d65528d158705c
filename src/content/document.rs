//! Document model

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Serialize;
use std::path::Path;

use super::error::ContentError;
use super::frontmatter::FrontMatter;
use super::summary::Summary;

/// One parsed content file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Logical source path, unique within a registry
    pub source: String,

    /// Publication date parsed from front-matter
    pub date: DateTime<FixedOffset>,

    /// Decoded front-matter
    pub metadata: FrontMatter,

    /// Raw markdown body
    pub body: String,
}

impl Document {
    /// Build a document, interpreting naive dates as UTC
    pub fn new(
        source: impl Into<String>,
        metadata: FrontMatter,
        body: impl Into<String>,
    ) -> Result<Self, ContentError> {
        Self::with_timezone(source, metadata, body, &Tz::UTC)
    }

    /// Build a document, interpreting naive dates in `tz`
    pub fn with_timezone(
        source: impl Into<String>,
        metadata: FrontMatter,
        body: impl Into<String>,
        tz: &Tz,
    ) -> Result<Self, ContentError> {
        let date = metadata.parse_date(tz).ok_or_else(|| {
            ContentError::malformed(format!("invalid date: {:?}", metadata.date))
        })?;

        Ok(Self {
            source: source.into(),
            date,
            metadata,
            body: body.into(),
        })
    }

    /// Parse a whole file's text into a document
    pub fn parse(source: impl Into<String>, content: &str, tz: &Tz) -> Result<Self, ContentError> {
        let (metadata, body) = FrontMatter::parse(content)?;
        Self::with_timezone(source, metadata, body, tz)
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn is_draft(&self) -> bool {
        self.metadata.draft
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    pub fn categories(&self) -> &[String] {
        &self.metadata.categories
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.metadata.categories.iter().any(|c| c == category)
    }

    /// URL-friendly name, taken from the last path segment
    pub fn slug(&self) -> String {
        let name = self.source.rsplit('/').next().unwrap_or(&self.source);
        slug::slugify(name)
    }

    /// Plain-text statistics of the body
    pub fn summary(&self) -> Summary {
        Summary::of(&self.body)
    }

    /// Write the document back out as a YAML-fenced file
    pub fn to_source(&self) -> Result<String, serde_yaml::Error> {
        let yaml = self.metadata.to_yaml()?;
        Ok(format!("---\n{}---\n{}", yaml, self.body))
    }
}

/// Derive the logical source identifier for a file under `root`.
///
/// The markdown extension is dropped and a bundle's `index.md` stands for its
/// directory, so `posts/a.md` and `posts/a/index.md` share an identifier.
pub fn source_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = parts.pop() {
        let stem = last
            .strip_suffix(".markdown")
            .or_else(|| last.strip_suffix(".md"))
            .unwrap_or(&last)
            .to_string();
        if stem != "index" || parts.is_empty() {
            parts.push(stem);
        }
    }

    parts.join("/")
}
