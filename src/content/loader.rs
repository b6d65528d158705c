//! Content loader - ingests every content file under the content directory

use anyhow::Result;
use chrono_tz::Tz;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::document::source_id;
use super::{ContentError, ContentRegistry, Document, IngestFailure};
use crate::Quire;

/// Outcome of one ingestion run
#[derive(Debug)]
pub struct Ingestion {
    pub registry: ContentRegistry,
    /// Files that could not be ingested, in path order
    pub failures: Vec<IngestFailure>,
}

impl Ingestion {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    quire: &'a Quire,
    ignore: Vec<glob::Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(quire: &'a Quire) -> Result<Self> {
        let ignore = quire
            .config
            .ignore
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { quire, ignore })
    }

    /// Load every content file with the configured failure mode
    pub fn load(&self) -> Result<Ingestion, IngestFailure> {
        self.load_with(self.quire.config.fail_fast)
    }

    /// Load every content file.
    ///
    /// Files are parsed in parallel; the registry is assembled afterwards in
    /// path order. Without `fail_fast` a broken file is recorded and skipped.
    pub fn load_with(&self, fail_fast: bool) -> Result<Ingestion, IngestFailure> {
        let root = &self.quire.content_dir;
        if !root.exists() {
            tracing::warn!("Content directory {:?} does not exist", root);
            return Ok(Ingestion {
                registry: ContentRegistry::default(),
                failures: Vec::new(),
            });
        }

        let start = std::time::Instant::now();
        let mut failures = Vec::new();
        let mut paths = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file() && is_markdown_file(path) && !self.is_ignored(path)
                    {
                        paths.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let failure = IngestFailure {
                        path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
                        error: ContentError::Io(e.into()),
                    };
                    if fail_fast {
                        return Err(failure);
                    }
                    tracing::warn!("Failed to walk content: {}", failure);
                    failures.push(failure);
                }
            }
        }

        let tz = self.quire.timezone;
        let parsed: Vec<(PathBuf, Result<Document, ContentError>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = parse_file(root, &path, &tz);
                (path, result)
            })
            .collect();

        let mut seen = HashSet::new();
        let mut documents = Vec::with_capacity(parsed.len());

        for (path, result) in parsed {
            let error = match result {
                Ok(doc) if seen.contains(&doc.source) => ContentError::DuplicateIdentifier {
                    source_id: doc.source,
                },
                Ok(doc) => {
                    tracing::debug!("Loaded {:?} as {}", path, doc.source);
                    seen.insert(doc.source.clone());
                    documents.push(doc);
                    continue;
                }
                Err(e) => e,
            };

            let failure = IngestFailure { path, error };
            if fail_fast {
                return Err(failure);
            }
            tracing::warn!("Failed to load {}", failure);
            failures.push(failure);
        }

        let registry = ContentRegistry::new(documents).map_err(|error| IngestFailure {
            path: root.clone(),
            error,
        })?;

        tracing::info!(
            "Ingested {} documents ({} failed) in {:.2}s",
            registry.len(),
            failures.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(Ingestion { registry, failures })
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let relative = path
            .strip_prefix(&self.quire.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        self.ignore.iter().any(|p| p.matches(&relative))
    }
}

/// Read and parse a single content file
pub fn parse_file(root: &Path, path: &Path, tz: &Tz) -> Result<Document, ContentError> {
    let content = fs::read_to_string(path)?;
    Document::parse(source_id(root, path), &content, tz)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Filter;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\nBody of {}\n", title, date, title)
    }

    fn site() -> (TempDir, Quire) {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("content");
        write(&content, "posts/docker.md", &post("Docker", "2025-09-01"));
        write(&content, "posts/react/index.md", &post("React", "2025-11-28"));
        write(&content, "portfolio/site.markdown", &post("Site", "2024-03-10"));
        write(&content, "posts/notes.txt", "not markdown");
        write(&content, ".obsidian/cache.md", "ignored");
        let quire = Quire::new(tmp.path()).unwrap();
        (tmp, quire)
    }

    #[test]
    fn test_load_all() {
        let (_tmp, quire) = site();
        let ingestion = ContentLoader::new(&quire).unwrap().load().unwrap();
        assert!(ingestion.is_clean());

        let filter = Filter::published();
        let sources: Vec<_> = ingestion
            .registry
            .list(&filter)
            .map(|d| d.source.as_str())
            .collect();
        assert_eq!(sources, vec!["posts/react", "posts/docker", "portfolio/site"]);
        assert_eq!(
            ingestion.registry.get("posts/react").unwrap().body,
            "Body of React\n"
        );
    }

    #[test]
    fn test_malformed_file_does_not_abort() {
        let (tmp, quire) = site();
        write(
            &tmp.path().join("content"),
            "posts/broken.md",
            "---\ntitle: Broken\ndate: 2024-01-01\n",
        );

        let ingestion = ContentLoader::new(&quire).unwrap().load().unwrap();
        assert_eq!(ingestion.registry.len(), 3);
        assert_eq!(ingestion.failures.len(), 1);
        assert!(ingestion.failures[0].path.ends_with("posts/broken.md"));
        assert!(matches!(
            ingestion.failures[0].error,
            ContentError::MalformedFrontMatter { .. }
        ));
    }

    #[test]
    fn test_fail_fast() {
        let (tmp, quire) = site();
        write(
            &tmp.path().join("content"),
            "posts/untitled.md",
            "---\ndate: 2024-01-01\n---\n",
        );

        let loader = ContentLoader::new(&quire).unwrap();
        let failure = loader.load_with(true).unwrap_err();
        assert!(matches!(
            failure.error,
            ContentError::MissingRequiredField { field: "title" }
        ));
    }

    #[test]
    fn test_bundle_collision_is_duplicate() {
        let (tmp, quire) = site();
        write(
            &tmp.path().join("content"),
            "posts/react.md",
            &post("React again", "2025-01-01"),
        );

        let ingestion = ContentLoader::new(&quire).unwrap().load().unwrap();
        assert_eq!(ingestion.failures.len(), 1);
        assert!(matches!(
            &ingestion.failures[0].error,
            ContentError::DuplicateIdentifier { source_id } if source_id == "posts/react"
        ));
        // path order decides the winner: posts/react/ sorts before posts/react.md
        assert!(ingestion.failures[0].path.ends_with("posts/react.md"));
        assert_eq!(ingestion.registry.get("posts/react").unwrap().title(), "React");
    }

    #[test]
    fn test_ignore_patterns() {
        let (tmp, _) = site();
        write(tmp.path(), "quire.yml", "ignore:\n  - \"portfolio/**\"\n");
        let quire = Quire::new(tmp.path()).unwrap();

        let ingestion = ContentLoader::new(&quire).unwrap().load().unwrap();
        assert_eq!(ingestion.registry.len(), 2);
        assert!(ingestion.registry.get("portfolio/site").is_err());
    }

    #[test]
    fn test_missing_content_dir() {
        let tmp = TempDir::new().unwrap();
        let quire = Quire::new(tmp.path()).unwrap();
        let ingestion = ContentLoader::new(&quire).unwrap().load().unwrap();
        assert!(ingestion.registry.is_empty());
    }
}
