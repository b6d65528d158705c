//! Validate every content file

use anyhow::Result;

use crate::content::{ContentLoader, Ingestion};
use crate::Quire;

/// Ingest the site and report failures.
///
/// Fails when any file could not be ingested.
pub fn run(quire: &Quire, fail_fast: bool) -> Result<Ingestion> {
    let loader = ContentLoader::new(quire)?;
    let ingestion = loader.load_with(fail_fast || quire.config.fail_fast)?;

    let drafts = ingestion
        .registry
        .list_where(|doc| doc.is_draft())
        .count();
    println!(
        "{} documents ({} drafts)",
        ingestion.registry.len(),
        drafts
    );

    if !ingestion.is_clean() {
        println!("Failures ({}):", ingestion.failures.len());
        for failure in &ingestion.failures {
            println!("  {}", failure);
        }
        anyhow::bail!("{} file(s) failed to load", ingestion.failures.len());
    }

    Ok(ingestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_reports_failures() {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("content").join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("ok.md"), "---\ntitle: Ok\ndate: 2024-01-01\n---\n").unwrap();

        let quire = Quire::new(tmp.path()).unwrap();
        let ingestion = run(&quire, false).unwrap();
        assert_eq!(ingestion.registry.len(), 1);

        fs::write(posts.join("bad.md"), "no front matter").unwrap();
        assert!(run(&quire, false).is_err());
        assert!(run(&quire, true).is_err());
    }
}
