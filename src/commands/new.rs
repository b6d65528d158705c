//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Quire;

/// Create a new draft post and return its path.
///
/// Uses `scaffolds/post.md` when present, replacing `{{ title }}` and
/// `{{ date }}`; otherwise writes minimal YAML front-matter.
pub fn create_post(quire: &Quire, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = quire.now();

    let relative = match path {
        Some(p) if p.ends_with(".md") || p.ends_with(".markdown") => p.to_string(),
        Some(p) => format!("{}.md", p),
        None => format!("{}/{}.md", quire.config.new_post_dir, slug::slugify(title)),
    };
    let file_path = quire.content_dir.join(relative);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = quire.base_dir.join("scaffolds").join("post.md");
    let content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
            .replace("{{ title }}", title)
            .replace("{{ date }}", &now.to_rfc3339())
    } else {
        let mut front_matter = FrontMatter::new(title, now.to_rfc3339());
        front_matter.draft = true;
        if !quire.config.author.is_empty() {
            front_matter.author = Some(quire.config.author.clone());
        }
        format!("---\n{}---\n", front_matter.to_yaml()?)
    };

    // refuse to write something the loader would reject
    FrontMatter::parse(&content)
        .with_context(|| format!("Scaffold {:?} produces invalid front-matter", scaffold_path))?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
