//! List site content

use anyhow::Result;

use crate::content::{ContentRegistry, Filter, TermCount};
use crate::Quire;

/// Listing switches from the command line
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Include drafts
    pub drafts: bool,
    /// Include documents dated in the future
    pub future: bool,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl ListOptions {
    /// Combine the switches with the site defaults
    pub fn filter(&self, quire: &Quire) -> Filter {
        let mut filter = quire.default_filter();
        if self.drafts {
            filter.drafts = true;
        }
        if self.future {
            filter.until = None;
        }
        filter.tag = self.tag.clone();
        filter.category = self.category.clone();
        filter
    }
}

/// List site content by type
pub fn run(quire: &Quire, content_type: &str, options: &ListOptions) -> Result<()> {
    let ingestion = quire.ingest()?;
    let filter = options.filter(quire);
    let lines = render(&ingestion.registry, content_type, &filter)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Produce the listing lines for a content type
pub fn render(registry: &ContentRegistry, content_type: &str, filter: &Filter) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let docs: Vec<_> = registry.list(filter).collect();
            lines.push(format!("Posts ({}):", docs.len()));
            for doc in docs {
                let marker = if doc.is_draft() { " (draft)" } else { "" };
                lines.push(format!(
                    "  {} - {}{} [{}]",
                    doc.date.format("%Y-%m-%d"),
                    doc.title(),
                    marker,
                    doc.source
                ));
            }
        }
        "tag" | "tags" => {
            let tags = registry.tags(filter);
            lines.push(format!("Tags ({}):", tags.len()));
            lines.extend(term_lines(&tags));
        }
        "category" | "categories" => {
            let categories = registry.categories(filter);
            lines.push(format!("Categories ({}):", categories.len()));
            lines.extend(term_lines(&categories));
        }
        "archive" | "archives" => {
            for (year, docs) in registry.archives(filter) {
                lines.push(format!("{} ({}):", year, docs.len()));
                for doc in docs {
                    lines.push(format!(
                        "  {} - {} [{}]",
                        doc.date.format("%m-%d"),
                        doc.title(),
                        doc.source
                    ));
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, archive",
                content_type
            );
        }
    }

    Ok(lines)
}

fn term_lines(terms: &[TermCount]) -> impl Iterator<Item = String> + '_ {
    terms
        .iter()
        .map(|term| format!("  {} ({})", term.name, term.count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Document, FrontMatter};

    fn registry() -> ContentRegistry {
        let mut docker = FrontMatter::new("Docker Tips", "2025-09-01");
        docker.tags = vec!["Docker".to_string()];
        docker.categories = vec!["DevOps".to_string()];

        let mut react = FrontMatter::new("React Patterns", "2025-11-28");
        react.tags = vec!["React".to_string(), "Docker".to_string()];

        let mut wip = FrontMatter::new("Go Layout", "2024-02-02");
        wip.draft = true;

        ContentRegistry::new(vec![
            Document::new("posts/docker", docker, "").unwrap(),
            Document::new("posts/react", react, "").unwrap(),
            Document::new("posts/go", wip, "").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_list_posts() {
        let lines = render(&registry(), "post", &Filter::published()).unwrap();
        assert_eq!(
            lines,
            vec![
                "Posts (2):",
                "  2025-11-28 - React Patterns [posts/react]",
                "  2025-09-01 - Docker Tips [posts/docker]",
            ]
        );
    }

    #[test]
    fn test_list_drafts_marked() {
        let lines = render(&registry(), "posts", &Filter::all()).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "  2024-02-02 - Go Layout (draft) [posts/go]");
    }

    #[test]
    fn test_list_tags() {
        let lines = render(&registry(), "tags", &Filter::published()).unwrap();
        assert_eq!(lines, vec!["Tags (2):", "  Docker (2)", "  React (1)"]);
    }

    #[test]
    fn test_list_archives() {
        let lines = render(&registry(), "archive", &Filter::all()).unwrap();
        assert_eq!(lines[0], "2025 (2):");
        assert_eq!(lines[3], "2024 (1):");
    }

    #[test]
    fn test_unknown_type() {
        assert!(render(&registry(), "route", &Filter::published()).is_err());
    }
}
