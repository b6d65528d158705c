//! Show a single document

use anyhow::Result;
use serde::Serialize;

use crate::content::{ContentRegistry, Document, Filter, Summary};
use crate::Quire;

/// Everything known about one document
#[derive(Debug, Serialize)]
pub struct DocumentView<'a> {
    #[serde(flatten)]
    pub document: &'a Document,
    pub summary: Summary,
    pub newer: Option<&'a str>,
    pub older: Option<&'a str>,
}

impl<'a> DocumentView<'a> {
    pub fn new(registry: &'a ContentRegistry, source: &str, filter: &Filter) -> Result<Self> {
        let document = registry.get(source)?;
        // drafts are not part of the listing, so they have no neighbours
        let (newer, older) = if filter.matches(document) {
            registry.neighbors(source, filter)?
        } else {
            (None, None)
        };

        Ok(Self {
            document,
            summary: document.summary(),
            newer: newer.map(|d| d.source.as_str()),
            older: older.map(|d| d.source.as_str()),
        })
    }
}

/// Print one document, as text or JSON
pub fn run(quire: &Quire, source: &str, json: bool) -> Result<()> {
    let ingestion = quire.ingest()?;
    let filter = quire.default_filter();
    let view = DocumentView::new(&ingestion.registry, source, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let doc = view.document;
    let meta = &doc.metadata;
    println!("{}", doc.title());
    println!("  source:   {}", doc.source);
    println!("  date:     {}", doc.date.to_rfc3339());
    if doc.is_draft() {
        println!("  draft:    yes");
    }
    if let Some(author) = &meta.author {
        println!("  author:   {}", author);
    }
    if !meta.tags.is_empty() {
        println!("  tags:     {}", meta.tags.join(", "));
    }
    if !meta.categories.is_empty() {
        println!("  category: {}", meta.categories.join(", "));
    }
    if let Some(description) = &meta.description {
        println!("  summary:  {}", description);
    }
    if let Some(image) = meta.cover.as_ref().and_then(|c| c.image.as_deref()) {
        println!("  cover:    {}", image);
    }
    println!(
        "  words:    {} (~{} min)",
        view.summary.word_count, view.summary.reading_time
    );
    if let Some(newer) = view.newer {
        println!("  newer:    {}", newer);
    }
    if let Some(older) = view.older {
        println!("  older:    {}", older);
    }

    Ok(())
}
