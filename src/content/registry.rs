//! Content registry - the in-memory aggregate of one ingestion run

use chrono::{DateTime, Datelike, FixedOffset};
use std::collections::{BTreeMap, HashMap};

use super::document::Document;
use super::error::ContentError;

/// Selects documents for a listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Include drafts
    pub drafts: bool,
    /// Only documents tagged with this tag
    pub tag: Option<String>,
    /// Only documents in this category
    pub category: Option<String>,
    /// Exclude documents dated after this instant
    pub until: Option<DateTime<FixedOffset>>,
}

impl Filter {
    /// Published documents only (no drafts)
    pub fn published() -> Self {
        Self::default()
    }

    /// Every document, drafts included
    pub fn all() -> Self {
        Self {
            drafts: true,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn until(mut self, instant: DateTime<FixedOffset>) -> Self {
        self.until = Some(instant);
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if doc.is_draft() && !self.drafts {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !doc.has_tag(tag) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !doc.has_category(category) {
                return false;
            }
        }
        if let Some(until) = &self.until {
            if doc.date > *until {
                return false;
            }
        }
        true
    }
}

/// Term (tag or category) with the number of documents carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub name: String,
    pub count: usize,
}

/// Parsed documents keyed by source identifier
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    /// Sorted by date descending, then source ascending
    documents: Vec<Document>,
    index: HashMap<String, usize>,
}

impl ContentRegistry {
    /// Build a registry, failing if two documents share a source identifier
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Result<Self, ContentError> {
        let mut documents: Vec<Document> = documents.into_iter().collect();
        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));

        let mut index = HashMap::with_capacity(documents.len());
        for (pos, doc) in documents.iter().enumerate() {
            if index.insert(doc.source.clone(), pos).is_some() {
                return Err(ContentError::DuplicateIdentifier {
                    source_id: doc.source.clone(),
                });
            }
        }

        Ok(Self { documents, index })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by source identifier
    pub fn get(&self, source: &str) -> Result<&Document, ContentError> {
        self.index
            .get(source)
            .map(|&pos| &self.documents[pos])
            .ok_or_else(|| ContentError::NotFound {
                source_id: source.to_string(),
            })
    }

    /// Documents matching `filter`, newest first.
    ///
    /// The iterator owns a copy of the filter, so it may be built inline.
    pub fn list(&self, filter: &Filter) -> impl Iterator<Item = &Document> + '_ {
        let filter = filter.clone();
        self.list_where(move |doc| filter.matches(doc))
    }

    /// Documents matching an arbitrary predicate, newest first
    pub fn list_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Document> + 'a
    where
        P: Fn(&Document) -> bool + 'a,
    {
        self.documents.iter().filter(move |doc| predicate(*doc))
    }

    /// Tag counts over the filtered set, most used first
    pub fn tags(&self, filter: &Filter) -> Vec<TermCount> {
        count_terms(self.list(filter).flat_map(|doc| doc.tags()))
    }

    /// Category counts over the filtered set, most used first
    pub fn categories(&self, filter: &Filter) -> Vec<TermCount> {
        count_terms(self.list(filter).flat_map(|doc| doc.categories()))
    }

    /// Filtered documents grouped by year, newest year first
    pub fn archives(&self, filter: &Filter) -> Vec<(i32, Vec<&Document>)> {
        let mut years: BTreeMap<i32, Vec<&Document>> = BTreeMap::new();
        for doc in self.documents.iter().filter(|doc| filter.matches(doc)) {
            years.entry(doc.date.year()).or_default().push(doc);
        }
        years.into_iter().rev().collect()
    }

    /// The newer and older neighbours of `source` within the filtered listing
    pub fn neighbors(
        &self,
        source: &str,
        filter: &Filter,
    ) -> Result<(Option<&Document>, Option<&Document>), ContentError> {
        let listed: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .collect();
        let pos = listed
            .iter()
            .position(|doc| doc.source == source)
            .ok_or_else(|| ContentError::NotFound {
                source_id: source.to_string(),
            })?;

        let newer = pos.checked_sub(1).map(|p| listed[p]);
        let older = listed.get(pos + 1).copied();
        Ok((newer, older))
    }
}

fn count_terms<'a>(terms: impl Iterator<Item = &'a String>) -> Vec<TermCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    terms
}
