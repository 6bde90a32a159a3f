//! Section-keyed portfolio collection and published snapshots.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::item::ProjectItem;

/// Mapping from section name to its items.
///
/// Sections keep first-encounter order from the feed. Items inside a
/// section are priority-descending, ties in feed row order. Built in one
/// pass by the parser and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortfolioData {
    sections: IndexMap<String, Vec<ProjectItem>>,
}

impl PortfolioData {
    /// Bucket items by section in encounter order, then stable-sort each
    /// bucket by priority descending.
    pub fn from_items(items: impl IntoIterator<Item = ProjectItem>) -> Self {
        let mut sections: IndexMap<String, Vec<ProjectItem>> = IndexMap::new();
        for item in items {
            sections.entry(item.section.clone()).or_default().push(item);
        }
        for bucket in sections.values_mut() {
            bucket.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
        Self { sections }
    }

    /// Items of one section; empty when the section is absent.
    pub fn section(&self, name: &str) -> &[ProjectItem] {
        self.sections.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &[ProjectItem])> {
        self.sections
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Every item across all sections, section by section.
    pub fn items(&self) -> impl Iterator<Item = &ProjectItem> {
        self.sections.values().flatten()
    }

    /// Featured items of a section, in section order.
    pub fn featured<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a ProjectItem> + use<'a> {
        self.section(name).iter().filter(|i| i.is_featured())
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn total_items(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<ProjectItem>> {
        self.sections
    }
}

/// One successfully loaded feed, shared read-only with consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Where the feed came from.
    pub source: String,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
    pub data: PortfolioData,
}

impl FeedSnapshot {
    pub fn new(source: impl Into<String>, data: PortfolioData) -> Self {
        Self {
            source: source.into(),
            fetched_at: Utc::now(),
            data,
        }
    }
}
