use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A headline record exactly as a feed produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    /// URL of the feed the record came from.
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawItem {
    /// Link if present, otherwise the guid.
    pub fn identity(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| self.guid.as_deref().map(str::trim).filter(|g| !g.is_empty()))
    }

    /// Host of the originating feed, or "unknown".
    pub fn source_label(&self) -> String {
        url::Url::parse(&self.source_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            published_at: None,
            embedding: None,
        }
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub title: String,
    pub items: Vec<NewsItem>,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Vec<f32>>,
    /// Set on the catch-all cluster built when no embeddings were available.
    #[serde(default)]
    pub fallback: bool,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn distinct_sources(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.source.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn urls(&self) -> HashSet<&str> {
        self.items.iter().map(|i| i.url.as_str()).collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.items.iter().map(|i| i.title.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakingDecision {
    pub cluster_id: String,
    pub rationale: String,
    pub sources: Vec<String>,
}

/// Headlines tied to the last event the caller reacted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSnapshot {
    pub titles: Vec<String>,
    #[serde(default)]
    pub cluster_title: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl HeadlineSnapshot {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            cluster_title: None,
            recorded_at: Utc::now(),
        }
    }
}
