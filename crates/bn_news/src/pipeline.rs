use bn_core::{BreakingDecision, Cluster, HeadlineSnapshot, NewsConfig, NewsItem, RawItem};
use bn_inference::EmbeddingGateway;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use crate::breaking::detect_breaking;
use crate::cluster::ClusterEngine;
use crate::dedup::dedupe;
use crate::gate::{headline_change, HeadlineChange};
use crate::normalize::normalize;
use crate::score::rank_clusters;
use crate::title::resolve_titles;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub change: HeadlineChange,
    /// Titles of every normalized headline seen this run.
    pub headlines: Vec<String>,
    /// Ranked clusters of this run, with duplicates merged away.
    pub clusters: Vec<Cluster>,
    pub breaking: Vec<BreakingDecision>,
    /// Previously retained clusters that do not overlap this run's clusters.
    pub retained: Vec<Cluster>,
}

impl Report {
    pub fn is_breaking(&self) -> bool {
        !self.breaking.is_empty()
    }

    pub fn breaking_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters
            .iter()
            .filter(|c| self.breaking.iter().any(|d| d.cluster_id == c.id))
    }

    /// Snapshot to persist once the caller has reacted to this report.
    pub fn headline_snapshot(&self) -> HeadlineSnapshot {
        let mut snapshot = HeadlineSnapshot::new(self.headlines.clone());
        snapshot.cluster_title = self.breaking_clusters().next().map(|c| c.title.clone());
        snapshot
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    /// The headline set barely moved; nothing was clustered.
    Unchanged(HeadlineChange),
    Evaluated(Report),
}

#[derive(Debug, Clone)]
pub struct NewsPipeline {
    engine: ClusterEngine,
    config: NewsConfig,
}

impl NewsPipeline {
    pub fn new(gateway: EmbeddingGateway, config: NewsConfig) -> Self {
        Self {
            engine: ClusterEngine::new(gateway, config.cluster.clone()),
            config,
        }
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// Cluster, label and rank items.
    pub async fn cluster(&self, items: Vec<NewsItem>) -> Vec<Cluster> {
        self.cluster_at(items, Utc::now()).await
    }

    pub async fn cluster_at(&self, items: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<Cluster> {
        let mut clusters = self.engine.cluster(items).await;
        resolve_titles(&mut clusters, &self.config.title);
        rank_clusters(clusters, now, &self.config.scoring)
    }

    pub async fn evaluate(
        &self,
        raw: Vec<RawItem>,
        retained: Vec<Cluster>,
        last_headlines: Option<&[String]>,
    ) -> Evaluation {
        self.evaluate_at(raw, retained, last_headlines, Utc::now()).await
    }

    /// Full decision run: normalize, gate against the last reacted-to
    /// headlines, cluster, remove overlap with `retained`, then flag
    /// breaking clusters.
    pub async fn evaluate_at(
        &self,
        raw: Vec<RawItem>,
        retained: Vec<Cluster>,
        last_headlines: Option<&[String]>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let items = normalize(raw);
        let headlines: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
        info!("📰 {} headlines after normalization", headlines.len());

        let change = headline_change(&headlines, last_headlines, self.config.gate.change_threshold);
        if !change.significant {
            info!(
                "⏭️ Headlines unchanged ({:.0}% new, threshold {:.0}%), skipping clustering",
                change.change_ratio * 100.0,
                self.config.gate.change_threshold * 100.0
            );
            return Evaluation::Unchanged(change);
        }

        let clusters = self.cluster_at(items, now).await;
        let deduped = dedupe(clusters, retained, &self.config.dedup);
        let breaking = detect_breaking(&deduped.primary, &self.config.breaking, &self.config.scoring, now);
        info!(
            "✨ {} clusters, {} breaking, {} retained",
            deduped.primary.len(),
            breaking.len(),
            deduped.secondary.len()
        );

        Evaluation::Evaluated(Report {
            change,
            headlines,
            clusters: deduped.primary,
            breaking,
            retained: deduped.secondary,
        })
    }
}
