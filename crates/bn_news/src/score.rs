use std::cmp::Ordering;
use bn_core::{Cluster, ScoringConfig};
use chrono::{DateTime, Utc};

/// Recency in `[recency_floor, recency_ceiling]`, falling linearly with age
/// over `decay_hours`. Undated items get `unknown_recency`; items dated in
/// the future count as brand new.
pub fn recency_score(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>, config: &ScoringConfig) -> f32 {
    let Some(published_at) = published_at else {
        return config.unknown_recency;
    };
    let hours = ((now - published_at).num_seconds() as f32 / 3600.0).max(0.0);
    let decay = if config.decay_hours > 0.0 { hours / config.decay_hours } else { 1.0 };
    (1.0 - decay).max(config.recency_floor).min(config.recency_ceiling)
}

pub fn recency_scores(cluster: &Cluster, now: DateTime<Utc>, config: &ScoringConfig) -> Vec<f32> {
    cluster
        .items
        .iter()
        .map(|i| recency_score(i.published_at, now, config))
        .collect()
}

/// `size_weight × members + source_weight × distinct sources + mean recency`.
/// The catch-all fallback cluster carries no signal beyond its size and is
/// scored by member count alone.
pub fn score_cluster(cluster: &Cluster, now: DateTime<Utc>, config: &ScoringConfig) -> f32 {
    if cluster.fallback || cluster.is_empty() {
        return cluster.len() as f32;
    }
    let recency = recency_scores(cluster, now, config);
    let avg_recency = recency.iter().sum::<f32>() / recency.len() as f32;
    config.size_weight * cluster.len() as f32
        + config.source_weight * cluster.distinct_sources() as f32
        + avg_recency
}

/// Score every cluster and sort by descending score.
pub fn rank_clusters(mut clusters: Vec<Cluster>, now: DateTime<Utc>, config: &ScoringConfig) -> Vec<Cluster> {
    for cluster in clusters.iter_mut() {
        cluster.score = score_cluster(cluster, now, config);
    }
    clusters.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    clusters
}
