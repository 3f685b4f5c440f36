use bn_core::{BreakingDecision, BreakingRules, Cluster, ScoringConfig};
use chrono::{DateTime, Utc};
use tracing::info;
use crate::score::recency_scores;

const MAX_SOURCES: usize = 5;

/// Flag the clusters that qualify as breaking news: enough coverage
/// (`min_items` members from `min_sources` outlets), or at least two very
/// recent members. Output follows input order.
pub fn detect_breaking(
    clusters: &[Cluster],
    rules: &BreakingRules,
    scoring: &ScoringConfig,
    now: DateTime<Utc>,
) -> Vec<BreakingDecision> {
    let mut out = Vec::new();

    for cluster in clusters {
        let recency = recency_scores(cluster, now, scoring);
        if recency.is_empty() {
            continue;
        }
        let recent_boost = recency.iter().copied().fold(f32::MIN, f32::max);
        let size = cluster.len();
        let sources = cluster.distinct_sources();

        let covered = size >= rules.min_items && sources >= rules.min_sources;
        let fresh = recent_boost >= rules.recency_boost && size >= 2;
        if !(covered || fresh) {
            continue;
        }

        let rationale = format!("size={}, sources={}, recentBoost={:.2}", size, sources, recent_boost);
        info!("🚨 Breaking: '{}' ({})", cluster.title, rationale);
        out.push(BreakingDecision {
            cluster_id: cluster.id.clone(),
            rationale,
            sources: cluster.items.iter().take(MAX_SOURCES).map(|i| i.url.clone()).collect(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bn_core::NewsItem;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn cluster(id: &str, sources: &[&str]) -> Cluster {
        Cluster {
            id: id.to_string(),
            title: id.to_string(),
            items: sources
                .iter()
                .enumerate()
                .map(|(i, s)| NewsItem::new(format!("{} {}", id, i), format!("https://{}/{}/{}", s, id, i), *s))
                .collect(),
            score: 0.0,
            centroid: None,
            fallback: false,
        }
    }

    fn detect(clusters: &[Cluster]) -> Vec<BreakingDecision> {
        detect_breaking(clusters, &BreakingRules::default(), &ScoringConfig::default(), now())
    }

    #[test]
    fn test_threshold_boundary() {
        let exact = cluster("exact", &["bbc", "bbc", "cnn"]);
        let decisions = detect(&[exact]);
        assert_eq!(decisions.len(), 1);
        assert!(decisions[0].rationale.contains("size=3, sources=2"));
        assert!(decisions[0].rationale.contains("recentBoost=0.50"));

        assert!(detect(&[cluster("few", &["bbc", "cnn"])]).is_empty());
        assert!(detect(&[cluster("mono", &["bbc", "bbc", "bbc"])]).is_empty());
    }

    #[test]
    fn test_recent_pair_qualifies() {
        let mut pair = cluster("pair", &["bbc", "bbc"]);
        pair.items[1].published_at = Some(now() - Duration::minutes(30));
        let decisions = detect(&[pair]);
        assert_eq!(decisions.len(), 1);

        let mut single = cluster("single", &["bbc"]);
        single.items[0].published_at = Some(now());
        assert!(detect(&[single]).is_empty());
    }

    #[test]
    fn test_sources_capped_and_order_preserved() {
        let big = cluster("big", &["a", "b", "c", "d", "e", "f", "g"]);
        let mid = cluster("mid", &["a", "b", "c"]);
        let decisions = detect(&[big, mid]);
        let ids: Vec<&str> = decisions.iter().map(|d| d.cluster_id.as_str()).collect();
        assert_eq!(ids, vec!["big", "mid"]);
        assert_eq!(decisions[0].sources.len(), 5);
    }

    #[test]
    fn test_empty_clusters_skipped() {
        let mut empty = cluster("empty", &[]);
        empty.items.clear();
        assert!(detect(&[empty]).is_empty());
        assert!(detect(&[]).is_empty());
    }
}
