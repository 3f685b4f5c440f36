use bn_core::{cosine_similarity, Cluster, ClusterConfig, NewsItem};
use bn_inference::{EmbeddingGateway, Embeddings};
use tracing::{debug, info, warn};
use crate::magnitude;

/// Cluster under construction. The centroid is kept as a running mean so
/// absorbing an item costs O(dimensions) regardless of cluster size.
struct Seed {
    items: Vec<NewsItem>,
    centroid: Vec<f32>,
}

impl Seed {
    fn new(item: NewsItem, embedding: Vec<f32>) -> Self {
        Self {
            centroid: embedding.clone(),
            items: vec![item.with_embedding(embedding)],
        }
    }

    fn absorb(&mut self, item: NewsItem, embedding: Vec<f32>) {
        let n = (self.items.len() + 1) as f32;
        for (c, x) in self.centroid.iter_mut().zip(&embedding) {
            *c += (x - *c) / n;
        }
        self.items.push(item.with_embedding(embedding));
    }

    fn into_cluster(self, index: usize) -> Cluster {
        Cluster {
            id: format!("cluster-{}", index),
            title: self.items[0].title.clone(),
            items: self.items,
            score: 0.0,
            centroid: Some(self.centroid),
            fallback: false,
        }
    }
}

/// Greedy nearest-centroid assignment in input order. Each item joins the
/// most similar existing cluster when that similarity reaches `threshold`,
/// otherwise it seeds a new one. Ties go to the earliest cluster.
///
/// `embeddings` must be parallel to `items`.
pub fn greedy_cluster(items: Vec<NewsItem>, embeddings: Vec<Vec<f32>>, threshold: f32) -> Vec<Cluster> {
    let mut seeds: Vec<Seed> = Vec::new();

    for (item, embedding) in items.into_iter().zip(embeddings) {
        let mut best: Option<(usize, f32)> = None;
        for (i, seed) in seeds.iter().enumerate() {
            let sim = cosine_similarity(&embedding, &seed.centroid);
            if best.map_or(true, |(_, b)| sim > b) {
                best = Some((i, sim));
            }
        }

        match best {
            Some((i, sim)) if sim >= threshold => {
                debug!("➕ '{}' joins cluster {} (similarity {:.3})", item.title, i, sim);
                seeds[i].absorb(item, embedding);
            }
            _ => seeds.push(Seed::new(item, embedding)),
        }
    }

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| seed.into_cluster(i))
        .collect()
}

/// Single catch-all cluster used when no semantic signal is available.
pub fn fallback_cluster(items: Vec<NewsItem>, title: &str) -> Cluster {
    Cluster {
        id: "cluster-fallback".to_string(),
        title: title.to_string(),
        score: items.len() as f32,
        items,
        centroid: None,
        fallback: true,
    }
}

#[derive(Debug, Clone)]
pub struct ClusterEngine {
    gateway: EmbeddingGateway,
    config: ClusterConfig,
}

impl ClusterEngine {
    pub fn new(gateway: EmbeddingGateway, config: ClusterConfig) -> Self {
        Self { gateway, config }
    }

    /// Group items into clusters covering every item that survives the
    /// minor-event filter exactly once.
    pub async fn cluster(&self, items: Vec<NewsItem>) -> Vec<Cluster> {
        let total = items.len();
        let items: Vec<NewsItem> = items
            .into_iter()
            .filter(|i| !magnitude::is_minor(&i.title, self.config.min_magnitude))
            .collect();
        if items.len() < total {
            debug!("🧹 Dropped {} minor magnitude reports", total - items.len());
        }
        if items.is_empty() {
            return Vec::new();
        }

        let texts: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
        let clusters = match self.gateway.embed(&texts).await {
            Embeddings::Available(vectors) if vectors.len() == items.len() => {
                greedy_cluster(items, vectors, self.config.similarity_threshold)
            }
            Embeddings::Available(vectors) => {
                warn!(
                    expected = items.len(),
                    received = vectors.len(),
                    "⚠️ Embedding count mismatch, using fallback cluster"
                );
                vec![fallback_cluster(items, &self.config.fallback_title)]
            }
            Embeddings::Unavailable(reason) => {
                warn!(%reason, "⚠️ Embeddings unavailable, using fallback cluster");
                vec![fallback_cluster(items, &self.config.fallback_title)]
            }
        };

        info!("🧩 Clustered {} items into {} clusters", texts.len(), clusters.len());
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn items(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem::new(format!("Headline {}", i), format!("https://n.example/{}", i), "src"))
            .collect()
    }

    #[test]
    fn test_identical_embeddings_form_one_cluster() {
        let clusters = greedy_cluster(items(5), vec![vec![0.3, 0.4, 0.5]; 5], 0.8);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 5);
        assert!(clusters[0].items.iter().all(|i| i.embedding.is_some()));
    }

    #[test]
    fn test_orthogonal_embeddings_split() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.05], vec![0.02, 1.0]];
        let clusters = greedy_cluster(items(4), embeddings, 0.8);
        assert_eq!(clusters.len(), 2);
        let urls: Vec<Vec<&str>> = clusters
            .iter()
            .map(|c| c.items.iter().map(|i| i.url.as_str()).collect())
            .collect();
        assert_eq!(urls[0], vec!["https://n.example/0", "https://n.example/2"]);
        assert_eq!(urls[1], vec!["https://n.example/1", "https://n.example/3"]);
    }

    #[test]
    fn test_centroid_is_running_mean() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.2], vec![1.0, 0.4]];
        let clusters = greedy_cluster(items(3), embeddings, 0.5);
        assert_eq!(clusters.len(), 1);
        let centroid = clusters[0].centroid.as_ref().unwrap();
        assert!((centroid[0] - 1.0).abs() < 1e-6);
        assert!((centroid[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_ties_go_to_earliest_cluster() {
        // Items 0 and 1 seed separate clusters; item 2 is equidistant.
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let clusters = greedy_cluster(items(3), embeddings, 0.7);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn test_zero_vectors_never_join() {
        let embeddings = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        let clusters = greedy_cluster(items(2), embeddings, 0.5);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_coverage_and_determinism() {
        let embeddings: Vec<Vec<f32>> = (0..20)
            .map(|i| vec![(i % 3) as f32, ((i * 7) % 5) as f32, 1.0])
            .collect();
        let first = greedy_cluster(items(20), embeddings.clone(), 0.9);
        let second = greedy_cluster(items(20), embeddings, 0.9);
        assert_eq!(first, second);

        let urls: Vec<&str> = first.iter().flat_map(|c| c.items.iter().map(|i| i.url.as_str())).collect();
        let unique: HashSet<&str> = urls.iter().copied().collect();
        assert_eq!(urls.len(), 20);
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_fallback_cluster() {
        let cluster = fallback_cluster(items(4), "uncategorized");
        assert_eq!(cluster.title, "uncategorized");
        assert_eq!(cluster.score, 4.0);
        assert!(cluster.fallback);
        assert!(cluster.centroid.is_none());
    }

    #[tokio::test]
    async fn test_engine_filters_minor_events() {
        let engine = ClusterEngine::new(EmbeddingGateway::disabled(), ClusterConfig::default());
        let mut input = items(2);
        input.push(NewsItem::new("M 2.3 - 8 km W of Cobb, CA", "https://quake.example/1", "usgs"));
        let clusters = engine.cluster(input).await;
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[tokio::test]
    async fn test_engine_keeps_road_and_group_names() {
        let engine = ClusterEngine::new(EmbeddingGateway::disabled(), ClusterConfig::default());
        let input = vec![
            NewsItem::new("M1 motorway closed after lorry fire", "https://roads.example/1", "bbc"),
            NewsItem::new("M4 shut as floods hit Wales", "https://roads.example/2", "bbc"),
        ];
        let clusters = engine.cluster(input).await;
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[tokio::test]
    async fn test_engine_empty_input() {
        let engine = ClusterEngine::new(EmbeddingGateway::disabled(), ClusterConfig::default());
        assert!(engine.cluster(Vec::new()).await.is_empty());
    }
}
