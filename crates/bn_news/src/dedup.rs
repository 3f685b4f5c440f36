use std::cmp::Ordering;
use std::collections::HashSet;
use bn_core::{cosine_similarity, jaccard, mean_vector, Cluster, DedupConfig};
use serde::Serialize;
use tracing::debug;

/// What the overlap test needs from a cluster, computed once per cluster.
struct Profile<'a> {
    urls: HashSet<&'a str>,
    centroid: Option<Vec<f32>>,
}

impl<'a> Profile<'a> {
    fn of(cluster: &'a Cluster) -> Self {
        // Clusters from an earlier run may carry embeddings on only some
        // members; average whatever is there.
        let centroid = cluster.centroid.clone().or_else(|| {
            mean_vector(cluster.items.iter().filter_map(|i| i.embedding.as_deref()))
        });
        Self {
            urls: cluster.urls(),
            centroid,
        }
    }

    fn centroid_similarity(&self, other: &Profile<'_>) -> f32 {
        match (&self.centroid, &other.centroid) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => 0.0,
        }
    }

    fn overlaps(&self, other: &Profile<'_>, config: &DedupConfig) -> bool {
        jaccard(&self.urls, &other.urls) >= config.jaccard_threshold
            || self.centroid_similarity(other) >= config.centroid_threshold
    }
}

/// Whether two clusters describe the same story: shared member URLs or
/// near-identical centroids.
pub fn clusters_overlap(a: &Cluster, b: &Cluster, config: &DedupConfig) -> bool {
    Profile::of(a).overlaps(&Profile::of(b), config)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Deduped {
    pub primary: Vec<Cluster>,
    pub secondary: Vec<Cluster>,
    /// Primary clusters folded into a higher-scored duplicate.
    pub merged: usize,
    /// Secondary clusters dropped for overlapping a kept primary cluster.
    pub dropped: usize,
}

/// Remove overlap between and within two cluster sets.
///
/// Within `primary`, of any overlapping pair only the higher-scored cluster
/// survives (members are not combined). Every `secondary` cluster that
/// overlaps a surviving primary cluster is dropped. Both outputs keep their
/// input order.
pub fn dedupe(primary: Vec<Cluster>, secondary: Vec<Cluster>, config: &DedupConfig) -> Deduped {
    let (keep_primary, merged) = {
        let profiles: Vec<Profile> = primary.iter().map(Profile::of).collect();

        let mut order: Vec<usize> = (0..primary.len()).collect();
        order.sort_by(|&a, &b| {
            primary[b].score.partial_cmp(&primary[a].score).unwrap_or(Ordering::Equal)
        });

        let mut kept: Vec<usize> = Vec::new();
        let mut merged = 0;
        for idx in order {
            match kept.iter().find(|&&k| profiles[k].overlaps(&profiles[idx], config)) {
                Some(&k) => {
                    debug!(
                        "🔗 Merging '{}' ({:.2}) into '{}' ({:.2})",
                        primary[idx].title, primary[idx].score, primary[k].title, primary[k].score
                    );
                    merged += 1;
                }
                None => kept.push(idx),
            }
        }

        let mut keep = vec![false; primary.len()];
        kept.into_iter().for_each(|k| keep[k] = true);
        (keep, merged)
    };

    let primary: Vec<Cluster> = primary
        .into_iter()
        .zip(keep_primary)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect();

    let keep_secondary: Vec<bool> = {
        let kept_profiles: Vec<Profile> = primary.iter().map(Profile::of).collect();
        secondary
            .iter()
            .map(|c| {
                let profile = Profile::of(c);
                !kept_profiles.iter().any(|p| p.overlaps(&profile, config))
            })
            .collect()
    };
    let before = secondary.len();
    let secondary: Vec<Cluster> = secondary
        .into_iter()
        .zip(keep_secondary)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect();
    let dropped = before - secondary.len();

    if merged > 0 || dropped > 0 {
        debug!("🧹 Overlap removal merged {} and dropped {} clusters", merged, dropped);
    }

    Deduped {
        primary,
        secondary,
        merged,
        dropped,
    }
}
