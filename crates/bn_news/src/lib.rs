pub mod breaking;
pub mod cluster;
pub mod dedup;
pub mod gate;
pub mod magnitude;
pub mod normalize;
pub mod pipeline;
pub mod score;
pub mod title;

pub use breaking::detect_breaking;
pub use cluster::{fallback_cluster, greedy_cluster, ClusterEngine};
pub use dedup::{clusters_overlap, dedupe, Deduped};
pub use gate::{has_significant_change, headline_change, HeadlineChange};
pub use normalize::normalize;
pub use pipeline::{Evaluation, NewsPipeline, Report};
pub use score::{rank_clusters, recency_score, score_cluster};
pub use title::{event_phrase, resolve_title, resolve_titles};

pub mod prelude {
    pub use super::{Evaluation, NewsPipeline, Report};
    pub use bn_core::{BreakingDecision, Cluster, NewsConfig, NewsItem, RawItem, Result};
    pub use bn_inference::{EmbeddingGateway, Embeddings};
}
