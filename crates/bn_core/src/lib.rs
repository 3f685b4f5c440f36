pub mod config;
pub mod error;
pub mod models;
pub mod similarity;
pub mod storage;
pub mod types;

pub use config::{BreakingRules, ClusterConfig, DedupConfig, GateConfig, NewsConfig, ScoringConfig, TitleConfig};
pub use error::{Error, Result};
pub use models::EmbeddingModel;
pub use similarity::{cosine_similarity, jaccard, mean_vector};
pub use storage::SnapshotStore;
pub use types::{BreakingDecision, Cluster, HeadlineSnapshot, NewsItem, RawItem};

pub mod prelude {
    pub use super::{Cluster, Error, NewsConfig, NewsItem, RawItem, Result};
}
