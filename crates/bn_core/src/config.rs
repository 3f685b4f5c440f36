//! Tunable thresholds for the news pipeline.
//!
//! Every value can be set from the command line or from a `BN_*` environment
//! variable. The `Default` impls carry the same values as the clap defaults.

use clap::Args;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct ClusterConfig {
    /// Minimum centroid cosine similarity for an item to join a cluster
    #[arg(long = "similarity-threshold", env = "BN_SIMILARITY_THRESHOLD", default_value_t = 0.8)]
    pub similarity_threshold: f32,

    /// Magnitude reports below this value are dropped before clustering (0 keeps all)
    #[arg(long = "min-magnitude", env = "BN_MIN_MAGNITUDE", default_value_t = 4.5)]
    pub min_magnitude: f32,

    /// Title of the catch-all cluster used when embeddings are unavailable
    #[arg(long = "fallback-title", env = "BN_FALLBACK_TITLE", default_value = "uncategorized")]
    pub fallback_title: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            min_magnitude: 4.5,
            fallback_title: "uncategorized".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct ScoringConfig {
    #[arg(long = "size-weight", env = "BN_SIZE_WEIGHT", default_value_t = 2.0)]
    pub size_weight: f32,

    #[arg(long = "source-weight", env = "BN_SOURCE_WEIGHT", default_value_t = 1.5)]
    pub source_weight: f32,

    /// Age in hours at which recency reaches its floor
    #[arg(long = "decay-hours", env = "BN_DECAY_HOURS", default_value_t = 48.0)]
    pub decay_hours: f32,

    #[arg(long = "recency-floor", env = "BN_RECENCY_FLOOR", default_value_t = 0.2)]
    pub recency_floor: f32,

    #[arg(long = "recency-ceiling", env = "BN_RECENCY_CEILING", default_value_t = 1.0)]
    pub recency_ceiling: f32,

    /// Recency assigned to items without a publication date
    #[arg(long = "unknown-recency", env = "BN_UNKNOWN_RECENCY", default_value_t = 0.5)]
    pub unknown_recency: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            size_weight: 2.0,
            source_weight: 1.5,
            decay_hours: 48.0,
            recency_floor: 0.2,
            recency_ceiling: 1.0,
            unknown_recency: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct TitleConfig {
    #[arg(long = "title-max-words", env = "BN_TITLE_MAX_WORDS", default_value_t = 8)]
    pub max_words: usize,

    /// Words to keep before a preposition may end the phrase
    #[arg(long = "title-min-words", env = "BN_TITLE_MIN_WORDS", default_value_t = 3)]
    pub min_phrase_words: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            max_words: 8,
            min_phrase_words: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct DedupConfig {
    #[arg(long = "dedup-jaccard", env = "BN_DEDUP_JACCARD", default_value_t = 0.3)]
    pub jaccard_threshold: f32,

    #[arg(long = "dedup-centroid", env = "BN_DEDUP_CENTROID", default_value_t = 0.85)]
    pub centroid_threshold: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            jaccard_threshold: 0.3,
            centroid_threshold: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct BreakingRules {
    #[arg(long = "min-items", env = "BN_MIN_ITEMS", default_value_t = 3)]
    pub min_items: usize,

    #[arg(long = "min-sources", env = "BN_MIN_SOURCES", default_value_t = 2)]
    pub min_sources: usize,

    /// Recency at which two items are enough to call a cluster breaking
    #[arg(long = "recency-boost", env = "BN_RECENCY_BOOST", default_value_t = 0.9)]
    pub recency_boost: f32,
}

impl Default for BreakingRules {
    fn default() -> Self {
        Self {
            min_items: 3,
            min_sources: 2,
            recency_boost: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct GateConfig {
    /// Share of new headlines above which the pipeline runs
    #[arg(long = "change-threshold", env = "BN_CHANGE_THRESHOLD", default_value_t = 0.3)]
    pub change_threshold: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            change_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Args)]
pub struct NewsConfig {
    #[command(flatten)]
    pub cluster: ClusterConfig,
    #[command(flatten)]
    pub scoring: ScoringConfig,
    #[command(flatten)]
    pub title: TitleConfig,
    #[command(flatten)]
    pub dedup: DedupConfig,
    #[command(flatten)]
    pub breaking: BreakingRules,
    #[command(flatten)]
    pub gate: GateConfig,
}

impl NewsConfig {
    /// Reject values the pipeline cannot work with. The pipeline itself
    /// trusts its configuration, so callers run this once at startup.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("similarity-threshold", self.cluster.similarity_threshold),
            ("dedup-jaccard", self.dedup.jaccard_threshold),
            ("dedup-centroid", self.dedup.centroid_threshold),
            ("recency-floor", self.scoring.recency_floor),
            ("recency-ceiling", self.scoring.recency_ceiling),
            ("unknown-recency", self.scoring.unknown_recency),
            ("recency-boost", self.breaking.recency_boost),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.scoring.recency_floor > self.scoring.recency_ceiling {
            return Err(Error::Config("recency-floor must not exceed recency-ceiling".to_string()));
        }
        if self.scoring.decay_hours <= 0.0 {
            return Err(Error::Config("decay-hours must be positive".to_string()));
        }
        if self.cluster.min_magnitude < 0.0 {
            return Err(Error::Config("min-magnitude must not be negative".to_string()));
        }
        if self.title.max_words == 0 {
            return Err(Error::Config("title-max-words must be at least 1".to_string()));
        }
        if self.gate.change_threshold < 0.0 {
            return Err(Error::Config("change-threshold must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        news: NewsConfig,
    }

    #[test]
    fn test_clap_defaults_match_default_impl() {
        let cli = TestCli::parse_from(["bn"]);
        assert_eq!(cli.news, NewsConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from(["bn", "--similarity-threshold", "0.75", "--min-items", "4"]);
        assert_eq!(cli.news.cluster.similarity_threshold, 0.75);
        assert_eq!(cli.news.breaking.min_items, 4);
        assert_eq!(cli.news.breaking.min_sources, 2);
    }

    #[test]
    fn test_validate() {
        assert!(NewsConfig::default().validate().is_ok());

        let mut config = NewsConfig::default();
        config.dedup.jaccard_threshold = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = NewsConfig::default();
        config.scoring.decay_hours = 0.0;
        assert!(config.validate().is_err());
    }
}
