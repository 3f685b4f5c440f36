use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use bn_core::{BreakingRules, Cluster, DedupConfig, EmbeddingModel, Error, NewsConfig, NewsItem, RawItem, Result};
use bn_inference::models::HashEmbeddingModel;
use bn_inference::EmbeddingGateway;
use bn_news::{dedupe, has_significant_change, Evaluation, NewsPipeline};
use chrono::{TimeZone, Utc};

#[derive(Debug)]
struct ConstantModel(Vec<f32>);

#[async_trait]
impl EmbeddingModel for ConstantModel {
    fn name(&self) -> &str {
        "constant"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![self.0.clone(); texts.len()])
    }
}

#[derive(Debug)]
struct RejectingModel;

#[async_trait]
impl EmbeddingModel for RejectingModel {
    fn name(&self) -> &str {
        "rejecting"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::PolicyRejected("content_policy_violation".to_string()))
    }
}

fn raw(title: &str, link: &str, feed: &str) -> RawItem {
    RawItem {
        title: title.to_string(),
        link: Some(link.to_string()),
        guid: None,
        source_url: feed.to_string(),
        date: None,
    }
}

fn items(specs: &[(&str, &str)]) -> Vec<NewsItem> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (title, source))| NewsItem::new(*title, format!("https://{}/story/{}", source, i), *source))
        .collect()
}

fn pipeline(model: Arc<dyn EmbeddingModel>) -> NewsPipeline {
    NewsPipeline::new(EmbeddingGateway::new(model), NewsConfig::default())
}

#[tokio::test]
async fn identical_embeddings_form_one_cluster() {
    let mut config = NewsConfig::default();
    config.cluster.similarity_threshold = 0.8;
    let pipeline = NewsPipeline::new(
        EmbeddingGateway::new(Arc::new(ConstantModel(vec![0.2, 0.4, 0.6]))),
        config,
    );
    let input = items(&[
        ("Flooding hits Valencia", "bbc.co.uk"),
        ("Valencia floods leave dozens dead", "cnn.com"),
        ("Spain mourns flood victims", "reuters.com"),
        ("Rescue teams search Valencia", "bbc.co.uk"),
        ("Floodwaters recede in Spain", "cnn.com"),
    ]);

    let clusters = pipeline.cluster(input).await;
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 5);
    assert_eq!(clusters[0].distinct_sources(), 3);
}

#[tokio::test]
async fn unavailable_embeddings_fall_back_to_one_cluster() {
    let pipeline = NewsPipeline::new(EmbeddingGateway::disabled(), NewsConfig::default());
    let input = items(&[("a story", "x"), ("b story", "y"), ("c story", "z"), ("d story", "x")]);

    let clusters = pipeline.cluster(input).await;
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].title, "uncategorized");
    assert_eq!(clusters[0].len(), 4);
    assert_eq!(clusters[0].score, 4.0);
}

#[tokio::test]
async fn policy_rejection_degrades_to_fallback() {
    let pipeline = pipeline(Arc::new(RejectingModel));
    let clusters = pipeline.cluster(items(&[("one", "x"), ("two", "y")])).await;
    assert_eq!(clusters.len(), 1);
    assert!(clusters[0].fallback);
}

#[tokio::test]
async fn covered_story_is_breaking_with_rationale() {
    let mut config = NewsConfig::default();
    config.breaking = BreakingRules {
        min_items: 3,
        min_sources: 2,
        recency_boost: 0.9,
    };
    let pipeline = NewsPipeline::new(
        EmbeddingGateway::new(Arc::new(ConstantModel(vec![1.0, 0.0]))),
        config,
    );
    let raw_items = vec![
        raw("Ceasefire agreed in Gaza", "https://bbc.example/1", "https://feeds.bbc.example/world.xml"),
        raw("Gaza ceasefire takes hold", "https://bbc.example/2", "https://feeds.bbc.example/world.xml"),
        raw("Truce announced for Gaza", "https://cnn.example/1", "https://rss.cnn.example/world.rss"),
    ];

    let Evaluation::Evaluated(report) = pipeline.evaluate(raw_items, Vec::new(), None).await else {
        panic!("cold start must evaluate");
    };
    assert_eq!(report.breaking.len(), 1);
    assert!(report.breaking[0].rationale.contains("size=3, sources=2"));
    assert_eq!(report.breaking[0].sources.len(), 3);

    let snapshot = report.headline_snapshot();
    assert_eq!(snapshot.titles.len(), 3);
    assert!(snapshot.cluster_title.is_some());
}

#[tokio::test]
async fn unchanged_headlines_skip_clustering() {
    let pipeline = pipeline(Arc::new(HashEmbeddingModel::default()));
    let raw_items = vec![
        raw("Storm batters coast", "https://a.example/1", "https://a.example/rss"),
        raw("Election results due", "https://b.example/1", "https://b.example/rss"),
    ];
    let last: Vec<String> = raw_items.iter().map(|r| r.title.clone()).collect();
    assert!(!has_significant_change(&last, Some(&last[..]), 0.3));

    match pipeline.evaluate(raw_items, Vec::new(), Some(&last[..])).await {
        Evaluation::Unchanged(change) => assert_eq!(change.change_ratio, 0.0),
        Evaluation::Evaluated(_) => panic!("identical headlines must not be re-evaluated"),
    }
}

#[test]
fn overlapping_clusters_keep_higher_score() {
    let make = |id: &str, urls: &[&str], score: f32| Cluster {
        id: id.to_string(),
        title: id.to_string(),
        items: urls.iter().map(|u| NewsItem::new("story", *u, "src")).collect(),
        score,
        centroid: None,
        fallback: false,
    };
    let ten = make("ten", &["u1", "u2", "u3"], 10.0);
    let seven = make("seven", &["u2", "u3", "u4"], 7.0);

    let out = dedupe(vec![seven, ten], Vec::new(), &DedupConfig::default());
    assert_eq!(out.primary.len(), 1);
    assert_eq!(out.primary[0].id, "ten");

    let again = dedupe(out.primary.clone(), Vec::new(), &DedupConfig::default());
    assert_eq!(again.primary, out.primary);
}

#[tokio::test]
async fn coverage_and_determinism_with_hash_embeddings() {
    let pipeline = pipeline(Arc::new(HashEmbeddingModel::default()));
    let input = items(&[
        ("Earthquake strikes off coast of Japan", "nhk"),
        ("Strong earthquake strikes Japan coast", "bbc"),
        ("Central bank raises interest rates", "ft"),
        ("Interest rates raised by central bank", "wsj"),
        ("Championship final ends in penalties", "espn"),
        ("M 2.0 - 3 km NE of Anza, CA", "usgs"),
    ]);

    let first = pipeline.cluster(input.clone()).await;
    let second = pipeline.cluster(input).await;

    let membership = |clusters: &[Cluster]| -> Vec<Vec<String>> {
        clusters
            .iter()
            .map(|c| c.items.iter().map(|i| i.url.clone()).collect())
            .collect()
    };
    assert_eq!(membership(&first), membership(&second));

    let urls: Vec<String> = first.iter().flat_map(|c| c.items.iter().map(|i| i.url.clone())).collect();
    let unique: HashSet<&String> = urls.iter().collect();
    assert_eq!(urls.len(), 5, "minor magnitude report is filtered out");
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn retained_clusters_overlapping_new_ones_are_dropped() {
    let pipeline = pipeline(Arc::new(ConstantModel(vec![1.0, 0.0])));
    let raw_items = vec![
        raw("Volcano erupts in Iceland", "https://a.example/1", "https://a.example/rss"),
        raw("Iceland volcano eruption", "https://b.example/1", "https://b.example/rss"),
    ];
    let retained = vec![Cluster {
        id: "old".to_string(),
        title: "Volcano".to_string(),
        items: vec![NewsItem::new("Volcano erupts in Iceland", "https://a.example/1", "a.example")],
        score: 3.0,
        centroid: None,
        fallback: false,
    }];

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let Evaluation::Evaluated(report) = pipeline.evaluate_at(raw_items, retained, None, now).await else {
        panic!("cold start must evaluate");
    };
    assert_eq!(report.clusters.len(), 1);
    assert!(report.retained.is_empty());
}

#[tokio::test]
async fn empty_input_is_a_valid_terminal_state() {
    let pipeline = pipeline(Arc::new(HashEmbeddingModel::default()));
    let Evaluation::Evaluated(report) = pipeline.evaluate(Vec::new(), Vec::new(), None).await else {
        panic!("cold start must evaluate");
    };
    assert!(report.clusters.is_empty());
    assert!(!report.is_breaking());
}
