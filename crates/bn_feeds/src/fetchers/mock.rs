use async_trait::async_trait;
use bn_core::{RawItem, Result};
use chrono::Utc;
use super::FeedFetcher;

const MOCK_FEED: &str = "https://mock/world";

const MOCK_HEADLINES: &[(&str, &str)] = &[
    ("Global climate summit sees urgent pledges", "https://example.com/a"),
    ("Markets react to multi-region policy shift", "https://example.com/b"),
];

/// Fixed sample headlines for offline runs.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher;

#[async_trait]
impl FeedFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>> {
        let now = Utc::now().to_rfc3339();
        Ok(MOCK_HEADLINES
            .iter()
            .map(|(title, link)| RawItem {
                title: title.to_string(),
                link: Some(link.to_string()),
                guid: None,
                source_url: MOCK_FEED.to_string(),
                date: Some(now.clone()),
            })
            .collect())
    }
}
