use std::time::Duration;
use async_trait::async_trait;
use bn_core::{Error, RawItem, Result};
use reqwest::Client;
use crate::logging::Logger;
use super::FeedFetcher;

const USER_AGENT: &str = concat!("bn/", env!("CARGO_PKG_VERSION"));

/// An RSS 2.0 feed fetched over HTTP.
#[derive(Debug, Clone)]
pub struct RssFetcher {
    client: Client,
    url: String,
    logger: Logger,
}

impl RssFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, url))
    }

    /// Share one connection pool between many feeds.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        let url = url.into();
        let host = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            client,
            logger: Logger::new().with_prefix(format!("[{}]", host)),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// One fetcher per URL, all sharing a client.
pub fn rss_fetchers<I, S>(urls: I, timeout: Duration) -> Result<Vec<RssFetcher>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
    Ok(urls
        .into_iter()
        .map(|u| RssFetcher::with_client(client.clone(), u))
        .collect())
}

/// Parse an RSS document. Items keep whatever fields the feed provides;
/// filtering of unusable ones happens during normalization. RSS 1.0 feeds
/// date their items with `dc:date` rather than `pubDate`.
pub fn parse_channel(bytes: &[u8], source_url: &str) -> Result<Vec<RawItem>> {
    let channel = rss::Channel::read_from(bytes).map_err(|e| Error::Feed(format!("{}: {}", source_url, e)))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| RawItem {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().map(str::to_string),
            guid: item.guid().map(|g| g.value().to_string()),
            source_url: source_url.to_string(),
            date: item
                .pub_date()
                .or_else(|| item.dublin_core_ext().and_then(|dc| dc.dates().first().map(String::as_str)))
                .map(str::to_string),
        })
        .collect())
}

#[async_trait]
impl FeedFetcher for RssFetcher {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<RawItem>> {
        self.logger.debug("fetching");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Feed(format!("{} returned {}", self.url, status)));
        }

        let body = response.bytes().await?;
        let items = parse_channel(&body, &self.url)?;
        self.logger.info(&format!("{} items", items.len()));
        Ok(items)
    }
}
