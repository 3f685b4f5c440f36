use std::path::PathBuf;
use std::time::Duration;
use clap::Args;
use bn_core::Result;

pub mod fetchers;
pub mod logging;

pub use fetchers::{fetch_all, BoxedFetcher, FeedFetcher, JsonFileFetcher, MockFetcher, RssFetcher};
pub use logging::{init_logging, Logger};

/// World news feeds polled when no list is configured.
pub const WORLD_FEEDS: &[&str] = &[
    "https://feeds.bbci.co.uk/news/world/rss.xml",
    "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    "https://rss.cnn.com/rss/edition_world.rss",
    "https://www.theguardian.com/world/rss",
    "https://feeds.npr.org/1004/rss.xml",
    "https://feeds.reuters.com/reuters/worldNews",
    "https://www.aljazeera.com/xml/rss/all.xml",
    "https://rss.dw.com/rdf/rss-en-all",
    "https://www.france24.com/en/rss",
    "https://www.ft.com/world?format=rss",
    "https://feeds.skynews.com/feeds/rss/world.xml",
    "https://www.cbc.ca/cmlink/rss-world",
    "https://www.latimes.com/world/rss2.0.xml",
    "https://www.economist.com/sections/international/rss.xml",
    "https://www.rfi.fr/en/rss",
    "https://globalnews.ca/world/feed/",
    "https://www.scmp.com/rss/91/feed",
    "https://www.japantimes.co.jp/news/world/feed/",
    "https://english.kyodonews.net/rss/news.xml",
    "https://www.abc.net.au/news/feed/51120/rss.xml",
];

#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    /// Comma-separated feed URLs (defaults to the built-in world list)
    #[arg(long, env = "BN_FEEDS", value_delimiter = ',')]
    pub feeds: Vec<String>,

    /// Use fixed sample headlines instead of the network
    #[arg(long, env = "MOCK_NEWS")]
    pub mock: bool,

    /// Read raw items from a JSON file instead of the network
    #[arg(long, conflicts_with = "mock")]
    pub file: Option<PathBuf>,

    #[arg(long = "feed-timeout", env = "BN_FEED_TIMEOUT_SECS", default_value_t = 15)]
    pub feed_timeout_secs: u64,
}

impl Default for FeedArgs {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            mock: false,
            file: None,
            feed_timeout_secs: 15,
        }
    }
}

impl FeedArgs {
    /// Configured feed URLs, blanks removed, falling back to `WORLD_FEEDS`.
    pub fn feed_urls(&self) -> Vec<String> {
        let urls: Vec<String> = self
            .feeds
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            WORLD_FEEDS.iter().map(|u| u.to_string()).collect()
        } else {
            urls
        }
    }

    pub fn build_fetchers(&self) -> Result<Vec<BoxedFetcher>> {
        if self.mock {
            return Ok(vec![Box::new(MockFetcher)]);
        }
        if let Some(path) = &self.file {
            return Ok(vec![Box::new(JsonFileFetcher::new(path.clone()))]);
        }

        let fetchers = fetchers::syndication::rss_fetchers(self.feed_urls(), Duration::from_secs(self.feed_timeout_secs))?;
        Ok(fetchers.into_iter().map(|f| Box::new(f) as BoxedFetcher).collect())
    }
}

pub mod prelude {
    pub use super::{fetch_all, FeedArgs, FeedFetcher};
    pub use bn_core::{RawItem, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        feeds: FeedArgs,
    }

    #[test]
    fn test_default_world_list() {
        let args = TestCli::parse_from(["bn"]).feeds;
        assert_eq!(args.feed_urls().len(), WORLD_FEEDS.len());
        assert_eq!(args.build_fetchers().unwrap().len(), WORLD_FEEDS.len());
    }

    #[test]
    fn test_feed_list_override() {
        let args = TestCli::parse_from(["bn", "--feeds", "https://a.example/rss, ,https://b.example/rss"]).feeds;
        assert_eq!(args.feed_urls(), vec!["https://a.example/rss", "https://b.example/rss"]);
    }

    #[test]
    fn test_mock_takes_precedence() {
        let args = TestCli::parse_from(["bn", "--mock"]).feeds;
        let fetchers = args.build_fetchers().unwrap();
        assert_eq!(fetchers.len(), 1);
        assert_eq!(fetchers[0].name(), "mock");
    }
}
