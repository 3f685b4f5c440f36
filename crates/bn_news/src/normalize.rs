use std::collections::HashSet;
use bn_core::{NewsItem, RawItem};
use chrono::{DateTime, Utc};

/// Parse the date formats feeds actually emit: RFC 3339 (Atom, `isoDate`)
/// and RFC 2822 (RSS `pubDate`).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Turn raw feed records into news items. Records without a title or an
/// identity are dropped, and the first record seen for a URL wins.
pub fn normalize<I>(raw: I) -> Vec<NewsItem>
where
    I: IntoIterator<Item = RawItem>,
{
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for record in raw {
        let title = record.title.trim();
        if title.is_empty() {
            continue;
        }
        let Some(url) = record.identity() else {
            continue;
        };
        if !seen.insert(url.to_string()) {
            continue;
        }

        items.push(NewsItem {
            title: title.to_string(),
            url: url.to_string(),
            source: record.source_label(),
            published_at: record.date.as_deref().and_then(parse_date),
            embedding: None,
        });
    }

    items
}
