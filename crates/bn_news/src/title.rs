//! Short labels for clusters.
//!
//! The label starts from the member headline closest to the cluster
//! centroid and is reduced to its event phrase: attribution is stripped,
//! the text is cut at the first sentence end or clause separator, leading
//! counts are dropped and the phrase stops at a connecting preposition once
//! it has enough words. Clusters dominated by magnitude reports get a
//! normalised "Magnitude X earthquake" label instead.

use bn_core::{cosine_similarity, Cluster, NewsItem, TitleConfig};
use lazy_static::lazy_static;
use regex::Regex;
use crate::magnitude::magnitude_of;

const TRUNCATION_MARK: &str = "…";
const CLAUSE_SEPARATORS: [&str; 5] = [": ", " - ", " – ", " — ", " | "];

const BREAK_WORDS: &[&str] = &[
    "after", "amid", "as", "while", "following", "despite", "during", "before", "since", "ahead",
    "because", "over", "with",
];

const QUANTIFIERS: &[&str] = &[
    "dozens", "dozen", "hundreds", "thousands", "millions", "billions", "scores", "several", "many",
    "some", "numerous", "multiple", "few", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "ten", "eleven", "twelve", "twenty", "fifty", "hundred", "thousand", "million",
];

const QUANTIFIER_PAIRS: &[(&str, &str)] = &[("at", "least"), ("more", "than"), ("up", "to")];

lazy_static! {
    static ref ACCORDING_TO: Regex = Regex::new(r"(?i),?\s+according to\b.*$").unwrap();
    static ref TRAILING_SAID: Regex =
        Regex::new(r"(?i)[,;]\s*(?:[\w'’.-]+\s+){0,3}(?:said|says|say|reports?|reported|claims?)\.?\s*$").unwrap();
    static ref SAID_CLAUSE: Regex = Regex::new(r"(?i),\s*(?:said|says|say)\b.*$").unwrap();
    static ref SAID_OFFICIALS: Regex = Regex::new(
        r"(?i)\s+(?:said|says|say)\s+(?:the\s+)?(?:officials?|police|authorities|sources|witnesses|reports?|state media|ministry)\.?\s*$"
    )
    .unwrap();
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

fn is_count(word: &str) -> bool {
    let w = normalize_word(word);
    if w.is_empty() {
        return false;
    }
    let numeric = w.chars().any(|c| c.is_ascii_digit())
        && w.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.');
    numeric || QUANTIFIERS.contains(&w.as_str())
}

fn strip_attribution(text: &str) -> String {
    let mut out = text.trim().to_string();
    for re in [&*ACCORDING_TO, &*TRAILING_SAID, &*SAID_CLAUSE, &*SAID_OFFICIALS] {
        let next = re.replace(&out, "").trim().to_string();
        out = next;
    }
    out
}

/// Text up to the first `.`, `!` or `?` that ends a sentence. Dots inside
/// abbreviations ("U.S.") and after one- or two-letter words do not count.
fn cut_sentence(text: &str) -> &str {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    for (pos, &(idx, c)) in chars.iter().enumerate() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if !chars.get(pos + 1).map_or(true, |&(_, n)| n.is_whitespace()) {
            continue;
        }
        let head = &text[..idx];
        let word = head.split_whitespace().last().unwrap_or("");
        if word.is_empty() {
            continue;
        }
        if c == '.' && (word.contains('.') || word.chars().count() <= 2) {
            continue;
        }
        return head;
    }
    text
}

/// Text before the first clause separator, unless that part is a one-word
/// kicker ("Live: ...") in which case the remainder is used.
fn cut_clause(text: &str) -> &str {
    let split = CLAUSE_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|(i, _)| *i);
    let Some((i, len)) = split else {
        return text;
    };
    let head = text[..i].trim();
    let tail = text[i + len..].trim();
    if head.split_whitespace().count() >= 2 || tail.is_empty() {
        head
    } else {
        cut_clause(tail)
    }
}

fn drop_leading_quantifiers<'a>(words: &'a [&'a str]) -> &'a [&'a str] {
    let mut start = 0;
    loop {
        let rest = &words[start..];
        let first = rest.first().map(|w| normalize_word(w));
        let second = rest.get(1).map(|w| normalize_word(w));
        let pair = match (first.as_deref(), second.as_deref()) {
            (Some(a), Some(b)) => QUANTIFIER_PAIRS.contains(&(a, b)),
            _ => false,
        };
        let skip = if pair {
            2
        } else if rest.first().is_some_and(|w| is_count(w)) {
            1
        } else {
            0
        };
        if skip == 0 {
            break;
        }

        let mut next = start + skip;
        if words.get(next).is_some_and(|w| normalize_word(w) == "of") {
            next += 1;
        }
        if next >= words.len() {
            break;
        }
        start = next;
    }
    &words[start..]
}

/// Reduce a raw headline to a short event phrase.
pub fn event_phrase(raw: &str, config: &TitleConfig) -> String {
    let stripped = strip_attribution(raw);
    let text = cut_clause(cut_sentence(&stripped));

    let words: Vec<&str> = text.split_whitespace().collect();
    let words = drop_leading_quantifiers(&words);

    let mut kept: Vec<&str> = Vec::new();
    for word in words {
        if kept.len() >= config.min_phrase_words && BREAK_WORDS.contains(&normalize_word(word).as_str()) {
            break;
        }
        kept.push(*word);
    }

    let truncated = kept.len() > config.max_words;
    kept.truncate(config.max_words);
    let phrase = kept
        .join(" ")
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '-' | '–' | '—'))
        .to_string();

    if phrase.is_empty() {
        return raw.trim().to_string();
    }
    if truncated {
        format!("{}{}", phrase, TRUNCATION_MARK)
    } else {
        phrase
    }
}

/// Member whose embedding is closest to the centroid. Falls back to the
/// first member when the cluster has no centroid.
pub fn representative(cluster: &Cluster) -> Option<&NewsItem> {
    let Some(centroid) = cluster.centroid.as_deref() else {
        return cluster.items.first();
    };
    let mut best: Option<(&NewsItem, f32)> = None;
    for item in &cluster.items {
        let sim = item
            .embedding
            .as_deref()
            .map_or(f32::NEG_INFINITY, |e| cosine_similarity(e, centroid));
        if best.map_or(true, |(_, b)| sim > b) {
            best = Some((item, sim));
        }
    }
    best.map(|(item, _)| item)
}

/// "Magnitude X earthquake" with the largest reported value, when most
/// members are magnitude reports.
pub fn magnitude_label(cluster: &Cluster) -> Option<String> {
    let magnitudes: Vec<f32> = cluster.items.iter().filter_map(|i| magnitude_of(&i.title)).collect();
    if magnitudes.len() * 2 <= cluster.len() {
        return None;
    }
    let max = magnitudes.into_iter().fold(f32::MIN, f32::max);
    Some(format!("Magnitude {:.1} earthquake", max))
}

pub fn resolve_title(cluster: &Cluster, config: &TitleConfig) -> String {
    if let Some(label) = magnitude_label(cluster) {
        return label;
    }
    match representative(cluster) {
        Some(item) => event_phrase(&item.title, config),
        None => cluster.title.clone(),
    }
}

/// Relabel every cluster except the fallback, whose label is fixed.
pub fn resolve_titles(clusters: &mut [Cluster], config: &TitleConfig) {
    for cluster in clusters.iter_mut().filter(|c| !c.fallback) {
        cluster.title = resolve_title(cluster, config);
    }
}
