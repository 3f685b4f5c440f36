//! Recognition of magnitude-scale event reports ("M 5.2 - 10 km SW of ...",
//! "magnitude 6.1 quake", "7.0-magnitude earthquake"). The bare "M" prefix
//! only counts in the feed shape of a decimal value followed by " - ", so
//! road and group names like "M4" or "M5" are left alone.

use lazy_static::lazy_static;
use regex::Regex;

const MAX_MAGNITUDE: f32 = 10.0;

lazy_static! {
    static ref MAGNITUDE: Regex = Regex::new(
        r"(?i)(?:^\s*(?-i:M)\s?(\d{1,2}\.\d+)\s+-\s|\bmagnitude[\s:-]*(\d{1,2}(?:\.\d+)?)\b|\b(\d{1,2}(?:\.\d+)?)[\s-]*magnitude\b)"
    )
    .unwrap();
}

/// The magnitude a title reports, if it follows one of the known patterns.
pub fn magnitude_of(title: &str) -> Option<f32> {
    let caps = MAGNITUDE.captures(title)?;
    let value = (1..=3).find_map(|i| caps.get(i))?;
    value
        .as_str()
        .parse::<f32>()
        .ok()
        .filter(|m| (0.0..=MAX_MAGNITUDE).contains(m))
}

/// True when the title is a magnitude report below `min_magnitude`.
pub fn is_minor(title: &str, min_magnitude: f32) -> bool {
    magnitude_of(title).is_some_and(|m| m < min_magnitude)
}
