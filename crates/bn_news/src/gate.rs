use std::collections::HashSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlineChange {
    /// Current headlines also present in the previous snapshot.
    pub overlap: usize,
    pub current: usize,
    pub change_ratio: f32,
    pub significant: bool,
}

/// Compare the current headlines with the snapshot taken at the last
/// reaction. Without a snapshot the change is always significant; otherwise
/// it is when `1 - overlap / current` exceeds `threshold`. An empty current
/// set against an existing snapshot counts as no change.
pub fn headline_change<A, B>(current: &[A], previous: Option<&[B]>, threshold: f32) -> HeadlineChange
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let Some(previous) = previous else {
        return HeadlineChange {
            overlap: 0,
            current: current.len(),
            change_ratio: 1.0,
            significant: true,
        };
    };

    let previous: HashSet<&str> = previous.iter().map(|t| t.as_ref()).collect();
    let overlap = current.iter().filter(|t| previous.contains((*t).as_ref())).count();
    let change_ratio = if current.is_empty() {
        0.0
    } else {
        1.0 - overlap as f32 / current.len() as f32
    };

    HeadlineChange {
        overlap,
        current: current.len(),
        change_ratio,
        significant: change_ratio > threshold,
    }
}

pub fn has_significant_change<A, B>(current: &[A], previous: Option<&[B]>, threshold: f32) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    headline_change(current, previous, threshold).significant
}
