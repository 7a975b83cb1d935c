use itertools::Itertools;

use crate::feed::FeedEntry;

/// Concatenate every entry's text into one global token bag: title and
/// description always, then summary and body parts when present, in feed-list
/// order then entry order. The result is lowercased with runs of whitespace
/// collapsed to single spaces. Returns the text and the entry count.
pub fn normalize(entries: &[FeedEntry]) -> (String, usize) {
    let joined = entries.iter().flat_map(entry_fragments).join(" ");
    let normalized = joined.to_lowercase().split_whitespace().join(" ");
    (normalized, entries.len())
}

fn entry_fragments(entry: &FeedEntry) -> impl Iterator<Item = &str> {
    [entry.title.as_str(), entry.description.as_str()]
        .into_iter()
        .chain(entry.summary.as_deref())
        .chain(entry.body_parts.iter().map(String::as_str))
}

// ── Tests ──
