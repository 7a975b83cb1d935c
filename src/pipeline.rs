use std::collections::HashSet;

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use crate::analyze::{self, Analyzer};
use crate::classify::{self, ClassifiedWord};
use crate::feed::FeedEntry;
use crate::lexicon::LexiconStore;
use crate::normalize;
use crate::unique::{UniquenessState, UniquenessTracker};

/// Counters reported alongside a completed run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub entry_count: usize,
    pub lexicon_size: usize,
    pub duplicates_removed: usize,
    pub candidate_count: usize,
    pub classified_count: usize,
    pub added_count: usize,
}

pub struct RunOutcome {
    pub batch: Vec<ClassifiedWord>,
    pub new_state: UniquenessState,
    pub stats: RunStats,
}

/// Run the discovery pipeline over fully materialized feed entries:
/// load lexicon -> normalize -> extract candidates -> classify -> admit.
/// Each stage consumes the previous stage's complete output; the prior
/// state's words double as the extractor's exclusion set. Only a lexicon
/// load failure aborts the run.
pub fn run(
    entries: &[FeedEntry],
    lexicon_records: Vec<Value>,
    prior_state: UniquenessState,
    analyzer: &dyn Analyzer,
) -> Result<RunOutcome> {
    let lexicon = LexiconStore::load(lexicon_records)?;
    info!(
        words = lexicon.len(),
        duplicates_removed = lexicon.duplicates_removed(),
        "lexicon loaded"
    );

    let (text, entry_count) = normalize::normalize(entries);
    info!(entry_count, chars = text.len(), "feed text normalized");

    let already_processed: HashSet<String> = prior_state.words.iter().cloned().collect();
    let candidates = analyze::extract_candidates(&text, analyzer, &already_processed);
    let classified = classify::classify(&candidates, &lexicon);
    info!(
        candidates = candidates.len(),
        classified = classified.len(),
        "candidates classified"
    );

    let stats = RunStats {
        entry_count,
        lexicon_size: lexicon.len(),
        duplicates_removed: lexicon.duplicates_removed(),
        candidate_count: candidates.len(),
        classified_count: classified.len(),
        added_count: 0,
    };

    let mut tracker = UniquenessTracker::new(prior_state, lexicon.all_words());
    let batch = tracker.admit(classified);
    info!(added = batch.len(), "unique words admitted");

    Ok(RunOutcome {
        stats: RunStats {
            added_count: batch.len(),
            ..stats
        },
        new_state: tracker.into_state(),
        batch,
    })
}

// ── Tests ──
