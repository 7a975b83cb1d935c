use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedWord;

/// Surface forms surfaced by any prior run. Serialized as `{"words": [...]}`;
/// the ordered set keeps the persisted form stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniquenessState {
    pub words: BTreeSet<String>,
}

/// Stateful first-occurrence filter over classified words, keyed by surface
/// form. Seeded from the prior persisted state plus every word already in the
/// lexicon, so known lexicon words are never surfaced as newly discovered.
#[derive(Debug)]
pub struct UniquenessTracker {
    seen: BTreeSet<String>,
}

impl UniquenessTracker {
    pub fn new(prior: UniquenessState, lexicon_words: BTreeSet<String>) -> Self {
        let mut seen = prior.words;
        seen.extend(lexicon_words);
        UniquenessTracker { seen }
    }

    /// Admit each word whose surface form has not been seen, in input order,
    /// marking it seen as it is accepted. Replaying the same batch against
    /// the mutated tracker therefore yields nothing.
    pub fn admit(&mut self, batch: Vec<ClassifiedWord>) -> Vec<ClassifiedWord> {
        let mut admitted = Vec::new();
        for word in batch {
            if self.seen.insert(word.surface_form.clone()) {
                admitted.push(word);
            }
        }
        admitted
    }

    /// Final tracked set, to be persisted as the next run's prior state.
    pub fn into_state(self) -> UniquenessState {
        UniquenessState { words: self.seen }
    }
}

// ── Tests ──
