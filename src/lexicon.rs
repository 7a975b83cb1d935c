use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalformedLexiconError {
    #[error("lexicon record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("lexicon record {index} has no `word` field")]
    MissingWord { index: usize },
}

/// One reference-lexicon entry. `fields` keeps the full raw record (including
/// `word`, `tn` and the inflection attribute `av`) so classified output can
/// carry every lexicon column untouched.
#[derive(Debug, Clone)]
pub struct LexiconRecord {
    pub word: String,
    pub grammatical_class: i64,
    pub fields: Map<String, Value>,
}

impl LexiconRecord {
    fn from_value(index: usize, value: Value) -> Result<Self, MalformedLexiconError> {
        let Value::Object(fields) = value else {
            return Err(MalformedLexiconError::NotAnObject { index });
        };
        let word = fields
            .get("word")
            .and_then(Value::as_str)
            .ok_or(MalformedLexiconError::MissingWord { index })?
            .to_string();
        // The snapshot generator emits tn=0 for entries missing it.
        let grammatical_class = fields.get("tn").and_then(Value::as_i64).unwrap_or(0);
        Ok(LexiconRecord {
            word,
            grammatical_class,
            fields,
        })
    }
}

/// Deduplicated word -> record lookup over a loaded lexicon snapshot.
#[derive(Debug)]
pub struct LexiconStore {
    records: HashMap<String, LexiconRecord>,
    duplicates_removed: usize,
}

impl LexiconStore {
    /// Load raw snapshot records in order. When the same `word` appears more
    /// than once, the last occurrence wins; the removed-duplicate count is
    /// kept for reporting.
    pub fn load(raw: Vec<Value>) -> Result<Self, MalformedLexiconError> {
        let input_len = raw.len();
        let mut records = HashMap::with_capacity(input_len);
        for (index, value) in raw.into_iter().enumerate() {
            let record = LexiconRecord::from_value(index, value)?;
            records.insert(record.word.clone(), record);
        }
        let duplicates_removed = input_len - records.len();
        Ok(LexiconStore {
            records,
            duplicates_removed,
        })
    }

    pub fn lookup(&self, word: &str) -> Option<&LexiconRecord> {
        self.records.get(word)
    }

    /// Snapshot of every distinct lexicon word, used to pre-seed the
    /// uniqueness tracker so known lexicon words are never surfaced as new.
    pub fn all_words(&self) -> BTreeSet<String> {
        self.records.keys().cloned().collect()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

// ── Tests ──
