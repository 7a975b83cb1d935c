use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Opaque pass-through attributes, as returned by the analyzer.
pub type Attrs = Map<String, Value>;

/// Lemma key in analysis attribute maps (Voikko convention).
pub const BASE_FORM_KEY: &str = "BASEFORM";

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("analyzer request for {token:?} failed: {reason}")]
    Request { token: String, reason: String },
    #[error("analyzer returned an undecodable payload for {token:?}: {reason}")]
    Decode { token: String, reason: String },
}

/// One morphological reading of a token.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub attrs: Attrs,
}

/// External morphological analysis capability. Deterministic per token; an
/// empty result means the analyzer does not recognize the token as a word.
pub trait Analyzer {
    fn analyze(&self, token: &str) -> Result<Vec<Analysis>, AnalyzerError>;
}

/// One analysis reading of one token occurrence, surface form lowercased.
#[derive(Debug, Clone)]
pub struct CandidateWord {
    pub surface_form: String,
    pub analysis: Attrs,
}

impl CandidateWord {
    pub fn base_form(&self) -> Option<&str> {
        self.analysis
            .get(BASE_FORM_KEY)
            .and_then(Value::as_str)
    }
}

/// Tokenize on whitespace and flatten each recognized token into one
/// candidate per reading. Tokens in `already_processed` are skipped without
/// touching the analyzer. Every occurrence of a token is flattened, but the
/// analyzer is consulted once per distinct token per run; analyzer failures
/// downgrade to "no analysis" so one bad token cannot abort a run.
pub fn extract_candidates(
    text: &str,
    analyzer: &dyn Analyzer,
    already_processed: &HashSet<String>,
) -> Vec<CandidateWord> {
    let mut cache: HashMap<&str, Vec<Analysis>> = HashMap::new();
    let mut candidates = Vec::new();

    for token in text.split_whitespace() {
        if already_processed.contains(token) {
            continue;
        }
        let readings = cache.entry(token).or_insert_with(|| {
            match analyzer.analyze(token) {
                Ok(readings) => readings,
                Err(err) => {
                    warn!(token, error = %err, "analyzer failed; treating token as unanalyzable");
                    Vec::new()
                }
            }
        });
        if readings.is_empty() {
            continue;
        }
        let surface_form = token.to_lowercase();
        for reading in readings.iter() {
            candidates.push(CandidateWord {
                surface_form: surface_form.clone(),
                analysis: reading.attrs.clone(),
            });
        }
    }

    candidates
}

// ── Tests ──

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::{Map, Value};

    use super::{Analysis, Analyzer, AnalyzerError, BASE_FORM_KEY};

    /// Table-backed analyzer for tests: each token maps to a list of lemmas,
    /// one reading per lemma. Records every call it receives.
    pub struct TableAnalyzer {
        table: HashMap<String, Vec<String>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl TableAnalyzer {
        pub fn new(entries: Vec<(&str, Vec<&str>)>) -> Self {
            let table = entries
                .into_iter()
                .map(|(token, lemmas)| {
                    (
                        token.to_string(),
                        lemmas.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect();
            TableAnalyzer {
                table,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Analyzer for TableAnalyzer {
        fn analyze(&self, token: &str) -> Result<Vec<Analysis>, AnalyzerError> {
            self.calls.borrow_mut().push(token.to_string());
            let lemmas = self.table.get(token).cloned().unwrap_or_default();
            Ok(lemmas
                .into_iter()
                .map(|lemma| {
                    let mut attrs = Map::new();
                    attrs.insert(BASE_FORM_KEY.to_string(), Value::String(lemma));
                    attrs.insert("CLASS".to_string(), Value::String("nimisana".into()));
                    Analysis { attrs }
                })
                .collect())
        }
    }

    pub struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn analyze(&self, token: &str) -> Result<Vec<Analysis>, AnalyzerError> {
            Err(AnalyzerError::Request {
                token: token.to_string(),
                reason: "connection refused".into(),
            })
        }
    }
}
