use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::analyze::{Attrs, CandidateWord};
use crate::lexicon::{LexiconRecord, LexiconStore};

/// Grammatical classes below this limit are nominal/declinable and admissible;
/// 53 and above (verbs, particles, ...) are rejected. Fixed domain constant of
/// the reference lexicon's classification scheme.
pub const NOMINAL_CLASS_LIMIT: i64 = 53;

/// Key under which the candidate's surface form appears in merged output.
/// Distinct from the lexicon's `word` key, so both survive the merge.
pub const SURFACE_FORM_KEY: &str = "surface_form";

/// A candidate admitted by the lexicon join, carrying the merged field set.
#[derive(Debug, Clone)]
pub struct ClassifiedWord {
    pub surface_form: String,
    pub grammatical_class: i64,
    pub fields: Attrs,
}

impl Serialize for ClassifiedWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Join candidates against the lexicon by base form. A candidate is admitted
/// only when its base form has a lexicon record with a grammatical class
/// below [`NOMINAL_CLASS_LIMIT`]. Readings without a base form cannot be
/// joined and are dropped.
pub fn classify(candidates: &[CandidateWord], lexicon: &LexiconStore) -> Vec<ClassifiedWord> {
    let mut classified = Vec::new();
    for candidate in candidates {
        let Some(base_form) = candidate.base_form() else {
            continue;
        };
        let Some(record) = lexicon.lookup(base_form) else {
            continue;
        };
        if record.grammatical_class >= NOMINAL_CLASS_LIMIT {
            continue;
        }
        classified.push(ClassifiedWord {
            surface_form: candidate.surface_form.clone(),
            grammatical_class: record.grammatical_class,
            fields: merge_fields(record, candidate),
        });
    }
    classified
}

/// Lexicon fields first, candidate fields overlaid: on a key collision the
/// candidate value wins.
pub fn merge_fields(record: &LexiconRecord, candidate: &CandidateWord) -> Attrs {
    let mut merged = record.fields.clone();
    for (key, value) in &candidate.analysis {
        merged.insert(key.clone(), value.clone());
    }
    merged.insert(
        SURFACE_FORM_KEY.to_string(),
        Value::String(candidate.surface_form.clone()),
    );
    merged
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::analyze::BASE_FORM_KEY;

    fn lexicon() -> LexiconStore {
        LexiconStore::load(vec![
            json!({"word": "kissa", "tn": 1, "av": "_"}),
            json!({"word": "juosta", "tn": 67, "av": "d"}),
            json!({"word": "raja", "tn": 52, "av": "_"}),
            json!({"word": "ja", "tn": 53, "av": "_"}),
        ])
        .unwrap()
    }

    fn candidate(surface: &str, base: &str) -> CandidateWord {
        let mut analysis = Attrs::new();
        analysis.insert(BASE_FORM_KEY.to_string(), Value::String(base.to_string()));
        CandidateWord {
            surface_form: surface.to_string(),
            analysis,
        }
    }

    #[test]
    fn admits_only_below_nominal_limit() {
        let candidates = vec![
            candidate("kissalle", "kissa"),
            candidate("juoksi", "juosta"),
            candidate("rajalla", "raja"),
            candidate("ja", "ja"),
        ];
        let classified = classify(&candidates, &lexicon());
        let surfaces: Vec<&str> = classified.iter().map(|w| w.surface_form.as_str()).collect();
        assert_eq!(surfaces, vec!["kissalle", "rajalla"]);
        assert!(classified.iter().all(|w| w.grammatical_class < NOMINAL_CLASS_LIMIT));
    }

    #[test]
    fn unknown_base_form_is_dropped() {
        let classified = classify(&[candidate("kissakahvilassa", "kissakahvila")], &lexicon());
        assert!(classified.is_empty());
    }

    #[test]
    fn reading_without_base_form_is_dropped() {
        let word = CandidateWord {
            surface_form: "kissa".into(),
            analysis: Attrs::new(),
        };
        assert!(classify(&[word], &lexicon()).is_empty());
    }

    #[test]
    fn merge_keeps_both_name_spaces() {
        let classified = classify(&[candidate("kissalle", "kissa")], &lexicon());
        let fields = &classified[0].fields;
        assert_eq!(fields["word"], json!("kissa"));
        assert_eq!(fields["tn"], json!(1));
        assert_eq!(fields["av"], json!("_"));
        assert_eq!(fields[SURFACE_FORM_KEY], json!("kissalle"));
        assert_eq!(fields[BASE_FORM_KEY], json!("kissa"));
    }

    #[test]
    fn candidate_wins_on_key_collision() {
        let mut word = candidate("kissalle", "kissa");
        word.analysis
            .insert("av".to_string(), Value::String("analyzer-av".into()));
        let classified = classify(&[word], &lexicon());
        assert_eq!(classified[0].fields["av"], json!("analyzer-av"));
    }

    #[test]
    fn serializes_as_the_merged_object() {
        let classified = classify(&[candidate("kissalle", "kissa")], &lexicon());
        let line = serde_json::to_value(&classified[0]).unwrap();
        assert_eq!(line["word"], json!("kissa"));
        assert_eq!(line[SURFACE_FORM_KEY], json!("kissalle"));
    }
}
