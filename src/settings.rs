use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

/// Runtime settings, read from `SEULA_*` environment variables
/// (e.g. `SEULA_DATA_DIR`, `SEULA_ANALYZER_URL`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of the blob store holding inputs and outputs.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Feed-list blob: one feed URL per line.
    #[serde(default = "default_feed_list")]
    pub feed_list: String,
    /// Lexicon snapshot blob: JSON array of records.
    #[serde(default = "default_lexicon")]
    pub lexicon: String,
    /// Uniqueness-state blob.
    #[serde(default = "default_state")]
    pub state: String,
    /// Directory prefix for output batches.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Base URL of the morphological analysis service.
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: String,
}

fn default_data_dir() -> String {
    "data".into()
}
fn default_feed_list() -> String {
    "feeds.txt".into()
}
fn default_lexicon() -> String {
    "kotus_all.json".into()
}
fn default_state() -> String {
    "unique_words.json".into()
}
fn default_output_dir() -> String {
    "feeds".into()
}
fn default_analyzer_url() -> String {
    "http://127.0.0.1:8000/analyze".into()
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .add_source(config::Environment::with_prefix("SEULA"))
            .build()
            .context("failed to read environment settings")?
            .try_deserialize()
            .context("invalid SEULA_* settings")
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.data_dir, "data");
        assert_eq!(settings.feed_list, "feeds.txt");
        assert_eq!(settings.lexicon, "kotus_all.json");
        assert_eq!(settings.state, "unique_words.json");
        assert_eq!(settings.output_dir, "feeds");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"data_dir": "/var/seula", "state": "seen.json"}"#).unwrap();
        assert_eq!(settings.data_dir, "/var/seula");
        assert_eq!(settings.state, "seen.json");
        assert_eq!(settings.lexicon, "kotus_all.json");
    }
}
