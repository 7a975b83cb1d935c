mod analyze;
mod classify;
mod feed;
mod lexicon;
mod normalize;
mod pipeline;
mod settings;
mod store;
mod unique;
mod voikko;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::settings::Settings;
use crate::store::{BlobStore, FsStore};
use crate::unique::UniquenessState;

#[derive(Parser)]
#[command(
    name = "sanaseula",
    about = "Discovers dictionary-grade words missing from a reference lexicon in syndicated feeds"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch feeds, classify words against the lexicon, persist first-time finds
    Run {
        /// Skip unreachable feeds instead of aborting the run
        #[arg(long)]
        lenient: bool,
    },
    /// Show the persisted uniqueness state
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let store = FsStore::new(&settings.data_dir);

    match cli.command {
        Commands::Run { lenient } => run(&settings, &store, lenient),
        Commands::Stats => stats(&settings, &store),
    }
}

fn run(settings: &Settings, store: &dyn BlobStore, lenient: bool) -> Result<()> {
    let feed_list =
        String::from_utf8(store.get(&settings.feed_list)?).context("feed list is not UTF-8")?;
    let urls = feed::parse_feed_list(&feed_list);
    info!(feeds = urls.len(), "feed list loaded");

    let (entries, report) = feed::fetch_all(&urls, lenient)?;

    let lexicon_records: Vec<serde_json::Value> =
        serde_json::from_slice(&store.get(&settings.lexicon)?)
            .context("lexicon snapshot is not a JSON array")?;

    let prior_state = load_prior_state(settings, store)?;
    let analyzer = voikko::VoikkoClient::new(settings.analyzer_url.clone())?;

    let outcome = pipeline::run(&entries, lexicon_records, prior_state, &analyzer)?;

    let batch_name = store::batch_blob_name(&settings.output_dir);
    store.put(&batch_name, &store::encode_jsonl(&outcome.batch)?)?;
    // The state advances only once the batch is safely written.
    store.put(&settings.state, &serde_json::to_vec_pretty(&outcome.new_state)?)?;

    let s = &outcome.stats;
    println!("Feeds:              {}", report.feed_count);
    if report.feeds_skipped > 0 {
        println!("Feeds skipped:      {}", report.feeds_skipped);
    }
    println!("Entries:            {}", s.entry_count);
    println!("Lexicon words:      {} ({} duplicates removed)", s.lexicon_size, s.duplicates_removed);
    println!("Candidates:         {}", s.candidate_count);
    println!("Classified:         {}", s.classified_count);
    println!("Added unique words: {}", s.added_count);
    println!("Batch written to {}", batch_name);
    Ok(())
}

/// A missing state blob means this is the first run and the tracker starts
/// empty. Any other read failure, and a state blob that does not parse, are
/// fatal: starting empty there would re-surface every previously discovered
/// word and then overwrite the accumulated state.
fn load_prior_state(settings: &Settings, store: &dyn BlobStore) -> Result<UniquenessState> {
    match store.get(&settings.state) {
        Ok(bytes) => {
            serde_json::from_slice(&bytes).context("uniqueness state is not valid JSON")
        }
        Err(err) if err.is_not_found() => {
            warn!(blob = %settings.state, "no prior uniqueness state; starting empty");
            Ok(UniquenessState::default())
        }
        Err(err) => Err(err).context("failed to read uniqueness state"),
    }
}

fn stats(settings: &Settings, store: &dyn BlobStore) -> Result<()> {
    let state: UniquenessState = serde_json::from_slice(&store.get(&settings.state)?)
        .context("uniqueness state is not valid JSON")?;
    println!("Data dir:    {}", settings.data_dir);
    println!("State blob:  {}", settings.state);
    println!("Known words: {}", state.words.len());
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::io;

    use crate::store::StoreError;

    use super::*;

    struct OneBlobStore {
        bytes: Vec<u8>,
    }

    impl BlobStore for OneBlobStore {
        fn get(&self, _name: &str) -> Result<Vec<u8>, StoreError> {
            Ok(self.bytes.clone())
        }

        fn put(&self, _name: &str, _bytes: &[u8]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct FailingStore {
        kind: io::ErrorKind,
    }

    impl BlobStore for FailingStore {
        fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::Get {
                name: name.to_string(),
                source: io::Error::new(self.kind, "store down"),
            })
        }

        fn put(&self, _name: &str, _bytes: &[u8]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn settings() -> Settings {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn missing_state_blob_starts_empty() {
        let store = FailingStore {
            kind: io::ErrorKind::NotFound,
        };
        let state = load_prior_state(&settings(), &store).unwrap();
        assert!(state.words.is_empty());
    }

    #[test]
    fn state_read_failure_is_fatal() {
        // A transient read failure must not reset cross-run uniqueness.
        let store = FailingStore {
            kind: io::ErrorKind::PermissionDenied,
        };
        assert!(load_prior_state(&settings(), &store).is_err());
    }

    #[test]
    fn unparseable_state_blob_is_fatal() {
        let store = OneBlobStore {
            bytes: b"not json".to_vec(),
        };
        assert!(load_prior_state(&settings(), &store).is_err());
    }

    #[test]
    fn valid_state_blob_is_loaded() {
        let store = OneBlobStore {
            bytes: br#"{"words": ["kissalle"]}"#.to_vec(),
        };
        let state = load_prior_state(&settings(), &store).unwrap();
        assert!(state.words.contains("kissalle"));
    }
}
