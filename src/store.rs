use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::classify::ClassifiedWord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob {name:?} could not be read: {source}")]
    Get {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("blob {name:?} could not be written: {source}")]
    Put {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// True when the blob simply does not exist, as opposed to existing but
    /// being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::Get { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

/// Get/put by name against whatever holds the run's inputs and outputs.
/// Stands in for the reference deployment's object-store bucket; the pipeline
/// itself never touches it.
pub trait BlobStore {
    fn get(&self, name: &str) -> Result<Vec<u8>, StoreError>;
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Local-directory store. Blob names may contain `/` subpaths, which become
/// directories under the root.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }
}

impl BlobStore for FsStore {
    fn get(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.root.join(name)).map_err(|source| StoreError::Get {
            name: name.to_string(),
            source,
        })
    }

    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.root.join(name);
        let write = |source| StoreError::Put {
            name: name.to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write)?;
        }
        fs::write(path, bytes).map_err(write)
    }
}

/// Epoch-stamped batch name, `<output_dir>/<unix-epoch>.jsonl`.
pub fn batch_blob_name(output_dir: &str) -> String {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{output_dir}/{epoch}.jsonl")
}

/// One merged JSON object per admitted word, in admission order.
pub fn encode_jsonl(batch: &[ClassifiedWord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    for word in batch {
        serde_json::to_writer(&mut out, word)?;
        out.push(b'\n');
    }
    Ok(out)
}

// ── Tests ──
