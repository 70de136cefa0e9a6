//! Durable per-(type, year-month) document number allocation.
//!
//! Numbers look like `INV-202406-001` / `QTE-202406-007`: a type prefix,
//! the issue year-month, and a counter zero-padded to at least three digits
//! (it grows past 999 without truncation). Counter state is an injected
//! [`SequenceStore`] so tests can run against an in-memory fake.
//!
//! One allocation consumes one counter value even if the surrounding
//! pipeline later fails; there is no rollback. The file-backed store is
//! read-modify-write with no cross-process locking: concurrent invocations
//! sharing a state file can race and allocate duplicate numbers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::InvoiceFlowError;
use crate::types::DocumentType;

/// Default counter store location, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".state/invoice-sequence.json";

/// A durable key → counter store with increment-and-get semantics.
pub trait SequenceStore {
    /// Increment the counter at `key` and return the new value (first call
    /// on a fresh key returns 1). The increment must be persisted before
    /// returning.
    fn next(&mut self, key: &str) -> Result<u64, InvoiceFlowError>;

    /// Last issued value at `key` without consuming one (0 for fresh keys).
    fn peek(&self, key: &str) -> u64;
}

/// JSON-file-backed sequence store.
///
/// A missing file is an empty map. So is a corrupt one: recovery is
/// silent apart from a warn-level log, so a truncated state file restarts
/// numbering for affected keys rather than failing the run.
#[derive(Debug, Clone)]
pub struct FileSequenceStore {
    path: PathBuf,
}

impl FileSequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (`.state/invoice-sequence.json`).
    pub fn default_location() -> Self {
        Self::new(DEFAULT_STATE_PATH)
    }

    /// Store at the profile-configured path, or the default when `None`.
    pub fn from_profile_path(custom: Option<&str>) -> Self {
        match custom {
            Some(path) => Self::new(path),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, u64> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "sequence state file is corrupt; treating as empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn save(&self, state: &BTreeMap<String, u64>) -> Result<(), InvoiceFlowError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut payload = serde_json::to_string_pretty(state)?;
        payload.push('\n');
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl SequenceStore for FileSequenceStore {
    fn next(&mut self, key: &str) -> Result<u64, InvoiceFlowError> {
        let mut state = self.load();
        let next = state.get(key).copied().unwrap_or(0) + 1;
        state.insert(key.to_string(), next);
        self.save(&state)?;
        debug!(key, next, path = %self.path.display(), "allocated sequence value");
        Ok(next)
    }

    fn peek(&self, key: &str) -> u64 {
        self.load().get(key).copied().unwrap_or(0)
    }
}

/// In-memory sequence store for deterministic tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemorySequenceStore {
    counters: BTreeMap<String, u64>,
}

impl MemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceStore for MemorySequenceStore {
    fn next(&mut self, key: &str) -> Result<u64, InvoiceFlowError> {
        let counter = self.counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    fn peek(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

/// First six date digits (`YYYYMM`) after stripping `-` separators.
///
/// The caller is expected to pass an ISO `YYYY-MM-DD` date; a malformed
/// date silently produces a malformed but consistent key.
fn year_month(issue_date: &str) -> String {
    issue_date.chars().filter(|c| *c != '-').take(6).collect()
}

/// Sequence key partitioning counters per document type and month,
/// e.g. `invoice-202406`.
pub fn sequence_key(issue_date: &str, document_type: DocumentType) -> String {
    format!("{}-{}", document_type.as_str(), year_month(issue_date))
}

/// Allocate the next document number for the given issue month.
pub fn next_document_number(
    issue_date: &str,
    document_type: DocumentType,
    store: &mut dyn SequenceStore,
) -> Result<String, InvoiceFlowError> {
    let yyyymm = year_month(issue_date);
    let key = sequence_key(issue_date, document_type);
    let seq = store.next(&key)?;
    Ok(format!("{}-{yyyymm}-{seq:03}", document_type.number_prefix()))
}
