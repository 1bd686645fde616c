use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::visit::{VisitRecord, UNKNOWN};

/// Result of a [`VisitStore::record_visit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Total unique (identity, date) pairs ever recorded.
    pub count: usize,
    /// True when the identity already had a record for the current UTC date.
    pub already_visited_today: bool,
}

/// Append-only log of unique daily visits, backed by a single pretty-printed
/// JSON document with an in-process volatile fallback.
///
/// Every read attempts the durable file first and falls back to the volatile
/// copy on failure; every write attempts the durable file and keeps the
/// volatile copy current either way, so a transiently unwritable filesystem
/// degrades the store to memory-only instead of failing requests. Durable
/// failures are logged as warnings and retried on the next write.
///
/// The whole check-then-append cycle runs under a single-writer mutex, so
/// concurrent callers cannot both append a record for the same
/// (identity, date).
pub struct VisitStore {
    path: PathBuf,
    /// Volatile copy of the log. Doubles as the serialization point for
    /// check-then-append.
    log: Mutex<Vec<VisitRecord>>,
}

impl VisitStore {
    /// Open the store backed by the document at `path`.
    ///
    /// A missing document is seeded with an empty `[]` array. If seeding
    /// fails the store still works, serving from memory; later writes retry
    /// the durable path since the failure may be transient.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists() {
            if let Err(e) = seed_empty(&path) {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not create visit log, continuing with in-memory store"
                );
            }
        }
        Self {
            path,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Record a visit for `identity` on the current UTC date.
    ///
    /// De-duplicated per (identity, date): if a record already exists for
    /// today this is a no-op and `already_visited_today` is true. Otherwise
    /// a new record is appended and the full log rewritten to disk. An empty
    /// `user_agent` is stored as the `"unknown"` sentinel.
    pub async fn record_visit(&self, identity: &str, user_agent: &str) -> RecordOutcome {
        let mut volatile = self.log.lock().await;
        let mut log = self.effective_log(&volatile);

        let now = Utc::now();
        let today = now.format("%Y-%m-%d").to_string();

        // Linear scan is fine at this scale: one self-hosted site's worth of
        // unique daily visitors.
        if log.iter().any(|r| r.ip == identity && r.date == today) {
            *volatile = log;
            return RecordOutcome {
                count: volatile.len(),
                already_visited_today: true,
            };
        }

        log.push(VisitRecord {
            ip: identity.to_string(),
            date: today,
            time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_agent: if user_agent.is_empty() {
                UNKNOWN.to_string()
            } else {
                user_agent.to_string()
            },
        });

        if let Err(e) = self.persist(&log) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "visit log write failed, keeping record in memory only"
            );
        }

        *volatile = log;
        RecordOutcome {
            count: volatile.len(),
            already_visited_today: false,
        }
    }

    /// Current total of unique (identity, date) pairs. Never mutates.
    pub async fn total_count(&self) -> usize {
        let volatile = self.log.lock().await;
        self.effective_log(&volatile).len()
    }

    /// Byte-for-byte contents of the durable document.
    ///
    /// When the file cannot be read, the volatile copy is serialized instead
    /// so the diagnostic endpoint stays useful while running degraded.
    pub async fn raw_dump(&self) -> Vec<u8> {
        match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "visit log unreadable, dumping volatile copy"
                );
                let volatile = self.log.lock().await;
                serde_json::to_vec_pretty(&*volatile).unwrap_or_else(|_| b"[]".to_vec())
            }
        }
    }

    /// The log the store should act on right now.
    ///
    /// Prefers the durable document, but a readable-yet-stale file (an
    /// earlier write failed while reads still succeed) must not roll back
    /// records already served from memory: the reported count is
    /// non-decreasing, so the longer copy wins.
    fn effective_log(&self, volatile: &[VisitRecord]) -> Vec<VisitRecord> {
        match self.load_durable() {
            Ok(durable) if durable.len() >= volatile.len() => durable,
            Ok(durable) => {
                debug!(
                    durable = durable.len(),
                    volatile = volatile.len(),
                    "durable log behind volatile copy, keeping volatile"
                );
                volatile.to_vec()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "visit log unreadable, serving volatile copy"
                );
                volatile.to_vec()
            }
        }
    }

    fn load_durable(&self) -> Result<Vec<VisitRecord>, StoreError> {
        let bytes = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rewrite the full document. Pretty-printed to stay hand-inspectable.
    fn persist(&self, log: &[VisitRecord]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(log)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

fn seed_empty(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, b"[]")?;
    Ok(())
}
