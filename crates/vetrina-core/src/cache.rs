// ── Parameterized query cache ──
//
// One entry per distinct QueryKey, living for the life of the process.
// The Loading transition is atomic (dashmap entry API), so concurrent
// requests for one key produce exactly one outbound fetch. Completions
// are keyed and epoch-checked: a late response can never land on another
// key's entry or on a newer generation of its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tracing::debug;

use crate::error::ErrorInfo;
use crate::model::Product;
use crate::query::QueryKey;

/// Per-entry lifecycle state.
///
/// `Ready` holds the fetched sequence verbatim behind an `Arc` -- once a
/// fetch succeeds the data is immutable; a refetch replaces the whole
/// state, it never mutates in place.
#[derive(Debug, Clone)]
pub enum QueryState {
    /// Entry exists but needs a (re)fetch.
    Idle,
    /// A fetch for this key is in flight.
    Loading,
    /// Fetch resolved; data stored verbatim, in server order.
    Ready(Arc<Vec<Product>>),
    /// Fetch failed; only the normalized error is kept.
    Failed(ErrorInfo),
}

impl QueryState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }
}

struct CacheEntry {
    state: QueryState,
    /// Generation of the in-flight fetch; completions must present it.
    epoch: u64,
}

/// Keyed cache of catalog query results.
///
/// Storage and notification follow the reactive-collection idiom:
/// `DashMap` for lock-free keyed access, a `watch` version counter
/// bumped on every transition so consumers re-read derived views.
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    next_epoch: AtomicU64,
    version: watch::Sender<u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            entries: DashMap::new(),
            next_epoch: AtomicU64::new(1),
            version,
        }
    }

    /// Current state for `key`, or `None` if never requested.
    pub fn get(&self, key: &QueryKey) -> Option<QueryState> {
        self.entries.get(key).map(|e| e.state.clone())
    }

    /// Claim the fetch for `key`.
    ///
    /// Returns `Some(epoch)` iff the caller must perform the outbound
    /// fetch: the entry was absent or Idle and has now atomically
    /// transitioned to Loading. Returns `None` while another fetch is in
    /// flight or the entry is already settled -- settled entries are
    /// never refetched implicitly (use [`invalidate`](Self::invalidate)).
    pub fn begin(&self, key: &QueryKey) -> Option<u64> {
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);

        let claimed = match self.entries.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(CacheEntry {
                    state: QueryState::Loading,
                    epoch,
                });
                true
            }
            Entry::Occupied(mut slot) => {
                if matches!(slot.get().state, QueryState::Idle) {
                    let entry = slot.get_mut();
                    entry.state = QueryState::Loading;
                    entry.epoch = epoch;
                    true
                } else {
                    false
                }
            }
        };

        if claimed {
            debug!(key = %key, epoch, "query fetch started");
            self.bump_version();
            Some(epoch)
        } else {
            None
        }
    }

    /// Apply a fetch result for `key`.
    ///
    /// The write is keyed and epoch-checked: it only lands if the entry
    /// is still Loading under the same epoch. Anything else -- the key
    /// was invalidated, refetched, or never claimed -- drops the result.
    /// Failures are normalized here; the raw error never travels upward.
    pub fn complete(
        &self,
        key: &QueryKey,
        epoch: u64,
        result: Result<Vec<Product>, vetrina_api::Error>,
    ) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            debug!(key = %key, epoch, "dropping completion for unknown entry");
            return;
        };

        if !matches!(entry.state, QueryState::Loading) || entry.epoch != epoch {
            debug!(key = %key, epoch, "dropping stale completion");
            return;
        }

        entry.state = match result {
            Ok(products) => {
                debug!(key = %key, count = products.len(), "query fetch succeeded");
                QueryState::Ready(Arc::new(products))
            }
            Err(err) => {
                let info = ErrorInfo::from_api(&err);
                debug!(key = %key, error = %info, "query fetch failed");
                QueryState::Failed(info)
            }
        };

        drop(entry);
        self.bump_version();
    }

    /// Mark `key` for refetch. The next [`begin`](Self::begin) wins a
    /// fresh epoch; an in-flight completion for the old one is dropped.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.state = QueryState::Idle;
            drop(entry);
            debug!(key = %key, "query entry invalidated");
            self.bump_version();
        }
    }

    /// Number of distinct keys ever requested.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe to transition notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
