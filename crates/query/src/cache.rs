//! The shared query cache.
//!
//! [`QueryClient`] maps [`QueryKey`]s to the last fetched value of any
//! type, de-duplicates concurrent fetches of the same key, and announces
//! every change as a [`CacheEvent`]. It is a cheap handle: clones share
//! the same cache.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use learnhub_client::ApiError;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::events::{CacheEvent, DEFAULT_EVENT_CAPACITY};
use crate::key::QueryKey;
use crate::state::QueryState;

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Erased, ApiError>>>;

/// Cache-wide defaults.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Default minimum re-use window for fetched data. Zero means every
    /// fetch goes to the backend (unless one is already in flight).
    pub stale_time: Duration,
    /// Capacity of the cache event channel.
    pub event_capacity: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

/// Fetch ids order results: a result only replaces data stored by an
/// older fetch, and data stored before `stale_from` is never fresh.
#[derive(Default)]
struct Entry {
    data: Option<Erased>,
    data_fetch_id: u64,
    updated_at: Option<Instant>,
    error: Option<ApiError>,
    error_fetch_id: u64,
    stale_from: u64,
    in_flight: Option<InFlight>,
}

impl Entry {
    fn fresh_data(&self, stale_time: Duration) -> Option<&Erased> {
        let data = self.data.as_ref()?;
        let updated_at = self.updated_at?;
        (self.data_fetch_id >= self.stale_from && updated_at.elapsed() < stale_time).then_some(data)
    }
}

struct Inner {
    config: QueryConfig,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    events: broadcast::Sender<CacheEvent>,
    next_fetch_id: AtomicU64,
}

#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                config,
                entries: Mutex::new(HashMap::new()),
                events,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Subscribe to every cache change.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return cached data for `key` if it is younger than `stale_time`,
    /// otherwise run `fetcher` (or join the fetch already in flight for
    /// this key) and store its result.
    ///
    /// The fetch runs on its own task, so it completes and updates the
    /// cache even if every caller stops waiting for it.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let Some(data) = entry.fresh_data(stale_time) {
                tracing::trace!(%key, "Serving fresh cached data");
                return downcast(key, Arc::clone(data));
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    tracing::trace!(%key, fetch_id = in_flight.id, "Joining in-flight fetch");
                    in_flight.fetch.clone()
                }
                None => {
                    let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = self.spawn_fetch(key.clone(), id, fetcher());
                    entry.in_flight = Some(InFlight {
                        id,
                        fetch: fetch.clone(),
                    });
                    tracing::debug!(%key, fetch_id = id, "Fetching");
                    self.publish(CacheEvent::Fetching(key.clone()));
                    fetch
                }
            }
        };

        downcast(key, fetch.await?)
    }

    /// Typed view of the entry for `key`.
    ///
    /// Data stored under the same key with a different type reads as absent.
    pub fn state<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.lock();
        let Some(entry) = entries.get(key) else {
            return QueryState::idle();
        };

        let data = entry.data.clone().and_then(|d| d.downcast::<T>().ok());
        let is_fetching = entry.in_flight.is_some();
        QueryState {
            is_loading: is_fetching && data.is_none(),
            data,
            is_fetching,
            error: entry.error.clone(),
            updated_at: entry.updated_at,
            revision: entry.data_fetch_id,
        }
    }

    pub fn get_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.state(key).data
    }

    /// Store a value directly (optimistic updates, rollback, seeding).
    pub fn set_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) {
        self.set_shared(key, Arc::new(value));
    }

    pub fn set_shared<T: Send + Sync + 'static>(&self, key: &QueryKey, value: Arc<T>) {
        {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();
            entry.data = Some(value as Erased);
            entry.data_fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
            entry.updated_at = Some(Instant::now());
            entry.error = None;
        }
        self.publish(CacheEvent::Updated(key.clone()));
    }

    /// Mark every key under `prefix` stale. Observers of those keys refetch.
    ///
    /// A fetch already in flight is detached: later fetches start fresh
    /// rather than joining a request that may predate the change.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let count = {
            let mut entries = self.lock();
            let stale_from = self.inner.next_fetch_id.load(Ordering::Relaxed);
            let mut count = 0;
            for (_, entry) in entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
                entry.stale_from = stale_from;
                entry.in_flight = None;
                count += 1;
            }
            count
        };

        tracing::debug!(%prefix, entries = count, "Invalidated queries");
        self.publish(CacheEvent::Invalidated(prefix.clone()));
        count
    }

    /// Drop every key under `prefix`.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let count = {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|k, _| !k.starts_with(prefix));
            before - entries.len()
        };

        tracing::debug!(%prefix, entries = count, "Removed queries");
        self.publish(CacheEvent::Removed(prefix.clone()));
        count
    }

    /// Drop everything, e.g. on sign-out.
    pub fn clear(&self) {
        self.remove(&QueryKey::from_segments(Vec::<String>::new()));
    }

    // ---- private helpers ----

    fn spawn_fetch<T, Fut>(&self, key: QueryKey, id: u64, fut: Fut) -> SharedFetch
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let client = self.clone();
        let task_client = self.clone();
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(|value| Arc::new(value) as Erased),
                Err(_) => {
                    tracing::error!(key = %task_key, fetch_id = id, "Fetcher panicked");
                    Err(ApiError::Network("Fetch failed unexpectedly".to_string()))
                }
            };
            task_client.settle(&task_key, id, &result);
            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    // The task never settled; release the key so later
                    // fetches start over instead of joining this one.
                    let result = Err(ApiError::Network(format!("Fetch task aborted: {e}")));
                    client.settle(&key, id, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Record the outcome of fetch `id` unless a newer result already landed.
    fn settle(&self, key: &QueryKey, id: u64, result: &Result<Erased, ApiError>) {
        let event = {
            let mut entries = self.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };

            let finished = entry.in_flight.as_ref().is_some_and(|f| f.id == id);
            if finished {
                entry.in_flight = None;
            }

            match result {
                Ok(data) if id > entry.data_fetch_id => {
                    entry.data = Some(Arc::clone(data));
                    entry.data_fetch_id = id;
                    entry.updated_at = Some(Instant::now());
                    if entry.error_fetch_id < id {
                        entry.error = None;
                    }
                    CacheEvent::Updated(key.clone())
                }
                Err(e) if id > entry.data_fetch_id && id > entry.error_fetch_id => {
                    tracing::debug!(%key, fetch_id = id, error = %e, "Fetch failed, keeping cached data");
                    entry.error = Some(e.clone());
                    entry.error_fetch_id = id;
                    CacheEvent::Failed(key.clone())
                }
                _ if finished => CacheEvent::Updated(key.clone()),
                _ => {
                    tracing::debug!(%key, fetch_id = id, "Discarding superseded fetch result");
                    return;
                }
            }
        };
        self.publish(event);
    }

    fn publish(&self, event: CacheEvent) {
        // Ignore the SendError: it only means nobody is observing.
        let _ = self.inner.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, data: Erased) -> Result<Arc<T>, ApiError> {
    data.downcast::<T>()
        .map_err(|_| ApiError::Decode(format!("Cached value for '{key}' has a different type")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
