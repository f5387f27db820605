//! Query bindings: a cache key bound to an async fetch.
//!
//! A [`Query`] is cheap to clone. Call [`Query::fetch`] for a one-off
//! read, or [`Query::observe`] to keep the value fresh in the background
//! (fetch on mount, refetch on invalidation and on the poll interval).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use learnhub_client::ApiError;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::cache::QueryClient;
use crate::events::CacheEvent;
use crate::key::QueryKey;
use crate::state::QueryState;

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// When false no fetch is ever issued and the state stays idle.
    pub enabled: bool,
    /// Overrides [`QueryConfig::stale_time`](crate::QueryConfig::stale_time).
    pub stale_time: Option<Duration>,
    /// Poll period while observed. Ticks missed during a slow fetch are
    /// delayed, never bunched up. A zero period disables polling.
    pub refetch_interval: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: None,
            refetch_interval: None,
        }
    }
}

pub struct Query<T> {
    client: QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    pub fn new<F, Fut>(client: &QueryClient, key: QueryKey, fetcher: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            client: client.clone(),
            key,
            options: QueryOptions::default(),
            fetcher: Arc::new(move || fetcher().boxed()),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.options.enabled = enabled;
        self
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.options.stale_time = Some(stale_time);
        self
    }

    /// Poll every `interval` while observed. Zero turns polling off.
    pub fn refetch_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            tracing::warn!(key = %self.key, "Ignoring zero refetch interval");
        }
        self.options.refetch_interval = Some(interval).filter(|i| !i.is_zero());
        self
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Current cached state. Always idle while disabled.
    pub fn state(&self) -> QueryState<T> {
        if !self.options.enabled {
            return QueryState::idle();
        }
        self.client.state(&self.key)
    }

    /// Fetch unless fresh data is cached, then return the resulting state.
    pub async fn fetch(&self) -> QueryState<T> {
        self.run(self.effective_stale_time()).await
    }

    /// Fetch regardless of staleness (still joins an in-flight fetch).
    pub async fn refetch(&self) -> QueryState<T> {
        self.run(Duration::ZERO).await
    }

    /// Fetch unless fresh and return the data itself.
    pub async fn data(&self) -> Result<Arc<T>, ApiError> {
        if !self.options.enabled {
            return Err(ApiError::InvalidRequest(format!(
                "Query '{}' is disabled",
                self.key
            )));
        }
        let fetcher = Arc::clone(&self.fetcher);
        self.client
            .fetch(&self.key, self.effective_stale_time(), move || fetcher())
            .await
    }

    /// Keep this query fresh on a background task until the returned
    /// observer is dropped.
    pub fn observe(&self) -> QueryObserver<T> {
        self.observe_until(&CancellationToken::new())
    }

    /// Like [`observe`](Self::observe), also stopping when `parent` is
    /// cancelled.
    pub fn observe_until(&self, parent: &CancellationToken) -> QueryObserver<T> {
        let (tx, rx) = watch::channel(self.state());
        let cancel = parent.child_token();
        // Subscribe before spawning so no event between now and the first
        // poll of the task is missed.
        let events = self.client.subscribe();
        tokio::spawn(observe_loop(self.clone(), tx, events, cancel.clone()));
        QueryObserver { rx, cancel }
    }

    // ---- private helpers ----

    fn effective_stale_time(&self) -> Duration {
        self.options
            .stale_time
            .unwrap_or(self.client.config().stale_time)
    }

    async fn run(&self, stale_time: Duration) -> QueryState<T> {
        if !self.options.enabled {
            return QueryState::idle();
        }
        let fetcher = Arc::clone(&self.fetcher);
        if let Err(e) = self.client.fetch(&self.key, stale_time, move || fetcher()).await {
            tracing::debug!(key = %self.key, error = %e, "Query fetch failed");
        }
        self.state()
    }

    /// Start a fetch on its own task; its progress arrives as cache events.
    fn spawn_fetch(&self, force: bool) {
        let query = self.clone();
        tokio::spawn(async move {
            if force {
                query.refetch().await;
            } else {
                query.fetch().await;
            }
        });
    }
}

/// Handle to a background observer task. Dropping it stops the task
/// (and with it any polling).
pub struct QueryObserver<T> {
    rx: watch::Receiver<QueryState<T>>,
    cancel: CancellationToken,
}

impl<T> QueryObserver<T> {
    pub fn current(&self) -> QueryState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published state. `None` once the observer stopped.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until a published state satisfies `predicate`.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<QueryState<T>>
    where
        F: FnMut(&QueryState<T>) -> bool,
    {
        self.rx.wait_for(predicate).await.ok().map(|state| state.clone())
    }

    /// A receiver for callers that want to select over several observers.
    pub fn receiver(&self) -> watch::Receiver<QueryState<T>> {
        self.rx.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn observe_loop<T: Send + Sync + 'static>(
    query: Query<T>,
    tx: watch::Sender<QueryState<T>>,
    mut events: broadcast::Receiver<CacheEvent>,
    cancel: CancellationToken,
) {
    let key = query.key.clone();

    if !query.options.enabled {
        tracing::debug!(%key, "Query disabled, observer idle");
        cancel.cancelled().await;
        return;
    }

    tracing::debug!(
        %key,
        interval_ms = query.options.refetch_interval.map(|d| d.as_millis() as u64),
        "Observer started",
    );

    let mut poll = query
        .options
        .refetch_interval
        .filter(|p| !p.is_zero())
        .map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

    query.spawn_fetch(false);
    publish(&tx, query.state());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = next_tick(&mut poll) => {
                tracing::trace!(%key, "Poll tick");
                query.spawn_fetch(true);
            }
            event = events.recv() => match event {
                Ok(CacheEvent::Invalidated(prefix)) if key.starts_with(&prefix) => {
                    query.spawn_fetch(false);
                    publish(&tx, query.state());
                }
                Ok(event) if event.concerns(&key) => publish(&tx, query.state()),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%key, skipped, "Observer lagged behind cache events");
                    publish(&tx, query.state());
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    tracing::debug!(%key, "Observer stopped");
}

async fn next_tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn publish<T>(tx: &watch::Sender<QueryState<T>>, state: QueryState<T>) {
    tx.send_if_modified(|current| {
        if current.same_as(&state) {
            false
        } else {
            *current = state;
            true
        }
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A query whose fetch returns how many times it has been called.
    fn counting_query(client: &QueryClient, calls: &Arc<AtomicUsize>) -> Query<usize> {
        let calls = Arc::clone(calls);
        Query::new(client, QueryKey::new("stats"), move || {
            let calls = Arc::clone(&calls);
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }
        })
    }

    fn has(n: usize) -> impl FnMut(&QueryState<usize>) -> bool {
        move |state| state.data.as_deref() == Some(&n)
    }

    #[tokio::test(start_paused = true)]
    async fn polls_at_interval_and_no_faster() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls).refetch_interval(Duration::from_secs(5));

        let mut observer = query.observe();
        observer.wait_for(has(1)).await.unwrap();
        let mounted = Instant::now();

        observer.wait_for(has(2)).await.unwrap();
        assert_eq!(mounted.elapsed(), Duration::from_secs(5));

        observer.wait_for(has(3)).await.unwrap();
        assert_eq!(mounted.elapsed(), Duration::from_secs(10));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_does_not_bunch_polls() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let query = Query::new(&client, QueryKey::new("slow"), move || {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(Duration::from_secs(12)).await;
                Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
            }
        })
        .refetch_interval(Duration::from_secs(5));

        let _observer = query.observe();
        tokio::time::sleep(Duration::from_secs(60)).await;

        // Polls while a fetch is running join it instead of issuing new
        // requests, so at most one request per 12 s fetch window.
        let issued = calls.load(Ordering::SeqCst);
        assert!(issued <= 5, "issued {issued} requests in 60s");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_means_no_polling() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls).refetch_interval(Duration::ZERO);
        assert_eq!(query.options().refetch_interval, None);

        // Set directly, bypassing the builder.
        let options = QueryOptions {
            refetch_interval: Some(Duration::ZERO),
            ..QueryOptions::default()
        };
        let mut observer = query.with_options(options).observe();
        observer.wait_for(has(1)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(observer.current().data.as_deref(), Some(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_query_never_fetches() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls)
            .enabled(false)
            .refetch_interval(Duration::from_secs(5));

        let observer = query.observe();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let state = observer.current();
        assert!(state.is_idle());
        assert!(!state.is_loading);
        assert!(query.fetch().await.data.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_observer_stops_polling() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls).refetch_interval(Duration::from_secs(5));

        let mut observer = query.observe();
        observer.wait_for(has(1)).await.unwrap();
        drop(observer);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_triggers_refetch() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls).stale_time(Duration::from_secs(3600));

        let mut observer = query.observe();
        observer.wait_for(has(1)).await.unwrap();

        client.invalidate(&QueryKey::new("stats"));
        let state = observer.wait_for(has(2)).await.unwrap();
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn observer_reports_loading_then_data() {
        let client = QueryClient::default();
        let query = Query::new(&client, QueryKey::new("courses"), || async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(vec!["Rust 101".to_string()])
        });

        let mut observer = query.observe();
        let loading = observer.wait_for(|s| s.is_loading).await.unwrap();
        assert!(loading.data.is_none());

        let loaded = observer.wait_for(|s| s.data.is_some()).await.unwrap();
        assert!(!loaded.is_loading);
        assert_eq!(loaded.data.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn observer_surfaces_fetch_errors() {
        let client = QueryClient::default();
        let query: Query<Vec<String>> = Query::new(&client, QueryKey::new("courses"), || async {
            Err(ApiError::Network("connection refused".into()))
        });

        let mut observer = query.observe();
        let failed = observer.wait_for(|s| s.error.is_some()).await.unwrap();
        assert!(failed.data.is_none());
        assert!(!failed.is_loading);
    }

    #[tokio::test]
    async fn data_on_disabled_query_is_an_error() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&client, &calls).enabled(false);
        assert!(query.data().await.is_err());
    }
}
