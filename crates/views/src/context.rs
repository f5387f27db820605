//! Application-wide context handed to every page.
//!
//! Built once at the root and cloned into pages; clones share the same
//! accessor, cache, notification hub and local store.

use std::future::Future;
use std::sync::Arc;

use learnhub_client::store::keys;
use learnhub_client::{ApiClient, ApiError, ClientConfig, LocalStore, StoredToken};
use learnhub_query::{LiveChannel, Mutation, Notifications, Query, QueryClient, QueryConfig, QueryObserver, QueryKey};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ViewError;

#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<ApiClient>,
    pub queries: QueryClient,
    pub notifications: Arc<Notifications>,
    pub store: Arc<LocalStore>,
    pub config: Arc<ClientConfig>,
    shutdown: CancellationToken,
}

impl AppContext {
    /// Open the local store and build an accessor that authenticates with
    /// the stored tokens.
    pub async fn from_config(config: ClientConfig) -> Result<Self, ViewError> {
        let store = Arc::new(LocalStore::open(&config.store_path).await);
        let tokens = Arc::new(StoredToken::new(Arc::clone(&store)));
        let api = Arc::new(ApiClient::new(&config, tokens)?);
        Ok(Self::from_parts(config, api, store))
    }

    pub fn from_parts(config: ClientConfig, api: Arc<ApiClient>, store: Arc<LocalStore>) -> Self {
        Self {
            api,
            queries: QueryClient::new(QueryConfig::default()),
            notifications: Arc::new(Notifications::default()),
            store,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Bind `key` to a fetch that receives the shared accessor.
    pub fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        Query::new(&self.queries, key, move || fetch(Arc::clone(&api)))
    }

    /// Wrap a write that receives the shared accessor.
    pub fn mutation<I, O, F, Fut>(&self, write: F) -> Mutation<I, O>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(Arc<ApiClient>, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        Mutation::new(&self.queries, &self.notifications, move |input| {
            write(Arc::clone(&api), input)
        })
    }

    /// Observe `query` until the observer is dropped or the context shuts down.
    pub fn observe<T: Send + Sync + 'static>(&self, query: &Query<T>) -> QueryObserver<T> {
        query.observe_until(&self.shutdown)
    }

    /// Start the invalidation push channel if one is configured.
    pub fn start_live_channel(&self) -> Option<JoinHandle<()>> {
        let url = self.config.live_url.as_deref()?;
        tracing::info!(url, "Starting live channel");
        Some(LiveChannel::new(url, &self.queries).spawn(self.shutdown.child_token()))
    }

    /// Forget the signed-in user's tokens and everything cached for them.
    pub async fn sign_out(&self) -> Result<(), ViewError> {
        self.store.remove(keys::ACCESS_TOKEN).await?;
        self.store.remove(keys::REFRESH_TOKEN).await?;
        self.queries.clear();
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Stop every observer and the live channel.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
