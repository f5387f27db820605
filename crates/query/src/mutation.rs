//! Mutation bindings: a wrapped write with cache and notification side
//! effects.
//!
//! On success the configured key prefixes are invalidated (so observed
//! lists refetch) and a success notification is published. On failure an
//! error notification carrying [`ApiError::user_message`] is published and
//! the cache is left as it was.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use learnhub_client::ApiError;

use crate::cache::QueryClient;
use crate::key::QueryKey;
use crate::notify::Notifications;
use crate::reconcile::Reconcile;

type MutateFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, ApiError>> + Send + Sync>;
type MessageFn<O> = Arc<dyn Fn(&O) -> String + Send + Sync>;

pub struct Mutation<I, O> {
    client: QueryClient,
    notifications: Arc<Notifications>,
    mutate: MutateFn<I, O>,
    invalidates: Vec<QueryKey>,
    success_message: Option<MessageFn<O>>,
    error_context: Option<String>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            notifications: Arc::clone(&self.notifications),
            mutate: Arc::clone(&self.mutate),
            invalidates: self.invalidates.clone(),
            success_message: self.success_message.clone(),
            error_context: self.error_context.clone(),
        }
    }
}

impl<I: Send + 'static, O: Send + 'static> Mutation<I, O> {
    pub fn new<F, Fut>(client: &QueryClient, notifications: &Arc<Notifications>, mutate: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
    {
        Self {
            client: client.clone(),
            notifications: Arc::clone(notifications),
            mutate: Arc::new(move |input| mutate(input).boxed()),
            invalidates: Vec::new(),
            success_message: None,
            error_context: None,
        }
    }

    /// Invalidate every key under `prefix` after a successful write.
    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.success_message = Some(Arc::new(move |_| message.clone()));
        self
    }

    /// Success message derived from the server response.
    pub fn success_message_with<F>(mut self, message: F) -> Self
    where
        F: Fn(&O) -> String + Send + Sync + 'static,
    {
        self.success_message = Some(Arc::new(message));
        self
    }

    /// Prefix for error notifications, e.g. `"Failed to delete course"`.
    pub fn error_context(mut self, context: impl Into<String>) -> Self {
        self.error_context = Some(context.into());
        self
    }

    pub async fn mutate(&self, input: I) -> Result<O, ApiError> {
        match (self.mutate)(input).await {
            Ok(output) => {
                self.on_success(&output);
                Ok(output)
            }
            Err(e) => {
                self.on_error(&e);
                Err(e)
            }
        }
    }

    /// Apply `apply` to the cached value under `target` before the write
    /// is sent. On success the optimistic and server values are merged by
    /// `reconcile` and the configured keys are invalidated; on failure the
    /// cached value is restored from a snapshot.
    ///
    /// With nothing cached under `target` this behaves like [`mutate`](Self::mutate).
    pub async fn mutate_optimistic<T, A, R>(
        &self,
        input: I,
        target: &QueryKey,
        apply: A,
        reconcile: R,
    ) -> Result<O, ApiError>
    where
        T: Send + Sync + 'static,
        A: FnOnce(&T) -> T,
        R: Reconcile<T, O> + Send,
    {
        let snapshot = self.client.get_data::<T>(target);
        let optimistic = snapshot.as_deref().map(apply).map(Arc::new);
        if let Some(value) = &optimistic {
            self.client.set_shared(target, Arc::clone(value));
        }

        match (self.mutate)(input).await {
            Ok(output) => {
                if let Some(optimistic) = &optimistic {
                    let outcome = reconcile.reconcile(optimistic, &output);
                    if outcome.conflict {
                        tracing::warn!(key = %target, "Server response differs from optimistic value, keeping server value");
                    }
                    self.client.set_data(target, outcome.value);
                }
                self.on_success(&output);
                Ok(output)
            }
            Err(e) => {
                if let Some(snapshot) = snapshot {
                    tracing::debug!(key = %target, "Rolling back optimistic update");
                    self.client.set_shared(target, snapshot);
                }
                self.on_error(&e);
                Err(e)
            }
        }
    }

    // ---- private helpers ----

    fn on_success(&self, output: &O) {
        for prefix in &self.invalidates {
            self.client.invalidate(prefix);
        }
        if let Some(message) = &self.success_message {
            self.notifications.success(message(output));
        }
    }

    fn on_error(&self, err: &ApiError) {
        tracing::warn!(error = %err, "Mutation failed");
        let message = match &self.error_context {
            Some(context) => format!("{context}: {}", err.user_message()),
            None => err.user_message(),
        };
        self.notifications.error(message);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
