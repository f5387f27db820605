//! Bearer credentials attached to every request.
//!
//! How tokens are obtained is owned by an external auth collaborator;
//! the accessor only asks a [`TokenSource`] for the current one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::{keys, LocalStore};

/// Supplies the bearer token for outgoing requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` for anonymous requests.
    async fn bearer_token(&self) -> Option<String>;
}

/// Never attaches credentials.
pub struct Anonymous;

#[async_trait]
impl TokenSource for Anonymous {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, e.g. from a CLI flag.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the signed-in user's access token from the local store, falling
/// back to the guest practice session token.
pub struct StoredToken {
    store: Arc<LocalStore>,
}

impl StoredToken {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenSource for StoredToken {
    async fn bearer_token(&self) -> Option<String> {
        match self.store.get(keys::ACCESS_TOKEN).await {
            Some(token) => Some(token),
            None => self.store.get(keys::GUEST_SESSION_TOKEN).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_token_prefers_access_token() {
        let store = Arc::new(LocalStore::in_memory());
        let source = StoredToken::new(Arc::clone(&store));
        assert!(source.bearer_token().await.is_none());

        store.set(keys::GUEST_SESSION_TOKEN, "guest").await.unwrap();
        assert_eq!(source.bearer_token().await.as_deref(), Some("guest"));

        store.set(keys::ACCESS_TOKEN, "user").await.unwrap();
        assert_eq!(source.bearer_token().await.as_deref(), Some("user"));
    }
}
