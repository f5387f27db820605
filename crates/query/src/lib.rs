//! Client-side query cache for the LearnHub REST API.
//!
//! Reads go through [`Query`] bindings keyed by [`QueryKey`] and cached
//! in a shared [`QueryClient`]; writes go through [`Mutation`] bindings
//! that invalidate affected keys and publish [`Notification`]s. Observers
//! keep queries fresh by polling, by reacting to invalidation, and
//! optionally through the [`LiveChannel`] push connection.

pub mod cache;
pub mod events;
pub mod key;
pub mod live;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod reconcile;
pub mod reconnect;
pub mod state;
pub mod view;

pub use cache::{QueryClient, QueryConfig};
pub use events::CacheEvent;
pub use key::QueryKey;
pub use live::LiveChannel;
pub use mutation::Mutation;
pub use notify::{Notification, NotificationLevel, Notifications};
pub use query::{Query, QueryObserver, QueryOptions};
pub use reconcile::{Identified, Reconcile, Reconciled};
pub use state::QueryState;
pub use view::ViewState;
