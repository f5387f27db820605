//! Reconciling optimistic cache values with server responses.
//!
//! After an optimistic write succeeds, the locally applied value and the
//! server's answer may disagree. A [`Reconcile`] policy decides,
//! deterministically, what ends up in the cache. The policies here all
//! let the server win and report whether the two differed.

use learnhub_core::course::{Course, Lesson};
use learnhub_core::instructor::JoinLink;
use learnhub_core::types::DbId;

pub struct Reconciled<T> {
    pub value: T,
    /// The optimistic value disagreed with the server.
    pub conflict: bool,
}

pub trait Reconcile<T, O> {
    fn reconcile(&self, optimistic: &T, server: &O) -> Reconciled<T>;
}

impl<T, O, F> Reconcile<T, O> for F
where
    F: Fn(&T, &O) -> Reconciled<T>,
{
    fn reconcile(&self, optimistic: &T, server: &O) -> Reconciled<T> {
        self(optimistic, server)
    }
}

/// The server's response replaces the cached value outright.
pub struct ServerWins;

impl<T: Clone + PartialEq> Reconcile<T, T> for ServerWins {
    fn reconcile(&self, optimistic: &T, server: &T) -> Reconciled<T> {
        Reconciled {
            value: server.clone(),
            conflict: optimistic != server,
        }
    }
}

/// Keep the optimistic value, for writes whose response carries no
/// resource (e.g. deletes).
pub struct KeepOptimistic;

impl<T: Clone, O> Reconcile<T, O> for KeepOptimistic {
    fn reconcile(&self, optimistic: &T, _server: &O) -> Reconciled<T> {
        Reconciled {
            value: optimistic.clone(),
            conflict: false,
        }
    }
}

/// Entities addressed by a database id.
pub trait Identified {
    fn id(&self) -> DbId;
}

impl Identified for Course {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Identified for Lesson {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Identified for JoinLink {
    fn id(&self) -> DbId {
        self.id
    }
}

/// In a cached list, the server's copy of the written item replaces the
/// optimistic one (or is appended if the list never had it).
pub struct ServerItemWins;

impl<E> Reconcile<Vec<E>, E> for ServerItemWins
where
    E: Identified + Clone + PartialEq,
{
    fn reconcile(&self, optimistic: &Vec<E>, server: &E) -> Reconciled<Vec<E>> {
        let mut value = optimistic.clone();
        let conflict = match value.iter_mut().find(|item| item.id() == server.id()) {
            Some(item) => {
                let differs = item != server;
                *item = server.clone();
                differs
            }
            None => {
                value.push(server.clone());
                true
            }
        };
        Reconciled { value, conflict }
    }
}
