//! Snapshot-and-notify access to node values.

use std::sync::Arc;
use tapdesk_core::{DeskError, Result};
use tokio::sync::watch;

/// Observable state of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    /// Invalidated or never computed; a computation may be running.
    Loading,
    Ready(T),
    /// The last computation failed. The next read retries.
    Failed(DeskError),
}

impl<T> Loadable<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Ready(value) => Loadable::Ready(f(value)),
            Loadable::Failed(err) => Loadable::Failed(err),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    /// Converts a settled state into a `Result`; `None` while loading.
    pub fn into_result(self) -> Option<Result<T>> {
        match self {
            Loadable::Loading => None,
            Loadable::Ready(value) => Some(Ok(value)),
            Loadable::Failed(err) => Some(Err(err)),
        }
    }
}

/// A live view of one node, optionally projected.
///
/// `current()` never blocks; `changed()` resolves on the next state change
/// (invalidation, successful recomputation or failure).
pub struct Subscription<S, T = S> {
    receiver: watch::Receiver<Loadable<Arc<S>>>,
    project: fn(&S) -> T,
}

impl<S: Clone> Subscription<S, S> {
    pub(crate) fn new(receiver: watch::Receiver<Loadable<Arc<S>>>) -> Self {
        Self::projected(receiver, S::clone)
    }
}

impl<S, T> Subscription<S, T> {
    pub(crate) fn projected(
        receiver: watch::Receiver<Loadable<Arc<S>>>,
        project: fn(&S) -> T,
    ) -> Self {
        Self { receiver, project }
    }

    /// The current state of the node.
    pub fn current(&self) -> Loadable<T> {
        let snapshot = self.receiver.borrow().clone();
        snapshot.map(|value| (self.project)(&value))
    }

    /// Waits for the next state change and returns the new state.
    pub async fn changed(&mut self) -> Result<Loadable<T>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| DeskError::internal("session graph dropped"))?;
        let snapshot = self.receiver.borrow_and_update().clone();
        Ok(snapshot.map(|value| (self.project)(&value)))
    }

    /// Waits until the node is ready or failed.
    pub async fn settled(&mut self) -> Result<T> {
        loop {
            let snapshot = self.receiver.borrow_and_update().clone();
            if let Some(result) = snapshot.map(|value| (self.project)(&value)).into_result() {
                return result;
            }
            self.receiver
                .changed()
                .await
                .map_err(|_| DeskError::internal("session graph dropped"))?;
        }
    }
}
