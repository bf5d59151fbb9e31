//! Generation-tagged memo cell for one asynchronously computed value.
//!
//! A `Memo` owns a generation counter. Invalidation bumps the counter; any
//! value or in-flight computation tagged with an older generation is dead.
//! Concurrent readers of a live generation share a single computation, and a
//! computation that settles after its generation died is thrown away and
//! redone against the current upstream.

use super::loadable::{Loadable, Subscription};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tapdesk_core::Result;
use tokio::sync::watch;

type Computation<T> = Shared<BoxFuture<'static, Result<Arc<T>>>>;

enum Slot<T> {
    Empty,
    Pending {
        generation: u64,
        attempt: u64,
        computation: Computation<T>,
    },
    Ready {
        generation: u64,
        value: Arc<T>,
    },
}

struct MemoState<T> {
    generation: u64,
    /// Distinguishes retries started within one generation.
    attempts: u64,
    slot: Slot<T>,
}

pub struct Memo<T> {
    name: &'static str,
    state: Mutex<MemoState<T>>,
    publisher: watch::Sender<Loadable<Arc<T>>>,
}

impl<T: Send + Sync + 'static> Memo<T> {
    pub fn new(name: &'static str) -> Self {
        let (publisher, _) = watch::channel(Loadable::Loading);
        Self {
            name,
            state: Mutex::new(MemoState {
                generation: 0,
                attempts: 0,
                slot: Slot::Empty,
            }),
            publisher,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The live generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// The cached value, if it belongs to the live generation.
    pub fn peek(&self) -> Option<Arc<T>> {
        let state = self.lock();
        match &state.slot {
            Slot::Ready { generation, value } if *generation == state.generation => {
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// Whether a computation for the live generation is in flight.
    pub fn is_pending(&self) -> bool {
        let state = self.lock();
        matches!(
            &state.slot,
            Slot::Pending { generation, .. } if *generation == state.generation
        )
    }

    /// Marks the cached value stale and returns the new generation.
    ///
    /// In-flight computations keep running; their results are discarded.
    pub fn invalidate(&self) -> u64 {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.slot = Slot::Empty;
            state.generation
        };
        self.publisher.send_replace(Loadable::Loading);
        tracing::debug!("[Memo] {} invalidated (generation {})", self.name, generation);
        generation
    }

    pub fn subscribe(&self) -> Subscription<T>
    where
        T: Clone,
    {
        Subscription::new(self.publisher.subscribe())
    }

    pub fn subscribe_projected<U>(&self, project: fn(&T) -> U) -> Subscription<T, U> {
        Subscription::projected(self.publisher.subscribe(), project)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.publisher.receiver_count()
    }

    /// Returns the live value, joining or starting its computation if needed.
    ///
    /// `compute` only builds the future; upstream values must be read when the
    /// future is first polled so they are never older than the generation the
    /// result is tagged with.
    pub async fn get_or_compute<F>(&self, compute: F) -> Result<Arc<T>>
    where
        F: Fn() -> BoxFuture<'static, Result<T>>,
    {
        loop {
            let (generation, attempt, computation) = match self.join_or_start(&compute) {
                Ok(value) => return Ok(value),
                Err(running) => running,
            };

            let outcome = computation.await;

            if self.settle(generation, attempt, &outcome) {
                return outcome;
            }
            tracing::debug!(
                "[Memo] {} discarded result of superseded generation {}",
                self.name,
                generation
            );
        }
    }

    /// Returns the cached value, or the computation to await for it.
    fn join_or_start<F>(
        &self,
        compute: &F,
    ) -> std::result::Result<Arc<T>, (u64, u64, Computation<T>)>
    where
        F: Fn() -> BoxFuture<'static, Result<T>>,
    {
        let mut state = self.lock();
        let live = state.generation;
        match &state.slot {
            Slot::Ready { generation, value } if *generation == live => Ok(value.clone()),
            Slot::Pending {
                generation,
                attempt,
                computation,
            } if *generation == live => Err((live, *attempt, computation.clone())),
            _ => {
                tracing::debug!("[Memo] {} computing generation {}", self.name, live);
                state.attempts += 1;
                let attempt = state.attempts;
                let computation = compute().map(|result| result.map(Arc::new)).boxed().shared();
                state.slot = Slot::Pending {
                    generation: live,
                    attempt,
                    computation: computation.clone(),
                };
                Err((live, attempt, computation))
            }
        }
    }

    /// Commits `outcome` if `generation` is still live.
    ///
    /// Returns false when the generation died while the computation ran.
    fn settle(&self, generation: u64, attempt: u64, outcome: &Result<Arc<T>>) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }

        // Only the first waiter to settle commits; the rest find the slot
        // already replaced.
        let still_pending = matches!(
            &state.slot,
            Slot::Pending { attempt: pending, .. } if *pending == attempt
        );
        if !still_pending {
            return true;
        }

        match outcome {
            Ok(value) => {
                state.slot = Slot::Ready {
                    generation,
                    value: value.clone(),
                };
                self.publisher.send_replace(Loadable::Ready(value.clone()));
            }
            Err(err) => {
                tracing::warn!("[Memo] {} computation failed: {}", self.name, err);
                state.slot = Slot::Empty;
                self.publisher.send_replace(Loadable::Failed(err.clone()));
            }
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, MemoState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tapdesk_core::DeskError;
    use tokio::sync::Notify;

    fn counting(calls: &Arc<AtomicUsize>, value: u32) -> BoxFuture<'static, Result<u32>> {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(value)
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let memo = Memo::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let first = memo.get_or_compute(|| counting(&calls, 7)).await.unwrap();
        let second = memo.get_or_compute(|| counting(&calls, 8)).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_computation() {
        let memo = Memo::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            memo.get_or_compute(|| counting(&calls, 1)),
            memo.get_or_compute(|| counting(&calls, 1)),
            memo.get_or_compute(|| counting(&calls, 1)),
        );

        assert_eq!(*a.unwrap(), 1);
        assert_eq!(*b.unwrap(), 1);
        assert_eq!(*c.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let memo = Memo::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        memo.get_or_compute(|| counting(&calls, 1)).await.unwrap();
        assert_eq!(memo.invalidate(), 1);
        assert!(memo.peek().is_none());

        let value = memo.get_or_compute(|| counting(&calls, 2)).await.unwrap();
        assert_eq!(*value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_result_is_discarded() {
        let memo = Arc::new(Memo::new("test"));
        let gate = Arc::new(Notify::new());
        let source = Arc::new(AtomicUsize::new(1));

        let reader = {
            let memo = memo.clone();
            let gate = gate.clone();
            let source = source.clone();
            tokio::spawn(async move {
                memo.get_or_compute(|| {
                    let gate = gate.clone();
                    let source = source.clone();
                    async move {
                        let seen = source.load(Ordering::SeqCst) as u32;
                        if seen == 1 {
                            gate.notified().await;
                        }
                        Ok(seen)
                    }
                    .boxed()
                })
                .await
            })
        };

        // Let the reader start its computation against source value 1.
        while !memo.is_pending() {
            tokio::task::yield_now().await;
        }

        source.store(2, Ordering::SeqCst);
        memo.invalidate();
        gate.notify_one();

        let value = reader.await.unwrap().unwrap();
        assert_eq!(*value, 2);
        assert_eq!(*memo.peek().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let memo = Memo::new("test");
        let fail = Arc::new(std::sync::atomic::AtomicBool::new(true));

        let compute = || {
            let fail = fail.clone();
            async move {
                if fail.load(Ordering::SeqCst) {
                    Err(DeskError::upstream("roles", "timeout"))
                } else {
                    Ok(5u32)
                }
            }
            .boxed()
        };

        let err = memo.get_or_compute(compute).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(memo.peek().is_none());

        fail.store(false, Ordering::SeqCst);
        assert_eq!(*memo.get_or_compute(compute).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_subscribers_see_state_changes() {
        let memo = Memo::new("test");
        let mut subscription = memo.subscribe();
        assert!(subscription.current().is_loading());

        memo.get_or_compute(|| async { Ok(3u32) }.boxed())
            .await
            .unwrap();
        assert_eq!(subscription.current(), Loadable::Ready(3));

        memo.invalidate();
        assert!(subscription.changed().await.unwrap().is_loading());
        assert_eq!(memo.subscriber_count(), 1);
    }
}
