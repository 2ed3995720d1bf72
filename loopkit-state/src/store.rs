//! Mutation-batching state store
//!
//! The store accumulates partial [`Patch`] writes and applies them in one
//! batched flush on a later event-loop turn, producing a fresh immutable
//! [`Snapshot`] and notifying subscribers. Flushes are edge-triggered by a
//! dirty flag, so at most one flush is ever outstanding per store.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::channel::oneshot;
use loopkit_defer::{CancelHandle, DeferOptions, Scheduler};

use crate::error::{Result, StoreError};
use crate::patch::Patch;
use crate::snapshot::{PropertyBag, Snapshot};

/// Process-wide counter assigning each store a diagnostic identity.
/// Never used for correctness.
static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(0);

/// Default window an [`Store::update`] caller waits for a flush.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_millis(200);

/// Construction-time configuration for a [`Store`]
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Flush synchronously on the same turn instead of deferring
    pub immediate_flush: bool,

    /// How long an [`Store::update`] caller waits before
    /// [`StoreError::FlushTimeout`]
    pub flush_timeout: Duration,

    /// Deferral scheduler driving non-immediate flushes
    pub scheduler: Scheduler,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            immediate_flush: false,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            scheduler: Scheduler::new(),
        }
    }
}

type SubscriberFn = dyn FnMut(&Snapshot, &Snapshot);

struct SubEntry {
    id: u64,
    /// `None` notifies on every flush; `Some` gates on listed keys.
    keys: Option<Vec<&'static str>>,
    callback: Rc<RefCell<SubscriberFn>>,
}

struct StoreInner {
    id: u64,
    options: StoreOptions,
    current: RefCell<Snapshot>,
    pending: RefCell<Vec<Patch>>,
    dirty: Cell<bool>,
    subscribers: RefCell<Vec<SubEntry>>,
    /// Tombstoned subscription ids, purged at the start of the next
    /// notification pass so an in-progress pass sees a stable list.
    removals: RefCell<HashSet<u64>>,
    /// One-shot next-flush listeners backing `update()`.
    waiters: RefCell<Vec<oneshot::Sender<Snapshot>>>,
    flush_handle: RefCell<Option<CancelHandle>>,
    next_sub_id: Cell<u64>,
    disposed: Cell<bool>,
}

/// Mutation-batching state container with key-scoped subscriptions
///
/// Clones share the same underlying store. All methods are synchronous;
/// only the future returned by [`Store::update`] suspends.
///
/// # Example
///
/// ```rust,ignore
/// use loopkit_state::{Patch, Property, Store};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Volume(u8);
/// impl Property for Volume {
///     const KEY: &'static str = "volume";
/// }
///
/// let store = Store::new(Patch::of(Volume(50)));
///
/// let sub = store.subscribe_keys(&["volume"], |next, _prev| {
///     println!("volume is now {:?}", next.get::<Volume>());
/// });
///
/// let flushed = store.update(Patch::of(Volume(75))).await?;
/// assert_eq!(flushed.get::<Volume>(), Some(Volume(75)));
/// sub.unsubscribe();
/// ```
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// Create a store seeded with `initial` (which may be partial)
    ///
    /// An initial flush is scheduled immediately, so subscribers attached
    /// right after construction observe the seeded state on the next turn.
    pub fn new(initial: Patch) -> Self {
        Self::with_options(initial, StoreOptions::default())
    }

    /// Create a store with explicit options
    pub fn with_options(initial: Patch, options: StoreOptions) -> Self {
        let mut bag = PropertyBag::default();
        initial.apply_to(&mut bag);

        let store = Self {
            inner: Rc::new(StoreInner {
                id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
                options,
                current: RefCell::new(Snapshot::from_bag(bag)),
                pending: RefCell::new(Vec::new()),
                dirty: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                removals: RefCell::new(HashSet::new()),
                waiters: RefCell::new(Vec::new()),
                flush_handle: RefCell::new(None),
                next_sub_id: Cell::new(0),
                disposed: Cell::new(false),
            }),
        };

        tracing::debug!(store = store.inner.id, "store created");
        store.mark_dirty();
        store
    }

    /// Diagnostic identity of this store (process-wide, monotonic)
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The current snapshot
    ///
    /// This is the live value, not a defensive copy: it shares identity
    /// with what the store holds until the next flush replaces it.
    pub fn get(&self) -> Snapshot {
        self.inner.current.borrow().clone()
    }

    /// Subscribe to every flush
    ///
    /// The callback receives `(next, prev)` snapshots. Dropping the
    /// returned [`Subscription`] does not detach; call
    /// [`Subscription::unsubscribe`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Snapshot, &Snapshot) + 'static,
    {
        self.register(None, callback)
    }

    /// Subscribe to flushes where at least one of `keys` changed value
    ///
    /// Gating compares each listed key between the pre- and post-flush
    /// snapshots and short-circuits on the first difference.
    pub fn subscribe_keys<F>(&self, keys: &[&'static str], callback: F) -> Subscription
    where
        F: FnMut(&Snapshot, &Snapshot) + 'static,
    {
        self.register(Some(keys.to_vec()), callback)
    }

    /// Queue a patch and await the next flushed snapshot ("update and await")
    ///
    /// The patch is queued synchronously in this call; the returned future
    /// resolves with the snapshot produced by the flush that applied it, or
    /// [`StoreError::FlushTimeout`] if no flush ran within the configured
    /// window. The timeout does not drop the patch.
    pub fn update(&self, patch: Patch) -> NextFlush {
        let (tx, rx) = oneshot::channel();

        if self.inner.disposed.get() {
            tracing::warn!(store = self.inner.id, "update on disposed store ignored");
            // Dropped sender resolves the future to Disposed.
        } else {
            tracing::trace!(store = self.inner.id, patch = ?patch, "patch queued");
            self.inner.pending.borrow_mut().push(patch);
            self.inner.waiters.borrow_mut().push(tx);
            self.mark_dirty();
        }

        NextFlush::new(rx, self.inner.options.flush_timeout)
    }

    /// Queue a patch and register `callback` as an ordinary subscription
    /// ("update and listen")
    ///
    /// Unlike [`Store::update`], the callback is not one-shot: it keeps
    /// firing on later flushes until unsubscribed.
    pub fn update_with<F>(&self, patch: Patch, callback: F) -> Subscription
    where
        F: FnMut(&Snapshot, &Snapshot) + 'static,
    {
        let subscription = self.register(None, callback);

        if !self.inner.disposed.get() {
            self.inner.pending.borrow_mut().push(patch);
            self.mark_dirty();
        }

        subscription
    }

    /// Dispose the store: cancel any scheduled flush, drop pending patches,
    /// reset the state to empty, and detach all subscribers
    ///
    /// Irreversible. Pending [`Store::update`] futures resolve
    /// [`StoreError::Disposed`]; later updates are ignored.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }

        if let Some(handle) = self.inner.flush_handle.borrow_mut().take() {
            handle.cancel();
        }
        self.inner.dirty.set(false);
        self.inner.pending.borrow_mut().clear();
        self.inner.subscribers.borrow_mut().clear();
        self.inner.removals.borrow_mut().clear();
        self.inner.waiters.borrow_mut().clear();
        *self.inner.current.borrow_mut() = Snapshot::empty();

        tracing::debug!(store = self.inner.id, "store disposed");
    }

    fn register<F>(&self, keys: Option<Vec<&'static str>>, callback: F) -> Subscription
    where
        F: FnMut(&Snapshot, &Snapshot) + 'static,
    {
        if self.inner.disposed.get() {
            tracing::warn!(store = self.inner.id, "subscribe on disposed store ignored");
            return Subscription {
                store: Weak::new(),
                id: 0,
            };
        }

        let id = self.inner.next_sub_id.get();
        self.inner.next_sub_id.set(id + 1);

        let callback: Rc<RefCell<SubscriberFn>> = Rc::new(RefCell::new(callback));
        self.inner
            .subscribers
            .borrow_mut()
            .push(SubEntry { id, keys, callback });

        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Raise the dirty flag and schedule a flush on its false-to-true edge.
    fn mark_dirty(&self) {
        if self.inner.dirty.get() || self.inner.disposed.get() {
            return;
        }
        self.inner.dirty.set(true);

        if self.inner.options.immediate_flush {
            Self::flush(&self.inner);
        } else {
            let inner = Rc::clone(&self.inner);
            let handle = self
                .inner
                .options
                .scheduler
                .defer(DeferOptions::default(), move || Self::flush(&inner));
            *self.inner.flush_handle.borrow_mut() = Some(handle);
        }
    }

    fn flush(inner: &Rc<StoreInner>) {
        if inner.disposed.get() {
            return;
        }

        inner.dirty.set(false);
        inner.flush_handle.borrow_mut().take();

        // From here, new updates start a fresh accumulation and re-raise
        // the dirty flag.
        let drained = std::mem::take(&mut *inner.pending.borrow_mut());
        let prev = inner.current.borrow().clone();

        // Fresh allocation even when nothing was drained or nothing
        // actually differs.
        let mut bag = prev.to_bag();
        for patch in &drained {
            patch.apply_to(&mut bag);
        }
        let next = Snapshot::from_bag(bag);
        *inner.current.borrow_mut() = next.clone();

        tracing::debug!(
            store = inner.id,
            patches = drained.len(),
            "flushed state"
        );

        let waiters = std::mem::take(&mut *inner.waiters.borrow_mut());
        for waiter in waiters {
            let _ = waiter.send(next.clone());
        }

        Self::notify(inner, &next, &prev);
    }

    fn notify(inner: &Rc<StoreInner>, next: &Snapshot, prev: &Snapshot) {
        // Purge tombstones from the previous pass, then take a stable pass
        // list so unsubscribing (or subscribing) inside a callback cannot
        // disturb this iteration.
        let pass: Vec<(Option<Vec<&'static str>>, Rc<RefCell<SubscriberFn>>)> = {
            let mut subscribers = inner.subscribers.borrow_mut();
            let mut removals = inner.removals.borrow_mut();
            if !removals.is_empty() {
                subscribers.retain(|entry| !removals.contains(&entry.id));
                removals.clear();
            }
            subscribers
                .iter()
                .map(|entry| (entry.keys.clone(), Rc::clone(&entry.callback)))
                .collect()
        };

        for (keys, callback) in pass {
            let fire = match &keys {
                None => true,
                Some(keys) => keys.iter().any(|key| next.key_changed(prev, key)),
            };
            if fire {
                (*callback.borrow_mut())(next, prev);
            }
        }
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("dirty", &self.inner.dirty.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

/// Handle detaching one subscription
///
/// Detachment is lazy: the entry is tombstoned now and purged at the start
/// of the next notification pass, which keeps an in-progress pass stable.
/// The callback will not fire on the next flush.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Detach this subscription
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            if inner.disposed.get() {
                return;
            }
            inner.removals.borrow_mut().insert(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Future returned by [`Store::update`], resolving with the next flushed
/// snapshot
pub struct NextFlush {
    inner: Pin<Box<dyn Future<Output = Result<Snapshot>>>>,
}

impl NextFlush {
    fn new(rx: oneshot::Receiver<Snapshot>, waited: Duration) -> Self {
        let inner = Box::pin(async move {
            match tokio::time::timeout(waited, rx).await {
                Ok(Ok(snapshot)) => Ok(snapshot),
                Ok(Err(_)) => Err(StoreError::Disposed),
                Err(_) => Err(StoreError::FlushTimeout { waited }),
            }
        });
        Self { inner }
    }
}

impl Future for NextFlush {
    type Output = Result<Snapshot>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use std::time::Duration;
    use tokio::task::LocalSet;

    #[derive(Clone, PartialEq, Debug)]
    struct Count(i64);

    impl Property for Count {
        const KEY: &'static str = "count";
    }

    #[derive(Clone, PartialEq, Debug)]
    struct Label(String);

    impl Property for Label {
        const KEY: &'static str = "label";
    }

    /// Long enough to pass the default frame-tier flush with time paused.
    const SETTLE: Duration = Duration::from_millis(50);

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_patches_merge_in_arrival_order() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(0)));
                tokio::time::sleep(SETTLE).await; // initial flush

                let _ = store.update(Patch::new().set(Count(1)).set(Label("a".into())));
                let _ = store.update(Patch::of(Count(2)));
                let _ = store.update(Patch::of(Label("b".into())));
                tokio::time::sleep(SETTLE).await;

                let snapshot = store.get();
                assert_eq!(snapshot.get::<Count>(), Some(Count(2)));
                assert_eq!(snapshot.get::<Label>(), Some(Label("b".into())));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_flush_produces_fresh_identity_even_without_changes() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(5)));
                tokio::time::sleep(SETTLE).await;
                let before = store.get();

                // Write the same value: nothing differs, identity must still
                // be replaced.
                store.update(Patch::of(Count(5))).await.unwrap();
                let after = store.get();

                assert!(!Snapshot::ptr_eq(&before, &after));
                assert_eq!(after.get::<Count>(), Some(Count(5)));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_batched_updates_notify_once_with_merged_state() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(0)));
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(RefCell::new(Vec::new()));
                let log = Rc::clone(&calls);
                store.subscribe(move |next, _prev| {
                    log.borrow_mut()
                        .push((next.get::<Count>(), next.get::<Label>()));
                });

                // Both land before the scheduled flush fires.
                let _ = store.update(Patch::of(Count(1)));
                let _ = store.update(Patch::of(Label("x".into())));
                tokio::time::sleep(SETTLE).await;

                assert_eq!(
                    *calls.borrow(),
                    vec![(Some(Count(1)), Some(Label("x".into())))]
                );
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_key_scoped_subscriber_gated_on_change() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(0)));
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&calls);
                store.subscribe_keys(&["count"], move |next, _prev| {
                    assert_eq!(next.get::<Count>(), Some(Count(2)));
                    counter.set(counter.get() + 1);
                });

                // Unrelated key: gated out.
                store.update(Patch::of(Label("y".into()))).await.unwrap();
                assert_eq!(calls.get(), 0);

                // Watched key changes: fires once with the merged state.
                store.update(Patch::of(Count(2))).await.unwrap();
                assert_eq!(calls.get(), 1);

                // Same value again: no change, no call.
                store.update(Patch::of(Count(2))).await.unwrap();
                assert_eq!(calls.get(), 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_keyless_subscriber_fires_on_every_flush() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(0)));
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&calls);
                store.subscribe(move |_next, _prev| counter.set(counter.get() + 1));

                store.update(Patch::of(Count(1))).await.unwrap();
                store.update(Patch::of(Count(1))).await.unwrap();
                assert_eq!(calls.get(), 2);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_unsubscribe_during_notify_keeps_pass_stable() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::new());
                tokio::time::sleep(SETTLE).await;

                let order = Rc::new(RefCell::new(Vec::new()));
                let victim: Rc<RefCell<Option<Subscription>>> =
                    Rc::new(RefCell::new(None));

                let log = Rc::clone(&order);
                let target = Rc::clone(&victim);
                store.subscribe(move |_n, _p| {
                    log.borrow_mut().push("first");
                    // Tombstone the later subscriber mid-pass.
                    if let Some(sub) = target.borrow_mut().take() {
                        sub.unsubscribe();
                    }
                });

                let log = Rc::clone(&order);
                let sub = store.subscribe(move |_n, _p| log.borrow_mut().push("second"));
                *victim.borrow_mut() = Some(sub);

                // First flush: both fire; the pass list was taken up front.
                store.update(Patch::of(Count(1))).await.unwrap();
                assert_eq!(*order.borrow(), vec!["first", "second"]);

                // Second flush: the tombstoned subscriber is gone.
                store.update(Patch::of(Count(2))).await.unwrap();
                assert_eq!(*order.borrow(), vec!["first", "second", "first"]);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_self_unsubscribe_inside_callback() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::new());
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(Cell::new(0u32));
                let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

                let counter = Rc::clone(&calls);
                let handle = Rc::clone(&own);
                let sub = store.subscribe(move |_n, _p| {
                    counter.set(counter.get() + 1);
                    if let Some(sub) = handle.borrow_mut().take() {
                        sub.unsubscribe();
                    }
                });
                *own.borrow_mut() = Some(sub);

                store.update(Patch::of(Count(1))).await.unwrap();
                store.update(Patch::of(Count(2))).await.unwrap();
                assert_eq!(calls.get(), 1, "one-shot via self-unsubscribe");
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_update_resolves_with_flushed_snapshot() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(0)));

                let flushed = store.update(Patch::of(Count(9))).await.unwrap();
                assert_eq!(flushed.get::<Count>(), Some(Count(9)));
                assert!(Snapshot::ptr_eq(&flushed, &store.get()));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_update_times_out_when_no_flush_occurs() {
        LocalSet::new()
            .run_until(async {
                // A frame period far beyond the flush timeout: the flush
                // will not run inside the window.
                let options = StoreOptions {
                    scheduler: Scheduler::with_periods(None, Some(Duration::from_secs(60))),
                    ..StoreOptions::default()
                };
                let store = Store::with_options(Patch::new(), options);

                let result = store.update(Patch::of(Count(1))).await;
                assert!(matches!(
                    result,
                    Err(StoreError::FlushTimeout { waited }) if waited == DEFAULT_FLUSH_TIMEOUT
                ));

                // The patch was not dropped: the late flush still applies it.
                tokio::time::sleep(Duration::from_secs(120)).await;
                assert_eq!(store.get().get::<Count>(), Some(Count(1)));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_update_with_registers_persistent_listener() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::new());
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&calls);
                let sub = store.update_with(Patch::of(Count(1)), move |_n, _p| {
                    counter.set(counter.get() + 1);
                });
                tokio::time::sleep(SETTLE).await;
                assert_eq!(calls.get(), 1);

                // Not one-shot: fires on the next flush too.
                store.update(Patch::of(Count(2))).await.unwrap();
                assert_eq!(calls.get(), 2);

                sub.unsubscribe();
                store.update(Patch::of(Count(3))).await.unwrap();
                assert_eq!(calls.get(), 2);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_immediate_flush_runs_on_same_turn() {
        LocalSet::new()
            .run_until(async {
                let options = StoreOptions {
                    immediate_flush: true,
                    ..StoreOptions::default()
                };
                let store = Store::with_options(Patch::of(Count(0)), options);

                let calls = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&calls);
                store.subscribe(move |_n, _p| counter.set(counter.get() + 1));

                let _ = store.update(Patch::of(Count(1)));
                // No await: the flush already happened synchronously.
                assert_eq!(calls.get(), 1);
                assert_eq!(store.get().get::<Count>(), Some(Count(1)));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_dispose_detaches_and_rejects_waiters() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::of(Count(1)));
                tokio::time::sleep(SETTLE).await;

                let calls = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&calls);
                store.subscribe(move |_n, _p| counter.set(counter.get() + 1));

                let pending = store.update(Patch::of(Count(2)));
                store.dispose();

                assert!(matches!(pending.await, Err(StoreError::Disposed)));
                assert!(store.get().is_empty());
                assert_eq!(calls.get(), 0);

                // Updates after dispose are ignored.
                let result = store.update(Patch::of(Count(3))).await;
                assert!(matches!(result, Err(StoreError::Disposed)));
                tokio::time::sleep(SETTLE).await;
                assert!(store.get().is_empty());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_clone_shares_store() {
        LocalSet::new()
            .run_until(async {
                let store = Store::new(Patch::new());
                let clone = store.clone();
                assert_eq!(store.id(), clone.id());

                clone.update(Patch::of(Count(4))).await.unwrap();
                assert_eq!(store.get().get::<Count>(), Some(Count(4)));
            })
            .await;
    }

    #[test]
    fn test_store_ids_are_monotonic() {
        let a = NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed);
        let b = NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed);
        assert!(b > a);
    }
}
