//! Idle/frame-driven batch draining over a backlog
//!
//! An [`IdleQueue`] wraps one [`Backlog`] and drains it in batches on later
//! event-loop turns. A single pending drain is ever scheduled; in blocking
//! mode the next drain additionally waits for the current hook's future to
//! settle, fully serializing batches.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use loopkit_defer::{CancelHandle, DeferOptions, Scheduler};

use crate::backlog::{Backlog, FifoBacklog, UniqueBacklog};

/// Default number of items taken per drain.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Construction-time configuration for an [`IdleQueue`]
#[derive(Debug, Clone)]
pub struct IdleQueueOptions {
    /// Prefer idle-time scheduling for drains
    pub use_idle: bool,

    /// Items taken from the front per drain
    pub batch_size: usize,

    /// Serialize batches on hook completion (full backpressure)
    pub block: bool,

    /// Deferral scheduler driving the drains
    pub scheduler: Scheduler,
}

impl Default for IdleQueueOptions {
    fn default() -> Self {
        Self {
            use_idle: false,
            batch_size: DEFAULT_BATCH_SIZE,
            block: false,
            scheduler: Scheduler::new(),
        }
    }
}

type TakeHook<T> = dyn FnMut(Vec<T>) -> LocalBoxFuture<'static, ()>;

struct QueueInner<T> {
    backlog: Box<dyn Backlog<T>>,
    hook: Option<Rc<RefCell<TakeHook<T>>>>,
    /// Cancel handle of the scheduled-but-not-fired drain; its presence
    /// guards against scheduling a second one.
    pending: Option<CancelHandle>,
    /// Blocking mode only: a hook invocation is still settling.
    in_flight: bool,
    options: IdleQueueOptions,
    destroyed: bool,
}

/// Batch-draining queue scheduler for a single-threaded event loop
///
/// Clones share the same queue. Items sit in the backlog until a hook is
/// installed; from then on every enqueue keeps exactly one drain scheduled
/// until the backlog empties.
///
/// In non-blocking mode successive hook futures may overlap: only the take
/// order (which item lands in which batch) is deterministic, not completion
/// order. In blocking mode batches are strictly serialized.
///
/// # Example
///
/// ```rust,ignore
/// use loopkit_queue::{IdleQueue, IdleQueueOptions};
///
/// let queue = IdleQueue::fifo(IdleQueueOptions {
///     batch_size: 16,
///     block: true,
///     ..IdleQueueOptions::default()
/// });
///
/// queue.on_take(|batch: Vec<String>| {
///     println!("draining {} items", batch.len());
/// });
///
/// queue.enqueue("hello".to_string());
/// ```
pub struct IdleQueue<T: 'static> {
    inner: Rc<RefCell<QueueInner<T>>>,
}

impl<T: 'static> IdleQueue<T> {
    /// Create a queue over ordered storage (duplicates allowed, FIFO)
    pub fn fifo(options: IdleQueueOptions) -> Self {
        Self::with_backlog(Box::new(FifoBacklog::new()), options)
    }

    /// Create a queue over caller-provided storage
    pub fn with_backlog(backlog: Box<dyn Backlog<T>>, options: IdleQueueOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueInner {
                backlog,
                hook: None,
                pending: None,
                in_flight: false,
                options,
                destroyed: false,
            })),
        }
    }

    /// Install or replace the processing hook (synchronous form)
    ///
    /// Affects future drains only. Items enqueued before any hook exists
    /// stay in the backlog until one is installed.
    pub fn on_take<F>(&self, mut hook: F)
    where
        F: FnMut(Vec<T>) + 'static,
    {
        self.on_take_async(move |batch| {
            hook(batch);
            futures::future::ready(()).boxed_local()
        });
    }

    /// Install or replace the processing hook (awaitable form)
    ///
    /// In blocking mode the next drain is not scheduled until the returned
    /// future settles.
    pub fn on_take_async<F>(&self, hook: F)
    where
        F: FnMut(Vec<T>) -> LocalBoxFuture<'static, ()> + 'static,
    {
        {
            let mut queue = self.inner.borrow_mut();
            if queue.destroyed {
                tracing::warn!("on_take on destroyed queue ignored");
                return;
            }
            let hook: Rc<RefCell<TakeHook<T>>> = Rc::new(RefCell::new(hook));
            queue.hook = Some(hook);
        }
        Self::request_drain(&self.inner);
    }

    /// Add an item and schedule a drain if none is pending
    pub fn enqueue(&self, item: T) {
        {
            let mut queue = self.inner.borrow_mut();
            if queue.destroyed {
                tracing::warn!("enqueue on destroyed queue ignored");
                return;
            }
            queue.backlog.add(item);
            tracing::trace!(len = queue.backlog.len(), "item enqueued");
        }
        Self::request_drain(&self.inner);
    }

    /// Number of items waiting in the backlog
    pub fn len(&self) -> usize {
        self.inner.borrow().backlog.len()
    }

    /// Whether the backlog is empty
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().backlog.is_empty()
    }

    /// Remove and return up to `n` items from the front, bypassing the hook
    pub fn take(&self, n: usize) -> Vec<T> {
        self.inner.borrow_mut().backlog.take(n)
    }

    /// Drop all queued items without draining them
    pub fn clear(&self) {
        self.inner.borrow_mut().backlog.clear();
    }

    /// Whether a drain is currently scheduled but has not fired
    pub fn drain_scheduled(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Destroy the queue: cancel a pending drain, drop queued items, and
    /// detach the hook
    ///
    /// Irreversible. An already-started hook invocation is never aborted;
    /// it runs to completion, and its continuation simply stops scheduling
    /// further drains.
    pub fn destroy(&self) {
        let mut queue = self.inner.borrow_mut();
        if queue.destroyed {
            return;
        }
        queue.destroyed = true;
        if let Some(handle) = queue.pending.take() {
            handle.cancel();
        }
        queue.backlog.clear();
        queue.hook = None;
        tracing::debug!("queue destroyed");
    }

    /// Schedule a drain unless one is pending, a blocking hook is still in
    /// flight, no hook is installed, or there is nothing to drain.
    fn request_drain(inner: &Rc<RefCell<QueueInner<T>>>) {
        let mut queue = inner.borrow_mut();
        if queue.destroyed
            || queue.pending.is_some()
            || queue.in_flight
            || queue.hook.is_none()
            || queue.backlog.is_empty()
        {
            return;
        }

        let shared = Rc::clone(inner);
        let defer = DeferOptions {
            use_idle: queue.options.use_idle,
        };
        let handle = queue
            .options
            .scheduler
            .defer(defer, move || Self::drain(&shared));
        queue.pending = Some(handle);
        tracing::trace!("drain scheduled");
    }

    fn drain(inner: &Rc<RefCell<QueueInner<T>>>) {
        let (batch, hook, block) = {
            let mut queue = inner.borrow_mut();
            queue.pending = None;
            if queue.destroyed {
                return;
            }
            let size = queue.options.batch_size.max(1);
            let batch = queue.backlog.take(size);
            let block = queue.options.block;
            // Reserve the in-flight slot before the hook gets a chance to
            // run: a hook that enqueues from its synchronous prologue must
            // not book an overlapping drain.
            if block {
                queue.in_flight = true;
            }
            (batch, queue.hook.clone(), block)
        };

        let Some(hook) = hook else {
            if block {
                inner.borrow_mut().in_flight = false;
            }
            return;
        };
        if batch.is_empty() {
            if block {
                inner.borrow_mut().in_flight = false;
            }
            return;
        }

        tracing::debug!(batch = batch.len(), "draining batch");

        // The hook borrow is scoped to the invocation itself, so the hook
        // is free to call back into the queue.
        let fut = (*hook.borrow_mut())(batch);

        if block {
            let shared = Rc::clone(inner);
            tokio::task::spawn_local(async move {
                fut.await;
                shared.borrow_mut().in_flight = false;
                Self::request_drain(&shared);
            });
        } else {
            // Fire and forget: completion order across batches is not
            // guaranteed, only take order.
            tokio::task::spawn_local(fut);
            Self::request_drain(inner);
        }
    }
}

impl<T: Hash + Eq + 'static> IdleQueue<T> {
    /// Create a queue over insertion-ordered unique storage
    ///
    /// Re-enqueueing an item already waiting in the backlog collapses into
    /// the existing entry at its original position.
    pub fn unique(options: IdleQueueOptions) -> Self {
        Self::with_backlog(Box::new(UniqueBacklog::new()), options)
    }
}

impl<T: 'static> Clone for IdleQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> std::fmt::Debug for IdleQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queue = self.inner.borrow();
        f.debug_struct("IdleQueue")
            .field("len", &queue.backlog.len())
            .field("pending", &queue.pending.is_some())
            .field("destroyed", &queue.destroyed)
            .finish()
    }
}
