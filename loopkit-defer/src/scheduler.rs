//! Mechanism selection and cancellation for deferred callbacks

use std::time::Duration;

use tokio::task::AbortHandle;

/// Default period for the frame mechanism (~60fps).
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Default period for the idle mechanism.
///
/// Idle work is intentionally scheduled later than frame work: it should
/// only run once time-critical callbacks have had a chance to fire.
pub const DEFAULT_IDLE_PERIOD: Duration = Duration::from_millis(32);

/// Which underlying mechanism a `defer` call selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Idle-time scheduling (requested and available)
    Idle,
    /// Next paint-frame scheduling
    Frame,
    /// Immediate task on the next event-loop turn
    Task,
}

/// Per-call options for [`Scheduler::defer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferOptions {
    /// Prefer idle-time scheduling when the host provides it
    pub use_idle: bool,
}

impl DeferOptions {
    /// Options requesting idle-time scheduling
    pub fn idle() -> Self {
        Self { use_idle: true }
    }
}

/// Idempotent cancellation handle for a deferred callback
///
/// `cancel()` may be called any number of times; it is a no-op after the
/// first effective cancellation or once the callback has already fired.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    inner: AbortHandle,
}

impl CancelHandle {
    fn new(inner: AbortHandle) -> Self {
        Self { inner }
    }

    /// Cancel the deferred callback if it has not fired yet
    pub fn cancel(&self) {
        tracing::trace!("cancelling deferred callback");
        self.inner.abort();
    }

    /// Whether the deferred callback has already fired (or been cancelled)
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Deferral scheduler for a single-threaded event loop
///
/// Cheap to clone; a clone shares nothing but the facility configuration.
/// Hosts without an idle-time or frame facility are modeled by constructing
/// the scheduler with that facility absent, in which case `defer` falls
/// through to the next mechanism in the fallback chain.
///
/// # Example
///
/// ```rust,ignore
/// use loopkit_defer::{DeferOptions, Scheduler, Tier};
///
/// let scheduler = Scheduler::frame_only();
///
/// // Idle requested but unavailable: falls back to the frame tier.
/// assert_eq!(scheduler.tier_for(true), Tier::Frame);
///
/// scheduler.defer(DeferOptions::idle(), || println!("next frame"));
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    idle: Option<Duration>,
    frame: Option<Duration>,
}

impl Scheduler {
    /// Create a scheduler with both idle and frame facilities available
    pub fn new() -> Self {
        Self {
            idle: Some(DEFAULT_IDLE_PERIOD),
            frame: Some(DEFAULT_FRAME_PERIOD),
        }
    }

    /// Create a scheduler without an idle facility
    pub fn frame_only() -> Self {
        Self {
            idle: None,
            frame: Some(DEFAULT_FRAME_PERIOD),
        }
    }

    /// Create a scheduler with neither facility; every callback runs as an
    /// immediate task on the next loop turn
    pub fn immediate_only() -> Self {
        Self {
            idle: None,
            frame: None,
        }
    }

    /// Create a scheduler with explicit facility periods
    ///
    /// `None` marks the facility as unavailable on this host.
    pub fn with_periods(idle: Option<Duration>, frame: Option<Duration>) -> Self {
        Self { idle, frame }
    }

    /// The mechanism `defer` would select for the given request
    ///
    /// Selection policy, in priority order: idle if requested and
    /// available, else frame if available, else an immediate task.
    pub fn tier_for(&self, use_idle: bool) -> Tier {
        if use_idle && self.idle.is_some() {
            Tier::Idle
        } else if self.frame.is_some() {
            Tier::Frame
        } else {
            Tier::Task
        }
    }

    /// Defer `callback` to a later point on the event loop
    ///
    /// Exactly one mechanism is chosen per call (see [`Scheduler::tier_for`]).
    /// The returned handle cancels the callback if it has not fired yet.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub fn defer<F>(&self, options: DeferOptions, callback: F) -> CancelHandle
    where
        F: FnOnce() + 'static,
    {
        let tier = self.tier_for(options.use_idle);
        let delay = match tier {
            Tier::Idle => self.idle,
            Tier::Frame => self.frame,
            Tier::Task => None,
        };

        tracing::trace!(?tier, "deferring callback");

        let task = tokio::task::spawn_local(async move {
            match delay {
                Some(period) => tokio::time::sleep(period).await,
                None => tokio::task::yield_now().await,
            }
            callback();
        });

        CancelHandle::new(task.abort_handle())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[test]
    fn test_tier_selection_fallback_order() {
        let full = Scheduler::new();
        assert_eq!(full.tier_for(true), Tier::Idle);
        assert_eq!(full.tier_for(false), Tier::Frame);

        let no_idle = Scheduler::frame_only();
        assert_eq!(no_idle.tier_for(true), Tier::Frame);
        assert_eq!(no_idle.tier_for(false), Tier::Frame);

        let bare = Scheduler::immediate_only();
        assert_eq!(bare.tier_for(true), Tier::Task);
        assert_eq!(bare.tier_for(false), Tier::Task);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_deferred_callback_fires() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let flag = Rc::clone(&fired);

                let scheduler = Scheduler::new();
                scheduler.defer(DeferOptions::default(), move || flag.set(true));

                assert!(!fired.get(), "callback must not fire synchronously");
                tokio::time::sleep(DEFAULT_FRAME_PERIOD * 2).await;
                assert!(fired.get());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_immediate_tier_runs_on_next_turn() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let flag = Rc::clone(&fired);

                let scheduler = Scheduler::immediate_only();
                scheduler.defer(DeferOptions::default(), move || flag.set(true));

                assert!(!fired.get());
                // A couple of yields is enough for a Task-tier callback.
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                assert!(fired.get());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_idle_fires_later_than_frame() {
        LocalSet::new()
            .run_until(async {
                let order = Rc::new(std::cell::RefCell::new(Vec::new()));
                let scheduler = Scheduler::new();

                let log = Rc::clone(&order);
                scheduler.defer(DeferOptions::idle(), move || log.borrow_mut().push("idle"));
                let log = Rc::clone(&order);
                scheduler.defer(DeferOptions::default(), move || log.borrow_mut().push("frame"));

                tokio::time::sleep(DEFAULT_IDLE_PERIOD * 2).await;
                assert_eq!(*order.borrow(), vec!["frame", "idle"]);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_cancel_prevents_callback() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let flag = Rc::clone(&fired);

                let scheduler = Scheduler::new();
                let cancel = scheduler.defer(DeferOptions::default(), move || flag.set(true));
                cancel.cancel();

                tokio::time::sleep(DEFAULT_FRAME_PERIOD * 4).await;
                assert!(!fired.get());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_cancel_is_idempotent_and_safe_after_fire() {
        LocalSet::new()
            .run_until(async {
                let count = Rc::new(Cell::new(0u32));
                let counter = Rc::clone(&count);

                let scheduler = Scheduler::new();
                let cancel = scheduler.defer(DeferOptions::default(), move || {
                    counter.set(counter.get() + 1);
                });

                tokio::time::sleep(DEFAULT_FRAME_PERIOD * 2).await;
                assert_eq!(count.get(), 1);

                // Already fired: cancelling now is a no-op, repeatedly.
                cancel.cancel();
                cancel.cancel();
                assert_eq!(count.get(), 1);
                assert!(cancel.is_finished());
            })
            .await;
    }
}
